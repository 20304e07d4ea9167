use assert_cmd::Command;
use indoc::indoc;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DATASET: &str = indoc! {r##"
    [
        {"id": 1, "name": "Login submit", "component": "Login", "selector": "#submit",
         "ui_element": "button", "execution_time": 1.5, "last_result": "fail"},
        {"id": 2, "name": "Footer links", "component": "Footer", "selector": "footer a",
         "ui_element": "link", "execution_time": 0.5, "last_result": "pass"},
        {"id": 3, "name": "Cart badge", "component": "Cart", "selector": "#badge",
         "ui_element": "label", "execution_time": 2.0, "last_result": "pass"},
        {"id": 4, "name": "Login remember me", "component": "Login", "selector": "#remember",
         "ui_element": "checkbox", "execution_time": 1.0, "last_result": "pass"},
        {"id": 5, "name": "Search box", "component": "Search", "selector": "input[name=q]",
         "ui_element": "textbox", "execution_time": 3.0, "last_result": "pass"}
    ]
"##};

fn testprio(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_testprio"));
    cmd.current_dir(dir).env_remove("TESTPRIO_SEED");
    cmd
}

fn write_dataset(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_rank_json_output() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(dir.path(), "batch.json", DATASET);

    let output = testprio(dir.path())
        .args(["rank", "--change", "Login form validation", "--format", "json"])
        .arg(&dataset)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let ranked: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ranked = ranked.as_array().unwrap();
    assert_eq!(ranked.len(), 5);
    assert_eq!(ranked[0]["rank"], 1);
    // both login tests outrank everything unrelated to the change
    let top_two: Vec<u64> = ranked[..2]
        .iter()
        .map(|entry| entry["test_id"].as_u64().unwrap())
        .collect();
    assert!(top_two.contains(&1) && top_two.contains(&4), "{:?}", top_two);
}

#[test]
fn test_rank_terminal_output_plain() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(dir.path(), "batch.json", DATASET);

    let output = testprio(dir.path())
        .args(["rank", "--plain", "--no-frc", "-c", "Cart"])
        .arg(&dataset)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Rank"), "{}", stdout);
    assert!(!stdout.contains('\u{1b}'), "plain output has no escape codes");
}

#[test]
fn test_rank_rejects_non_list_batch() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(dir.path(), "bad.json", r#"{"id": 1}"#);

    testprio(dir.path())
        .args(["rank", "--change", "Login"])
        .arg(&dataset)
        .assert()
        .failure();
}

#[test]
fn test_validate_json_report() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(dir.path(), "login_suite.json", DATASET);

    let output = testprio(dir.path())
        .args(["validate", "--seed", "42", "--format", "json", "-k", "1,2"])
        .args(["--change", "Login form validation"])
        .arg(&dataset)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let run: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let result = &run["datasets"][0];
    assert_eq!(result["dataset"], "login_suite");
    assert_eq!(result["total_tests"], 5);
    assert_eq!(result["failing_tests"], 1);

    let report = &result["report"];
    assert_eq!(report["apfd_scores"].as_object().unwrap().len(), 7);
    assert!(report["precision_at_k"].get("1").is_some());
    assert!(report["precision_at_k"].get("2").is_some());
    assert!(run.get("generated_at").is_some());
}

#[test]
fn test_validate_fixed_order() {
    let dir = TempDir::new().unwrap();
    let dataset = write_dataset(dir.path(), "suite.json", DATASET);
    let order = write_dataset(dir.path(), "order.json", "[1, 2, 3, 4, 5]");

    let output = testprio(dir.path())
        .args(["validate", "--seed", "1", "--format", "json", "--order"])
        .arg(&order)
        .arg(&dataset)
        .output()
        .unwrap();
    assert!(output.status.success());

    let run: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &run["datasets"][0]["report"];
    // the only failing test runs first: 1 - 1/5 + 1/10
    assert_eq!(report["agentic_apfd"], 0.9);
    assert_eq!(report["wasted_effort"], 0);
}

#[test]
fn test_record_appends_feedback() {
    let dir = TempDir::new().unwrap();

    testprio(dir.path()).args(["record", "3", "fail"]).assert().success();
    testprio(dir.path()).args(["record", "3", "pass"]).assert().success();

    let memory = fs::read_to_string(dir.path().join("memory.json")).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&memory).unwrap();
    assert_eq!(
        entries,
        serde_json::json!([
            {"test_id": 3, "result": "fail"},
            {"test_id": 3, "result": "pass"}
        ])
    );
}

#[test]
fn test_init_creates_config_once() {
    let dir = TempDir::new().unwrap();

    testprio(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".testprio.toml").exists());

    testprio(dir.path()).arg("init").assert().failure();
    testprio(dir.path()).args(["init", "--force"]).assert().success();
}
