use pretty_assertions::assert_eq;
use testprio::core::{Error, FeedbackEntry, LastResult, TestCase};
use testprio::io::parse_testcases;
use testprio::priority::Prioritizer;
use testprio::scoring::ScoreMode;

fn gui_test(id: u64, component: &str, ui_element: &str, selector: &str) -> TestCase {
    TestCase::new(id, format!("{} test", component))
        .with_component(component)
        .with_ui_element(ui_element)
        .with_selector(selector)
        .with_execution_time(1.0)
}

#[test]
fn test_critic_demotes_high_scoring_unrelated_test() {
    let tests = vec![
        gui_test(1, "Search", "textbox", "#q"),
        gui_test(2, "Login", "link", "#login-link"),
    ];
    // Two recent failures push the search test well above the login test
    let feedback = vec![FeedbackEntry::fail(1), FeedbackEntry::fail(1)];

    let result = Prioritizer::default()
        .with_frc(false)
        .prioritize(&tests, "Login page update", &feedback, &[])
        .unwrap();

    assert_eq!(result.scores[&1].score, 10.0);
    assert_eq!(result.scores[&2].score, 5.0);
    assert_eq!(result.scores[&1].mode, ScoreMode::Legacy);
    assert_eq!(result.order, vec![2, 1]);
}

#[test]
fn test_advisory_order_breaks_score_ties() {
    let tests = vec![
        gui_test(1, "Footer", "link", "a.home"),
        gui_test(2, "Footer", "link", "a.about"),
        gui_test(3, "Footer", "link", "a.jobs"),
    ];
    let prioritizer = Prioritizer::default().with_frc(false);

    let advised = prioritizer
        .prioritize(&tests, "Login tweaks", &[], &[3, 1, 2])
        .unwrap();
    assert_eq!(advised.order, vec![3, 1, 2]);

    let unadvised = prioritizer.prioritize(&tests, "Login tweaks", &[], &[]).unwrap();
    assert_eq!(unadvised.order, vec![1, 2, 3]);
}

#[test]
fn test_advisory_ignores_unknown_and_repeated_ids() {
    let tests = vec![
        gui_test(1, "Footer", "link", "a.home"),
        gui_test(2, "Footer", "link", "a.about"),
    ];
    let result = Prioritizer::default()
        .with_frc(false)
        .prioritize(&tests, "", &[], &[42, 2, 1, 2])
        .unwrap();
    assert_eq!(result.order, vec![2, 1]);
}

#[test]
fn test_combined_scores_are_bounded() {
    let tests = vec![
        gui_test(1, "Checkout", "button", "#pay"),
        gui_test(2, "Footer", "link", "a.legal").with_flaky(true),
        gui_test(3, "Login", "textbox", "div > div > span.input"),
    ];
    let feedback = vec![
        FeedbackEntry::fail(2),
        FeedbackEntry::pass(2),
        FeedbackEntry::fail(3),
    ];

    let result = Prioritizer::default()
        .prioritize(&tests, "Checkout and login flow", &feedback, &[])
        .unwrap();

    assert_eq!(result.len(), 3);
    for (_, scored) in result.ranked() {
        let scored = scored.unwrap();
        assert_eq!(scored.mode, ScoreMode::Combined);
        assert!((0.0..=1.0).contains(&scored.score), "{}", scored.score);
        assert!(scored.reason.contains("Combined:"));
    }
    // the footer test is unrelated to the change and sinks to the end
    assert_eq!(result.order.last(), Some(&2));
}

#[test]
fn test_parallel_and_sequential_scoring_agree() {
    let tests: Vec<TestCase> = (1..=40)
        .map(|id| {
            let component = if id % 3 == 0 { "Cart" } else { "Header" };
            gui_test(id, component, "button", &format!("#b{}", id))
                .with_execution_time((id % 7) as f64)
        })
        .collect();
    let feedback: Vec<FeedbackEntry> = (1..=40)
        .filter(|id| id % 4 == 0)
        .map(FeedbackEntry::fail)
        .collect();

    let parallel = Prioritizer::default()
        .with_parallel(true)
        .prioritize(&tests, "Cart badge", &feedback, &[])
        .unwrap();
    let sequential = Prioritizer::default()
        .with_parallel(false)
        .prioritize(&tests, "Cart badge", &feedback, &[])
        .unwrap();

    assert_eq!(parallel, sequential);
}

#[test]
fn test_missing_required_field_is_reported() {
    let tests = vec![
        gui_test(1, "Login", "button", "#go"),
        TestCase::new(2, "incomplete").with_component("Cart"),
    ];
    let err = Prioritizer::default()
        .prioritize(&tests, "Cart", &[], &[])
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { .. }), "{:?}", err);
}

#[test]
fn test_prioritize_loaded_batch() {
    let tests = parse_testcases(
        r##"[
            {"id": 1, "name": "Add to cart", "component": "Cart", "selector": "#add",
             "ui_element": "button", "execution_time": 2.5, "last_result": "pass"},
            {"id": 2, "name": "Newsletter", "component": "Footer", "selector": "#news",
             "ui_element": "textbox", "execution_time": 5.0, "last_result": "fail"}
        ]"##,
    )
    .unwrap();
    assert_eq!(tests[1].last_result, LastResult::Fail);

    let result = Prioritizer::default()
        .prioritize(&tests, "Cart total fix", &[], &[])
        .unwrap();
    assert_eq!(result.order, vec![1, 2]);
}
