use crate::core::{TestCase, TestId};
use crate::formatting::Styler;
use crate::priority::Prioritization;
use crate::scoring::{RiskLevel, ScoreMode, ScoredTest};
use crate::validation::{ValidationReport, ValidationRun};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

/// Rows shown by the terminal priority table.
pub const TERMINAL_TOP_N: usize = 10;

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_prioritization(
        &mut self,
        prioritization: &Prioritization,
        testcases: &[TestCase],
    ) -> anyhow::Result<()>;

    fn write_validation(&mut self, run: &ValidationRun) -> anyhow::Result<()>;
}

/// One row of a rendered priority list.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub test_id: TestId,
    pub name: &'a str,
    pub score: f64,
    pub risk: RiskLevel,
    pub reason: &'a str,
}

/// Legacy scores use the risk thresholds directly; combined scores live in
/// [0, 1] and are scaled onto the same 0-10 range first.
pub fn risk_level(scored: &ScoredTest) -> RiskLevel {
    match scored.mode {
        ScoreMode::Legacy => RiskLevel::from_score(scored.score),
        ScoreMode::Combined => RiskLevel::from_score(scored.score * 10.0),
    }
}

pub fn ranked_entries<'a>(
    prioritization: &'a Prioritization,
    testcases: &'a [TestCase],
) -> Vec<RankedEntry<'a>> {
    let names: HashMap<TestId, &str> = testcases
        .iter()
        .map(|tc| (tc.id, tc.name.as_str()))
        .collect();

    prioritization
        .ranked()
        .enumerate()
        .map(|(index, (id, scored))| RankedEntry {
            rank: index + 1,
            test_id: id,
            name: names.get(&id).copied().unwrap_or(""),
            score: scored.map(|s| s.score).unwrap_or(0.0),
            risk: scored.map(risk_level).unwrap_or(RiskLevel::Low),
            reason: scored.map(|s| s.reason.as_str()).unwrap_or(""),
        })
        .collect()
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_prioritization(
        &mut self,
        prioritization: &Prioritization,
        testcases: &[TestCase],
    ) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&ranked_entries(prioritization, testcases))?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn write_validation(&mut self, run: &ValidationRun) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(run)?;
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_prioritization(
        &mut self,
        prioritization: &Prioritization,
        testcases: &[TestCase],
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "# Test Priority")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Rank | Test | Name | Score | Risk | Reason |")?;
        writeln!(self.writer, "|------|------|------|-------|------|--------|")?;
        for entry in ranked_entries(prioritization, testcases) {
            writeln!(
                self.writer,
                "| {} | {} | {} | {:.4} | {} | {} |",
                entry.rank,
                entry.test_id,
                entry.name,
                entry.score,
                entry.risk.as_str(),
                entry.reason
            )?;
        }
        Ok(())
    }

    fn write_validation(&mut self, run: &ValidationRun) -> anyhow::Result<()> {
        writeln!(self.writer, "# Validation Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated {}",
            run.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        for result in &run.datasets {
            writeln!(self.writer)?;
            writeln!(self.writer, "## {}", result.dataset)?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{} tests, {} failing",
                result.total_tests, result.failing_tests
            )?;
            match (&result.report, &result.error) {
                (Some(report), _) => self.write_report(report)?,
                (None, Some(error)) => writeln!(self.writer, "\nSkipped: {}", error)?,
                (None, None) => {}
            }
        }
        Ok(())
    }
}

impl<W: Write> MarkdownWriter<W> {
    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "| Ordering | APFD |")?;
        writeln!(self.writer, "|----------|------|")?;
        for (key, apfd) in &report.apfd_scores {
            writeln!(self.writer, "| {} | {:.4} |", key.trim_end_matches("_apfd"), apfd)?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "| k | Faults found (%) | Precision (%) |")?;
        writeln!(self.writer, "|---|------------------|---------------|")?;
        for (k, efd) in &report.early_fault_detection {
            let precision = report.precision_at_k.get(k).copied().unwrap_or_default();
            writeln!(self.writer, "| {} | {:.2} | {:.2} |", k, efd, precision)?;
        }
        writeln!(self.writer)?;
        writeln!(self.writer, "- Wasted effort: {}", report.wasted_effort)?;
        writeln!(self.writer, "- Time saved: {:.2}s", report.time_saved)?;
        writeln!(self.writer, "- Lift over random: {:.2}x", report.lift_factor)?;
        let early = report.failing_tests_found_earlier_top_20_percent;
        writeln!(
            self.writer,
            "- Failing tests in top 20%: {} (random {})",
            early.agentic, early.random
        )?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    styler: Styler,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, styler: Styler) -> Self {
        Self { writer, styler }
    }

    fn rule(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "-".repeat(RULE_WIDTH))?;
        Ok(())
    }

    fn write_report(&mut self, report: &ValidationReport) -> anyhow::Result<()> {
        let agentic = report.agentic_apfd;
        for (key, apfd) in &report.apfd_scores {
            let name = format!("{:<16}", key.trim_end_matches("_apfd"));
            let value = format!("{:.4}", apfd);
            let value = if key == "agentic_apfd" {
                self.styler.bold(&value)
            } else if *apfd > agentic {
                self.styler.bad(&value)
            } else {
                value
            };
            writeln!(self.writer, "  {} {}", name, value)?;
        }

        writeln!(self.writer)?;
        for (k, efd) in &report.early_fault_detection {
            let precision = report.precision_at_k.get(k).copied().unwrap_or_default();
            writeln!(
                self.writer,
                "  top {:<4} faults found {:>6.2}%  precision {:>6.2}%",
                k, efd, precision
            )?;
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "  Wasted effort:   {}", report.wasted_effort)?;
        let saved = format!("{:.2}s", report.time_saved);
        let saved = if report.time_saved >= 0.0 {
            self.styler.good(&saved)
        } else {
            self.styler.bad(&saved)
        };
        writeln!(self.writer, "  Time saved:      {}", saved)?;
        writeln!(self.writer, "  Lift factor:     {:.2}x", report.lift_factor)?;
        let early = report.failing_tests_found_earlier_top_20_percent;
        writeln!(
            self.writer,
            "  Top 20% faults:  {} agentic vs {} random",
            early.agentic, early.random
        )?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_prioritization(
        &mut self,
        prioritization: &Prioritization,
        testcases: &[TestCase],
    ) -> anyhow::Result<()> {
        let entries = ranked_entries(prioritization, testcases);

        writeln!(self.writer)?;
        self.rule()?;
        writeln!(
            self.writer,
            "{}",
            self.styler.header(&format!(
                "{:<6} {:<8} {:<8} {:<8} {:<40}",
                "Rank", "TestID", "Score", "Risk", "Reason"
            ))
        )?;
        self.rule()?;

        for entry in entries.iter().take(TERMINAL_TOP_N) {
            writeln!(
                self.writer,
                "{:<6} {:<8} {:<8} {} {:<40}",
                entry.rank,
                entry.test_id,
                format!("{:.4}", entry.score),
                self.styler.risk_label(entry.risk, 8),
                entry.reason
            )?;
        }

        if entries.len() > TERMINAL_TOP_N {
            writeln!(
                self.writer,
                "{}",
                self.styler
                    .dim(&format!("... and {} more tests", entries.len() - TERMINAL_TOP_N))
            )?;
        }

        self.rule()?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_validation(&mut self, run: &ValidationRun) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.styler.header("Validation Report"))?;
        writeln!(self.writer, "{}", self.styler.header("================="))?;
        writeln!(
            self.writer,
            "{}",
            self.styler.dim(&run.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        )?;

        for result in &run.datasets {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{} ({} tests, {} failing)",
                self.styler.bold(&result.dataset),
                result.total_tests,
                result.failing_tests
            )?;
            match (&result.report, &result.error) {
                (Some(report), _) => self.write_report(report)?,
                (None, Some(error)) => {
                    writeln!(self.writer, "  {}", self.styler.dim(&format!("Skipped: {}", error)))?
                }
                (None, None) => {}
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

pub fn create_writer(format: OutputFormat, styler: Styler) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(std::io::stdout())),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(std::io::stdout())),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(std::io::stdout(), styler)),
    }
}
