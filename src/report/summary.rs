//! Per-run outcome tracking and the summary table shown after each tool

use std::path::{Path, PathBuf};

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

/// What happened to a single selected item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The item was processed; `output` is the artifact written, if any
    Succeeded { output: Option<PathBuf> },
    /// The item was deliberately left alone
    Skipped { reason: String },
    /// Processing the item failed
    Failed { reason: String },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub item: PathBuf,
    pub outcome: Outcome,
}

/// Outcomes of one pipeline run, in processing order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub action: String,
    pub items: Vec<ItemReport>,
}

impl RunReport {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            items: Vec::new(),
        }
    }

    pub fn record(&mut self, item: &Path, outcome: Outcome) {
        self.items.push(ItemReport {
            item: item.to_path_buf(),
            outcome,
        });
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Failed { .. }))
            .count()
    }

    /// Reasons given for failed items, in processing order.
    pub fn failure_reasons(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|i| match &i.outcome {
                Outcome::Failed { reason } => Some(reason.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Output paths of the successful items, deduplicated in order.
    pub fn outputs(&self) -> Vec<&Path> {
        let mut outputs: Vec<&Path> = Vec::new();
        for item in &self.items {
            if let Outcome::Succeeded {
                output: Some(path),
            } = &item.outcome
            {
                if !outputs.contains(&path.as_path()) {
                    outputs.push(path.as_path());
                }
            }
        }
        outputs
    }

    /// Aggregate line, e.g. "2 of 3 succeeded".
    pub fn summary_line(&self) -> String {
        format!("{} of {} succeeded", self.succeeded(), self.total())
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style(self.action.to_uppercase()).white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Selected"), Cell::new(self.total())]);

        table.add_row(vec![
            Cell::new("✅ Succeeded"),
            Cell::new(self.succeeded())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        if self.skipped() > 0 {
            table.add_row(vec![
                Cell::new("⏭️  Skipped"),
                Cell::new(self.skipped()).fg(Color::Yellow),
            ]);
        }

        table.add_row(vec![
            Cell::new("❌ Failed"),
            Cell::new(self.failed()).fg(if self.failed() == 0 {
                Color::White
            } else {
                Color::Red
            }),
        ]);

        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        let failures: Vec<&ItemReport> = self
            .items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Failed { .. }))
            .collect();

        if !failures.is_empty() {
            println!();
            println!(
                "      {} {}:",
                style("Failures").yellow(),
                style(format!("({})", failures.len())).dim()
            );
            for failure in failures {
                if let Outcome::Failed { reason } = &failure.outcome {
                    println!(
                        "        {} {}: {}",
                        style("•").dim(),
                        display_name(&failure.item),
                        reason
                    );
                }
            }
        }

        println!();
        println!("    {}", style(self.summary_line()).bold());
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunReport {
        let mut report = RunReport::new("Protect PDF");
        report.record(
            Path::new("a.pdf"),
            Outcome::Succeeded {
                output: Some(PathBuf::from("a_protected.pdf")),
            },
        );
        report.record(
            Path::new("b.pdf"),
            Outcome::Failed {
                reason: "broken xref".to_string(),
            },
        );
        report.record(
            Path::new("c.pdf"),
            Outcome::Skipped {
                reason: "not encrypted".to_string(),
            },
        );
        report
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.summary_line(), "1 of 3 succeeded");
    }

    #[test]
    fn test_outputs_are_deduplicated() {
        let mut report = RunReport::new("Merge PDFs");
        for name in ["a.pdf", "b.pdf"] {
            report.record(
                Path::new(name),
                Outcome::Succeeded {
                    output: Some(PathBuf::from("merged.pdf")),
                },
            );
        }
        assert_eq!(report.outputs(), vec![Path::new("merged.pdf")]);
    }

    #[test]
    fn test_empty_report() {
        let report = RunReport::new("Sort by type");
        assert_eq!(report.summary_line(), "0 of 0 succeeded");
        assert!(report.outputs().is_empty());
    }
}
