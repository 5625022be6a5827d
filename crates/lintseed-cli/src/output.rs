//! Output formatting and reporting
//!
//! Printing of lint findings and discovery decisions, plus the progress bar
//! used as a discovery progress sink.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use lintseed_core::{Finding, LintseedError, ProgressSink, Result, RuleDecision, Severity};

use crate::OutputFormat;

/// Summary statistics for linting results
#[derive(Debug, Clone, Default)]
pub struct LintSummary {
    pub files_checked: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl LintSummary {
    pub fn from_findings(files_checked: usize, findings: &[Finding]) -> Self {
        let errors = findings.iter().filter(|f| f.is_error()).count();
        Self {
            files_checked,
            errors,
            warnings: findings.len() - errors,
        }
    }

    pub fn total_issues(&self) -> usize {
        self.errors + self.warnings
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format and print linting results
    pub fn print_results(&self, findings: &[Finding], summary: &LintSummary) -> Result<()> {
        match self.format {
            OutputFormat::Human => self.print_human_format(findings, summary),
            OutputFormat::Json => self.print_json_format(findings, summary),
            OutputFormat::Compact => self.print_compact_format(summary),
            OutputFormat::Github => self.print_github_format(findings),
        }
    }

    fn print_human_format(&self, findings: &[Finding], summary: &LintSummary) -> Result<()> {
        let mut current_path = None;
        for finding in findings {
            if current_path != Some(finding.path()) {
                println!("\n{}", finding.path().display().to_string().underline());
                current_path = Some(finding.path());
            }
            let severity = match finding.severity {
                Severity::Error => "error".red(),
                _ => "warning".yellow(),
            };
            println!(
                "  {:>4}:{:<3} {:<7} {}  {}",
                finding.line,
                finding.column,
                severity,
                finding.message,
                finding.rule_id.dimmed()
            );
        }

        self.print_summary_human(summary);
        Ok(())
    }

    fn print_summary_human(&self, summary: &LintSummary) {
        println!("\n{}", "Summary:".bold());
        println!("  Files checked: {}", summary.files_checked);

        if summary.has_issues() {
            println!("  Issues found:");
            if summary.errors > 0 {
                println!("    Errors: {}", summary.errors.to_string().red());
            }
            if summary.warnings > 0 {
                println!("    Warnings: {}", summary.warnings.to_string().yellow());
            }
        } else {
            println!("  {} No issues found", "✅".green());
        }
    }

    fn print_json_format(&self, findings: &[Finding], summary: &LintSummary) -> Result<()> {
        let result = serde_json::json!({
            "files_checked": summary.files_checked,
            "issues": findings,
            "summary": {
                "errors": summary.errors,
                "warnings": summary.warnings,
                "total": summary.total_issues(),
            }
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&result).map_err(|e| {
                LintseedError::internal_error(format!("Failed to serialize JSON: {e}"))
            })?
        );
        Ok(())
    }

    fn print_compact_format(&self, summary: &LintSummary) -> Result<()> {
        if summary.has_issues() {
            println!(
                "lintseed: {} files, {} issues ({} errors, {} warnings)",
                summary.files_checked,
                summary.total_issues(),
                summary.errors,
                summary.warnings
            );
        } else {
            println!("lintseed: {} files checked, no issues", summary.files_checked);
        }
        Ok(())
    }

    fn print_github_format(&self, findings: &[Finding]) -> Result<()> {
        for finding in findings {
            let level = match finding.severity {
                Severity::Error => "error",
                _ => "warning",
            };
            println!(
                "::{} file={},line={},col={}::{} ({})",
                level,
                finding.path().display(),
                finding.line,
                finding.column,
                finding.message,
                finding.rule_id
            );
        }
        Ok(())
    }
}

/// Print one line per rule decision
pub fn print_decisions(decisions: &[RuleDecision]) {
    println!("{}", "Decisions:".bold());
    for decision in decisions {
        let marker = if decision.setting.is_enabled() {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("  {marker} {decision}");
    }
    println!();
}

/// Terminal progress bar fed by discovery progress increments
pub struct ProgressReporter {
    bar: ProgressBar,
    done: f64,
}

/// Resolution of the bar; increments are fractions of the whole run
const PROGRESS_STEPS: u64 = 1000;

impl ProgressReporter {
    pub fn new(enabled: bool, message: &str) -> Self {
        let bar = if enabled {
            ProgressBar::new(PROGRESS_STEPS)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) =
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {percent:>3}% ({elapsed})")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(message.to_string());
        Self { bar, done: 0.0 }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ProgressReporter {
    fn report(&mut self, increment: f64) {
        self.done = (self.done + increment).min(1.0);
        self.bar
            .set_position((self.done * PROGRESS_STEPS as f64).round() as u64);
    }
}

/// Utility functions for output formatting
pub mod utils {
    /// Format duration in human-readable format
    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_ms = duration.as_millis();

        if total_ms < 1000 {
            format!("{total_ms}ms")
        } else if total_ms < 60_000 {
            format!("{:.1}s", total_ms as f64 / 1000.0)
        } else {
            let minutes = total_ms / 60_000;
            let seconds = (total_ms % 60_000) as f64 / 1000.0;
            format!("{minutes}m {seconds:.1}s")
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_format_duration() {
            assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
            assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
            assert_eq!(format_duration(Duration::from_secs(90)), "1m 30.0s");
        }
    }
}
