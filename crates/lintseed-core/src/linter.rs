//! Running a configuration against parsed source units

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{LintConfig, RuleSetting, Severity};
use crate::rules::{RuleCatalog, RuleOptions};
use crate::source::SourceUnit;

/// A reported problem in one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub path: PathBuf,
    /// 1-based line
    pub line: usize,
    /// 1-based column
    pub column: usize,
}

/// Applies the rules of a [`RuleCatalog`] to source units
#[derive(Debug, Clone, Copy)]
pub struct Linter<'a> {
    catalog: &'a RuleCatalog,
}

impl<'a> Linter<'a> {
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self { catalog }
    }

    /// Lint one unit with every enabled rule of `config`
    ///
    /// Rules set to `off` are skipped. Rule ids the catalog does not know
    /// are logged and skipped. Findings are sorted by position, then rule id.
    pub fn verify(&self, unit: &SourceUnit, config: &LintConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (rule_id, setting) in &config.rules {
            findings.extend(self.verify_rule(unit, rule_id, setting));
        }
        findings.sort_by(|a, b| {
            (a.line, a.column, &a.rule_id).cmp(&(b.line, b.column, &b.rule_id))
        });
        findings
    }

    /// Lint one unit with a single rule setting
    pub fn verify_rule(&self, unit: &SourceUnit, rule_id: &str, setting: &RuleSetting) -> Vec<Finding> {
        if !setting.is_enabled() {
            return Vec::new();
        }
        let Some(rule) = self.catalog.get(rule_id) else {
            tracing::warn!("Definition for rule '{}' was not found", rule_id);
            return Vec::new();
        };

        rule.check(unit, RuleOptions::new(&setting.options))
            .into_iter()
            .map(|violation| Finding {
                rule_id: rule_id.to_string(),
                severity: setting.severity,
                message: violation.message,
                path: unit.path().to_path_buf(),
                line: violation.line,
                column: violation.column,
            })
            .collect()
    }
}

impl Finding {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
