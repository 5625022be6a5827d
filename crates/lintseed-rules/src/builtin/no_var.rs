//! `var` declarations

use lintseed_core::{Rule, RuleCategory, RuleMetadata, RuleOptions, SourceUnit, Violation};

pub const NO_VAR: &str = "no-var";

pub struct NoVar {
    meta: RuleMetadata,
}

impl NoVar {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                NO_VAR,
                "No Var",
                "Require let or const instead of var",
                RuleCategory::Style,
            ),
        }
    }
}

impl Default for NoVar {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoVar {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, _options: RuleOptions<'_>) -> Vec<Violation> {
        unit.significant()
            .iter()
            .map(|&idx| unit.token(idx))
            .filter(|token| token.is_keyword("var"))
            .map(|token| Violation::at(token, "Unexpected var, use let or const instead."))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_var() {
        let unit = SourceUnit::parse("test.js", "var a = 1;\nlet b = 2;\nfor (var i = 0; i < 1; i++) {}\n").unwrap();
        let lines: Vec<usize> = NoVar::new()
            .check(&unit, RuleOptions::new(&[]))
            .into_iter()
            .map(|v| v.line)
            .collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_var_in_strings_and_comments() {
        let unit = SourceUnit::parse("test.js", "const s = 'var';\n// var x\n").unwrap();
        assert!(NoVar::new().check(&unit, RuleOptions::new(&[])).is_empty());
    }
}
