//! Trailing commas in array and object literals

use lintseed_core::{
    BraceKind, OptionSchema, Rule, RuleCategory, RuleMetadata, RuleOptions, SourceUnit, Violation,
};

pub const COMMA_DANGLE: &str = "comma-dangle";

pub struct CommaDangle {
    meta: RuleMetadata,
}

impl CommaDangle {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                COMMA_DANGLE,
                "Comma Dangle",
                "Require or disallow trailing commas",
                RuleCategory::Style,
            )
            .with_option(OptionSchema::enumeration([
                "never",
                "always",
                "always-multiline",
                "only-multiline",
            ])),
        }
    }
}

impl Default for CommaDangle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Policy {
    Never,
    Always,
    AlwaysMultiline,
    OnlyMultiline,
}

impl Policy {
    fn parse(value: &str) -> Self {
        match value {
            "always" => Policy::Always,
            "always-multiline" => Policy::AlwaysMultiline,
            "only-multiline" => Policy::OnlyMultiline,
            _ => Policy::Never,
        }
    }

    /// Whether a trailing comma is required (`Some(true)`), forbidden
    /// (`Some(false)`) or optional
    fn wants_comma(self, multiline: bool) -> Option<bool> {
        match (self, multiline) {
            (Policy::Never, _) => Some(false),
            (Policy::Always, _) => Some(true),
            (Policy::AlwaysMultiline, multiline) => Some(multiline),
            (Policy::OnlyMultiline, true) => None,
            (Policy::OnlyMultiline, false) => Some(false),
        }
    }
}

impl Rule for CommaDangle {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        let policy = Policy::parse(options.string(0, "never"));
        let mut violations = Vec::new();

        for &close in unit.significant() {
            let token = unit.token(close);
            let is_list_end = token.is_punct("]")
                || (token.is_punct("}") && unit.brace_kind(close) == Some(BraceKind::Object));
            if !is_list_end {
                continue;
            }
            let Some(prev) = unit.prev_significant(close) else {
                continue;
            };
            if unit.matching(close) == Some(prev) {
                continue;
            }

            let trailing = unit.token(prev).is_punct(",");
            let last = if trailing {
                match unit.prev_significant(prev) {
                    Some(idx) => idx,
                    None => continue,
                }
            } else {
                prev
            };
            let multiline = token.line > unit.token(last).end_line();

            match policy.wants_comma(multiline) {
                Some(false) if trailing => {
                    violations.push(Violation::at(unit.token(prev), "Unexpected trailing comma."));
                }
                Some(true) if !trailing => {
                    let last = unit.token(last);
                    violations.push(Violation::new(
                        "Missing trailing comma.",
                        last.end_line(),
                        last.column + last.text.chars().count(),
                    ));
                }
                _ => {}
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    const SOURCE: &str = "const a = [1, 2];\nconst b = {\n  x: 1,\n  y: 2,\n};\nconst c = {\n  x: 1\n};\nconst d = [1, 2,];\nconst e = {};\n";

    fn positions(options: &[Value]) -> Vec<(usize, usize)> {
        let unit = SourceUnit::parse("test.js", SOURCE).unwrap();
        CommaDangle::new()
            .check(&unit, RuleOptions::new(options))
            .into_iter()
            .map(|v| (v.line, v.column))
            .collect()
    }

    #[test]
    fn test_never() {
        assert_eq!(positions(&[json!("never")]), vec![(4, 7), (9, 16)]);
        assert_eq!(positions(&[]), positions(&[json!("never")]));
    }

    #[test]
    fn test_always() {
        assert_eq!(positions(&[json!("always")]), vec![(1, 16), (7, 7)]);
    }

    #[test]
    fn test_always_multiline() {
        assert_eq!(positions(&[json!("always-multiline")]), vec![(7, 7), (9, 16)]);
    }

    #[test]
    fn test_only_multiline() {
        assert_eq!(positions(&[json!("only-multiline")]), vec![(9, 16)]);
    }

    #[test]
    fn test_block_braces_are_ignored() {
        let unit = SourceUnit::parse("test.js", "if (a) {\n  b();\n}\n").unwrap();
        let violations = CommaDangle::new().check(&unit, RuleOptions::new(&[json!("always")]));
        assert!(violations.is_empty());
    }
}
