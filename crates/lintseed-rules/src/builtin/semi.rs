//! Semicolon usage at the end of statements

use lintseed_core::{
    BraceKind, OptionSchema, Rule, RuleCategory, RuleMetadata, RuleOptions, SourceUnit, TokenKind,
    Violation,
};

use super::{ends_expression, inside_expression_brackets};

pub const SEMI: &str = "semi";

/// Keywords that continue the previous line's statement
const CONTINUATION_KEYWORDS: &[&str] = &["else", "catch", "finally", "instanceof", "in", "of"];

/// Punctuators that may start a line without ending the previous statement
const STATEMENT_STARTERS: &[&str] = &["}", "{", "++", "--", "!", "~"];

/// Tokens after which a `;` is kept even in "never" mode
const RISKY_STARTERS: &[&str] = &["(", "[", "+", "-", "/"];

pub struct Semi {
    meta: RuleMetadata,
}

impl Semi {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                SEMI,
                "Semicolons",
                "Require or disallow semicolons at the end of statements",
                RuleCategory::Style,
            )
            .with_option(OptionSchema::enumeration(["always", "never"])),
        }
    }
}

impl Default for Semi {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Semi {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        match options.string(0, "always") {
            "never" => extra_semicolons(unit),
            _ => missing_semicolons(unit),
        }
    }
}

/// Whether a statement ending at `idx` is really ended by what follows
fn statement_ends_after(unit: &SourceUnit, idx: usize) -> bool {
    let Some(next) = unit.next_significant(idx) else {
        return true;
    };
    let (current, following) = (unit.token(idx), unit.token(next));

    if following.line == current.end_line() {
        return following.is_punct("}") && unit.brace_kind(next) == Some(BraceKind::Block);
    }

    match following.kind {
        TokenKind::Template => false,
        TokenKind::Punctuator => STATEMENT_STARTERS.contains(&following.text.as_str()),
        TokenKind::Keyword => !CONTINUATION_KEYWORDS.contains(&following.text.as_str()),
        _ => true,
    }
}

fn missing_semicolons(unit: &SourceUnit) -> Vec<Violation> {
    unit.significant()
        .iter()
        .copied()
        .filter(|&idx| {
            ends_expression(unit, idx)
                && !inside_expression_brackets(unit, idx)
                && statement_ends_after(unit, idx)
        })
        .map(|idx| {
            let token = unit.token(idx);
            let end_column = token.column + token.text.chars().count();
            Violation::new("Missing semicolon.", token.end_line(), end_column)
        })
        .collect()
}

fn extra_semicolons(unit: &SourceUnit) -> Vec<Violation> {
    unit.significant()
        .iter()
        .copied()
        .filter(|&idx| unit.token(idx).is_punct(";"))
        .filter(|&idx| !unit.parent(idx).is_some_and(|open| unit.token(open).is_punct("(")))
        .filter(|&idx| unit.prev_significant(idx).is_some_and(|prev| ends_expression(unit, prev)))
        .filter(|&idx| {
            let risky = unit.next_significant(idx).is_some_and(|next| {
                let token = unit.token(next);
                token.line > unit.token(idx).line
                    && (RISKY_STARTERS.contains(&token.text.as_str())
                        || matches!(token.kind, TokenKind::Template | TokenKind::Regex))
            });
            !risky && statement_ends_after(unit, idx)
        })
        .map(|idx| Violation::at(unit.token(idx), "Extra semicolon."))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn check(text: &str, options: &[Value]) -> Vec<(usize, usize)> {
        let unit = SourceUnit::parse("test.js", text).unwrap();
        Semi::new()
            .check(&unit, RuleOptions::new(options))
            .into_iter()
            .map(|v| (v.line, v.column))
            .collect()
    }

    #[test]
    fn test_always_accepts_terminated_statements() {
        let text = "import a from 'a';\nconst o = {\n  x: 1,\n  y: [1, 2]\n};\nif (o) {\n  run(o);\n}\nfunction f(x) {\n  return x;\n}\nfor (let i = 0; i < 3; i++) {\n  f(i);\n}\n";
        assert!(check(text, &[json!("always")]).is_empty());
        assert!(check(text, &[]).is_empty());
    }

    #[test]
    fn test_always_reports_missing() {
        let text = "let a = 1\nconst o = {\n  x: 1\n}\nfunction f() { return a }\nitems.forEach(x => {\n  use(x)\n})";
        assert_eq!(
            check(text, &[json!("always")]),
            vec![(1, 10), (4, 2), (5, 24), (7, 9), (8, 3)]
        );
    }

    #[test]
    fn test_continuation_lines_are_not_statement_ends() {
        let text = "const total = a\n  + b;\nconst s = value\n  .trim();\nif (a) {\n  x();\n} else {\n  y();\n}\n";
        assert!(check(text, &[json!("always")]).is_empty());
    }

    #[test]
    fn test_never_reports_extra() {
        let text = "let a = 1;\nfor (;;) {\n  break\n}\nconst b = a;\n[1, 2].forEach(log)\n";
        assert_eq!(check(text, &[json!("never")]), vec![(1, 10)]);
    }

    #[test]
    fn test_never_accepts_asi_style() {
        let text = "const a = 1\nlet b = a + 1\nexport default b\n";
        assert!(check(text, &[json!("never")]).is_empty());
    }
}
