//! Quote style of string literals

use lintseed_core::{
    OptionSchema, PropertySchema, Rule, RuleCategory, RuleMetadata, RuleOptions, SourceUnit,
    Token, TokenKind, Violation,
};

pub const QUOTES: &str = "quotes";

pub struct Quotes {
    meta: RuleMetadata,
}

impl Quotes {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                QUOTES,
                "Quotes",
                "Enforce the consistent use of double quotes, single quotes or backticks",
                RuleCategory::Style,
            )
            .with_option(OptionSchema::enumeration(["double", "single", "backtick"]))
            .with_option(OptionSchema::object([
                PropertySchema::boolean("avoidEscape"),
                PropertySchema::boolean("allowTemplateLiterals"),
            ])),
        }
    }
}

impl Default for Quotes {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Double,
    Single,
    Backtick,
}

impl Style {
    fn parse(value: &str) -> Self {
        match value {
            "single" => Style::Single,
            "backtick" => Style::Backtick,
            _ => Style::Double,
        }
    }

    fn quote(self) -> char {
        match self {
            Style::Double => '"',
            Style::Single => '\'',
            Style::Backtick => '`',
        }
    }

    fn description(self) -> &'static str {
        match self {
            Style::Double => "doublequote",
            Style::Single => "singlequote",
            Style::Backtick => "backtick",
        }
    }
}

impl Rule for Quotes {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        let style = Style::parse(options.string(0, "double"));
        let avoid_escape = options.flag(1, "avoidEscape", false);
        let allow_templates = options.flag(1, "allowTemplateLiterals", false);
        let message = format!("Strings must use {}.", style.description());

        unit.significant()
            .iter()
            .copied()
            .filter(|&idx| {
                let token = unit.token(idx);
                match token.kind {
                    TokenKind::String => {
                        let quote = token.quote();
                        quote != Some(style.quote())
                            && !(avoid_escape && body(token).contains(style.quote()))
                    }
                    TokenKind::Template => {
                        style != Style::Backtick
                            && !allow_templates
                            && is_plain_template(token)
                            && !is_tagged(unit, idx)
                            && !(avoid_escape && body(token).contains(style.quote()))
                    }
                    _ => false,
                }
            })
            .map(|idx| Violation::at(unit.token(idx), message.clone()))
            .collect()
    }
}

/// Literal text between the quotes
fn body(token: &Token) -> &str {
    let text = token.text.as_str();
    if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        ""
    }
}

/// A template without substitutions or line breaks could be a plain string
fn is_plain_template(token: &Token) -> bool {
    let body = body(token);
    !body.contains("${") && !body.contains('\n')
}

fn is_tagged(unit: &SourceUnit, idx: usize) -> bool {
    unit.prev_significant(idx).is_some_and(|prev| {
        let token = unit.token(prev);
        token.kind == TokenKind::Identifier || token.is_punct(")") || token.is_punct("]")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn lines(text: &str, options: &[Value]) -> Vec<usize> {
        let unit = SourceUnit::parse("test.js", text).unwrap();
        Quotes::new()
            .check(&unit, RuleOptions::new(options))
            .into_iter()
            .map(|v| v.line)
            .collect()
    }

    const MIXED: &str = "const a = \"double\";\nconst b = 'single';\nconst c = `plain`;\nconst d = `with ${a}`;\nconst e = html`tagged`;\n";

    #[test]
    fn test_double() {
        assert_eq!(lines(MIXED, &[json!("double")]), vec![2, 3]);
        assert_eq!(lines(MIXED, &[]), vec![2, 3]);
    }

    #[test]
    fn test_single() {
        assert_eq!(lines(MIXED, &[json!("single")]), vec![1, 3]);
    }

    #[test]
    fn test_backtick() {
        assert_eq!(lines(MIXED, &[json!("backtick")]), vec![1, 2]);
    }

    #[test]
    fn test_allow_template_literals() {
        let options = [json!("double"), json!({ "avoidEscape": false, "allowTemplateLiterals": true })];
        assert_eq!(lines(MIXED, &options), vec![2]);
    }

    #[test]
    fn test_avoid_escape() {
        let text = "const a = 'say \"hi\"';\n";
        assert_eq!(lines(text, &[json!("double")]), vec![1]);
        let options = [json!("double"), json!({ "avoidEscape": true, "allowTemplateLiterals": false })];
        assert!(lines(text, &options).is_empty());
    }
}
