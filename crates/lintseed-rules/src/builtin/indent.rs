//! Consistent indentation
//!
//! Each line is measured against the line holding the innermost open
//! bracket: one unit deeper inside the bracket, level with it on the line
//! that closes it. Continuation lines may add one more unit. Lines inside
//! multi-line comments and templates are not checked.

use lintseed_core::{
    LineInfo, OptionSchema, PropertySchema, Rule, RuleCategory, RuleMetadata, RuleOptions,
    SourceUnit, TokenKind, Violation,
};
use serde_json::Value;

use super::{closes_header, follows_header};

pub const INDENT: &str = "indent";

/// First tokens that continue the previous line's expression
const CONTINUATION_STARTERS: &[&str] = &[
    ".", "?.", "+", "-", "*", "/", "%", "&&", "||", "??", "?", ":", "=", "==", "===", "!=",
    "!==", "<", ">", "<=", ">=", "|", "&", "^", "=>",
];

/// Punctuators after which the next line starts a new statement or element
const LINE_ENDERS: &[&str] = &[";", "{", "}", "(", "[", ")", "]", ",", "++", "--", ":"];

/// Keywords after which the next line continues the statement
const CONTINUING_KEYWORDS: &[&str] = &["else", "do", "return", "typeof", "new", "await", "yield"];

pub struct Indent {
    meta: RuleMetadata,
}

impl Indent {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                INDENT,
                "Indentation",
                "Enforce consistent indentation",
                RuleCategory::Layout,
            )
            .with_option(OptionSchema::enumeration([
                Value::from("tab"),
                Value::from(2),
                Value::from(4),
            ]))
            .with_option(OptionSchema::object([PropertySchema::enumeration(
                "SwitchCase",
                [0, 1],
            )])),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::new()
    }
}

/// Indentation unit derived from the options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unit {
    ch: char,
    size: usize,
    switch_case: usize,
}

impl Unit {
    fn from_options(options: RuleOptions<'_>) -> Self {
        let (ch, size) = match options.get(0) {
            Some(Value::String(s)) if s == "tab" => ('\t', 1),
            Some(Value::Number(n)) => (' ', n.as_u64().map_or(4, |n| n as usize)),
            _ => (' ', 4),
        };
        let switch_case = options
            .get(1)
            .and_then(|v| v.get("SwitchCase"))
            .and_then(Value::as_u64)
            .map_or(0, |n| n as usize);
        Self { ch, size, switch_case }
    }

    fn describe(&self, width: usize) -> String {
        let name = if self.ch == '\t' { "tab" } else { "space" };
        format!("{} {}{}", width, name, if width == 1 { "" } else { "s" })
    }
}

impl Rule for Indent {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        let indent = Unit::from_options(options);
        let lines = unit.lines();
        let mut violations = Vec::new();

        for (pos, line) in lines.iter().enumerate() {
            let Some(first) = line.first_token else {
                continue;
            };
            if line.continued || line.is_blank() {
                continue;
            }

            let mut accepted = expected_widths(unit, line, first, indent);
            if unit.token(first).kind.is_comment()
                && let Some((next, next_first)) = next_code_line(unit, &lines[pos + 1..])
            {
                accepted.extend(expected_widths(unit, next, next_first, indent));
            }

            let found = line.indentation();
            let matches = accepted
                .iter()
                .any(|&width| found.len() == width && found.chars().all(|c| c == indent.ch));
            if !matches {
                let expected = accepted.first().copied().unwrap_or_default();
                violations.push(Violation::new(
                    format!(
                        "Expected indentation of {} but found {}.",
                        indent.describe(expected),
                        describe_found(found)
                    ),
                    line.number,
                    1,
                ));
            }
        }

        violations
    }
}

/// Acceptable widths for a line whose first token is `first`, preferred first
fn expected_widths(unit: &SourceUnit, line: &LineInfo, first: usize, indent: Unit) -> Vec<usize> {
    let token = unit.token(first);
    let is_closer = token.is_punct("}") || token.is_punct(")") || token.is_punct("]");

    let base = if is_closer {
        unit.matching(first)
            .map(|open| line_width(unit, open))
            .unwrap_or_default()
    } else {
        match line.open_brackets.last() {
            None => 0,
            Some(&open) => {
                let levels = if follows_header(unit, open, &["switch"]) {
                    let is_case = token.is_keyword("case") || token.is_keyword("default");
                    indent.switch_case + usize::from(!is_case)
                } else {
                    1
                };
                line_width(unit, open) + levels * indent.size
            }
        }
    };

    if !is_closer && is_continuation(unit, first) {
        vec![base, base + indent.size]
    } else {
        vec![base]
    }
}

/// Indentation width of the line holding token `idx`
fn line_width(unit: &SourceUnit, idx: usize) -> usize {
    let line = unit.token(idx).line;
    unit.lines()
        .get(line - 1)
        .map_or(0, |info| info.indentation().chars().count())
}

fn is_continuation(unit: &SourceUnit, first: usize) -> bool {
    let token = unit.token(first);
    if token.kind == TokenKind::Punctuator && CONTINUATION_STARTERS.contains(&token.text.as_str()) {
        return true;
    }
    if token.is_punct("{") {
        return false;
    }

    let Some(prev) = unit.prev_significant(first) else {
        return false;
    };
    let prev_token = unit.token(prev);
    match prev_token.kind {
        TokenKind::Punctuator if prev_token.is_punct(")") => closes_header(unit, prev),
        TokenKind::Punctuator => !LINE_ENDERS.contains(&prev_token.text.as_str()),
        TokenKind::Keyword => CONTINUING_KEYWORDS.contains(&prev_token.text.as_str()),
        _ => false,
    }
}

fn next_code_line<'u>(unit: &SourceUnit, rest: &'u [LineInfo]) -> Option<(&'u LineInfo, usize)> {
    rest.iter()
        .filter(|line| !line.continued)
        .find_map(|line| {
            let first = line.first_token?;
            (!unit.token(first).kind.is_comment()).then_some((line, first))
        })
}

fn describe_found(indentation: &str) -> String {
    let spaces = indentation.chars().filter(|&c| c == ' ').count();
    let tabs = indentation.chars().filter(|&c| c == '\t').count();
    let plural = |n: usize| if n == 1 { "" } else { "s" };
    match (spaces, tabs) {
        (0, 0) => "0".to_string(),
        (s, 0) => format!("{} space{}", s, plural(s)),
        (0, t) => format!("{} tab{}", t, plural(t)),
        (s, t) => format!("{} space{} and {} tab{}", s, plural(s), t, plural(t)),
    }
}
