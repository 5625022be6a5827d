//! Built-in rules
//!
//! Each module holds one rule, or a few closely related layout rules, plus
//! the rule id constants the catalog is keyed by.

use lintseed_core::{BraceKind, SourceUnit, TokenKind};

pub mod comma_dangle;
pub mod eqeqeq;
pub mod indent;
pub mod layout;
pub mod no_console;
pub mod no_empty;
pub mod no_unused_vars;
pub mod no_var;
pub mod quotes;
pub mod semi;

pub use comma_dangle::CommaDangle;
pub use eqeqeq::Eqeqeq;
pub use indent::Indent;
pub use layout::{EolLast, LinebreakStyle, NoTrailingSpaces};
pub use no_console::NoConsole;
pub use no_empty::{NoDebugger, NoEmpty};
pub use no_unused_vars::NoUnusedVars;
pub use no_var::NoVar;
pub use quotes::Quotes;
pub use semi::Semi;

/// Keywords whose parenthesized head is followed by a statement
const HEADER_KEYWORDS: &[&str] = &["if", "for", "while", "with", "switch", "catch", "function"];

/// Keywords that end an expression
const VALUE_KEYWORDS: &[&str] = &[
    "this", "null", "true", "false", "super", "break", "continue", "return", "debugger",
];

/// Whether the `(` matching this `)` follows a control keyword or a
/// function name, i.e. the `)` is followed by a body rather than ending an
/// expression.
pub(crate) fn closes_header(unit: &SourceUnit, close_idx: usize) -> bool {
    let Some(before) = unit
        .matching(close_idx)
        .and_then(|open| unit.prev_significant(open))
    else {
        return false;
    };
    let token = unit.token(before);
    match token.kind {
        TokenKind::Keyword => HEADER_KEYWORDS.contains(&token.text.as_str()),
        TokenKind::Identifier => unit
            .prev_significant(before)
            .is_some_and(|idx| unit.token(idx).is_keyword("function")),
        _ => false,
    }
}

/// Whether the `{` at `open_idx` opens the body of `header (...)`
pub(crate) fn follows_header(unit: &SourceUnit, open_idx: usize, keywords: &[&str]) -> bool {
    let Some(prev) = unit.prev_significant(open_idx) else {
        return false;
    };
    if !unit.token(prev).is_punct(")") {
        return false;
    }
    unit.matching(prev)
        .and_then(|open| unit.prev_significant(open))
        .is_some_and(|idx| {
            let token = unit.token(idx);
            token.kind == TokenKind::Keyword && keywords.contains(&token.text.as_str())
        })
}

/// Whether the token at `idx` can be the last token of an expression
/// statement
pub(crate) fn ends_expression(unit: &SourceUnit, idx: usize) -> bool {
    let token = unit.token(idx);
    match token.kind {
        TokenKind::Identifier
        | TokenKind::Number
        | TokenKind::String
        | TokenKind::Template
        | TokenKind::Regex => true,
        TokenKind::Keyword => VALUE_KEYWORDS.contains(&token.text.as_str()),
        TokenKind::Punctuator => match token.text.as_str() {
            "++" | "--" | "]" => true,
            ")" => !closes_header(unit, idx),
            "}" => {
                unit.brace_kind(idx) == Some(BraceKind::Object) || closes_arrow_body(unit, idx)
            }
            _ => false,
        },
        _ => false,
    }
}

/// `}` closing `=> { ... }`
pub(crate) fn closes_arrow_body(unit: &SourceUnit, close_idx: usize) -> bool {
    unit.matching(close_idx)
        .and_then(|open| unit.prev_significant(open))
        .is_some_and(|idx| unit.token(idx).is_punct("=>"))
}

/// Whether the token at `idx` sits directly inside parentheses, brackets
/// or an object literal
pub(crate) fn inside_expression_brackets(unit: &SourceUnit, idx: usize) -> bool {
    unit.parent(idx).is_some_and(|open| {
        let token = unit.token(open);
        token.is_punct("(")
            || token.is_punct("[")
            || unit.brace_kind(open) == Some(BraceKind::Object)
    })
}
