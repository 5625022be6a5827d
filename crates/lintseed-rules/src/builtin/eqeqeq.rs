//! Strict equality operators

use lintseed_core::{
    OptionSchema, Rule, RuleCategory, RuleMetadata, RuleOptions, SourceUnit, Token, TokenKind,
    Violation,
};

pub const EQEQEQ: &str = "eqeqeq";

pub struct Eqeqeq {
    meta: RuleMetadata,
}

impl Eqeqeq {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                EQEQEQ,
                "Strict Equality",
                "Require the use of === and !==",
                RuleCategory::Suspicious,
            )
            .with_option(OptionSchema::enumeration(["always", "smart"])),
        }
    }
}

impl Default for Eqeqeq {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for Eqeqeq {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        let smart = options.string(0, "always") == "smart";

        unit.significant()
            .iter()
            .copied()
            .filter(|&idx| {
                let token = unit.token(idx);
                token.is_punct("==") || token.is_punct("!=")
            })
            .filter(|&idx| !(smart && is_smart_exception(unit, idx)))
            .map(|idx| {
                let token = unit.token(idx);
                Violation::at(
                    token,
                    format!("Expected '{}=' and instead saw '{}'.", token.text, token.text),
                )
            })
            .collect()
    }
}

/// Comparisons "smart" mode allows: against `null`, `typeof` results, or
/// between two literals
fn is_smart_exception(unit: &SourceUnit, op: usize) -> bool {
    let (Some(left_idx), Some(right_idx)) = (unit.prev_significant(op), unit.next_significant(op))
    else {
        return false;
    };
    let (left, right) = (unit.token(left_idx), unit.token(right_idx));

    let left_typeof = operand_start(unit, left_idx)
        .and_then(|start| unit.prev_significant(start))
        .is_some_and(|before| unit.token(before).is_keyword("typeof"));

    left.is_keyword("null")
        || right.is_keyword("null")
        || left_typeof
        || right.is_keyword("typeof")
        || (is_literal(left) && is_literal(right))
}

fn is_literal(token: &Token) -> bool {
    matches!(token.kind, TokenKind::String | TokenKind::Number)
        || token.is_keyword("true")
        || token.is_keyword("false")
        || token.is_keyword("null")
}

/// First token of a simple member-access operand ending at `last`
fn operand_start(unit: &SourceUnit, last: usize) -> Option<usize> {
    let mut start = last;
    loop {
        let Some(dot) = unit.prev_significant(start) else {
            return Some(start);
        };
        if !unit.token(dot).is_punct(".") {
            return Some(start);
        }
        start = unit.prev_significant(dot)?;
    }
}
