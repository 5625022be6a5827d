//! Calls to `console` methods

use lintseed_core::{
    OptionSchema, PropertySchema, Rule, RuleCategory, RuleMetadata, RuleOptions, SourceUnit,
    TokenKind, Violation,
};
use serde_json::Value;

pub const NO_CONSOLE: &str = "no-console";

pub struct NoConsole {
    meta: RuleMetadata,
}

impl NoConsole {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                NO_CONSOLE,
                "No Console",
                "Disallow the use of console",
                RuleCategory::Suspicious,
            )
            .with_option(OptionSchema::object([PropertySchema::opaque("allow")])),
        }
    }
}

impl Default for NoConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoConsole {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        let allowed: Vec<&str> = options
            .get(0)
            .and_then(|v| v.get("allow"))
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        unit.significant()
            .iter()
            .copied()
            .filter(|&idx| {
                let token = unit.token(idx);
                token.kind == TokenKind::Identifier && token.text == "console"
            })
            .filter(|&idx| {
                !unit
                    .prev_significant(idx)
                    .is_some_and(|p| unit.token(p).is_punct(".") || unit.token(p).is_punct("?."))
            })
            .filter(|&idx| {
                let method = unit
                    .next_significant(idx)
                    .filter(|&dot| unit.token(dot).is_punct("."))
                    .and_then(|dot| unit.next_significant(dot))
                    .map(|name| unit.token(name).text.as_str());
                match method {
                    Some(name) => !allowed.contains(&name),
                    None => false,
                }
            })
            .map(|idx| Violation::at(unit.token(idx), "Unexpected console statement."))
            .collect()
    }
}
