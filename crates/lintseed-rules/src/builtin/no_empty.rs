//! Empty blocks and `debugger` statements

use lintseed_core::{
    BraceKind, OptionSchema, PropertySchema, Rule, RuleCategory, RuleMetadata, RuleOptions,
    SourceUnit, Violation,
};

use super::follows_header;

pub const NO_EMPTY: &str = "no-empty";
pub const NO_DEBUGGER: &str = "no-debugger";

/// Keywords directly followed by a block
const BLOCK_KEYWORDS: &[&str] = &["else", "try", "finally", "do", "catch"];

pub struct NoEmpty {
    meta: RuleMetadata,
}

impl NoEmpty {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                NO_EMPTY,
                "No Empty Blocks",
                "Disallow empty block statements",
                RuleCategory::Suspicious,
            )
            .recommended()
            .with_option(OptionSchema::object([PropertySchema::boolean("allowEmptyCatch")])),
        }
    }
}

impl Default for NoEmpty {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoEmpty {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        let allow_empty_catch = options.flag(0, "allowEmptyCatch", false);
        let mut violations = Vec::new();

        for &open in unit.significant() {
            if !unit.token(open).is_punct("{") || unit.brace_kind(open) != Some(BraceKind::Block) {
                continue;
            }
            let Some(close) = unit.matching(open) else {
                continue;
            };
            let has_content = unit.next_significant(open) != Some(close)
                || (open + 1..close).any(|idx| unit.token(idx).kind.is_comment());
            if has_content {
                continue;
            }

            match block_context(unit, open) {
                Some(Context::Switch) => {
                    violations.push(Violation::at(unit.token(open), "Empty switch statement."));
                }
                Some(Context::Catch) if allow_empty_catch => {}
                Some(_) => {
                    violations.push(Violation::at(unit.token(open), "Empty block statement."));
                }
                None => {}
            }
        }

        violations
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Statement,
    Catch,
    Switch,
}

/// What a block belongs to; `None` for function and class bodies
fn block_context(unit: &SourceUnit, open: usize) -> Option<Context> {
    if follows_header(unit, open, &["switch"]) {
        return Some(Context::Switch);
    }
    if follows_header(unit, open, &["catch"]) {
        return Some(Context::Catch);
    }
    if follows_header(unit, open, &["if", "for", "while", "with"]) {
        return Some(Context::Statement);
    }

    let Some(prev) = unit.prev_significant(open) else {
        return Some(Context::Statement);
    };
    let token = unit.token(prev);
    if token.is_keyword("catch") {
        Some(Context::Catch)
    } else if BLOCK_KEYWORDS.iter().any(|kw| token.is_keyword(kw))
        || token.is_punct(";")
        || token.is_punct("}")
        || (token.is_punct("{") && unit.brace_kind(prev) == Some(BraceKind::Block))
    {
        Some(Context::Statement)
    } else {
        None
    }
}

pub struct NoDebugger {
    meta: RuleMetadata,
}

impl NoDebugger {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                NO_DEBUGGER,
                "No Debugger",
                "Disallow the use of debugger",
                RuleCategory::Correctness,
            )
            .recommended(),
        }
    }
}

impl Default for NoDebugger {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoDebugger {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, _options: RuleOptions<'_>) -> Vec<Violation> {
        unit.significant()
            .iter()
            .map(|&idx| unit.token(idx))
            .filter(|token| token.is_keyword("debugger"))
            .map(|token| Violation::at(token, "Unexpected 'debugger' statement."))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn messages(rule: &dyn Rule, text: &str, options: &[Value]) -> Vec<(usize, String)> {
        let unit = SourceUnit::parse("test.js", text).unwrap();
        rule.check(&unit, RuleOptions::new(options))
            .into_iter()
            .map(|v| (v.line, v.message))
            .collect()
    }

    #[test]
    fn test_empty_blocks() {
        let text = "if (a) {}\ntry {\n  run();\n} catch (e) {}\nswitch (b) {}\nfunction f() {}\nconst g = () => {};\nwhile (c) {\n  // waiting\n}\n{}\nclass K {}\n";
        assert_eq!(
            messages(&NoEmpty::new(), text, &[]),
            vec![
                (1, "Empty block statement.".to_string()),
                (4, "Empty block statement.".to_string()),
                (5, "Empty switch statement.".to_string()),
                (11, "Empty block statement.".to_string()),
            ]
        );
    }

    #[test]
    fn test_allow_empty_catch() {
        let text = "try {\n  run();\n} catch (e) {}\ntry {\n  run();\n} catch {}\n";
        assert_eq!(messages(&NoEmpty::new(), text, &[]).len(), 2);
        assert!(messages(&NoEmpty::new(), text, &[json!({ "allowEmptyCatch": true })]).is_empty());
    }

    #[test]
    fn test_debugger() {
        let text = "function f() {\n  debugger;\n}\nconst debuggerName = 1;\n";
        assert_eq!(
            messages(&NoDebugger::new(), text, &[]),
            vec![(2, "Unexpected 'debugger' statement.".to_string())]
        );
    }
}
