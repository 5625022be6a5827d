//! Declared bindings that are never read
//!
//! Bindings come from `var`/`let`/`const` declarators (including
//! destructuring patterns), function and class declarations and imports.
//! Exported declarations count as used. Names are matched by text across
//! the whole unit; shadowing is not tracked.

use std::collections::HashSet;

use lintseed_core::source::lex;
use lintseed_core::{
    BraceKind, OptionSchema, Rule, RuleCategory, RuleMetadata, RuleOptions, SourceUnit,
    TokenKind, Violation,
};

use super::ends_expression;

pub const NO_UNUSED_VARS: &str = "no-unused-vars";

const DECLARATION_KEYWORDS: &[&str] = &["var", "let", "const"];

pub struct NoUnusedVars {
    meta: RuleMetadata,
}

impl NoUnusedVars {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                NO_UNUSED_VARS,
                "No Unused Variables",
                "Disallow variables, functions and imports that are never used",
                RuleCategory::Correctness,
            )
            .recommended()
            .with_option(OptionSchema::opaque("vars, args and ignore patterns")),
        }
    }
}

impl Default for NoUnusedVars {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
struct Binding {
    idx: usize,
    assigned: bool,
}

impl Rule for NoUnusedVars {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, _options: RuleOptions<'_>) -> Vec<Violation> {
        let bindings = collect_bindings(unit);
        let declared: HashSet<usize> = bindings.iter().map(|b| b.idx).collect();

        let mut used: HashSet<String> = HashSet::new();
        for &idx in unit.significant() {
            let token = unit.token(idx);
            match token.kind {
                TokenKind::Identifier if !declared.contains(&idx) && is_reference(unit, idx) => {
                    used.insert(token.text.clone());
                }
                TokenKind::Template => used.extend(template_identifiers(&token.text)),
                _ => {}
            }
        }

        bindings
            .iter()
            .filter(|b| !used.contains(&unit.token(b.idx).text))
            .map(|b| {
                let token = unit.token(b.idx);
                let message = if b.assigned {
                    format!("'{}' is assigned a value but never used.", token.text)
                } else {
                    format!("'{}' is defined but never used.", token.text)
                };
                Violation::at(token, message)
            })
            .collect()
    }
}

fn collect_bindings(unit: &SourceUnit) -> Vec<Binding> {
    let mut bindings = Vec::new();
    for &idx in unit.significant() {
        let token = unit.token(idx);
        if token.kind != TokenKind::Keyword {
            continue;
        }
        match token.text.as_str() {
            kw if DECLARATION_KEYWORDS.contains(&kw) => {
                if !is_exported(unit, idx) {
                    declarators(unit, idx, &mut bindings);
                }
            }
            "function" | "class" => {
                let name = unit
                    .next_significant(idx)
                    .filter(|&n| unit.token(n).kind == TokenKind::Identifier);
                if let Some(name) = name
                    && starts_statement(unit, idx)
                    && !is_exported(unit, idx)
                {
                    bindings.push(Binding { idx: name, assigned: false });
                }
            }
            "import" => import_bindings(unit, idx, &mut bindings),
            _ => {}
        }
    }
    bindings
}

/// Previous significant token, skipping `async` and `default` modifiers
fn prev_before_modifiers(unit: &SourceUnit, idx: usize) -> Option<usize> {
    let mut prev = unit.prev_significant(idx);
    while let Some(p) = prev {
        let token = unit.token(p);
        if token.is_keyword("async") || token.is_keyword("default") {
            prev = unit.prev_significant(p);
        } else {
            break;
        }
    }
    prev
}

fn is_exported(unit: &SourceUnit, idx: usize) -> bool {
    prev_before_modifiers(unit, idx).is_some_and(|p| unit.token(p).is_keyword("export"))
}

/// Whether a `function`/`class` keyword begins a declaration statement
fn starts_statement(unit: &SourceUnit, idx: usize) -> bool {
    match prev_before_modifiers(unit, idx) {
        None => true,
        Some(p) => {
            let token = unit.token(p);
            token.is_punct(";")
                || token.is_punct("}")
                || (token.is_punct("{") && unit.brace_kind(p) == Some(BraceKind::Block))
                || token.is_keyword("export")
        }
    }
}

fn declarators(unit: &SourceUnit, keyword: usize, out: &mut Vec<Binding>) {
    let scope = unit.parent(keyword);
    let scope_end = scope.and_then(|open| unit.matching(open));
    let mut cursor = unit.next_significant(keyword);

    while let Some(idx) = cursor {
        let token = unit.token(idx);
        let after = if token.kind == TokenKind::Identifier {
            let assigned = unit.next_significant(idx).is_some_and(|n| {
                let next = unit.token(n);
                next.is_punct("=") || next.is_keyword("of") || next.is_keyword("in")
            });
            out.push(Binding { idx, assigned });
            idx
        } else if token.is_punct("{") || token.is_punct("[") {
            let Some(close) = unit.matching(idx) else {
                break;
            };
            pattern_bindings(unit, idx, close, out);
            close
        } else {
            break;
        };

        // Skip the initializer up to the next declarator
        cursor = None;
        let mut prev = after;
        let mut next = unit.next_significant(after);
        while let Some(n) = next {
            if Some(n) == scope_end {
                break;
            }
            let token = unit.token(n);
            if unit.parent(n) == scope {
                if token.is_punct(",") {
                    cursor = unit.next_significant(n);
                    break;
                }
                if token.is_punct(";") || token.is_keyword("of") || token.is_keyword("in") {
                    break;
                }
                let new_line = token.line > unit.token(prev).end_line();
                let starts_word = token.kind == TokenKind::Identifier
                    || (token.kind == TokenKind::Keyword && !token.is_keyword("instanceof"));
                if new_line && starts_word && ends_expression(unit, prev) {
                    break;
                }
            }
            prev = n;
            next = unit.next_significant(n);
        }
    }
}

/// Names bound by a destructuring pattern between `open` and `close`
fn pattern_bindings(unit: &SourceUnit, open: usize, close: usize, out: &mut Vec<Binding>) {
    let mut default_scope: Option<Option<usize>> = None;
    for &idx in unit.significant().iter().filter(|&&i| i > open && i < close) {
        let token = unit.token(idx);
        let parent = unit.parent(idx);

        if let Some(scope) = default_scope {
            let ends_default = (token.is_punct(",") && parent == scope)
                || scope.and_then(|s| unit.matching(s)) == Some(idx);
            if ends_default {
                default_scope = None;
            }
            continue;
        }

        if token.is_punct("=") {
            default_scope = Some(parent);
        } else if token.kind == TokenKind::Identifier {
            let is_key = unit
                .next_significant(idx)
                .is_some_and(|n| unit.token(n).is_punct(":"));
            if !is_key {
                out.push(Binding { idx, assigned: true });
            }
        }
    }
}

fn import_bindings(unit: &SourceUnit, keyword: usize, out: &mut Vec<Binding>) {
    let mut cursor = unit.next_significant(keyword);
    // import(...) and import.meta
    if cursor.is_some_and(|n| unit.token(n).is_punct("(") || unit.token(n).is_punct(".")) {
        return;
    }

    let is_as = |idx: Option<usize>| {
        idx.is_some_and(|n| unit.token(n).kind == TokenKind::Identifier && unit.token(n).text == "as")
    };

    while let Some(idx) = cursor {
        let token = unit.token(idx);
        if token.kind == TokenKind::String || token.is_punct(";") {
            break;
        }
        let next = unit.next_significant(idx);
        if token.kind == TokenKind::Identifier {
            if token.text == "from" && unit.parent(idx) == unit.parent(keyword) {
                break;
            }
            let renames_next = token.text == "as"
                && next.is_some_and(|n| unit.token(n).kind == TokenKind::Identifier);
            if !renames_next && !is_as(next) {
                out.push(Binding { idx, assigned: false });
            }
        }
        cursor = next;
    }
}

/// Whether an identifier reads the binding of the same name
fn is_reference(unit: &SourceUnit, idx: usize) -> bool {
    let prev = unit.prev_significant(idx).map(|p| unit.token(p));
    if prev.is_some_and(|t| t.is_punct(".") || t.is_punct("?.")) {
        return false;
    }

    let Some(next) = unit.next_significant(idx).map(|n| unit.token(n)) else {
        return true;
    };
    if next.is_punct("=") {
        return false;
    }
    let in_object = unit
        .parent(idx)
        .is_some_and(|open| unit.brace_kind(open) == Some(BraceKind::Object));
    let is_key = in_object
        && next.is_punct(":")
        && prev.is_some_and(|t| t.is_punct("{") || t.is_punct(","));
    !is_key
}

/// Identifiers referenced from `${...}` substitutions of a template literal
fn template_identifiers(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        let body = &rest[start + 2..];
        let mut depth = 0usize;
        let mut end = body.len();
        for (i, c) in body.char_indices() {
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => {
                    end = i;
                    break;
                }
                '}' => depth -= 1,
                _ => {}
            }
        }

        if let Ok(tokens) = lex(&body[..end]) {
            let significant: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).collect();
            for (i, token) in significant.iter().enumerate() {
                match token.kind {
                    TokenKind::Identifier => {
                        let member = i > 0
                            && (significant[i - 1].is_punct(".") || significant[i - 1].is_punct("?."));
                        if !member {
                            names.push(token.text.clone());
                        }
                    }
                    TokenKind::Template => names.extend(template_identifiers(&token.text)),
                    _ => {}
                }
            }
        }
        rest = &body[end..];
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unused(text: &str) -> Vec<(usize, String)> {
        let unit = SourceUnit::parse("test.js", text).unwrap();
        NoUnusedVars::new()
            .check(&unit, RuleOptions::new(&[]))
            .into_iter()
            .map(|v| (v.line, v.message))
            .collect()
    }

    #[test]
    fn test_reports_unused_bindings() {
        let text = "import fs from 'fs';\nimport { join, resolve as res } from 'path';\nconst used = 1;\nlet unused = 2;\nconst { a, b: renamed } = obj;\nfunction helper() {}\nfunction main() { return `${used} ${a}`; }\nexport function api() { return fs; }\nclass Thing {}\nmain();\nconsole.log(renamed, res);\n";
        assert_eq!(
            unused(text),
            vec![
                (2, "'join' is defined but never used.".to_string()),
                (4, "'unused' is assigned a value but never used.".to_string()),
                (6, "'helper' is defined but never used.".to_string()),
                (9, "'Thing' is defined but never used.".to_string()),
            ]
        );
    }

    #[test]
    fn test_declarator_lists_and_loops() {
        let text = "for (const item of items) {\n  total += 1;\n}\nlet x = 1, y = 2;\ny;\n";
        let names: Vec<String> = unused(text).into_iter().map(|(_, m)| m).collect();
        assert_eq!(
            names,
            vec![
                "'item' is assigned a value but never used.".to_string(),
                "'x' is assigned a value but never used.".to_string(),
            ]
        );
    }

    #[test]
    fn test_declarations_without_semicolons() {
        assert!(unused("let a = 1\nlet b = a\nb\n").is_empty());
    }

    #[test]
    fn test_member_access_and_keys_are_not_uses() {
        let text = "const name = 1;\nconst o = { name: 2 };\no.name;\n";
        assert_eq!(unused(text), vec![(1, "'name' is assigned a value but never used.".to_string())]);
    }

    #[test]
    fn test_exported_and_shorthand() {
        let text = "export const value = 1;\nconst a = 2;\nexport default { a };\n";
        assert!(unused(text).is_empty());
    }

    #[test]
    fn test_template_identifiers() {
        assert_eq!(
            template_identifiers("`x ${a + b.c} ${`${d}`}`"),
            vec!["a".to_string(), "b".to_string(), "d".to_string()]
        );
    }
}
