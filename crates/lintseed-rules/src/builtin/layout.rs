//! Whitespace and line-ending layout rules

use lintseed_core::{
    OptionSchema, PropertySchema, Rule, RuleCategory, RuleMetadata, RuleOptions, SourceUnit,
    Token, TokenKind, Violation,
};

pub const NO_TRAILING_SPACES: &str = "no-trailing-spaces";
pub const EOL_LAST: &str = "eol-last";
pub const LINEBREAK_STYLE: &str = "linebreak-style";

/// Disallow whitespace at the end of lines
pub struct NoTrailingSpaces {
    meta: RuleMetadata,
}

impl NoTrailingSpaces {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                NO_TRAILING_SPACES,
                "No Trailing Spaces",
                "Disallow trailing whitespace at the end of lines",
                RuleCategory::Layout,
            )
            .with_option(OptionSchema::object([
                PropertySchema::boolean("skipBlankLines"),
                PropertySchema::boolean("ignoreComments"),
            ])),
        }
    }
}

impl Default for NoTrailingSpaces {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for NoTrailingSpaces {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        let skip_blank = options.flag(0, "skipBlankLines", false);
        let ignore_comments = options.flag(0, "ignoreComments", false);
        let tokens = unit.tokens();
        let mut violations = Vec::new();

        for (idx, token) in tokens.iter().enumerate() {
            match token.kind {
                TokenKind::Whitespace => {
                    let at_line_end = tokens
                        .get(idx + 1)
                        .is_none_or(|next| next.kind == TokenKind::Newline);
                    if !at_line_end {
                        continue;
                    }
                    let blank = idx == 0 || tokens[idx - 1].kind == TokenKind::Newline;
                    if !(skip_blank && blank) {
                        violations.push(trailing(token.line, token.column));
                    }
                }
                kind if kind.is_comment() && !ignore_comments => {
                    violations.extend(comment_trailing(token));
                }
                _ => {}
            }
        }

        violations.sort_by_key(|v| (v.line, v.column));
        violations
    }
}

fn trailing(line: usize, column: usize) -> Violation {
    Violation::new("Trailing spaces not allowed.", line, column)
}

/// Trailing whitespace on each line of a comment token
fn comment_trailing(token: &Token) -> Vec<Violation> {
    token
        .text
        .split('\n')
        .enumerate()
        .filter_map(|(offset, part)| {
            let part = part.strip_suffix('\r').unwrap_or(part);
            let trimmed = part.trim_end_matches([' ', '\t']);
            if trimmed.len() == part.len() {
                return None;
            }
            let start_column = if offset == 0 { token.column } else { 1 };
            Some(trailing(token.line + offset, start_column + trimmed.chars().count()))
        })
        .collect()
}

/// Require or disallow a newline at the end of files
pub struct EolLast {
    meta: RuleMetadata,
}

impl EolLast {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                EOL_LAST,
                "Newline At End Of File",
                "Require or disallow a newline at the end of files",
                RuleCategory::Layout,
            )
            .with_option(OptionSchema::enumeration(["always", "never"])),
        }
    }
}

impl Default for EolLast {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for EolLast {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        if unit.text().is_empty() {
            return Vec::new();
        }
        let Some(last) = unit.lines().last() else {
            return Vec::new();
        };
        let end_column = last.text.chars().count() + 1;

        match (options.string(0, "always"), unit.ends_with_newline()) {
            ("never", true) => vec![Violation::new(
                "Newline not allowed at end of file.",
                last.number,
                end_column,
            )],
            ("never", false) | (_, true) => Vec::new(),
            (_, false) => vec![Violation::new(
                "Newline required at end of file but not found.",
                last.number,
                end_column,
            )],
        }
    }
}

/// Consistent line endings
pub struct LinebreakStyle {
    meta: RuleMetadata,
}

impl LinebreakStyle {
    pub fn new() -> Self {
        Self {
            meta: RuleMetadata::new(
                LINEBREAK_STYLE,
                "Linebreak Style",
                "Enforce consistent linebreak style",
                RuleCategory::Layout,
            )
            .with_option(OptionSchema::enumeration(["unix", "windows"])),
        }
    }
}

impl Default for LinebreakStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule for LinebreakStyle {
    fn metadata(&self) -> &RuleMetadata {
        &self.meta
    }

    fn check(&self, unit: &SourceUnit, options: RuleOptions<'_>) -> Vec<Violation> {
        let (expected, found, wanted) = match options.string(0, "unix") {
            "windows" => ("CRLF", "LF", "\r\n"),
            _ => ("LF", "CRLF", "\n"),
        };
        let message = format!("Expected linebreaks to be '{expected}' but found '{found}'.");

        unit.tokens()
            .iter()
            .filter(|t| t.kind == TokenKind::Newline && t.text != wanted)
            .map(|t| Violation::at(t, message.clone()))
            .collect()
    }
}
