//! Parsed source units
//!
//! A [`SourceUnit`] is the immutable, parsed form of one file: its text,
//! its lossless token stream, and the bracket structure recovered from
//! the tokens. Building the structure is what "parsing" means here: a file
//! whose brackets do not balance is rejected just like a file that cannot
//! be tokenized.

use super::lexer::{LexError, Token, TokenKind, lex};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// How a `{` is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BraceKind {
    /// Statement block, function/class body
    Block,
    /// Object literal, destructuring pattern, import/export list
    Object,
}

/// A syntax error with a 1-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Per-line layout facts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineInfo {
    /// 1-based line number
    pub number: usize,
    /// Line text without its terminator
    pub text: String,
    /// Index of the first non-whitespace token on this line, if any
    pub first_token: Option<usize>,
    /// The line starts inside a multi-line token (comment, template)
    pub continued: bool,
    /// Brackets enclosing the first token, outermost first
    ///
    /// A closing bracket is not enclosed by the bracket it closes.
    pub open_brackets: Vec<usize>,
}

impl LineInfo {
    /// Leading whitespace of the line
    pub fn indentation(&self) -> &str {
        let trimmed = self.text.trim_start_matches([' ', '\t']);
        &self.text[..self.text.len() - trimmed.len()]
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Bracket nesting depth of the first token
    pub fn depth(&self) -> usize {
        self.open_brackets.len()
    }
}

/// A parsed source file
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: PathBuf,
    text: String,
    tokens: Vec<Token>,
    significant: Vec<usize>,
    matching: HashMap<usize, usize>,
    brace_kinds: HashMap<usize, BraceKind>,
    parents: Vec<Option<usize>>,
    lines: Vec<LineInfo>,
}

/// Tokens before which `{` opens an object literal
const OBJECT_CONTEXT_PUNCTUATORS: &[&str] = &[
    "=", "(", ",", ":", "[", "?", "||", "&&", "??", "...", "+=", "-=", "||=", "&&=", "??=",
];

/// Keywords before which `{` opens an object literal or a binding list
const OBJECT_CONTEXT_KEYWORDS: &[&str] = &[
    "return", "import", "export", "const", "let", "var", "typeof", "throw", "yield", "await",
];

impl SourceUnit {
    /// Tokenize and structure `text`
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self, SyntaxError> {
        let text = text.into();
        let tokens = lex(&text).map_err(|err| syntax_error_at(&text, &err))?;

        let significant: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(idx, _)| idx)
            .collect();

        let (matching, brace_kinds, parents) = build_structure(&tokens, &significant)?;
        let lines = build_lines(&text, &tokens, &parents);

        Ok(Self {
            path: path.into(),
            text,
            tokens,
            significant,
            matching,
            brace_kinds,
            parents,
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, idx: usize) -> &Token {
        &self.tokens[idx]
    }

    /// Indices of non-trivia tokens in source order
    pub fn significant(&self) -> &[usize] {
        &self.significant
    }

    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    /// Previous non-trivia token index
    pub fn prev_significant(&self, idx: usize) -> Option<usize> {
        let pos = self.significant.partition_point(|&i| i < idx);
        pos.checked_sub(1).map(|p| self.significant[p])
    }

    /// Next non-trivia token index
    pub fn next_significant(&self, idx: usize) -> Option<usize> {
        let pos = self.significant.partition_point(|&i| i <= idx);
        self.significant.get(pos).copied()
    }

    /// Matching bracket for an opening or closing bracket token
    pub fn matching(&self, idx: usize) -> Option<usize> {
        self.matching.get(&idx).copied()
    }

    /// Innermost bracket enclosing a token
    ///
    /// For a closing bracket this is the bracket enclosing its opener.
    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parents.get(idx).copied().flatten()
    }

    /// Enclosing brackets of a token, innermost first
    pub fn ancestors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        std::iter::successors(self.parent(idx), move |&open| self.parent(open))
    }

    /// Classification of a `{` token (or of the `}` closing it)
    pub fn brace_kind(&self, idx: usize) -> Option<BraceKind> {
        self.brace_kinds.get(&idx).copied()
    }

    /// Whether the text ends with a line terminator
    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n') || self.text.ends_with('\r')
    }
}

fn syntax_error_at(text: &str, err: &LexError) -> SyntaxError {
    let before = &text[..err.offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    SyntaxError {
        message: err.message.clone(),
        line,
        column: before[line_start..].chars().count() + 1,
    }
}

type Structure = (HashMap<usize, usize>, HashMap<usize, BraceKind>, Vec<Option<usize>>);

/// Match brackets, classify braces, and record the innermost open bracket
/// at each token.
fn build_structure(tokens: &[Token], significant: &[usize]) -> Result<Structure, SyntaxError> {
    let mut matching = HashMap::new();
    let mut brace_kinds = HashMap::new();
    let mut parents = vec![None; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut previous: Option<usize> = None;

    let mut cursor = significant.iter().peekable();
    for (idx, token) in tokens.iter().enumerate() {
        parents[idx] = stack.last().copied();
        if cursor.peek() != Some(&&idx) {
            continue;
        }
        cursor.next();

        if token.kind == TokenKind::Punctuator {
            match token.text.as_str() {
                "(" | "[" => stack.push(idx),
                "{" => {
                    let kind = classify_brace(tokens, previous);
                    brace_kinds.insert(idx, kind);
                    stack.push(idx);
                }
                closer @ (")" | "]" | "}") => {
                    let opener = stack.pop().ok_or_else(|| SyntaxError {
                        message: format!("Unexpected '{closer}'"),
                        line: token.line,
                        column: token.column,
                    })?;
                    let expected = match tokens[opener].text.as_str() {
                        "(" => ")",
                        "[" => "]",
                        _ => "}",
                    };
                    if expected != closer {
                        return Err(SyntaxError {
                            message: format!("Expected '{expected}' but found '{closer}'"),
                            line: token.line,
                            column: token.column,
                        });
                    }
                    if let Some(kind) = brace_kinds.get(&opener).copied() {
                        brace_kinds.insert(idx, kind);
                    }
                    matching.insert(opener, idx);
                    matching.insert(idx, opener);
                    parents[idx] = stack.last().copied();
                }
                _ => {}
            }
        }
        previous = Some(idx);
    }

    if let Some(&open) = stack.last() {
        let token = &tokens[open];
        return Err(SyntaxError {
            message: format!("Unclosed '{}'", token.text),
            line: token.line,
            column: token.column,
        });
    }

    Ok((matching, brace_kinds, parents))
}

fn classify_brace(tokens: &[Token], previous: Option<usize>) -> BraceKind {
    let Some(prev) = previous.map(|idx| &tokens[idx]) else {
        return BraceKind::Block;
    };
    match prev.kind {
        TokenKind::Punctuator if OBJECT_CONTEXT_PUNCTUATORS.contains(&prev.text.as_str()) => {
            BraceKind::Object
        }
        TokenKind::Keyword if OBJECT_CONTEXT_KEYWORDS.contains(&prev.text.as_str()) => {
            BraceKind::Object
        }
        _ => BraceKind::Block,
    }
}

fn build_lines(text: &str, tokens: &[Token], parents: &[Option<usize>]) -> Vec<LineInfo> {
    let mut lines: Vec<LineInfo> = text
        .split('\n')
        .enumerate()
        .map(|(idx, raw)| LineInfo {
            number: idx + 1,
            text: raw.strip_suffix('\r').unwrap_or(raw).to_string(),
            first_token: None,
            continued: false,
            open_brackets: Vec::new(),
        })
        .collect();

    // A trailing newline does not start another line
    if text.ends_with('\n') {
        lines.pop();
    }

    let enclosing = |idx: usize| {
        let mut chain: Vec<usize> =
            std::iter::successors(parents[idx], |&open| parents[open]).collect();
        chain.reverse();
        chain
    };

    let mut seen = vec![false; lines.len()];
    for (idx, token) in tokens.iter().enumerate() {
        let line_idx = token.line - 1;
        if line_idx < lines.len() && !seen[line_idx] {
            match token.kind {
                TokenKind::Whitespace => {}
                TokenKind::Newline => {
                    seen[line_idx] = true;
                    lines[line_idx].open_brackets = enclosing(idx);
                }
                _ => {
                    seen[line_idx] = true;
                    lines[line_idx].first_token = Some(idx);
                    lines[line_idx].open_brackets = enclosing(idx);
                }
            }
        }

        // Lines covered by the interior of a multi-line token
        let end_line = token.end_line();
        if end_line > token.line && token.kind != TokenKind::Newline {
            for line in lines.iter_mut().take(end_line).skip(token.line) {
                line.continued = true;
            }
            for flag in seen.iter_mut().take(end_line).skip(token.line) {
                *flag = true;
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SourceUnit {
        SourceUnit::parse("test.js", text).unwrap()
    }

    fn find(unit: &SourceUnit, text: &str, nth: usize) -> usize {
        unit.tokens()
            .iter()
            .enumerate()
            .filter(|(_, t)| t.text == text)
            .nth(nth)
            .map(|(idx, _)| idx)
            .unwrap()
    }

    #[test]
    fn test_brace_classification() {
        let unit = parse("function f() {\n  const o = { a: 1 };\n  return { b: 2 };\n}\n");
        let body = find(&unit, "{", 0);
        let object = find(&unit, "{", 1);
        let returned = find(&unit, "{", 2);

        assert_eq!(unit.brace_kind(body), Some(BraceKind::Block));
        assert_eq!(unit.brace_kind(object), Some(BraceKind::Object));
        assert_eq!(unit.brace_kind(returned), Some(BraceKind::Object));

        let closing = unit.matching(object).unwrap();
        assert_eq!(unit.token(closing).text, "}");
        assert_eq!(unit.brace_kind(closing), Some(BraceKind::Object));
        assert_eq!(unit.parent(closing), Some(body));
        assert_eq!(unit.ancestors(find(&unit, "a", 0)).collect::<Vec<_>>(), vec![object, body]);
    }

    #[test]
    fn test_line_depths() {
        let unit = parse("if (a) {\n\tb();\n}\n");
        let depths: Vec<usize> = unit.lines().iter().map(LineInfo::depth).collect();
        assert_eq!(depths, vec![0, 1, 0]);
        let body = find(&unit, "{", 0);
        assert_eq!(unit.lines()[1].open_brackets, vec![body]);
        assert_eq!(unit.lines()[1].indentation(), "\t");
    }

    #[test]
    fn test_continued_lines() {
        let unit = parse("/*\n * doc\n */\nconst s = `a\nb`;\n");
        let continued: Vec<bool> = unit.lines().iter().map(|l| l.continued).collect();
        assert_eq!(continued, vec![false, true, true, false, true]);
    }

    #[test]
    fn test_significant_navigation() {
        let unit = parse("a  /* c */ = 1;");
        let eq = find(&unit, "=", 0);
        let prev = unit.prev_significant(eq).unwrap();
        let next = unit.next_significant(eq).unwrap();
        assert_eq!(unit.token(prev).text, "a");
        assert_eq!(unit.token(next).text, "1");
    }

    #[test]
    fn test_unbalanced_brackets_are_errors() {
        let err = SourceUnit::parse("a.js", "call(a, b;\n").unwrap_err();
        assert_eq!(err.message, "Unclosed '('");
        assert_eq!((err.line, err.column), (1, 5));

        let err = SourceUnit::parse("a.js", "x = [1, 2);").unwrap_err();
        assert!(err.message.contains("Expected ']'"));

        assert!(SourceUnit::parse("a.js", "}\n").is_err());
    }

    #[test]
    fn test_lexer_errors_carry_positions() {
        let err = SourceUnit::parse("a.js", "let a = 1;\nlet b = 'x;\n").unwrap_err();
        assert_eq!((err.line, err.column), (2, 9));
    }

    #[test]
    fn test_crlf_lines() {
        let unit = parse("a();\r\nb();\r\n");
        assert_eq!(unit.lines().len(), 2);
        assert_eq!(unit.lines()[0].text, "a();");
        assert!(unit.ends_with_newline());
    }
}
