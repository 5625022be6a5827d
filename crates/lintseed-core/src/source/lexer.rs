//! Trivia-preserving lexer for JavaScript-style source
//!
//! Every byte of the input ends up in exactly one token, so
//! `tokens.iter().map(|t| t.text).collect::<String>() == input`.
//! Rules that care about layout (indentation, trailing spaces, line breaks)
//! read the whitespace and newline tokens directly.

use std::ops::Range;

/// Simple span representing a byte range in the source
pub type Span = Range<usize>;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Newline,
    LineComment,
    BlockComment,
    Identifier,
    Keyword,
    Number,
    String,
    Template,
    Regex,
    Punctuator,
}

impl TokenKind {
    /// Whitespace, newlines and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A token with its kind, text and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
    /// 1-based line of the first character
    pub line: usize,
    /// 1-based column of the first character
    pub column: usize,
}

impl Token {
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.is(TokenKind::Punctuator, text)
    }

    pub fn is_keyword(&self, text: &str) -> bool {
        self.is(TokenKind::Keyword, text)
    }

    /// Quote character of a string literal
    pub fn quote(&self) -> Option<char> {
        match self.kind {
            TokenKind::String => self.text.chars().next(),
            TokenKind::Template => Some('`'),
            _ => None,
        }
    }

    /// Line of the last character of this token
    pub fn end_line(&self) -> usize {
        self.line + self.text.matches('\n').count()
    }
}

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub offset: usize,
}

impl LexError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

pub const KEYWORDS: &[&str] = &[
    "async",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "of",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Keywords after which a `/` starts a regular expression
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
    "yield",
    "await",
];

/// Punctuators, longest first
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@",
];

/// Lex input into a lossless token stream
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        input,
        pos: 0,
        line: 1,
        line_start: 0,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) -> Result<(), LexError> {
        // Shebang line
        if self.input.starts_with("#!") {
            let end = self.input.find('\n').unwrap_or(self.input.len());
            self.push(TokenKind::LineComment, end);
        }

        while let Some(current) = self.peek(0) {
            let start = self.pos;
            match current {
                '\n' => self.push(TokenKind::Newline, start + 1),
                '\r' => {
                    let end = if self.peek(1) == Some('\n') {
                        start + 2
                    } else {
                        start + 1
                    };
                    self.push(TokenKind::Newline, end);
                }
                c if is_whitespace(c) => {
                    let end = self.scan_while(start, |c| is_whitespace(c) && c != '\n' && c != '\r');
                    self.push(TokenKind::Whitespace, end);
                }
                '/' if self.peek(1) == Some('/') => {
                    let end = self.scan_while(start, |c| c != '\n' && c != '\r');
                    self.push(TokenKind::LineComment, end);
                }
                '/' if self.peek(1) == Some('*') => {
                    let end = self.input[start + 2..]
                        .find("*/")
                        .map(|idx| start + 2 + idx + 2)
                        .ok_or_else(|| LexError::new("Unterminated block comment", start))?;
                    self.push(TokenKind::BlockComment, end);
                }
                '/' if self.regex_allowed() => {
                    let end = self.scan_regex(start)?;
                    self.push(TokenKind::Regex, end);
                }
                '"' | '\'' => {
                    let end = self.scan_string(start, current)?;
                    self.push(TokenKind::String, end);
                }
                '`' => {
                    let end = scan_template(self.input, start)?;
                    self.push(TokenKind::Template, end);
                }
                c if c.is_ascii_digit()
                    || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    let end = self.scan_while(start, |c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                    self.push(TokenKind::Number, end);
                }
                c if is_identifier_start(c) || (c == '#' && self.peek(1).is_some_and(is_identifier_start)) => {
                    let end = self.scan_while(start + c.len_utf8(), is_identifier_part);
                    let kind = if KEYWORDS.contains(&&self.input[start..end]) {
                        TokenKind::Keyword
                    } else {
                        TokenKind::Identifier
                    };
                    self.push(kind, end);
                }
                c => {
                    let rest = &self.input[start..];
                    match PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) {
                        Some(punct) => self.push(TokenKind::Punctuator, start + punct.len()),
                        None => {
                            return Err(LexError::new(format!("Unexpected character '{c}'"), start));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(ahead)
    }

    fn scan_while(&self, from: usize, predicate: impl Fn(char) -> bool) -> usize {
        self.input[from..]
            .char_indices()
            .find(|(_, c)| !predicate(*c))
            .map(|(idx, _)| from + idx)
            .unwrap_or(self.input.len())
    }

    fn push(&mut self, kind: TokenKind, end: usize) {
        let start = self.pos;
        let text = &self.input[start..end];
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            span: start..end,
            line: self.line,
            column: self.input[self.line_start..start].chars().count() + 1,
        });

        for (idx, ch) in text.char_indices() {
            if ch == '\n' {
                self.line += 1;
                self.line_start = start + idx + 1;
            } else if ch == '\r' && !text[idx + 1..].starts_with('\n') {
                self.line += 1;
                self.line_start = start + idx + 1;
            }
        }
        self.pos = end;
    }

    fn regex_allowed(&self) -> bool {
        let previous = self.tokens.iter().rev().find(|t| !t.kind.is_trivia());
        match previous {
            None => true,
            Some(token) => match token.kind {
                TokenKind::Punctuator => !matches!(token.text.as_str(), ")" | "]" | "}" | "++" | "--"),
                TokenKind::Keyword => REGEX_PRECEDING_KEYWORDS.contains(&token.text.as_str()),
                _ => false,
            },
        }
    }

    fn scan_string(&self, start: usize, quote: char) -> Result<usize, LexError> {
        let mut chars = self.input[start + 1..].char_indices();
        while let Some((idx, ch)) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                '\n' | '\r' => break,
                c if c == quote => return Ok(start + 1 + idx + 1),
                _ => {}
            }
        }
        Err(LexError::new("Unterminated string literal", start))
    }

    fn scan_regex(&self, start: usize) -> Result<usize, LexError> {
        let mut in_class = false;
        let mut chars = self.input[start + 1..].char_indices();
        while let Some((idx, ch)) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    let body_end = start + 1 + idx + 1;
                    return Ok(self.scan_while(body_end, |c| c.is_ascii_alphabetic()));
                }
                '\n' | '\r' => break,
                _ => {}
            }
        }
        Err(LexError::new("Unterminated regular expression", start))
    }
}

/// Scan a template literal starting at the opening backtick, returning the
/// end offset. Substitutions may nest strings and further templates.
fn scan_template(input: &str, start: usize) -> Result<usize, LexError> {
    let bytes = input.as_bytes();
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Ok(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = scan_substitution(input, i + 2)?;
            }
            _ => i += 1,
        }
    }
    Err(LexError::new("Unterminated template literal", start))
}

/// Scan a `${ ... }` body starting after the brace, returning the offset
/// just past the closing brace.
fn scan_substitution(input: &str, from: usize) -> Result<usize, LexError> {
    let bytes = input.as_bytes();
    let mut depth = 1usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            b'`' => {
                i = scan_template(input, i)?;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = input[i + 2..]
                    .find("*/")
                    .map(|idx| i + 2 + idx + 2)
                    .ok_or_else(|| LexError::new("Unterminated block comment", i))?;
                continue;
            }
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(LexError::new("Unterminated template substitution", from - 2))
}

/// Whitespace other than line breaks, including the byte order mark
fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
