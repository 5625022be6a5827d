//! Source model shared by every rule
//!
//! Files are lexed into a lossless token stream and given a light bracket
//! structure. Rules work on tokens and lines rather than on a full syntax
//! tree.

mod lexer;
mod unit;

pub use lexer::{KEYWORDS, LexError, Span, Token, TokenKind, lex};
pub use unit::{BraceKind, LineInfo, SourceUnit, SyntaxError};
