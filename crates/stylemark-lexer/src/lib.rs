//! Stylemark Lexer
//!
//! Tokenizes SCSS-flavoured stylesheet source into a stream of tokens.
//! Whitespace and comments are kept as tokens: the parser turns them into
//! `space` and comment nodes, and comments carry the prose of the document.
//!
//! # Example
//!
//! ```
//! use stylemark_lexer::Scanner;
//!
//! let tokens = Scanner::tokenize("").unwrap();
//! assert_eq!(tokens.len(), 1); // Just EOF
//! ```

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Position, Span, Token, TokenKind};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}
