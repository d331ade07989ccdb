//! Stylemark Parser
//!
//! Parses stylesheet source into a syntax tree whose node types follow the
//! gonzales-pe SCSS vocabulary (`stylesheet`, `ruleset`, `selector`,
//! `typeSelector`, `class`, `attributeSelector`, `multilineComment`, ...).
//!
//! The tree keeps whitespace and comments, so printing it with `Display`
//! gives back the original source.
//!
//! # Example
//!
//! ```
//! use stylemark_parser::{NodeKind, Parser};
//!
//! let sheet = Parser::parse("div.card { }").unwrap();
//! assert!(sheet.contains(NodeKind::Ruleset));
//! ```

pub mod ast;
pub mod parser;

pub use ast::{Content, Node, NodeKind, Position};
pub use parser::Parser;

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl From<stylemark_lexer::LexerError> for ParseError {
    fn from(e: stylemark_lexer::LexerError) -> Self {
        Self {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}
