/// A line/column position in source text. Both are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The extent of a token in source text.
///
/// `start`/`end` are char offsets (end exclusive). `from` is the position of
/// the first character and `to` the position of the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub from: Position,
    pub to: Position,
}

impl Span {
    pub fn new(start: usize, end: usize, from: Position, to: Position) -> Self {
        Self {
            start,
            end,
            from,
            to,
        }
    }
}

/// Token classification for stylesheet source.
///
/// Data-carrying variants embed their literal text directly.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A run of spaces, tabs and line breaks, kept verbatim.
    Whitespace(String),

    // Comments (content without the markers)
    SinglelineComment(String),
    MultilineComment(String),

    // Literals
    Identifier(String),
    /// `$name`, without the dollar.
    Variable(String),
    /// `@name`, without the at sign.
    AtKeyword(String),
    /// `#name`, without the hash. Either an id selector or a color.
    Hash(String),
    /// Numeric literal as written: `12`, `1.5`, `.5`.
    Number(String),
    /// Quoted string including its quotes.
    String(String),
    /// Unquoted `url(...)`; holds the text between the parentheses.
    Url(String),
    /// SCSS `#{...}` interpolation; holds the text between the braces.
    Interpolation(String),

    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Greater,
    Plus,
    Tilde,
    Star,
    Ampersand,
    Equals,
    Bang,
    Slash,
    Percent,
    Minus,
    /// Any other printable character (`|`, `^`, `?`, ...).
    Delim(char),

    Eof,
}

impl TokenKind {
    /// The source text this token stands for.
    pub fn text(&self) -> String {
        match self {
            TokenKind::Whitespace(s)
            | TokenKind::Identifier(s)
            | TokenKind::Number(s)
            | TokenKind::String(s) => s.clone(),
            TokenKind::SinglelineComment(s) => format!("//{s}"),
            TokenKind::MultilineComment(s) => format!("/*{s}*/"),
            TokenKind::Variable(s) => format!("${s}"),
            TokenKind::AtKeyword(s) => format!("@{s}"),
            TokenKind::Hash(s) => format!("#{s}"),
            TokenKind::Url(s) => format!("url({s})"),
            TokenKind::Interpolation(s) => format!("#{{{s}}}"),
            TokenKind::Delim(c) => c.to_string(),
            TokenKind::Eof => String::new(),
            punct => punct.punctuation().unwrap_or_default().to_string(),
        }
    }

    fn punctuation(&self) -> Option<&'static str> {
        let s = match self {
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Greater => ">",
            TokenKind::Plus => "+",
            TokenKind::Tilde => "~",
            TokenKind::Star => "*",
            TokenKind::Ampersand => "&",
            TokenKind::Equals => "=",
            TokenKind::Bang => "!",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Minus => "-",
            _ => return None,
        };
        Some(s)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, TokenKind::Whitespace(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(
            self,
            TokenKind::SinglelineComment(_) | TokenKind::MultilineComment(_)
        )
    }
}

/// A token produced by the stylesheet lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}
