use crate::token::{Position, Span, Token, TokenKind};
use crate::LexerError;

/// Stylesheet source scanner.
///
/// Tokenizes SCSS-flavoured source into a stream of tokens.
/// Whitespace runs and comments survive as tokens so the parser can
/// rebuild `space` and comment nodes with their original text.
///
/// - `Vec<char>` source for index-based navigation
/// - Line/column tracking on every character, start and end position on every token
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    /// Position of the most recently consumed character.
    last: Position,
    tokens: Vec<Token>,
}

impl Scanner {
    /// Create a new scanner for the given source.
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            last: Position::new(1, 1),
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source into a vector of tokens.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        let mut scanner = Scanner::new(source);
        scanner.scan_tokens()?;
        Ok(scanner.tokens)
    }

    /// Scan all tokens from the source.
    fn scan_tokens(&mut self) -> Result<(), LexerError> {
        while !self.is_at_end() {
            self.scan_token()?;
        }

        let here = self.here();
        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.pos, self.pos, here, here),
        ));
        Ok(())
    }

    /// Scan the next token.
    fn scan_token(&mut self) -> Result<(), LexerError> {
        let ch = self.peek();

        match ch {
            ' ' | '\t' | '\n' | '\r' | '\x0c' => self.scan_whitespace(),

            // Comments
            '/' if self.peek_next() == '/' => self.scan_singleline_comment(),
            '/' if self.peek_next() == '*' => self.scan_multiline_comment(),

            // Strings
            '"' | '\'' => self.scan_string(),

            // Numbers, including `.5`
            '0'..='9' => self.scan_number(),
            '.' if self.peek_next().is_ascii_digit() => self.scan_number(),

            '#' if self.peek_next() == '{' => self.scan_interpolation(),

            // Sigils
            '$' if is_ident_start(self.peek_next()) => self.scan_sigil(TokenKind::Variable),
            '@' if is_ident_start(self.peek_next()) => self.scan_sigil(TokenKind::AtKeyword),
            '#' if is_ident_char(self.peek_next()) => self.scan_sigil(TokenKind::Hash),

            // Identifiers, including vendor prefixes and custom properties
            '-' if is_ident_start(self.peek_next()) || self.peek_next() == '-' => {
                self.scan_identifier()
            }
            c if is_ident_start(c) => self.scan_identifier(),

            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            ':' => self.single(TokenKind::Colon),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '.' => self.single(TokenKind::Dot),
            '>' => self.single(TokenKind::Greater),
            '+' => self.single(TokenKind::Plus),
            '~' => self.single(TokenKind::Tilde),
            '*' => self.single(TokenKind::Star),
            '&' => self.single(TokenKind::Ampersand),
            '=' => self.single(TokenKind::Equals),
            '!' => self.single(TokenKind::Bang),
            '/' => self.single(TokenKind::Slash),
            '%' => self.single(TokenKind::Percent),
            '-' => self.single(TokenKind::Minus),

            c if c.is_control() => Err(self.error(format!(
                "Unexpected character: {:?}",
                c
            ))),

            c => self.single(TokenKind::Delim(c)),
        }
    }

    // --- Scanners ---

    /// Consume one character as a punctuation token.
    fn single(&mut self, kind: TokenKind) -> Result<(), LexerError> {
        let (start, from) = (self.pos, self.here());
        self.advance();
        self.finish(kind, start, from);
        Ok(())
    }

    /// Scan a run of whitespace, keeping it verbatim.
    fn scan_whitespace(&mut self) -> Result<(), LexerError> {
        let (start, from) = (self.pos, self.here());

        while !self.is_at_end() && matches!(self.peek(), ' ' | '\t' | '\n' | '\r' | '\x0c') {
            self.advance();
        }

        let text = self.slice(start);
        self.finish(TokenKind::Whitespace(text), start, from);
        Ok(())
    }

    /// Scan a line comment (`// ...`). The content runs up to, not including, the line break.
    fn scan_singleline_comment(&mut self) -> Result<(), LexerError> {
        let (start, from) = (self.pos, self.here());

        // Skip the two `/` characters
        self.advance();
        self.advance();

        let content_start = self.pos;
        while !self.is_at_end() && self.peek() != '\n' && self.peek() != '\r' {
            self.advance();
        }

        let content = self.slice(content_start);
        self.finish(TokenKind::SinglelineComment(content), start, from);
        Ok(())
    }

    /// Scan a block comment (`/* ... */`).
    fn scan_multiline_comment(&mut self) -> Result<(), LexerError> {
        let (start, from) = (self.pos, self.here());

        self.advance(); // `/`
        self.advance(); // `*`

        let content_start = self.pos;
        while !self.is_at_end() && !(self.peek() == '*' && self.peek_next() == '/') {
            self.advance();
        }

        if self.is_at_end() {
            return Err(LexerError {
                message: "Unterminated comment".into(),
                line: from.line,
                column: from.column,
            });
        }

        let content = self.slice(content_start);
        self.advance(); // `*`
        self.advance(); // `/`

        self.finish(TokenKind::MultilineComment(content), start, from);
        Ok(())
    }

    /// Scan a string literal. The token keeps the quotes and escapes as written.
    fn scan_string(&mut self) -> Result<(), LexerError> {
        let quote = self.peek();
        let (start, from) = (self.pos, self.here());
        self.advance(); // consume opening quote

        while !self.is_at_end() && self.peek() != quote {
            match self.peek() {
                '\\' => {
                    self.advance();
                    if self.is_at_end() {
                        return Err(self.error("Unterminated escape sequence".into()));
                    }
                    self.advance();
                }
                '\n' | '\r' => break,
                _ => self.advance(),
            }
        }

        if self.is_at_end() || self.peek() != quote {
            return Err(LexerError {
                message: "Unterminated string".into(),
                line: from.line,
                column: from.column,
            });
        }

        self.advance(); // consume closing quote

        let text = self.slice(start);
        self.finish(TokenKind::String(text), start, from);
        Ok(())
    }

    /// Scan a number literal (integer or decimal). The text is kept as written.
    fn scan_number(&mut self) -> Result<(), LexerError> {
        let (start, from) = (self.pos, self.here());

        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance(); // `.`
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.slice(start);
        self.finish(TokenKind::Number(text), start, from);
        Ok(())
    }

    /// Scan an identifier. Hyphens and underscores are part of the name
    /// (`items-center`, `-webkit-box`, `--gap`).
    fn scan_identifier(&mut self) -> Result<(), LexerError> {
        let (start, from) = (self.pos, self.here());

        self.advance();
        while !self.is_at_end() && is_ident_char(self.peek()) {
            self.advance();
        }

        let ident = self.slice(start);
        if ident == "url" && self.peek() == '(' && self.at_unquoted_url() {
            return self.scan_url(start, from);
        }
        self.finish(TokenKind::Identifier(ident), start, from);
        Ok(())
    }

    /// After `url`, check whether the parenthesized argument is unquoted.
    fn at_unquoted_url(&self) -> bool {
        self.chars[self.pos + 1..]
            .iter()
            .find(|c| !c.is_whitespace())
            .is_some_and(|c| !matches!(*c, '"' | '\'' | ')'))
    }

    /// Scan the raw argument of an unquoted `url(...)`. Nothing inside is tokenized,
    /// so `//` in a URL is not mistaken for a comment.
    fn scan_url(&mut self, start: usize, from: Position) -> Result<(), LexerError> {
        self.advance(); // `(`
        let content_start = self.pos;

        while !self.is_at_end() && self.peek() != ')' && self.peek() != '\n' {
            self.advance();
        }

        if self.peek() != ')' {
            return Err(LexerError {
                message: "Unterminated url".into(),
                line: from.line,
                column: from.column,
            });
        }

        let content = self.slice(content_start);
        self.advance(); // `)`
        self.finish(TokenKind::Url(content), start, from);
        Ok(())
    }

    /// Scan `#{...}`. Braces nest; the content is kept verbatim.
    fn scan_interpolation(&mut self) -> Result<(), LexerError> {
        let (start, from) = (self.pos, self.here());

        self.advance(); // `#`
        self.advance(); // `{`
        let content_start = self.pos;
        let mut depth = 1usize;

        while !self.is_at_end() {
            match self.peek() {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            self.advance();
        }

        if self.is_at_end() {
            return Err(LexerError {
                message: "Unterminated interpolation".into(),
                line: from.line,
                column: from.column,
            });
        }

        let content = self.slice(content_start);
        self.advance(); // `}`
        self.finish(TokenKind::Interpolation(content), start, from);
        Ok(())
    }

    /// Scan `$name`, `@name` or `#name`. The sigil is not part of the payload.
    fn scan_sigil(&mut self, make: fn(String) -> TokenKind) -> Result<(), LexerError> {
        let (start, from) = (self.pos, self.here());

        self.advance(); // sigil
        let name_start = self.pos;
        while !self.is_at_end() && is_ident_char(self.peek()) {
            self.advance();
        }

        let name = self.slice(name_start);
        self.finish(make(name), start, from);
        Ok(())
    }

    // --- Helpers ---

    fn finish(&mut self, kind: TokenKind, start: usize, from: Position) {
        let span = Span::new(start, self.pos, from, self.last);
        self.tokens.push(Token::new(kind, span));
    }

    fn slice(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.pos]
        }
    }

    fn peek_next(&self) -> char {
        if self.pos + 1 >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.pos + 1]
        }
    }

    fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        self.last = self.here();
        if self.chars[self.pos] == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.pos += 1;
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, message: String) -> LexerError {
        LexerError {
            message,
            line: self.line,
            column: self.column,
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || !c.is_ascii() && !c.is_whitespace() && c != '\0'
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}
