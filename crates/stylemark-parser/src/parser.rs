//! Stylesheet parser for stylemark.
//!
//! Parses a stream of source-level tokens (from `stylemark-lexer`) into a
//! syntax tree rooted at a `stylesheet` node. Whitespace and comments are
//! kept as `space` and comment nodes, so the tree prints back to its source.
//!
//! Uses recursive descent. Inside blocks, a scan ahead to the first
//! top-level `{`, `;` or `}` decides between a nested ruleset and a
//! declaration.

use crate::ast::{Node, NodeKind, Position};
use crate::ParseError;
use stylemark_lexer::{Token, TokenKind};

/// Stylesheet parser.
///
/// Converts the flat token stream into a hierarchical syntax tree.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser for the given tokens.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof) {
            let end = tokens.last().map_or(
                stylemark_lexer::Span::new(0, 0, Default::default(), Default::default()),
                |token| token.span,
            );
            tokens.push(Token::new(TokenKind::Eof, end));
        }
        Self { tokens, pos: 0 }
    }

    /// Parse source text into a syntax tree.
    pub fn parse(source: &str) -> Result<Node, ParseError> {
        let tokens = stylemark_lexer::Scanner::tokenize(source)?;

        let mut parser = Parser::new(tokens);
        parser.parse_stylesheet()
    }

    /// Parse a full stylesheet.
    fn parse_stylesheet(&mut self) -> Result<Node, ParseError> {
        let start = Position::new(1, 1);
        let mut nodes = Vec::new();

        while !self.is_at_end() {
            if self.peek().kind == TokenKind::RBrace {
                return Err(self.error("Unexpected '}'".into()));
            }
            self.parse_item(&mut nodes)?;
        }

        let end = nodes.last().map_or(start, |node| node.end);
        Ok(Node::branch(NodeKind::Stylesheet, nodes, start, end))
    }

    /// Parse one item of a stylesheet or block into `out`.
    ///
    /// Declarations can push more than one node: whitespace after a value
    /// belongs to the enclosing block, not to the declaration.
    fn parse_item(&mut self, out: &mut Vec<Node>) -> Result<(), ParseError> {
        if let Some(trivia) = self.parse_trivia() {
            out.push(trivia);
            return Ok(());
        }

        match &self.peek().kind {
            TokenKind::Semicolon => {
                out.push(self.take_leaf(NodeKind::DeclarationDelimiter));
            }
            TokenKind::AtKeyword(_) => {
                out.push(self.parse_atrule()?);
            }
            _ if self.starts_ruleset() => {
                out.push(self.parse_ruleset()?);
            }
            _ => self.parse_declaration(out)?,
        }

        Ok(())
    }

    // =========================================================================
    // Rulesets and blocks
    // =========================================================================

    /// Parse a ruleset:
    /// ```text
    /// div.card, section { ... }
    /// ```
    fn parse_ruleset(&mut self) -> Result<Node, ParseError> {
        let start = self.here();
        let mut children = Vec::new();

        loop {
            children.push(self.parse_selector()?);
            self.push_trivia(&mut children);

            if self.peek().kind != TokenKind::Comma {
                break;
            }
            children.push(self.take_leaf(NodeKind::Delimiter));
            self.push_trivia(&mut children);
        }

        if self.peek().kind != TokenKind::LBrace {
            return Err(self.error(format!(
                "Expected '{{' after selector, got {}",
                describe(&self.peek().kind)
            )));
        }

        let block = self.parse_block()?;
        let end = block.end;
        children.push(block);

        Ok(Node::branch(NodeKind::Ruleset, children, start, end))
    }

    /// Parse a `{ ... }` block of declarations, nested rulesets and at-rules.
    fn parse_block(&mut self) -> Result<Node, ParseError> {
        let open = self.advance(); // consume `{`
        let mut items = Vec::new();

        loop {
            match &self.peek().kind {
                TokenKind::RBrace => break,
                TokenKind::Eof => {
                    return Err(error_at("Unclosed block".into(), open.span.from.into()));
                }
                _ => self.parse_item(&mut items)?,
            }
        }

        let close = self.advance(); // consume `}`
        Ok(Node::branch(
            NodeKind::Block,
            items,
            open.span.from.into(),
            close.span.to.into(),
        ))
    }

    /// Parse an at-rule: `@media screen { ... }`, `@import 'a';`.
    /// A terminating `;` is left for the enclosing block.
    fn parse_atrule(&mut self) -> Result<Node, ParseError> {
        let token = self.advance();
        let TokenKind::AtKeyword(name) = &token.kind else {
            return Err(error_at("Expected at-rule".into(), token.span.from.into()));
        };

        let keyword = Node::branch(
            NodeKind::Atkeyword,
            vec![Node::leaf(
                NodeKind::Ident,
                name.clone(),
                after_sigil(&token),
                token.span.to.into(),
            )],
            token.span.from.into(),
            token.span.to.into(),
        );

        let mut children = vec![keyword];
        children.extend(self.parse_value_items()?);

        match &self.peek().kind {
            TokenKind::LBrace => children.push(self.parse_block()?),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => {}
            other => {
                return Err(self.error(format!("Unexpected {} in at-rule", describe(other))));
            }
        }

        let end = children.last().map_or(token.span.to.into(), |node| node.end);
        Ok(Node::branch(
            NodeKind::Atrule,
            children,
            token.span.from.into(),
            end,
        ))
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    /// Parse one selector of a selector list. Whitespace that only separates
    /// the selector from a following `,` or `{` is left to the ruleset.
    fn parse_selector(&mut self) -> Result<Node, ParseError> {
        let start = self.here();
        let mut parts: Vec<Node> = Vec::new();

        loop {
            match self.peek().kind.clone() {
                TokenKind::Whitespace(_)
                | TokenKind::SinglelineComment(_)
                | TokenKind::MultilineComment(_) => {
                    if matches!(
                        self.next_solid(),
                        TokenKind::LBrace | TokenKind::Comma | TokenKind::Eof
                    ) {
                        break;
                    }
                    self.push_trivia(&mut parts);
                }
                TokenKind::Identifier(_) | TokenKind::Interpolation(_) => {
                    let names = self.parse_name("selector")?;
                    let kind = if parts.last().is_some_and(|p| p.is(NodeKind::ParentSelector)) {
                        NodeKind::ParentSelectorExtension
                    } else {
                        NodeKind::TypeSelector
                    };
                    let (s, e) = extent(&names);
                    parts.push(Node::branch(kind, names, s, e));
                }
                TokenKind::Star => {
                    parts.push(self.take_leaf(NodeKind::UniversalSelector));
                }
                TokenKind::Dot => {
                    let dot = self.advance();
                    let names = self.parse_name("'.'")?;
                    let (_, end) = extent(&names);
                    parts.push(Node::branch(
                        NodeKind::Class,
                        names,
                        dot.span.from.into(),
                        end,
                    ));
                }
                TokenKind::Hash(name) => {
                    let token = self.advance();
                    let ident =
                        Node::leaf(NodeKind::Ident, name, after_sigil(&token), token.span.to.into());
                    parts.push(Node::branch(
                        NodeKind::Id,
                        vec![ident],
                        token.span.from.into(),
                        token.span.to.into(),
                    ));
                }
                TokenKind::LBracket => parts.push(self.parse_attribute_selector()?),
                TokenKind::Colon => parts.push(self.parse_pseudo()?),
                TokenKind::Ampersand => {
                    parts.push(self.take_leaf(NodeKind::ParentSelector));
                }
                TokenKind::Greater | TokenKind::Plus | TokenKind::Tilde => {
                    parts.push(self.take_leaf(NodeKind::Combinator));
                }
                TokenKind::Percent if self.at_placeholder() => {
                    parts.push(self.parse_placeholder()?);
                }
                // Keyframe steps: `0%`, `50.5%`
                TokenKind::Number(_) => parts.push(self.parse_number()),
                TokenKind::LBrace | TokenKind::Comma | TokenKind::Eof => break,
                other => {
                    return Err(self.error(format!("Unexpected {} in selector", describe(&other))));
                }
            }
        }

        let Some(end) = parts.last().map(|part| part.end) else {
            return Err(self.error(format!(
                "Expected selector, got {}",
                describe(&self.peek().kind)
            )));
        };

        Ok(Node::branch(NodeKind::Selector, parts, start, end))
    }

    /// Parse `[name]`, `[name=value]`, `[name^="value" i]`.
    fn parse_attribute_selector(&mut self) -> Result<Node, ParseError> {
        let open = self.advance(); // consume `[`
        let mut parts = Vec::new();

        self.push_spaces(&mut parts);

        let name = self.expect_identifier("'['")?;
        let (s, e) = (name.start, name.end);
        parts.push(Node::branch(NodeKind::AttributeName, vec![name], s, e));
        self.push_spaces(&mut parts);

        if let Some(matcher) = self.parse_attribute_match() {
            parts.push(matcher);
            self.push_spaces(&mut parts);

            let value = match &self.peek().kind {
                TokenKind::String(_) => self.take_leaf(NodeKind::String),
                TokenKind::Identifier(_) => self.take_leaf(NodeKind::Ident),
                TokenKind::Number(_) => self.take_leaf(NodeKind::Number),
                other => {
                    return Err(self.error(format!(
                        "Expected attribute value, got {}",
                        describe(other)
                    )));
                }
            };
            let (s, e) = (value.start, value.end);
            parts.push(Node::branch(NodeKind::AttributeValue, vec![value], s, e));
            self.push_spaces(&mut parts);

            if matches!(self.peek().kind, TokenKind::Identifier(_)) {
                parts.push(self.take_leaf(NodeKind::AttributeFlags));
                self.push_spaces(&mut parts);
            }
        }

        if self.peek().kind != TokenKind::RBracket {
            return Err(error_at(
                "Unclosed attribute selector".into(),
                open.span.from.into(),
            ));
        }
        let close = self.advance();

        Ok(Node::branch(
            NodeKind::AttributeSelector,
            parts,
            open.span.from.into(),
            close.span.to.into(),
        ))
    }

    /// Parse `=`, `~=`, `|=`, `^=`, `$=` or `*=`.
    fn parse_attribute_match(&mut self) -> Option<Node> {
        if self.peek().kind == TokenKind::Equals {
            return Some(self.take_leaf(NodeKind::AttributeMatch));
        }

        let prefixed = matches!(
            self.peek().kind,
            TokenKind::Tilde
                | TokenKind::Star
                | TokenKind::Delim('|')
                | TokenKind::Delim('^')
                | TokenKind::Delim('$')
        );
        if !prefixed || self.peek_at(1).kind != TokenKind::Equals {
            return None;
        }

        let first = self.advance();
        let equals = self.advance();
        Some(Node::leaf(
            NodeKind::AttributeMatch,
            format!("{}=", first.kind.text()),
            first.span.from.into(),
            equals.span.to.into(),
        ))
    }

    /// Parse `:hover`, `:nth-child(2n)` or `::before`.
    fn parse_pseudo(&mut self) -> Result<Node, ParseError> {
        let colon = self.advance(); // consume `:`

        let kind = if self.peek().kind == TokenKind::Colon {
            self.advance();
            NodeKind::PseudoElement
        } else {
            NodeKind::PseudoClass
        };

        let ident = self.expect_identifier("':'")?;
        let mut end = ident.end;
        let mut children = vec![ident];

        if kind == NodeKind::PseudoClass && self.peek().kind == TokenKind::LParen {
            let arguments = self.parse_parenthesized(NodeKind::Arguments)?;
            end = arguments.end;
            children.push(arguments);
        }

        Ok(Node::branch(kind, children, colon.span.from.into(), end))
    }

    // =========================================================================
    // Declarations and values
    // =========================================================================

    /// Parse `property: value` or `$variable: value`. The `;` is left for the
    /// enclosing block.
    fn parse_declaration(&mut self, out: &mut Vec<Node>) -> Result<(), ParseError> {
        let start = self.here();
        let mut children = Vec::new();

        let (name, property) = match self.peek().kind.clone() {
            TokenKind::Identifier(_) | TokenKind::Interpolation(_) => {
                let names = self.parse_name("property")?;
                let name = names.iter().map(Node::to_string).collect::<String>();
                (name, names)
            }
            TokenKind::Variable(name) => {
                let token = self.advance();
                let ident = Node::leaf(
                    NodeKind::Ident,
                    name.clone(),
                    after_sigil(&token),
                    token.span.to.into(),
                );
                let variable = Node::branch(
                    NodeKind::Variable,
                    vec![ident],
                    token.span.from.into(),
                    token.span.to.into(),
                );
                (format!("${name}"), vec![variable])
            }
            other => {
                return Err(self.error(format!(
                    "Expected property name, got {}",
                    describe(&other)
                )));
            }
        };
        let (s, e) = extent(&property);
        children.push(Node::branch(NodeKind::Property, property, s, e));
        self.push_spaces(&mut children);

        if self.peek().kind != TokenKind::Colon {
            return Err(self.error(format!("Expected ':' after property '{name}'")));
        }
        children.push(self.take_leaf(NodeKind::PropertyDelimiter));
        self.push_spaces(&mut children);

        let mut items = self.parse_value_items()?;

        match &self.peek().kind {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => {}
            other => {
                return Err(self.error(format!("Unexpected {} in declaration", describe(other))));
            }
        }

        // Trailing whitespace and comments belong to the enclosing block
        let mut trailing = Vec::new();
        while items
            .last()
            .is_some_and(|node| node.is(NodeKind::Space) || is_comment(node))
        {
            trailing.extend(items.pop());
        }
        trailing.reverse();

        let (Some(first), Some(last)) = (items.first(), items.last()) else {
            return Err(self.error(format!("Expected value for property '{name}'")));
        };
        let (s, e) = (first.start, last.end);
        children.push(Node::branch(NodeKind::Value, items, s, e));

        out.push(Node::branch(NodeKind::Declaration, children, start, e));
        out.extend(trailing);
        Ok(())
    }

    /// Parse value items up to (not including) the next `;`, `{`, `}`, `)`
    /// or end of input.
    fn parse_value_items(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut items = Vec::new();

        loop {
            if let Some(trivia) = self.parse_trivia() {
                items.push(trivia);
                continue;
            }

            let item = match self.peek().kind.clone() {
                TokenKind::Semicolon
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::RParen
                | TokenKind::Eof => break,
                TokenKind::Identifier(_) if self.peek_at(1).kind == TokenKind::LParen => {
                    let ident = self.take_leaf(NodeKind::Ident);
                    let arguments = self.parse_parenthesized(NodeKind::Arguments)?;
                    let (s, e) = (ident.start, arguments.end);
                    Node::branch(NodeKind::Function, vec![ident, arguments], s, e)
                }
                TokenKind::Identifier(_) => self.take_leaf(NodeKind::Ident),
                TokenKind::Number(_) => self.parse_number(),
                TokenKind::String(_) => self.take_leaf(NodeKind::String),
                TokenKind::Url(_) => self.take_leaf(NodeKind::Uri),
                TokenKind::Interpolation(_) => self.take_leaf(NodeKind::Interpolation),
                TokenKind::Percent if self.at_placeholder() => self.parse_placeholder()?,
                TokenKind::Hash(_) => self.take_leaf(NodeKind::Color),
                TokenKind::Variable(name) => {
                    let token = self.advance();
                    let ident =
                        Node::leaf(NodeKind::Ident, name, after_sigil(&token), token.span.to.into());
                    Node::branch(
                        NodeKind::Variable,
                        vec![ident],
                        token.span.from.into(),
                        token.span.to.into(),
                    )
                }
                TokenKind::Bang
                    if matches!(
                        &self.peek_at(1).kind,
                        TokenKind::Identifier(word) if word.eq_ignore_ascii_case("important")
                    ) =>
                {
                    let bang = self.advance();
                    let word = self.advance();
                    Node::leaf(
                        NodeKind::Important,
                        word.kind.text(),
                        bang.span.from.into(),
                        word.span.to.into(),
                    )
                }
                TokenKind::LParen => self.parse_parenthesized(NodeKind::Parentheses)?,
                TokenKind::Ampersand => self.take_leaf(NodeKind::ParentSelector),
                _ => self.take_leaf(NodeKind::Operator),
            };
            items.push(item);
        }

        Ok(items)
    }

    /// Parse `12`, `12px` or `12%`.
    fn parse_number(&mut self) -> Node {
        let number = self.take_leaf(NodeKind::Number);

        match &self.peek().kind {
            TokenKind::Percent => {
                let percent = self.advance();
                let start = number.start;
                Node::branch(
                    NodeKind::Percentage,
                    vec![number],
                    start,
                    percent.span.to.into(),
                )
            }
            TokenKind::Identifier(_) => {
                let unit = self.take_leaf(NodeKind::Ident);
                let (s, e) = (number.start, unit.end);
                Node::branch(NodeKind::Dimension, vec![number, unit], s, e)
            }
            _ => number,
        }
    }

    /// Parse a `%name` placeholder selector.
    fn parse_placeholder(&mut self) -> Result<Node, ParseError> {
        let percent = self.advance(); // consume `%`
        let names = self.parse_name("'%'")?;
        let (_, end) = extent(&names);
        Ok(Node::branch(
            NodeKind::Placeholder,
            names,
            percent.span.from.into(),
            end,
        ))
    }

    fn at_placeholder(&self) -> bool {
        matches!(
            self.peek_at(1).kind,
            TokenKind::Identifier(_) | TokenKind::Interpolation(_)
        )
    }

    /// Parse an identifier that may be glued together from interpolations:
    /// `a-#{$i}`, `#{$side}-width`.
    fn parse_name(&mut self, after: &str) -> Result<Vec<Node>, ParseError> {
        let mut names = Vec::new();

        loop {
            match &self.peek().kind {
                TokenKind::Identifier(_) => names.push(self.take_leaf(NodeKind::Ident)),
                TokenKind::Interpolation(_) => {
                    names.push(self.take_leaf(NodeKind::Interpolation));
                }
                _ => break,
            }
        }

        if names.is_empty() {
            return Err(self.error(format!(
                "Expected identifier after {after}, got {}",
                describe(&self.peek().kind)
            )));
        }

        Ok(names)
    }

    /// Parse a `( ... )` group as `arguments` or `parentheses`.
    fn parse_parenthesized(&mut self, kind: NodeKind) -> Result<Node, ParseError> {
        let open = self.advance(); // consume `(`
        let items = self.parse_value_items()?;

        if self.peek().kind != TokenKind::RParen {
            return Err(error_at("Unclosed '('".into(), open.span.from.into()));
        }
        let close = self.advance();

        Ok(Node::branch(
            kind,
            items,
            open.span.from.into(),
            close.span.to.into(),
        ))
    }

    // =========================================================================
    // Trivia
    // =========================================================================

    /// Take a whitespace or comment token as a node.
    fn parse_trivia(&mut self) -> Option<Node> {
        let kind = match &self.peek().kind {
            TokenKind::Whitespace(_) => NodeKind::Space,
            TokenKind::SinglelineComment(_) => NodeKind::SinglelineComment,
            TokenKind::MultilineComment(_) => NodeKind::MultilineComment,
            _ => return None,
        };
        Some(self.take_leaf(kind))
    }

    fn push_trivia(&mut self, out: &mut Vec<Node>) {
        while let Some(trivia) = self.parse_trivia() {
            out.push(trivia);
        }
    }

    fn push_spaces(&mut self, out: &mut Vec<Node>) {
        while self.peek().kind.is_whitespace() {
            out.push(self.take_leaf(NodeKind::Space));
        }
    }

    // =========================================================================
    // Token navigation helpers
    // =========================================================================

    /// Scan ahead: does the upcoming item open a block before it ends?
    fn starts_ruleset(&self) -> bool {
        let mut depth = 0usize;

        for token in &self.tokens[self.pos..] {
            match &token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::LBrace if depth == 0 => return true,
                TokenKind::Semicolon | TokenKind::RBrace if depth == 0 => return false,
                TokenKind::Eof => return false,
                _ => {}
            }
        }

        false
    }

    /// The next token that is not whitespace or a comment.
    fn next_solid(&self) -> &TokenKind {
        self.tokens[self.pos..]
            .iter()
            .map(|token| &token.kind)
            .find(|kind| !kind.is_whitespace() && !kind.is_comment())
            .unwrap_or(&TokenKind::Eof)
    }

    /// Consume the current token as a leaf carrying its payload text.
    fn take_leaf(&mut self, kind: NodeKind) -> Node {
        let token = self.advance();
        let text = match token.kind {
            TokenKind::Whitespace(s)
            | TokenKind::SinglelineComment(s)
            | TokenKind::MultilineComment(s)
            | TokenKind::Identifier(s)
            | TokenKind::Number(s)
            | TokenKind::String(s)
            | TokenKind::Url(s)
            | TokenKind::Interpolation(s)
            | TokenKind::Hash(s) => s,
            other => other.text(),
        };
        Node::leaf(kind, text, token.span.from.into(), token.span.to.into())
    }

    fn expect_identifier(&mut self, after: &str) -> Result<Node, ParseError> {
        if matches!(self.peek().kind, TokenKind::Identifier(_)) {
            Ok(self.take_leaf(NodeKind::Ident))
        } else {
            Err(self.error(format!(
                "Expected identifier after {after}, got {}",
                describe(&self.peek().kind)
            )))
        }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Past the end, this keeps returning the trailing EOF token.
    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len() || matches!(self.peek().kind, TokenKind::Eof)
    }

    fn here(&self) -> Position {
        self.peek().span.from.into()
    }

    fn error(&self, message: String) -> ParseError {
        error_at(message, self.here())
    }
}

fn error_at(message: String, at: Position) -> ParseError {
    ParseError {
        message,
        line: at.line,
        column: at.column,
    }
}

/// Start of the first node and end of the last.
fn extent(nodes: &[Node]) -> (Position, Position) {
    match (nodes.first(), nodes.last()) {
        (Some(first), Some(last)) => (first.start, last.end),
        _ => Default::default(),
    }
}

/// Position of the name after a one-character sigil (`$`, `@`, `#`).
fn after_sigil(token: &Token) -> Position {
    Position::new(token.span.from.line, token.span.from.column + 1)
}

fn is_comment(node: &Node) -> bool {
    node.is(NodeKind::SinglelineComment) || node.is(NodeKind::MultilineComment)
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Eof => "end of input".into(),
        other => format!("'{}'", other.text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Node {
        Parser::parse(source).unwrap()
    }

    fn kinds(node: &Node) -> Vec<NodeKind> {
        node.children().iter().map(|child| child.kind).collect()
    }

    /// The first ruleset at the top level.
    fn first_ruleset(sheet: &Node) -> &Node {
        sheet
            .first(NodeKind::Ruleset)
            .unwrap_or_else(|| panic!("Expected ruleset in {:?}", kinds(sheet)))
    }

    fn selector_of(source: &str) -> Node {
        let sheet = parse(source);
        first_ruleset(&sheet)
            .first(NodeKind::Selector)
            .cloned()
            .unwrap()
    }

    // =========================================================================
    // Empty / simple
    // =========================================================================

    #[test]
    fn test_empty_stylesheet() {
        let sheet = parse("");
        assert!(sheet.is(NodeKind::Stylesheet));
        assert!(sheet.children().is_empty());
    }

    #[test]
    fn test_whitespace_only() {
        let sheet = parse("  \n");
        assert_eq!(kinds(&sheet), vec![NodeKind::Space]);
    }

    #[test]
    fn test_single_ruleset() {
        let sheet = parse("div {}");
        let ruleset = first_ruleset(&sheet);
        assert_eq!(
            kinds(ruleset),
            vec![NodeKind::Selector, NodeKind::Space, NodeKind::Block]
        );
    }

    #[test]
    fn test_ruleset_positions() {
        let sheet = parse("a {\n}");
        let ruleset = first_ruleset(&sheet);
        assert_eq!(ruleset.start, Position::new(1, 1));
        assert_eq!(ruleset.end, Position::new(2, 1));
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    #[test]
    fn test_type_selector() {
        let selector = selector_of("div {}");
        let ty = selector.first(NodeKind::TypeSelector).unwrap();
        assert_eq!(ty.first(NodeKind::Ident).unwrap().text(), Some("div"));
    }

    #[test]
    fn test_classes() {
        let selector = selector_of("div.foo.bar {}");
        assert_eq!(
            kinds(&selector),
            vec![NodeKind::TypeSelector, NodeKind::Class, NodeKind::Class]
        );
        let mut names = Vec::new();
        selector.for_each(NodeKind::Class, |class, _, _| {
            names.push(class.first(NodeKind::Ident).unwrap().text().unwrap().to_string());
        });
        assert_eq!(names, vec!["foo", "bar"]);
    }

    #[test]
    fn test_class_only_selector() {
        let selector = selector_of(".foo {}");
        assert_eq!(kinds(&selector), vec![NodeKind::Class]);
        assert!(selector.first(NodeKind::TypeSelector).is_none());
    }

    #[test]
    fn test_attribute_selector_with_string() {
        let selector = selector_of("a[data-x=\"1\"] {}");
        let attr = selector.first(NodeKind::AttributeSelector).unwrap();
        assert_eq!(
            kinds(attr),
            vec![
                NodeKind::AttributeName,
                NodeKind::AttributeMatch,
                NodeKind::AttributeValue,
            ]
        );
        let name = attr.first(NodeKind::AttributeName).unwrap();
        assert_eq!(name.first(NodeKind::Ident).unwrap().text(), Some("data-x"));
        let value = attr.first(NodeKind::AttributeValue).unwrap();
        assert_eq!(value.first(NodeKind::String).unwrap().text(), Some("\"1\""));
    }

    #[test]
    fn test_attribute_selector_bare() {
        let selector = selector_of("input[disabled] {}");
        let attr = selector.first(NodeKind::AttributeSelector).unwrap();
        assert_eq!(kinds(attr), vec![NodeKind::AttributeName]);
    }

    #[test]
    fn test_attribute_selector_ident_value_and_flag() {
        let selector = selector_of("a[ type ^= text i ] {}");
        let attr = selector.first(NodeKind::AttributeSelector).unwrap();
        let matcher = attr.first(NodeKind::AttributeMatch).unwrap();
        assert_eq!(matcher.text(), Some("^="));
        let value = attr.first(NodeKind::AttributeValue).unwrap();
        assert_eq!(value.first(NodeKind::Ident).unwrap().text(), Some("text"));
        assert_eq!(attr.first(NodeKind::AttributeFlags).unwrap().text(), Some("i"));
    }

    #[test]
    fn test_unclosed_attribute_selector() {
        let err = Parser::parse("a[href {}").unwrap_err();
        assert!(err.message.contains("Unclosed attribute selector"));
        assert_eq!((err.line, err.column), (1, 2));
    }

    #[test]
    fn test_id_selector() {
        let selector = selector_of("section#main {}");
        let id = selector.first(NodeKind::Id).unwrap();
        assert_eq!(id.first(NodeKind::Ident).unwrap().text(), Some("main"));
    }

    #[test]
    fn test_pseudo_class_and_element() {
        let selector = selector_of("li:nth-child(2n)::before {}");
        assert_eq!(
            kinds(&selector),
            vec![
                NodeKind::TypeSelector,
                NodeKind::PseudoClass,
                NodeKind::PseudoElement,
            ]
        );
        let pseudo = selector.first(NodeKind::PseudoClass).unwrap();
        assert!(pseudo.contains(NodeKind::Arguments));
    }

    #[test]
    fn test_descendant_and_child_combinators() {
        let selector = selector_of("ul > li a {}");
        assert_eq!(
            kinds(&selector),
            vec![
                NodeKind::TypeSelector,
                NodeKind::Space,
                NodeKind::Combinator,
                NodeKind::Space,
                NodeKind::TypeSelector,
                NodeKind::Space,
                NodeKind::TypeSelector,
            ]
        );
    }

    #[test]
    fn test_selector_list() {
        let sheet = parse("h1, h2 {}");
        let ruleset = first_ruleset(&sheet);
        assert_eq!(
            kinds(ruleset),
            vec![
                NodeKind::Selector,
                NodeKind::Delimiter,
                NodeKind::Space,
                NodeKind::Selector,
                NodeKind::Space,
                NodeKind::Block,
            ]
        );
    }

    #[test]
    fn test_parent_selector_extension() {
        let sheet = parse("a { &-icon {} &.active {} }");
        let block = first_ruleset(&sheet).first(NodeKind::Block).unwrap();
        let nested: Vec<_> = block
            .children()
            .iter()
            .filter(|n| n.is(NodeKind::Ruleset))
            .map(|r| kinds(r.first(NodeKind::Selector).unwrap()))
            .collect();
        assert_eq!(
            nested,
            vec![
                vec![NodeKind::ParentSelector, NodeKind::ParentSelectorExtension],
                vec![NodeKind::ParentSelector, NodeKind::Class],
            ]
        );
    }

    #[test]
    fn test_missing_selector() {
        let err = Parser::parse("{}").unwrap_err();
        assert!(err.message.contains("Expected selector"));
    }

    // =========================================================================
    // Blocks, declarations, nesting
    // =========================================================================

    #[test]
    fn test_declaration() {
        let sheet = parse("p { color: red; }");
        let block = first_ruleset(&sheet).first(NodeKind::Block).unwrap();
        assert_eq!(
            kinds(block),
            vec![
                NodeKind::Space,
                NodeKind::Declaration,
                NodeKind::DeclarationDelimiter,
                NodeKind::Space,
            ]
        );
        let decl = block.first(NodeKind::Declaration).unwrap();
        assert_eq!(
            kinds(decl),
            vec![
                NodeKind::Property,
                NodeKind::PropertyDelimiter,
                NodeKind::Space,
                NodeKind::Value,
            ]
        );
    }

    #[test]
    fn test_declaration_trailing_space_goes_to_block() {
        let sheet = parse("p { color: red }");
        let block = first_ruleset(&sheet).first(NodeKind::Block).unwrap();
        assert_eq!(
            kinds(block),
            vec![NodeKind::Space, NodeKind::Declaration, NodeKind::Space]
        );
    }

    #[test]
    fn test_value_items() {
        let sheet = parse("p { margin: 0 10px 5% auto !important; color: rgba(0, 0, 0, .5); background: #fff url(a.png); }");
        let block = first_ruleset(&sheet).first(NodeKind::Block).unwrap();
        let values: Vec<Vec<NodeKind>> = block
            .children()
            .iter()
            .filter(|n| n.is(NodeKind::Declaration))
            .map(|d| {
                kinds(d.first(NodeKind::Value).unwrap())
                    .into_iter()
                    .filter(|k| *k != NodeKind::Space)
                    .collect()
            })
            .collect();
        assert_eq!(
            values,
            vec![
                vec![
                    NodeKind::Number,
                    NodeKind::Dimension,
                    NodeKind::Percentage,
                    NodeKind::Ident,
                    NodeKind::Important,
                ],
                vec![NodeKind::Function],
                vec![NodeKind::Color, NodeKind::Uri],
            ]
        );
    }

    #[test]
    fn test_nested_ruleset_vs_pseudo_declaration() {
        let sheet = parse("a { color: red; span:hover { } }");
        let block = first_ruleset(&sheet).first(NodeKind::Block).unwrap();
        assert!(block.contains(NodeKind::Declaration));
        let nested = block.first(NodeKind::Ruleset).unwrap();
        let selector = nested.first(NodeKind::Selector).unwrap();
        assert_eq!(
            kinds(selector),
            vec![NodeKind::TypeSelector, NodeKind::PseudoClass]
        );
    }

    #[test]
    fn test_variable_declaration_at_top_level() {
        let sheet = parse("$gap: 4px;");
        assert_eq!(
            kinds(&sheet),
            vec![NodeKind::Declaration, NodeKind::DeclarationDelimiter]
        );
        let property = sheet
            .first(NodeKind::Declaration)
            .and_then(|d| d.first(NodeKind::Property))
            .unwrap();
        assert!(property.contains(NodeKind::Variable));
    }

    #[test]
    fn test_missing_colon() {
        let err = Parser::parse("a { color red; }").unwrap_err();
        assert!(err.message.contains("Expected ':' after property 'color'"));
    }

    #[test]
    fn test_missing_value() {
        let err = Parser::parse("a { color: ; }").unwrap_err();
        assert!(err.message.contains("Expected value for property 'color'"));
    }

    #[test]
    fn test_unclosed_block() {
        let err = Parser::parse("div {\n  span {").unwrap_err();
        assert!(err.message.contains("Unclosed block"));
        assert_eq!((err.line, err.column), (2, 8));
    }

    #[test]
    fn test_stray_closing_brace() {
        let err = Parser::parse("a {} }").unwrap_err();
        assert!(err.message.contains("Unexpected '}'"));
    }

    #[test]
    fn test_unclosed_paren() {
        let err = Parser::parse("a { color: rgb(1, 2; }").unwrap_err();
        assert!(err.message.contains("Unclosed '('"));
    }

    #[test]
    fn test_lexer_error_is_reported() {
        let err = Parser::parse("a { content: \"open }").unwrap_err();
        assert!(err.message.contains("Unterminated string"));
        assert_eq!((err.line, err.column), (1, 14));
    }

    // =========================================================================
    // At-rules
    // =========================================================================

    #[test]
    fn test_atrule_with_block() {
        let sheet = parse("@media screen { div {} }");
        let atrule = sheet.first(NodeKind::Atrule).unwrap();
        let keyword = atrule.first(NodeKind::Atkeyword).unwrap();
        assert_eq!(keyword.first(NodeKind::Ident).unwrap().text(), Some("media"));
        let block = atrule.first(NodeKind::Block).unwrap();
        assert!(block.contains(NodeKind::Ruleset));
    }

    #[test]
    fn test_atrule_statement() {
        let sheet = parse("@import 'base';");
        assert_eq!(
            kinds(&sheet),
            vec![NodeKind::Atrule, NodeKind::DeclarationDelimiter]
        );
    }

    #[test]
    fn test_keyframes_steps() {
        let sheet = parse("@keyframes spin { from { } 50% { } }");
        let block = sheet
            .first(NodeKind::Atrule)
            .and_then(|a| a.first(NodeKind::Block))
            .unwrap();
        let steps = block
            .children()
            .iter()
            .filter(|n| n.is(NodeKind::Ruleset))
            .count();
        assert_eq!(steps, 2);
    }

    // =========================================================================
    // SCSS placeholders and interpolation
    // =========================================================================

    #[test]
    fn test_placeholder_selector() {
        let selector = selector_of("%message { color: red; }");
        assert_eq!(kinds(&selector), vec![NodeKind::Placeholder]);
        let placeholder = selector.first(NodeKind::Placeholder).unwrap();
        assert_eq!(placeholder.first(NodeKind::Ident).unwrap().text(), Some("message"));
    }

    #[test]
    fn test_extend_placeholder_in_atrule() {
        let sheet = parse("p { @extend %message; }");
        let block = first_ruleset(&sheet).first(NodeKind::Block).unwrap();
        let atrule = block.first(NodeKind::Atrule).unwrap();
        assert!(atrule.contains(NodeKind::Placeholder));
    }

    #[test]
    fn test_interpolation_in_value() {
        let sheet = parse("div { width: calc(100% - #{$x}); }");
        let value = first_ruleset(&sheet)
            .first(NodeKind::Block)
            .and_then(|b| b.first(NodeKind::Declaration))
            .and_then(|d| d.first(NodeKind::Value))
            .unwrap();
        let arguments = value
            .first(NodeKind::Function)
            .and_then(|f| f.first(NodeKind::Arguments))
            .unwrap();
        let interpolation = arguments.first(NodeKind::Interpolation).unwrap();
        assert_eq!(interpolation.text(), Some("$x"));
    }

    #[test]
    fn test_interpolated_class_name() {
        let sheet = parse("@each $i in 1, 2 { .a-#{$i} { } }");
        let ruleset = sheet
            .first(NodeKind::Atrule)
            .and_then(|a| a.first(NodeKind::Block))
            .and_then(|b| b.first(NodeKind::Ruleset))
            .unwrap();
        let class = ruleset
            .first(NodeKind::Selector)
            .and_then(|s| s.first(NodeKind::Class))
            .unwrap();
        assert_eq!(kinds(class), vec![NodeKind::Ident, NodeKind::Interpolation]);
    }

    #[test]
    fn test_interpolated_selector_and_property() {
        let sheet = parse("#{$sel} { #{$side}-width: 1px; }");
        let ruleset = first_ruleset(&sheet);
        let ty = ruleset
            .first(NodeKind::Selector)
            .and_then(|s| s.first(NodeKind::TypeSelector))
            .unwrap();
        assert_eq!(kinds(ty), vec![NodeKind::Interpolation]);
        let property = ruleset
            .first(NodeKind::Block)
            .and_then(|b| b.first(NodeKind::Declaration))
            .and_then(|d| d.first(NodeKind::Property))
            .unwrap();
        assert_eq!(kinds(property), vec![NodeKind::Interpolation, NodeKind::Ident]);
        assert_eq!(property.to_string(), "#{$side}-width");
    }

    // =========================================================================
    // Comments
    // =========================================================================

    #[test]
    fn test_comments_are_nodes() {
        let sheet = parse("// line\n/* block */");
        assert_eq!(
            kinds(&sheet),
            vec![
                NodeKind::SinglelineComment,
                NodeKind::Space,
                NodeKind::MultilineComment,
            ]
        );
        assert_eq!(sheet.children()[0].text(), Some(" line"));
        assert_eq!(sheet.children()[2].text(), Some(" block "));
    }

    #[test]
    fn test_comment_inside_block() {
        let sheet = parse("div {\n  // note\n}");
        let block = first_ruleset(&sheet).first(NodeKind::Block).unwrap();
        assert!(block.contains(NodeKind::SinglelineComment));
    }

    // =========================================================================
    // Round trip and traversal
    // =========================================================================

    #[test]
    fn test_display_round_trips_source() {
        let source = "// Title\n\ndiv.card[data-id=\"7\"] > a:hover, #x::after {\n  /* Body\n     text */\n  color: rgba(0, 0, 0, .5) !important;\n  &-icon { margin: -1px 0 }\n}\n@media (min-width: 10px) { p { } }\n$gap: 4px;\n%base { top: #{$gap}; }\n.a-#{$i} { @extend %base; }\n";
        assert_eq!(parse(source).to_string(), source);
    }

    #[test]
    fn test_traverse_depths() {
        let sheet = parse("a { b { } }");
        let mut rulesets = Vec::new();
        sheet.traverse(|node, _, _, depth| {
            if node.is(NodeKind::Ruleset) {
                rulesets.push(depth);
            }
        });
        // stylesheet(0) > ruleset(1) > block(2) > ruleset(3)
        assert_eq!(rulesets, vec![1, 3]);
    }

    #[test]
    fn test_json_dump() {
        let json = parse("a {}").to_json().unwrap();
        assert!(json.contains("\"type\": \"stylesheet\""));
        assert!(json.contains("\"type\": \"ruleset\""));
        assert!(json.contains("\"start\""));
    }
}
