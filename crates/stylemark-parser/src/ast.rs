//! Syntax tree for stylemark source.
//!
//! Nodes follow the gonzales-pe vocabulary (`ruleset`, `selector`,
//! `typeSelector`, ...) so that dumps read like any other SCSS syntax tree.
//! Every node is either a leaf holding its literal text or a branch holding
//! its children in source order.

use std::fmt;

use serde::Serialize;

/// A 1-based line/column position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl From<stylemark_lexer::Position> for Position {
    fn from(pos: stylemark_lexer::Position) -> Self {
        Self::new(pos.line, pos.column)
    }
}

/// The type tag of a syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Stylesheet,

    // Rules
    Ruleset,
    Block,
    Atrule,
    Atkeyword,

    // Selectors
    Selector,
    TypeSelector,
    UniversalSelector,
    Class,
    Id,
    AttributeSelector,
    AttributeName,
    AttributeMatch,
    AttributeValue,
    AttributeFlags,
    PseudoClass,
    PseudoElement,
    ParentSelector,
    ParentSelectorExtension,
    Placeholder,
    Combinator,
    Delimiter,

    // Declarations
    Declaration,
    Property,
    PropertyDelimiter,
    Value,
    DeclarationDelimiter,

    // Values
    Ident,
    Number,
    Dimension,
    Percentage,
    String,
    Color,
    Variable,
    Function,
    Arguments,
    Parentheses,
    Uri,
    Operator,
    Important,
    Interpolation,

    // Trivia
    Space,
    SinglelineComment,
    MultilineComment,
}

impl NodeKind {
    /// The gonzales-pe type name.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Stylesheet => "stylesheet",
            NodeKind::Ruleset => "ruleset",
            NodeKind::Block => "block",
            NodeKind::Atrule => "atrule",
            NodeKind::Atkeyword => "atkeyword",
            NodeKind::Selector => "selector",
            NodeKind::TypeSelector => "typeSelector",
            NodeKind::UniversalSelector => "universalSelector",
            NodeKind::Class => "class",
            NodeKind::Id => "id",
            NodeKind::AttributeSelector => "attributeSelector",
            NodeKind::AttributeName => "attributeName",
            NodeKind::AttributeMatch => "attributeMatch",
            NodeKind::AttributeValue => "attributeValue",
            NodeKind::AttributeFlags => "attributeFlags",
            NodeKind::PseudoClass => "pseudoClass",
            NodeKind::PseudoElement => "pseudoElement",
            NodeKind::ParentSelector => "parentSelector",
            NodeKind::ParentSelectorExtension => "parentSelectorExtension",
            NodeKind::Placeholder => "placeholder",
            NodeKind::Combinator => "combinator",
            NodeKind::Delimiter => "delimiter",
            NodeKind::Declaration => "declaration",
            NodeKind::Property => "property",
            NodeKind::PropertyDelimiter => "propertyDelimiter",
            NodeKind::Value => "value",
            NodeKind::DeclarationDelimiter => "declarationDelimiter",
            NodeKind::Ident => "ident",
            NodeKind::Number => "number",
            NodeKind::Dimension => "dimension",
            NodeKind::Percentage => "percentage",
            NodeKind::String => "string",
            NodeKind::Color => "color",
            NodeKind::Variable => "variable",
            NodeKind::Function => "function",
            NodeKind::Arguments => "arguments",
            NodeKind::Parentheses => "parentheses",
            NodeKind::Uri => "uri",
            NodeKind::Operator => "operator",
            NodeKind::Important => "important",
            NodeKind::Interpolation => "interpolation",
            NodeKind::Space => "space",
            NodeKind::SinglelineComment => "singlelineComment",
            NodeKind::MultilineComment => "multilineComment",
        }
    }

    /// Source text written around a node's content but not stored in it.
    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            NodeKind::Class => (".", ""),
            NodeKind::Id | NodeKind::Color => ("#", ""),
            NodeKind::AttributeSelector => ("[", "]"),
            NodeKind::PseudoClass => (":", ""),
            NodeKind::PseudoElement => ("::", ""),
            NodeKind::Variable => ("$", ""),
            NodeKind::Atkeyword => ("@", ""),
            NodeKind::Block => ("{", "}"),
            NodeKind::Arguments | NodeKind::Parentheses => ("(", ")"),
            NodeKind::Uri => ("url(", ")"),
            NodeKind::Percentage => ("", "%"),
            NodeKind::Placeholder => ("%", ""),
            NodeKind::Interpolation => ("#{", "}"),
            NodeKind::Important => ("!", ""),
            NodeKind::SinglelineComment => ("//", ""),
            NodeKind::MultilineComment => ("/*", "*/"),
            _ => ("", ""),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The literal content of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    /// Leaf text: identifiers, numbers (as written), strings (with quotes),
    /// whitespace, comment bodies.
    Text(String),
    Children(Vec<Node>),
}

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub content: Content,
    pub start: Position,
    /// Position of the node's last character.
    pub end: Position,
}

impl Node {
    /// Create a leaf node.
    pub fn leaf(kind: NodeKind, text: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            kind,
            content: Content::Text(text.into()),
            start,
            end,
        }
    }

    /// Create a branch node.
    pub fn branch(kind: NodeKind, children: Vec<Node>, start: Position, end: Position) -> Self {
        Self {
            kind,
            content: Content::Children(children),
            start,
            end,
        }
    }

    /// Check the node's type tag.
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Leaf text, or `None` for branch nodes.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Children(children) => children,
            Content::Text(_) => &[],
        }
    }

    /// First direct child of the given kind.
    pub fn first(&self, kind: NodeKind) -> Option<&Node> {
        self.children().iter().find(|child| child.is(kind))
    }

    /// Whether any direct child has the given kind.
    pub fn contains(&self, kind: NodeKind) -> bool {
        self.first(kind).is_some()
    }

    /// Visit each direct child of the given kind with its index in this node.
    pub fn for_each<'a, F>(&'a self, kind: NodeKind, mut visit: F)
    where
        F: FnMut(&'a Node, usize, &'a Node),
    {
        for (index, child) in self.children().iter().enumerate() {
            if child.is(kind) {
                visit(child, index, self);
            }
        }
    }

    /// Pre-order traversal of this node and all its descendants.
    ///
    /// The callback receives `(node, index_in_parent, parent, depth)`. The
    /// node this is called on comes first, at depth 0 with no parent. Siblings
    /// are visited in source order; there are no exit events.
    pub fn traverse<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a Node, usize, Option<&'a Node>, usize),
    {
        fn walk<'a, F>(node: &'a Node, index: usize, parent: Option<&'a Node>, depth: usize, visit: &mut F)
        where
            F: FnMut(&'a Node, usize, Option<&'a Node>, usize),
        {
            visit(node, index, parent, depth);
            for (i, child) in node.children().iter().enumerate() {
                walk(child, i, Some(node), depth + 1, visit);
            }
        }

        walk(self, 0, None, 0, &mut visit);
    }

    /// Pretty-printed JSON dump of the tree.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Writes the node back out as source text.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = self.kind.delimiters();
        f.write_str(open)?;
        match &self.content {
            Content::Text(text) => f.write_str(text)?,
            Content::Children(children) => {
                for child in children {
                    write!(f, "{child}")?;
                }
            }
        }
        f.write_str(close)
    }
}
