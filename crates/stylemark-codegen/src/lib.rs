//! Stylemark Code Generator
//!
//! Turns a parsed stylesheet into HTML. Rulesets whose selector names a
//! tag become nested elements; comments become text, with multi-line
//! comments rendered as Markdown.
//!
//! ```text
//! source → Parser::parse() → build() → Element tree → serialize() → HTML
//! ```
//!
//! # Example
//!
//! ```
//! let html = stylemark_codegen::transform("div.card { h1 { } }", true).unwrap();
//! assert_eq!(html, "<div class=\"card\">\n  <h1></h1>\n</div>");
//! ```

pub mod builder;
pub mod html;
pub mod markup;
pub mod prose;
pub mod selector;

pub use builder::{build, TreeBuilder};
pub use markup::{Element, Markup};
pub use prose::{dedent, Markdown, ProseRenderer};

use stylemark_parser::{Node, ParseError, Parser};

/// The result of compiling one document.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOutput {
    pub html: String,
    /// The syntax tree the HTML was generated from.
    pub ast: Node,
}

/// Converts stylesheet source into HTML with a pluggable prose renderer.
#[derive(Debug, Clone, Default)]
pub struct Transformer<R = Markdown> {
    renderer: R,
    indent: bool,
}

impl Transformer<Markdown> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ProseRenderer> Transformer<R> {
    /// Use a different renderer for multi-line comments.
    pub fn with_renderer<S: ProseRenderer>(self, renderer: S) -> Transformer<S> {
        Transformer {
            renderer,
            indent: self.indent,
        }
    }

    /// Indent nested output by two spaces per level.
    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    /// Generate HTML for an already parsed syntax tree.
    pub fn generate(&self, ast: &Node) -> String {
        let tree = build(ast, &self.renderer);
        html::serialize(&tree, self.indent)
    }

    /// Parse and convert source text.
    pub fn transform(&self, source: &str) -> Result<String, ParseError> {
        let ast = Parser::parse(source)?;
        Ok(self.generate(&ast))
    }

    /// Parse and convert source text, keeping the syntax tree.
    pub fn compile(&self, source: &str) -> Result<CompilerOutput, ParseError> {
        let ast = Parser::parse(source)?;
        let html = self.generate(&ast);
        Ok(CompilerOutput { html, ast })
    }
}

/// Convert stylesheet source to HTML with the Markdown renderer.
pub fn transform(source: &str, indent: bool) -> Result<String, ParseError> {
    Transformer::new().indent(indent).transform(source)
}

/// Like [`transform`], also returning the syntax tree.
pub fn transform_with_ast(source: &str, indent: bool) -> Result<CompilerOutput, ParseError> {
    Transformer::new().indent(indent).compile(source)
}
