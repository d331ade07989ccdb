//! Markup tree builder.
//!
//! Consumes the pre-order, depth-annotated traversal of a syntax tree and
//! nests the resulting markup with an explicit stack of open elements.
//! Each frame remembers the depth its element was opened at; when the
//! traversal comes back to that depth (or above), the frame is closed and
//! moved into the frame below it.

use log::debug;
use stylemark_parser::{Node, NodeKind};

use crate::markup::{Element, Markup};
use crate::prose::{dedent, ProseRenderer};
use crate::selector::ruleset_element;

/// Build the markup tree for a syntax tree.
pub fn build<R: ProseRenderer + ?Sized>(root: &Node, renderer: &R) -> Element {
    let mut builder = TreeBuilder::new(renderer);
    root.traverse(|node, _, _, depth| builder.visit(node, depth));
    let tree = builder.finish();
    debug!("Built markup tree with {} top-level nodes", tree.children.len());
    tree
}

/// Incremental markup tree construction from traversal events.
pub struct TreeBuilder<'r, R: ?Sized> {
    renderer: &'r R,
    /// Open elements with the depth they were opened at. The root sits at
    /// the bottom and is only removed by `finish`.
    stack: Vec<(usize, Element)>,
}

impl<'r, R: ProseRenderer + ?Sized> TreeBuilder<'r, R> {
    pub fn new(renderer: &'r R) -> Self {
        Self {
            renderer,
            stack: vec![(0, Element::root())],
        }
    }

    /// Handle one traversal event.
    pub fn visit(&mut self, node: &Node, depth: usize) {
        self.close_from(depth);

        match classify(node, self.renderer) {
            Some(Markup::Element(element)) => self.stack.push((depth, element)),
            Some(text) => {
                if let Some((_, top)) = self.stack.last_mut() {
                    top.children.push(text);
                }
            }
            None => {}
        }
    }

    /// Close every open element and return the root.
    pub fn finish(mut self) -> Element {
        while self.stack.len() > 1 {
            self.close_top();
        }
        self.stack.pop().map(|(_, root)| root).unwrap_or_default()
    }

    /// Close frames opened at `depth` or deeper.
    fn close_from(&mut self, depth: usize) {
        while self.stack.len() > 1 && self.stack.last().is_some_and(|(d, _)| *d >= depth) {
            self.close_top();
        }
    }

    fn close_top(&mut self) {
        if let Some((_, element)) = self.stack.pop() {
            if let Some((_, parent)) = self.stack.last_mut() {
                parent.children.push(element.into());
            }
        }
    }
}

/// What a syntax node contributes to the markup tree.
///
/// Comments become text (multi-line ones through the renderer when they
/// span lines); rulesets with a type selector become elements.
pub fn classify<R: ProseRenderer + ?Sized>(node: &Node, renderer: &R) -> Option<Markup> {
    match node.kind {
        NodeKind::SinglelineComment => node.text().map(|text| Markup::Text(dedent(text))),
        NodeKind::MultilineComment => node.text().map(|text| {
            let text = dedent(text);
            if text.contains('\n') {
                Markup::Text(renderer.render(&text))
            } else {
                Markup::Text(text)
            }
        }),
        NodeKind::Ruleset => ruleset_element(node).map(Markup::Element),
        _ => None,
    }
}
