//! Markup tree produced by the builder and consumed by the serializer.

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(Element),
    /// Comment text or a rendered Markdown fragment.
    Text(String),
}

/// An element with literal open/close markers, e.g. `<div class="a">` and
/// `</div>`. The document root has empty markers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub open: String,
    pub children: Vec<Markup>,
    pub close: String,
}

impl Element {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            children: Vec::new(),
            close: close.into(),
        }
    }

    /// The implicit document root.
    pub fn root() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with(mut self, child: Markup) -> Self {
        self.children.push(child);
        self
    }

    /// At most one child, and that child is text without a line break.
    pub fn is_inline(&self) -> bool {
        match self.children.as_slice() {
            [] => true,
            [Markup::Text(text)] => !text.contains('\n'),
            _ => false,
        }
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Element(element)
    }
}
