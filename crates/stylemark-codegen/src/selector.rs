//! Resolves a ruleset's selector into element markers.
//!
//! Only the first selector of a list is used. Its type selector names the
//! tag, attribute selectors become attributes, and classes are joined into a
//! single `class` attribute placed after them:
//!
//! ```text
//! div.foo.bar[data-x="1"]  →  <div data-x="1" class="foo bar"> … </div>
//! ```

use log::trace;
use stylemark_parser::{Node, NodeKind};

use crate::markup::Element;

/// Build the (empty) element for a ruleset, or `None` when its selector has
/// no usable type selector.
pub fn ruleset_element(ruleset: &Node) -> Option<Element> {
    let Some(selector) = ruleset.first(NodeKind::Selector) else {
        trace!("ruleset at {}:{} has no selector", ruleset.start.line, ruleset.start.column);
        return None;
    };

    let Some(tag) = ident_of(selector.first(NodeKind::TypeSelector)) else {
        trace!("skipping `{selector}`: no type selector");
        return None;
    };

    let mut attributes = Vec::new();
    selector.for_each(NodeKind::AttributeSelector, |attr, _, _| match attribute(attr) {
        Some(attribute) => attributes.push(attribute),
        None => trace!("skipping attribute `{attr}`: no name"),
    });

    let mut classes = Vec::new();
    selector.for_each(NodeKind::Class, |class, _, _| {
        if let Some(name) = ident_of(Some(class)) {
            classes.push(name);
        }
    });
    if !classes.is_empty() {
        attributes.push(format!("class=\"{}\"", classes.join(" ")));
    }

    let mut open = format!("<{tag}");
    for attribute in &attributes {
        open.push(' ');
        open.push_str(attribute);
    }
    open.push('>');

    Some(Element::new(open, format!("</{tag}>")))
}

/// `name` or `name=value`. Quoted values are kept as written; bare idents
/// and numbers get double quotes.
fn attribute(attr: &Node) -> Option<String> {
    let name = ident_of(attr.first(NodeKind::AttributeName))?;

    let value = attr.first(NodeKind::AttributeValue).and_then(|value| {
        if let Some(string) = value.first(NodeKind::String) {
            return string.text().map(str::to_string);
        }
        value
            .first(NodeKind::Ident)
            .or_else(|| value.first(NodeKind::Number))
            .and_then(Node::text)
            .map(|bare| format!("\"{bare}\""))
    });

    Some(match value {
        Some(value) => format!("{name}={value}"),
        None => name.to_string(),
    })
}

/// Non-empty text of a node's `ident` child. Names with `#{...}` parts
/// resolve to nothing.
fn ident_of(node: Option<&Node>) -> Option<&str> {
    let node = node?;
    if node.contains(NodeKind::Interpolation) {
        trace!("skipping interpolated name `{node}`");
        return None;
    }
    node.first(NodeKind::Ident)
        .and_then(Node::text)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylemark_parser::Parser;

    fn markers(selector: &str) -> Option<(String, String)> {
        let sheet = Parser::parse(&format!("{selector} {{ }}")).unwrap();
        let ruleset = sheet.first(NodeKind::Ruleset).unwrap();
        ruleset_element(ruleset).map(|el| (el.open, el.close))
    }

    fn open(selector: &str) -> String {
        markers(selector).unwrap().0
    }

    #[test]
    fn test_plain_tag() {
        assert_eq!(
            markers("section"),
            Some(("<section>".to_string(), "</section>".to_string()))
        );
    }

    #[test]
    fn test_classes_joined_in_source_order() {
        assert_eq!(open("div.foo.bar"), "<div class=\"foo bar\">");
    }

    #[test]
    fn test_attributes_before_class() {
        assert_eq!(
            open("div.foo.bar[data-x=\"1\"]"),
            "<div data-x=\"1\" class=\"foo bar\">"
        );
    }

    #[test]
    fn test_multiple_attributes_in_order() {
        assert_eq!(
            open("a[href='#'][target=_blank][hidden]"),
            "<a href='#' target=\"_blank\" hidden>"
        );
    }

    #[test]
    fn test_class_without_type_selector() {
        assert_eq!(markers(".foo"), None);
    }

    #[test]
    fn test_universal_selector_is_not_a_tag() {
        assert_eq!(markers("*.foo"), None);
    }

    #[test]
    fn test_first_selector_of_list() {
        assert_eq!(open("h1.title, h2"), "<h1 class=\"title\">");
    }

    #[test]
    fn test_descendant_selector_uses_first_tag() {
        assert_eq!(open("ul li"), "<ul>");
    }

    #[test]
    fn test_unquoted_values_are_quoted() {
        assert_eq!(
            open("input[type=text][maxlength=8]"),
            "<input type=\"text\" maxlength=\"8\">"
        );
    }

    #[test]
    fn test_placeholder_is_not_a_tag() {
        assert_eq!(markers("%card"), None);
    }

    #[test]
    fn test_interpolated_tag_is_skipped() {
        assert_eq!(markers("#{$tag}.x"), None);
        assert_eq!(markers("h#{$level}"), None);
    }

    #[test]
    fn test_interpolated_class_is_dropped() {
        assert_eq!(open("li.item.is-#{$state}"), "<li class=\"item\">");
    }

    #[test]
    fn test_pseudo_class_ignored() {
        assert_eq!(open("a.link:hover"), "<a class=\"link\">");
    }
}
