//! HTML serializer.
//!
//! Writes the markup tree out line by line. An element whose only content
//! is one line of text (or nothing) goes on a single line; every other
//! element is expanded, with its open and close markers on their own lines
//! and its children one level deeper. The root's empty markers are never
//! written.

use crate::markup::{Element, Markup};

/// Serialize a markup tree. With `indent`, each nesting level is prefixed
/// with two spaces; without it every line starts at column 0.
pub fn serialize(root: &Element, indent: bool) -> String {
    let mut lines = Vec::new();

    for child in &root.children {
        write_node(child, indent, 0, &mut lines);
    }

    lines.join("\n")
}

fn write_node(node: &Markup, indent: bool, depth: usize, out: &mut Vec<String>) {
    match node {
        Markup::Text(text) => write_text(text, indent, depth, out),
        Markup::Element(el) => write_element(el, indent, depth, out),
    }
}

fn write_element(el: &Element, indent: bool, depth: usize, out: &mut Vec<String>) {
    let pad = padding(indent, depth);

    if el.is_inline() {
        let content = match el.children.first() {
            Some(Markup::Text(text)) => text.as_str(),
            _ => "",
        };
        out.push(format!("{pad}{}{content}{}", el.open, el.close));
        return;
    }

    out.push(format!("{pad}{}", el.open));
    for child in &el.children {
        write_node(child, indent, depth + 1, out);
    }
    out.push(format!("{pad}{}", el.close));
}

/// One output line per physical line of text. Blank lines stay empty.
fn write_text(text: &str, indent: bool, depth: usize, out: &mut Vec<String>) {
    let pad = padding(indent, depth);

    for line in text.lines() {
        if line.is_empty() {
            out.push(String::new());
        } else {
            out.push(format!("{pad}{line}"));
        }
    }
}

fn padding(indent: bool, depth: usize) -> String {
    if indent {
        "  ".repeat(depth)
    } else {
        String::new()
    }
}
