//! Comment prose: dedenting and Markdown rendering.

use pulldown_cmark::{html, Options, Parser};

/// Renders comment prose into an HTML fragment.
pub trait ProseRenderer {
    /// Best effort; malformed input still produces some output.
    fn render(&self, text: &str) -> String;
}

/// CommonMark plus the GitHub extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Markdown;

impl ProseRenderer for Markdown {
    fn render(&self, text: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);

        let parser = Parser::new_ext(text, options);
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}

impl<F> ProseRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render(&self, text: &str) -> String {
        self(text)
    }
}

/// Remove the indentation shared by all non-blank lines, then trim.
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(indent_width)
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| strip_indent(line, indent))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Leading spaces and tabs. Other whitespace counts as content.
fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// Strip up to `width` leading spaces and tabs.
fn strip_indent(line: &str, width: usize) -> &str {
    &line[indent_width(line).min(width)..]
}
