//! Markdown rendering

use pulldown_cmark::{html, Parser};

/// Render a Markdown document to an HTML fragment
pub fn render(markdown: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(markdown));
    out
}
