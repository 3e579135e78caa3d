//! Papermark HTML
//!
//! Renders a recovered [`Tree`] as nested `<span>` elements, one per tag,
//! styled through the lookup table in [`style`]. Text is HTML-escaped and
//! line breaks inside text runs become `<br>`.
//!
//! ```text
//! source → papermark_tree::parse() → Tree → render() → HTML
//! ```

pub mod style;

use papermark_markup::{Diagnostic, ParseError, TagRegistry};
use papermark_tree::{Tree, TreeNode, Visit};

use crate::style::style_for;

/// Rendered HTML together with the diagnostics of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse, reconcile and render `source`.
pub fn render_markup(source: &str) -> Result<RenderOutput, ParseError> {
    let tree = papermark_tree::parse(source)?;
    Ok(into_output(tree))
}

/// Like [`render_markup`], validating tags against `registry`.
pub fn render_markup_with(
    source: &str,
    registry: &TagRegistry,
) -> Result<RenderOutput, ParseError> {
    let tree = papermark_tree::parse_with(source, registry)?;
    Ok(into_output(tree))
}

fn into_output(tree: Tree) -> RenderOutput {
    RenderOutput {
        html: render(&tree),
        diagnostics: tree.diagnostics,
    }
}

/// Render a finished tree.
pub fn render(tree: &Tree) -> String {
    let mut out = String::new();
    for visit in tree.root.walk() {
        match visit {
            Visit::Enter(node, _) => open_element(node, &mut out),
            Visit::Text(text, _) => render_text(text, &mut out),
            Visit::Leave(..) => out.push_str("</span>"),
        }
    }
    out
}

fn open_element(node: &TreeNode, out: &mut String) {
    let style = style_for(&node.tag, node.param.as_ref());

    out.push_str("<span");
    if let Some(class) = &style.class {
        out.push_str(" class=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(class));
        out.push('"');
    }
    if let Some(css) = &style.css {
        out.push_str(" style=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(css));
        out.push('"');
    }
    out.push('>');

    if let Some(prefix) = style.prefix {
        out.push_str(&html_escape::encode_text(prefix));
    }
}

fn render_text(text: &str, out: &mut String) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push_str("<br>");
        }
        out.push_str(&html_escape::encode_text(line));
    }
}
