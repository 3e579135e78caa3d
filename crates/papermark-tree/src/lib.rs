//! Papermark Tree
//!
//! Builds a well-formed tree from the flat node list of `papermark-markup`,
//! recovering from mismatched and unclosed tags instead of rejecting them.
//!
//! ```text
//! source → parse_markup() → [Node] → Reconciler → Tree { root, diagnostics }
//! ```
//!
//! # Example
//!
//! ```
//! let tree = papermark_tree::parse("[bold]hi").unwrap();
//! assert_eq!(tree.root.text_content(), "hi");
//! assert_eq!(tree.diagnostics.len(), 1); // `bold` never closed
//! ```

pub mod reconcile;
pub mod tree;

pub use papermark_markup::ParseError;
pub use reconcile::Reconciler;
pub use tree::{Child, Tree, TreeNode, Visit, Walk, ROOT_TAG};

use papermark_markup::{parse_markup, parse_markup_with, Diagnostic, Node, TagRegistry};

/// Reconcile a grammar node list into a tree.
pub fn build(nodes: &[Node]) -> Tree {
    let mut reconciler = Reconciler::new();
    reconciler.feed(nodes);
    reconciler.finish()
}

/// Parse and reconcile `input` using the built-in tags.
///
/// Grammar diagnostics come first, followed by reconciliation diagnostics.
/// `Err` is only returned for a hard parse failure.
pub fn parse(input: &str) -> Result<Tree, ParseError> {
    let parsed = parse_markup(input)?;
    Ok(merge(parsed.diagnostics, build(&parsed.nodes)))
}

/// Like [`parse`], validating tags against `registry`.
pub fn parse_with(input: &str, registry: &TagRegistry) -> Result<Tree, ParseError> {
    let parsed = parse_markup_with(input, registry)?;
    Ok(merge(parsed.diagnostics, build(&parsed.nodes)))
}

fn merge(mut diagnostics: Vec<Diagnostic>, mut tree: Tree) -> Tree {
    diagnostics.append(&mut tree.diagnostics);
    tree.diagnostics = diagnostics;
    tree
}
