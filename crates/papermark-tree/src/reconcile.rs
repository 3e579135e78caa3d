//! Tag reconciliation.
//!
//! Turns the grammar's flat node list into a tree, the way permissive HTML
//! parsers treat tag soup: a closing tag that does not match the innermost
//! open tag closes everything opened after its match, then reopens those
//! tags so the following text keeps their styling.
//!
//! ```text
//! [bold][italic]hi[/bold]bye
//!
//! root
//!   bold
//!     italic
//!       "hi"
//!   italic
//!     "bye"
//! ```

use papermark_markup::{Diagnostic, Node, NodeKind, Parameter, Span};

use crate::tree::{Child, Tree, TreeNode};

/// Stack machine building one document's tree.
///
/// The synthetic root is held apart from the stack of open tags, so it can
/// never be popped; the stack depth is `open.len() + 1`.
#[derive(Debug)]
pub struct Reconciler {
    root: TreeNode,
    open: Vec<TreeNode>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconciler {
    pub fn new() -> Self {
        Self {
            root: TreeNode::root(),
            open: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Number of nodes on the stack, root included.
    pub fn depth(&self) -> usize {
        self.open.len() + 1
    }

    /// Drive the engine from a grammar node list.
    pub fn feed(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node.kind {
                NodeKind::Text => self.text(node.value.clone()),
                NodeKind::Open => self.open(node.value.clone(), node.param.clone(), node.span),
                NodeKind::Close => self.close(&node.value, node.span),
            }
        }
    }

    /// Append a text run to the innermost open tag.
    pub fn text(&mut self, value: impl Into<String>) {
        self.top_mut().children.push(Child::Text(value.into()));
    }

    pub fn open(&mut self, name: impl Into<String>, param: Option<Parameter>, span: Span) {
        self.open.push(TreeNode::new(name, param, span));
    }

    /// Close the innermost open tag named `name`.
    ///
    /// Closing a tag that is not open, including when nothing is open at all,
    /// is ignored without a diagnostic.
    pub fn close(&mut self, name: &str, span: Span) {
        let Some(index) = self.open.iter().rposition(|node| node.tag == name) else {
            log::debug!("ignoring `[/{name}]` at {span}: no matching open tag");
            return;
        };

        // Tags opened after the match, innermost first.
        let mut split = Vec::new();
        while self.open.len() > index + 1 {
            if let Some(node) = self.open.last() {
                split.push((node.tag.clone(), node.param.clone(), node.open_span));
            }
            self.pop_into_parent(Some(Span::empty(span.start)));
        }
        self.pop_into_parent(Some(span));

        if !split.is_empty() {
            log::debug!(
                "`[/{name}]` at {span} crosses {} open tag(s), reopening them",
                split.len()
            );
        }
        for (tag, param, open_span) in split.into_iter().rev() {
            self.open.push(TreeNode::new(tag, param, open_span));
        }
    }

    /// Close whatever is still open and hand back the tree.
    ///
    /// Each tag left open gets an unclosed-tag diagnostic at its open span and
    /// keeps `close_span == None`.
    pub fn finish(mut self) -> Tree {
        while let Some(node) = self.open.last() {
            self.diagnostics
                .push(Diagnostic::unclosed_tag(&node.tag, node.open_span));
            self.pop_into_parent(None);
        }
        self.root.close_span = Some(Span::empty(0));
        Tree {
            root: self.root,
            diagnostics: self.diagnostics,
        }
    }

    fn top_mut(&mut self) -> &mut TreeNode {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    fn pop_into_parent(&mut self, close_span: Option<Span>) {
        if let Some(mut node) = self.open.pop() {
            node.close_span = close_span;
            self.top_mut().children.push(Child::Node(node));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use papermark_markup::DiagnosticKind;
    use pretty_assertions::assert_eq;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end)
    }

    fn node(tag: &str, open_span: Span, close_span: Option<Span>, children: Vec<Child>) -> Child {
        Child::Node(TreeNode {
            tag: tag.into(),
            param: None,
            open_span,
            close_span,
            children,
        })
    }

    fn text(value: &str) -> Child {
        Child::Text(value.into())
    }

    // =========================================================================
    // Well-nested input
    // =========================================================================

    #[test]
    fn test_empty_document() {
        let tree = Reconciler::new().finish();
        assert!(tree.root.is_root());
        assert!(tree.root.children.is_empty());
        assert_eq!(tree.root.close_span, Some(Span::empty(0)));
        assert!(tree.diagnostics.is_empty());
    }

    #[test]
    fn test_text_goes_to_root() {
        let mut rec = Reconciler::new();
        rec.text("a");
        rec.text("b\nc");
        let tree = rec.finish();
        assert_eq!(tree.root.children, vec![text("a"), text("b\nc")]);
    }

    #[test]
    fn test_simple_nesting() {
        let mut rec = Reconciler::new();
        rec.open("bold", None, span(0, 6));
        assert_eq!(rec.depth(), 2);
        rec.text("hi");
        rec.close("bold", span(8, 15));
        assert_eq!(rec.depth(), 1);
        let tree = rec.finish();
        assert_eq!(
            tree.root.children,
            vec![node("bold", span(0, 6), Some(span(8, 15)), vec![text("hi")])]
        );
    }

    #[test]
    fn test_param_kept() {
        let mut rec = Reconciler::new();
        rec.open("head", Some(Parameter::Number(2)), span(0, 8));
        rec.close("head", span(8, 15));
        let tree = rec.finish();
        let head = tree.root.child_nodes().next().unwrap();
        assert_eq!(head.param, Some(Parameter::Number(2)));
    }

    // =========================================================================
    // Unmatched closes
    // =========================================================================

    #[test]
    fn test_close_with_nothing_open_is_ignored() {
        let mut rec = Reconciler::new();
        rec.close("bold", span(0, 7));
        rec.text("x");
        let tree = rec.finish();
        assert_eq!(tree.root.children, vec![text("x")]);
        assert!(tree.diagnostics.is_empty());
    }

    #[test]
    fn test_close_of_never_opened_tag_is_ignored() {
        let mut rec = Reconciler::new();
        rec.open("bold", None, span(0, 6));
        rec.close("italic", span(6, 15));
        assert_eq!(rec.depth(), 2);
        rec.close("bold", span(15, 22));
        let tree = rec.finish();
        assert_eq!(
            tree.root.children,
            vec![node("bold", span(0, 6), Some(span(15, 22)), vec![])]
        );
        assert!(tree.diagnostics.is_empty());
    }

    // =========================================================================
    // Tag soup
    // =========================================================================

    #[test]
    fn test_crossing_close_splits_inner_tag() {
        // [bold][italic]hi[/bold]bye[/italic]
        let mut rec = Reconciler::new();
        rec.open("bold", None, span(0, 6));
        rec.open("italic", None, span(6, 14));
        rec.text("hi");
        rec.close("bold", span(16, 23));
        rec.text("bye");
        rec.close("italic", span(26, 35));
        let tree = rec.finish();

        assert_eq!(
            tree.root.children,
            vec![
                node(
                    "bold",
                    span(0, 6),
                    Some(span(16, 23)),
                    vec![node("italic", span(6, 14), Some(Span::empty(16)), vec![text("hi")])]
                ),
                node("italic", span(6, 14), Some(span(26, 35)), vec![text("bye")]),
            ]
        );
        assert!(tree.diagnostics.is_empty());
    }

    #[test]
    fn test_split_reopens_in_original_order() {
        // [a][b][c]x[/a]y
        let mut rec = Reconciler::new();
        rec.open("a", None, span(0, 3));
        rec.open("b", Some(Parameter::Number(1)), span(3, 8));
        rec.open("c", None, span(8, 11));
        rec.text("x");
        rec.close("a", span(12, 16));
        assert_eq!(rec.depth(), 3);
        rec.text("y");
        let tree = rec.finish();

        let tags: Vec<_> = tree.root.child_nodes().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["a", "b"]);
        let reopened_b = tree.root.child_nodes().nth(1).unwrap();
        assert_eq!(reopened_b.param, Some(Parameter::Number(1)));
        assert_eq!(reopened_b.open_span, span(3, 8));
        let reopened_c = reopened_b.child_nodes().next().unwrap();
        assert_eq!(reopened_c.tag, "c");
        assert_eq!(reopened_c.children, vec![text("y")]);
    }

    #[test]
    fn test_close_picks_innermost_match() {
        // [b]1[b]2[i]3[/b]4
        let mut rec = Reconciler::new();
        rec.open("b", None, span(0, 3));
        rec.text("1");
        rec.open("b", None, span(4, 7));
        rec.text("2");
        rec.open("i", None, span(8, 11));
        rec.text("3");
        rec.close("b", span(12, 16));
        rec.text("4");
        assert_eq!(rec.depth(), 3);
        let tree = rec.finish();
        let outer = tree.root.child_nodes().next().unwrap();
        assert_eq!(outer.text_content(), "1234");
        let inner: Vec<_> = outer.child_nodes().map(|n| n.tag.as_str()).collect();
        assert_eq!(inner, vec!["b", "i"]);
        assert_eq!(tree.diagnostics.len(), 2);
    }

    // =========================================================================
    // finish()
    // =========================================================================

    #[test]
    fn test_unclosed_tag_is_drained_with_diagnostic() {
        let mut rec = Reconciler::new();
        rec.open("bold", None, span(0, 6));
        rec.text("hi");
        let tree = rec.finish();
        assert_eq!(
            tree.root.children,
            vec![node("bold", span(0, 6), None, vec![text("hi")])]
        );
        assert_eq!(tree.diagnostics.len(), 1);
        assert_eq!(tree.diagnostics[0].kind, DiagnosticKind::UnclosedTag);
        assert_eq!(tree.diagnostics[0].span, span(0, 6));
        assert_eq!(tree.diagnostics[0].message, "tag `bold` not properly closed");
    }

    #[test]
    fn test_finish_reports_innermost_first() {
        let mut rec = Reconciler::new();
        rec.open("a", None, span(0, 3));
        rec.open("b", None, span(3, 6));
        let tree = rec.finish();
        let spans: Vec<_> = tree.diagnostics.iter().map(|d| d.span).collect();
        assert_eq!(spans, vec![span(3, 6), span(0, 3)]);
        assert_eq!(tree.root.text_content(), "");
    }
}
