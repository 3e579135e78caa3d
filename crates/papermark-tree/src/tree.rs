//! Recovered document tree.

use std::fmt;

use papermark_markup::{Diagnostic, Parameter, Span};
use serde::Serialize;

/// Tag name of the synthetic root node.
pub const ROOT_TAG: &str = "root";

/// A finished document: the tree plus every diagnostic found on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tree {
    pub root: TreeNode,
    pub diagnostics: Vec<Diagnostic>,
}

/// A tag and everything inside it. Children are owned; there are no parent
/// links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub tag: String,
    pub param: Option<Parameter>,
    pub open_span: Span,
    /// `None` until closed. Implicitly closed tags get a zero-width span at
    /// the closing tag that ended them.
    pub close_span: Option<Span>,
    pub children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Child {
    Node(TreeNode),
    /// A text run; may contain `\n`, which renderers treat as a line break.
    Text(String),
}

impl TreeNode {
    pub fn new(tag: impl Into<String>, param: Option<Parameter>, open_span: Span) -> Self {
        Self {
            tag: tag.into(),
            param,
            open_span,
            close_span: None,
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(ROOT_TAG, None, Span::empty(0))
    }

    pub fn is_root(&self) -> bool {
        self.tag == ROOT_TAG && self.open_span == Span::empty(0)
    }

    /// Child tags, skipping text runs.
    pub fn child_nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.iter().filter_map(|child| match child {
            Child::Node(node) => Some(node),
            Child::Text(_) => None,
        })
    }

    /// All text below this node, concatenated in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for visit in self.walk() {
            if let Visit::Text(text, _) = visit {
                out.push_str(text);
            }
        }
        out
    }

    /// Depth-first walk over this node and everything below it.
    ///
    /// Uses an explicit stack, so nesting depth is bounded by memory rather
    /// than by the call stack.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![Visit::Enter(self, 0)],
        }
    }
}

/// Indented outline, one tag or text run per line.
impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for visit in self.walk() {
            match visit {
                Visit::Enter(node, depth) => {
                    let indent = "  ".repeat(depth);
                    match &node.param {
                        Some(param) => writeln!(f, "{indent}{}={param}", node.tag)?,
                        None => writeln!(f, "{indent}{}", node.tag)?,
                    }
                }
                Visit::Text(text, depth) => writeln!(f, "{}{text:?}", "  ".repeat(depth))?,
                Visit::Leave(..) => {}
            }
        }
        Ok(())
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        // Flatten descendants first so deep trees do not drop recursively.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(child) = pending.pop() {
            if let Child::Node(mut node) = child {
                pending.append(&mut node.children);
            }
        }
    }
}

/// One step of [`TreeNode::walk`]. Depth is relative to the walk's start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visit<'a> {
    Enter(&'a TreeNode, usize),
    Text(&'a str, usize),
    Leave(&'a TreeNode, usize),
}

/// Iterator returned by [`TreeNode::walk`].
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        let visit = self.stack.pop()?;
        if let Visit::Enter(node, depth) = visit {
            self.stack.push(Visit::Leave(node, depth));
            for child in node.children.iter().rev() {
                self.stack.push(match child {
                    Child::Node(inner) => Visit::Enter(inner, depth + 1),
                    Child::Text(text) => Visit::Text(text, depth + 1),
                });
            }
        }
        Some(visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> TreeNode {
        let mut italic = TreeNode::new("italic", None, Span::new(6, 14));
        italic.children.push(Child::Text("hi".into()));
        let mut color = TreeNode::new("color", Some(Parameter::Number(3)), Span::new(0, 6));
        color.children.push(Child::Node(italic));
        color.children.push(Child::Text("\nthere".into()));
        let mut root = TreeNode::root();
        root.children.push(Child::Node(color));
        root
    }

    #[test]
    fn test_root() {
        let root = TreeNode::root();
        assert!(root.is_root());
        assert_eq!(root.open_span, Span::empty(0));
        assert!(!TreeNode::new("root", None, Span::new(0, 6)).is_root());
    }

    #[test]
    fn test_text_content() {
        assert_eq!(sample().text_content(), "hi\nthere");
    }

    #[test]
    fn test_child_nodes_skips_text() {
        let root = sample();
        let color = root.child_nodes().next().unwrap();
        let tags: Vec<_> = color.child_nodes().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["italic"]);
    }

    #[test]
    fn test_walk_order() {
        let root = sample();
        let steps: Vec<String> = root
            .walk()
            .map(|visit| match visit {
                Visit::Enter(node, depth) => format!("+{}@{depth}", node.tag),
                Visit::Text(text, depth) => format!("{text:?}@{depth}"),
                Visit::Leave(node, depth) => format!("-{}@{depth}", node.tag),
            })
            .collect();
        assert_eq!(
            steps,
            vec![
                "+root@0",
                "+color@1",
                "+italic@2",
                "\"hi\"@3",
                "-italic@2",
                "\"\\nthere\"@2",
                "-color@1",
                "-root@0",
            ]
        );
    }

    #[test]
    fn test_deep_tree_walks_and_drops() {
        let mut node = TreeNode::new("bold", None, Span::new(0, 6));
        node.children.push(Child::Text("x".into()));
        for _ in 0..100_000 {
            let mut parent = TreeNode::new("bold", None, Span::new(0, 6));
            parent.children.push(Child::Node(node));
            node = parent;
        }
        assert_eq!(node.text_content(), "x");
        assert_eq!(node.walk().count(), 2 * 100_001 + 1);
        drop(node);
    }

    #[test]
    fn test_outline() {
        assert_eq!(
            sample().to_string(),
            "root\n  color=3\n    italic\n      \"hi\"\n    \"\\nthere\"\n"
        );
    }
}
