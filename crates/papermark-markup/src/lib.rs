//! Papermark Markup
//!
//! Grammar for the bracket-tag markup (`[bold]`, `[color=#f00]`,
//! `[head=2 id="x"]`, `[bullet/]`, escapes `\[ \] \/`), producing a flat,
//! ordered node list. Every opening tag is checked against a
//! [`TagRegistry`]; problems are collected as [`Diagnostic`]s and never stop
//! the parse.
//!
//! # Example
//!
//! ```
//! use papermark_markup::{parse_markup, NodeKind};
//!
//! let parsed = parse_markup("foobar[head=1]barbaz[/head]").unwrap();
//! assert_eq!(parsed.nodes.len(), 4);
//! assert_eq!(parsed.nodes[1].kind, NodeKind::Open);
//! assert!(parsed.diagnostics.is_empty());
//! ```

pub mod color;
pub mod diagnostic;
pub mod grammar;
pub mod node;
pub mod registry;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use node::{Color, KeyValuePair, Node, NodeKind, ParamKind, Parameter};
pub use papermark_combinator::{ParseError, Span};
pub use registry::{TagRegistry, TagSpec};

use once_cell::sync::Lazy;
use papermark_combinator::Input;

use crate::grammar::DOCUMENT;

static BUILTIN_REGISTRY: Lazy<TagRegistry> = Lazy::new(TagRegistry::builtin);

/// Error loading tag registry rows.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid tag registry: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid tag name `{0}`")]
    InvalidName(String),
}

/// Grammar output for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMarkup {
    pub nodes: Vec<Node>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse markup and validate it against the built-in tags.
pub fn parse_markup(input: &str) -> Result<ParsedMarkup, ParseError> {
    parse_markup_with(input, &BUILTIN_REGISTRY)
}

/// Parse markup and validate it against `registry`.
///
/// Where the document grammar stops early (a `[` that opens no valid tag, a
/// `\` that escapes nothing) that single character becomes a text node with
/// a [`DiagnosticKind::MalformedTag`] diagnostic and parsing resumes after
/// it, so no input is dropped.
pub fn parse_markup_with(
    input: &str,
    registry: &TagRegistry,
) -> Result<ParsedMarkup, ParseError> {
    let source = Input::new(input);
    let mut nodes = Vec::new();
    let mut diagnostics = Vec::new();
    let mut offset = 0;

    loop {
        if let Some(m) = DOCUMENT.parse_at(&source, offset)? {
            for node in &m.value {
                diagnostics.extend(registry.validate(node));
            }
            nodes.extend(m.value);
            offset = m.span.end;
        }

        let Some(ch) = source.char_at(offset) else {
            break;
        };
        let span = Span::new(offset, offset + 1);
        log::trace!("stray `{ch}` at {span}, keeping it as text");
        diagnostics.push(Diagnostic::malformed_tag(ch, span));
        nodes.push(Node::text(ch.to_string(), span));
        offset += 1;
    }

    log::debug!(
        "parsed {} nodes with {} diagnostics",
        nodes.len(),
        diagnostics.len()
    );
    Ok(ParsedMarkup { nodes, diagnostics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(parsed: &ParsedMarkup) -> Vec<DiagnosticKind> {
        parsed.diagnostics.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_well_formed_document() {
        let parsed = parse_markup("foobar[head=1]barbaz[/head]").unwrap();
        assert_eq!(parsed.nodes.len(), 4);
        assert_eq!(parsed.nodes[0], Node::text("foobar", Span::new(0, 6)));
        assert_eq!(
            parsed.nodes[1],
            Node::open("head", Some(Parameter::Number(1)), vec![], Span::new(6, 14))
        );
        assert_eq!(parsed.nodes[2], Node::text("barbaz", Span::new(14, 20)));
        assert_eq!(parsed.nodes[3], Node::close("head", Span::new(20, 27)));
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_markup("").unwrap();
        assert!(parsed.nodes.is_empty());
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn test_color_validation() {
        assert!(parse_markup("[color=#fff]x[/color]").unwrap().diagnostics.is_empty());
        assert!(parse_markup("[color=red]x[/color]").unwrap().diagnostics.is_empty());

        let parsed = parse_markup("[color=notacolor]x[/color]").unwrap();
        assert_eq!(kinds(&parsed), vec![DiagnosticKind::InvalidParameter]);
        assert_eq!(parsed.diagnostics[0].span, Span::new(0, 17));
    }

    #[test]
    fn test_number_parameter_alternation_order() {
        let parsed = parse_markup("[head=800]").unwrap();
        assert_eq!(parsed.nodes[0].param, Some(Parameter::Number(800)));
    }

    #[test]
    fn test_registry_diagnostics_in_document_order() {
        let parsed = parse_markup("[blink]a[bullet]b[bold=2]").unwrap();
        assert_eq!(
            kinds(&parsed),
            vec![
                DiagnosticKind::UnknownTag,
                DiagnosticKind::SelfClosingRequired,
                DiagnosticKind::UnexpectedParameter,
            ]
        );
    }

    #[test]
    fn test_self_closing_bullet_validates() {
        let parsed = parse_markup("[bullet/] item").unwrap();
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.nodes.len(), 3);
    }

    #[test]
    fn test_stray_bracket_kept_as_text() {
        let parsed = parse_markup("a [= b").unwrap();
        let values: Vec<_> = parsed.nodes.iter().map(|n| n.value.as_str()).collect();
        assert_eq!(values, vec!["a ", "[", "= b"]);
        assert_eq!(kinds(&parsed), vec![DiagnosticKind::MalformedTag]);
        assert_eq!(parsed.diagnostics[0].span, Span::new(2, 3));
    }

    #[test]
    fn test_stray_backslash_kept_as_text() {
        let parsed = parse_markup(r"a\b").unwrap();
        let values: Vec<_> = parsed.nodes.iter().map(|n| n.value.as_str()).collect();
        assert_eq!(values, vec!["a", "\\", "b"]);
        assert_eq!(kinds(&parsed), vec![DiagnosticKind::MalformedTag]);
    }

    #[test]
    fn test_trailing_open_bracket() {
        let parsed = parse_markup("text[").unwrap();
        assert_eq!(parsed.nodes.len(), 2);
        assert_eq!(parsed.nodes[1].span, Span::new(4, 5));
    }

    #[test]
    fn test_number_overflow_is_a_diagnostic() {
        let parsed = parse_markup("[head=4294967296]x[/head]").unwrap();
        assert_eq!(parsed.nodes.len(), 3);
        assert_eq!(
            parsed.nodes[0].param,
            Some(Parameter::Text("4294967296".into()))
        );
        assert_eq!(kinds(&parsed), vec![DiagnosticKind::InvalidParameter]);
        assert_eq!(
            parsed.diagnostics[0].message,
            "`4294967296` is not a valid integer parameter for tag `head`"
        );
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = TagRegistry::builtin();
        registry
            .extend_from_toml("[[tag]]\nname = \"underline\"\n")
            .unwrap();
        let parsed = parse_markup_with("[underline]x[/underline]", &registry).unwrap();
        assert!(parsed.diagnostics.is_empty());
        let parsed = parse_markup("[underline]x[/underline]").unwrap();
        assert_eq!(kinds(&parsed), vec![DiagnosticKind::UnknownTag]);
    }

    #[test]
    fn test_parse_is_repeatable() {
        let source = "[bold][italic]hi[/bold]bye";
        assert_eq!(parse_markup(source).unwrap(), parse_markup(source).unwrap());
    }
}
