use std::fmt;

use papermark_combinator::Span;
use serde::Serialize;

use crate::node::ParamKind;

/// Categories of non-fatal markup problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Tag name missing from the registry.
    UnknownTag,
    /// Tag must be written as `[name/]`.
    SelfClosingRequired,
    /// Tag requires a parameter and none was given.
    MissingParameter,
    /// Tag takes no parameter but one was given.
    UnexpectedParameter,
    /// Parameter present but not of the expected kind.
    InvalidParameter,
    /// A `[` or `\` that starts no tag or escape; kept as text.
    MalformedTag,
    /// Tag still open at the end of the document.
    UnclosedTag,
}

/// A span-located markup problem. Never aborts parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub span: Span,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_tag(name: &str, span: Span) -> Self {
        Self::new(DiagnosticKind::UnknownTag, span, format!("unknown tag `{name}`"))
    }

    pub fn self_closing_required(name: &str, span: Span) -> Self {
        Self::new(
            DiagnosticKind::SelfClosingRequired,
            span,
            format!("tag `{name}` must be self-closing, write `[{name}/]`"),
        )
    }

    pub fn missing_parameter(name: &str, expected: ParamKind, span: Span) -> Self {
        Self::new(
            DiagnosticKind::MissingParameter,
            span,
            format!("tag `{name}` requires a {expected} parameter"),
        )
    }

    pub fn unexpected_parameter(name: &str, span: Span) -> Self {
        Self::new(
            DiagnosticKind::UnexpectedParameter,
            span,
            format!("tag `{name}` does not take a parameter"),
        )
    }

    pub fn invalid_parameter(name: &str, raw: &str, expected: ParamKind, span: Span) -> Self {
        Self::new(
            DiagnosticKind::InvalidParameter,
            span,
            format!("`{raw}` is not a valid {expected} parameter for tag `{name}`"),
        )
    }

    pub fn malformed_tag(ch: char, span: Span) -> Self {
        let message = if ch == '\\' {
            "`\\` does not escape anything, kept as text".to_string()
        } else {
            format!("`{ch}` does not start a valid tag, kept as text")
        };
        Self::new(DiagnosticKind::MalformedTag, span, message)
    }

    pub fn unclosed_tag(name: &str, span: Span) -> Self {
        Self::new(
            DiagnosticKind::UnclosedTag,
            span,
            format!("tag `{name}` not properly closed"),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}
