//! Flat node list produced by the markup grammar.

use std::borrow::Cow;
use std::fmt;

use papermark_combinator::Span;
use serde::{Deserialize, Serialize};

use crate::color::{is_named_color, FALLBACK_COLOR};

/// What a grammar node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Text,
    Open,
    Close,
}

/// One item of the flat node list, in document order.
///
/// For `Text` nodes `value` is the text with escapes resolved; for `Open` and
/// `Close` nodes it is the tag name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub value: String,
    pub param: Option<Parameter>,
    pub attrs: Vec<KeyValuePair>,
    pub span: Span,
    /// Set on `Open` nodes written as `[name/]`.
    pub self_closing: bool,
}

impl Node {
    pub fn text(value: impl Into<String>, span: Span) -> Self {
        Self {
            kind: NodeKind::Text,
            value: value.into(),
            param: None,
            attrs: Vec::new(),
            span,
            self_closing: false,
        }
    }

    pub fn open(
        name: impl Into<String>,
        param: Option<Parameter>,
        attrs: Vec<KeyValuePair>,
        span: Span,
    ) -> Self {
        Self {
            kind: NodeKind::Open,
            value: name.into(),
            param,
            attrs,
            span,
            self_closing: false,
        }
    }

    pub fn close(name: impl Into<String>, span: Span) -> Self {
        Self {
            kind: NodeKind::Close,
            value: name.into(),
            param: None,
            attrs: Vec::new(),
            span,
            self_closing: false,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_open(&self) -> bool {
        self.kind == NodeKind::Open
    }

    pub fn is_close(&self) -> bool {
        self.kind == NodeKind::Close
    }
}

/// An attribute on an opening tag: `key` or `key=value`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: Option<Parameter>,
}

/// A typed tag parameter.
///
/// `Display` is the canonical string form handed to renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Parameter {
    Text(String),
    Color(Color),
    Number(u32),
}

impl Parameter {
    /// The parameter as the author wrote it (quotes removed).
    pub fn raw(&self) -> Cow<'_, str> {
        match self {
            Parameter::Text(text) => Cow::Borrowed(text),
            Parameter::Color(color) => Cow::Borrowed(&color.written),
            Parameter::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Text(text) => f.write_str(text),
            Parameter::Color(color) => f.write_str(&color.value),
            Parameter::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A color parameter.
///
/// `written` keeps the source text for validation; `value` is what renders.
/// Unrecognized names resolve to [`FALLBACK_COLOR`] instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Color {
    pub written: String,
    pub value: String,
}

impl Color {
    pub fn hex(hex: impl Into<String>) -> Self {
        let hex = hex.into();
        Self {
            value: hex.clone(),
            written: hex,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        let written = name.into();
        let value = if is_named_color(&written) {
            written.to_ascii_lowercase()
        } else {
            FALLBACK_COLOR.to_string()
        };
        Self { written, value }
    }
}

/// Parameter kind a registered tag expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    #[default]
    None,
    Color,
    Int,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::None => f.write_str("no"),
            ParamKind::Color => f.write_str("color"),
            ParamKind::Int => f.write_str("integer"),
        }
    }
}
