//! Markup grammar built from `papermark-combinator`.
//!
//! ```text
//! document   = { text | tag }
//! text       = ( escape | run )+          run: no '[' or '\'
//! escape     = '\' ( '/' | '[' | ']' )
//! tag        = '[' ( closing | opening )
//! closing    = '/' ws ident ws ']'
//! opening    = pair { pair } ( '/]' | ']' )
//! pair       = ws ident ws [ '=' ws value ] ws
//! value      = '"' [^"]* '"' | color | [0-9]+
//! color      = '#' hex{6} | '#' hex{3} | [A-Za-z#][A-Za-z0-9#]*
//! ```
//!
//! Each production is exposed as a function returning a fresh [`Parser`];
//! [`document`] composes them all.

use once_cell::sync::Lazy;
use papermark_combinator::{
    alt, delimited, literal, one_or_more, optional, pair, preceded, recognize, regex,
    succeeded, take_while0, take_while1, triple, zero_or_more, Parser, Span,
};
use regex::Regex;

use crate::node::{Color, KeyValuePair, Node, Parameter};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*").unwrap());
static HEX6: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{6}").unwrap());
static HEX3: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{3}").unwrap());
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t\n\r]*").unwrap());

/// The complete document grammar, built once per process.
pub static DOCUMENT: Lazy<Parser<Vec<Node>>> = Lazy::new(document);

// =========================================================================
// Text
// =========================================================================

/// `\/`, `\[` or `\]`; yields the escaped character without the backslash.
pub fn escape_sequence() -> Parser<String> {
    preceded("\\", alt(["/", "[", "]"]))
}

/// A run of text and escapes, as a single `Text` node.
pub fn text() -> Parser<Vec<Node>> {
    let run = take_while1(|c| c != '[' && c != '\\');
    one_or_more(alt([escape_sequence(), run]))
        .map(|span, pieces| vec![Node::text(pieces.concat(), span)])
}

pub fn identifier() -> Parser<String> {
    regex(&IDENTIFIER)
}

fn whitespace0() -> Parser<String> {
    regex(&WHITESPACE)
}

// =========================================================================
// Parameters
// =========================================================================

/// Contents of a quoted string; the quotes belong to [`param_value`].
pub fn param_string() -> Parser<Parameter> {
    take_while0(|c| c != '"').map(|_, text| Parameter::Text(text))
}

pub fn hex_color() -> Parser<String> {
    recognize(pair("#", alt([regex(&HEX6), regex(&HEX3)])))
}

/// A bare color-name token, resolved against the named color table.
pub fn color_name() -> Parser<Color> {
    recognize(pair(
        take_while1(|c| c.is_ascii_alphabetic() || c == '#'),
        take_while0(|c| c.is_ascii_alphanumeric() || c == '#'),
    ))
    .map(|_, name| Color::named(name))
}

pub fn param_color() -> Parser<Parameter> {
    alt([hex_color().map(|_, hex| Color::hex(hex)), color_name()])
        .map(|_, color| Parameter::Color(color))
}

/// A bare non-negative integer.
///
/// Digit runs past `u32::MAX` are kept verbatim as text, so the registry
/// reports them instead of the parse failing.
pub fn param_number() -> Parser<Parameter> {
    regex(&DIGITS).map(|span, digits| match digits.parse::<u32>() {
        Ok(n) => Parameter::Number(n),
        Err(_) => {
            log::trace!("number `{digits}` at {span} does not fit u32, keeping it as text");
            Parameter::Text(digits)
        }
    })
}

/// String, then color, then number; the first to match wins.
pub fn param_value() -> Parser<Parameter> {
    alt([
        delimited("\"", param_string(), "\""),
        param_color(),
        param_number(),
    ])
}

/// `=` followed by a value.
pub fn param() -> Parser<Parameter> {
    preceded(succeeded("=", whitespace0()), param_value())
}

/// `key` or `key=value`, whitespace tolerant on both sides.
pub fn kv_pair() -> Parser<KeyValuePair> {
    delimited(
        whitespace0(),
        pair(succeeded(identifier(), whitespace0()), optional(param())),
        whitespace0(),
    )
    .map(|_, (key, value)| KeyValuePair { key, value })
}

// =========================================================================
// Tags
// =========================================================================

/// Body of a tag after its `[`.
enum TagBody {
    Close(String),
    Open {
        head: KeyValuePair,
        attrs: Vec<KeyValuePair>,
        self_closing: bool,
        terminator: Span,
    },
}

impl TagBody {
    /// Turn a parsed tag spanning `span` (including `[`) into nodes.
    ///
    /// A self-closing tag yields an `Open` node up to its `/]` and a `Close`
    /// node covering the `/]`, so the two spans touch.
    fn into_nodes(self, span: Span) -> Vec<Node> {
        match self {
            TagBody::Close(name) => vec![Node::close(name, span)],
            TagBody::Open {
                head,
                attrs,
                self_closing: false,
                ..
            } => vec![Node::open(head.key, head.value, attrs, span)],
            TagBody::Open {
                head,
                attrs,
                self_closing: true,
                terminator,
            } => {
                let mut open = Node::open(
                    head.key.clone(),
                    head.value,
                    attrs,
                    Span::new(span.start, terminator.start),
                );
                open.self_closing = true;
                vec![open, Node::close(head.key, terminator)]
            }
        }
    }
}

fn closing_tag() -> Parser<TagBody> {
    delimited(
        "/",
        delimited(whitespace0(), identifier(), whitespace0()),
        "]",
    )
    .map(|_, name| TagBody::Close(name))
}

fn opening_tag() -> Parser<TagBody> {
    let terminator = alt([
        literal("/]").map(|span, _| (true, span)),
        literal("]").map(|span, _| (false, span)),
    ]);
    triple(kv_pair(), zero_or_more(kv_pair()), terminator).map(
        |_, (head, attrs, (self_closing, terminator))| TagBody::Open {
            head,
            attrs,
            self_closing,
            terminator,
        },
    )
}

/// `[` followed by a closing or opening tag. Closing is tried first since its
/// `/` prefix is unambiguous.
pub fn tag() -> Parser<Vec<Node>> {
    preceded("[", alt([closing_tag(), opening_tag()])).map(|span, body| body.into_nodes(span))
}

/// Text and tags in document order, flattened into one node list.
pub fn document() -> Parser<Vec<Node>> {
    zero_or_more(alt([text(), tag()]))
        .map(|_, lists| lists.into_iter().flatten().collect())
}
