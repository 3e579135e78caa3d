//! Papermark parser combinators
//!
//! Small, backtracking parsers over character spans of a string, in the
//! spirit of `nom`. A parser is a pure function from `(input, offset)` to an
//! [`Outcome`], which separates a clean non-match (`Ok(None)`) from a hard
//! failure (`Err`), so ordered alternation can recover from the former while
//! the latter unwinds the whole parse.
//!
//! # Example
//!
//! ```
//! use papermark_combinator::{alt, delimited, literal, take_while1};
//!
//! let word = take_while1(|c| c.is_ascii_alphabetic());
//! let parser = delimited("(", alt([word, literal("?")]), ")");
//! let m = parser.parse("(hello)").unwrap().unwrap();
//! assert_eq!(m.value, "hello");
//! assert_eq!((m.span.start, m.span.end), (0, 7));
//! ```

pub mod combinators;
pub mod input;
pub mod parser;
pub mod span;

pub use combinators::{
    alt, delimited, literal, map, one_or_more, optional, optional_or, pair, preceded,
    recognize, regex, sequence, succeeded, suppress, take_while0, take_while1, triple,
    try_map, zero_or_more,
};
pub use input::Input;
pub use parser::{IntoParser, Outcome, Parser};
pub use span::{Match, Span};

/// Hard parse failure with the span it was raised for.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("parse failure at {span}: {message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}
