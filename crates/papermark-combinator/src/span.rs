use std::fmt;

use serde::Serialize;

/// A half-open range of character offsets into the parsed input.
///
/// Offsets count Unicode scalar values, not bytes, so a span can be shown to
/// a user without knowing how the text was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} is past its end {end}");
        Self { start, end }
    }

    /// A zero-width span sitting at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A successfully parsed value together with where it came from.
///
/// `suppressed` marks values such as delimiters that [`sequence`] leaves out
/// of its collected output; their span still advances the sequence.
///
/// [`sequence`]: crate::sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Match<T> {
    pub value: T,
    pub span: Span,
    pub suppressed: bool,
}

impl<T> Match<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self {
            value,
            span,
            suppressed: false,
        }
    }

    pub fn with_start(mut self, start: usize) -> Self {
        self.span.start = start;
        self
    }

    pub fn with_end(mut self, end: usize) -> Self {
        self.span.end = end;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn suppress(mut self) -> Self {
        self.suppressed = true;
        self
    }

    /// Transform the value, keeping span and suppression.
    pub fn map_value<U>(self, f: impl FnOnce(T) -> U) -> Match<U> {
        Match {
            value: f(self.value),
            span: self.span,
            suppressed: self.suppressed,
        }
    }
}
