use crate::span::Span;

/// Source text prepared for offset-based parsing.
///
/// Parsers address the text by character offset. `Input` keeps a `Vec<char>`
/// for index-based lookups plus the byte position of every character so that
/// substrings and regex haystacks can be sliced without rescanning.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    source: &'a str,
    chars: Vec<char>,
    byte_offsets: Vec<usize>,
}

impl<'a> Input<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = Vec::with_capacity(source.len());
        let mut byte_offsets = Vec::with_capacity(source.len() + 1);
        for (byte, ch) in source.char_indices() {
            chars.push(ch);
            byte_offsets.push(byte);
        }
        byte_offsets.push(source.len());
        Self {
            source,
            chars,
            byte_offsets,
        }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    /// Everything from `offset` to the end of the input.
    pub fn rest(&self, offset: usize) -> &'a str {
        &self.source[self.byte_offset(offset)..]
    }

    /// The text covered by `span`.
    pub fn slice(&self, span: Span) -> &'a str {
        &self.source[self.byte_offset(span.start)..self.byte_offset(span.end)]
    }

    fn byte_offset(&self, offset: usize) -> usize {
        self.byte_offsets[offset.min(self.chars.len())]
    }
}
