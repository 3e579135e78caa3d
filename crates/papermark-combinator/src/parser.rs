use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::combinators::{alt, literal, map, regex, try_map};
use crate::input::Input;
use crate::span::{Match, Span};
use crate::ParseError;

/// Result of running a parser at one offset.
///
/// - `Err(_)`: hard failure, unwinds the whole parse.
/// - `Ok(None)`: the parser does not match here; alternation may try the next branch.
/// - `Ok(Some(_))`: matched.
pub type Outcome<T> = Result<Option<Match<T>>, ParseError>;

type ParseFn<T> = dyn Fn(&Input<'_>, usize) -> Outcome<T> + Send + Sync;

/// An immutable, shareable parser producing values of type `T`.
///
/// Cloning is cheap (the function is reference counted) and a parser holds no
/// per-parse state, so one value can serve any number of concurrent parses.
pub struct Parser<T> {
    func: Arc<ParseFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Parser")
    }
}

impl<T: 'static> Parser<T> {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Input<'_>, usize) -> Outcome<T> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Parse `text` from its first character.
    pub fn parse(&self, text: &str) -> Outcome<T> {
        self.parse_from(text, 0)
    }

    /// Parse `text` starting at character `offset`.
    pub fn parse_from(&self, text: &str, offset: usize) -> Outcome<T> {
        self.parse_at(&Input::new(text), offset)
    }

    /// Run against already prepared input. Combinators call this.
    pub fn parse_at(&self, input: &Input<'_>, offset: usize) -> Outcome<T> {
        (self.func)(input, offset)
    }

    pub fn map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(Span, T) -> U + Send + Sync + 'static,
    {
        map(self, f)
    }

    pub fn try_map<U, F>(self, f: F) -> Parser<U>
    where
        U: 'static,
        F: Fn(Span, T) -> Result<U, ParseError> + Send + Sync + 'static,
    {
        try_map(self, f)
    }

    /// Two-branch alternation: `self` first, then `other`.
    pub fn or(self, other: impl IntoParser<T>) -> Parser<T> {
        alt([self, other.into_parser()])
    }
}

/// Conversion of plain values into parsers.
///
/// Strings lift to [`literal`] and compiled regexes to [`regex`], so
/// combinators accept `"]"` or a `Regex` wherever they accept a parser.
pub trait IntoParser<T> {
    fn into_parser(self) -> Parser<T>;
}

impl<T> IntoParser<T> for Parser<T> {
    fn into_parser(self) -> Parser<T> {
        self
    }
}

impl<T> IntoParser<T> for &Parser<T> {
    fn into_parser(self) -> Parser<T> {
        self.clone()
    }
}

impl IntoParser<String> for &str {
    fn into_parser(self) -> Parser<String> {
        literal(self)
    }
}

impl IntoParser<String> for String {
    fn into_parser(self) -> Parser<String> {
        literal(self)
    }
}

impl IntoParser<String> for Regex {
    fn into_parser(self) -> Parser<String> {
        regex(&self)
    }
}

impl IntoParser<String> for &Regex {
    fn into_parser(self) -> Parser<String> {
        regex(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::thread;

    #[test]
    fn test_parse_from_offset() {
        let parser = literal("world");
        let m = parser.parse_from("hello world", 6).unwrap().unwrap();
        assert_eq!(m.value, "world");
        assert_eq!(m.span, Span::new(6, 11));
    }

    #[test]
    fn test_or_method() {
        let parser = literal("world").or("hello");
        let m = parser.parse("hello world").unwrap().unwrap();
        assert_eq!(m.value, "hello");
    }

    #[test]
    fn test_map_method_receives_span() {
        let parser = literal("abc").map(|span, value| format!("{value}@{span}"));
        let m = parser.parse("abc").unwrap().unwrap();
        assert_eq!(m.value, "abc@0..3");
    }

    #[test]
    fn test_parser_is_shareable_across_threads() {
        let parser = literal("ok").or("no");
        let handles: Vec<_> = ["ok", "no", "xx"]
            .into_iter()
            .map(|text| {
                let parser = parser.clone();
                thread::spawn(move || parser.parse(text).unwrap().map(|m| m.value))
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            results,
            vec![Some("ok".to_string()), Some("no".to_string()), None]
        );
    }
}
