//! The combinator set.
//!
//! Every function here returns a new [`Parser`]. A non-match anywhere inside
//! a sequencing combinator turns the whole thing into a non-match; a hard
//! failure is returned as soon as it is seen.

use regex::Regex;

use crate::input::Input;
use crate::parser::{IntoParser, Outcome, Parser};
use crate::span::{Match, Span};
use crate::ParseError;

/// Unwrap a successful match or return the non-match / failure to the caller.
macro_rules! matched {
    ($outcome:expr) => {
        match $outcome? {
            Some(m) => m,
            None => return Ok(None),
        }
    };
}

// =========================================================================
// Terminals
// =========================================================================

/// Match `s` verbatim.
pub fn literal(s: impl Into<String>) -> Parser<String> {
    let s: String = s.into();
    let width = s.chars().count();
    Parser::new(move |input, offset| {
        if offset <= input.len() && input.rest(offset).starts_with(s.as_str()) {
            Ok(Some(Match::new(s.clone(), Span::new(offset, offset + width))))
        } else {
            Ok(None)
        }
    })
}

/// Match `re` anchored at the offset.
///
/// The pattern is searched in the remaining input and only accepted when the
/// match begins at the offset. Starting the pattern with `^` keeps the search
/// from scanning ahead.
pub fn regex(re: &Regex) -> Parser<String> {
    let re = re.clone();
    Parser::new(move |input, offset| {
        if offset > input.len() {
            return Ok(None);
        }
        match re.find(input.rest(offset)) {
            Some(found) if found.start() == 0 => {
                let text = found.as_str();
                let width = text.chars().count();
                Ok(Some(Match::new(
                    text.to_string(),
                    Span::new(offset, offset + width),
                )))
            }
            _ => Ok(None),
        }
    })
}

fn take_while_span<F>(input: &Input<'_>, offset: usize, pred: &F) -> Span
where
    F: Fn(char) -> bool,
{
    let mut end = offset;
    while let Some(ch) = input.char_at(end) {
        if !pred(ch) {
            break;
        }
        end += 1;
    }
    Span::new(offset, end)
}

/// Consume the longest run of characters satisfying `pred`; at least one.
pub fn take_while1<F>(pred: F) -> Parser<String>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    Parser::new(move |input, offset| {
        let span = take_while_span(input, offset, &pred);
        if span.is_empty() {
            return Ok(None);
        }
        Ok(Some(Match::new(input.slice(span).to_string(), span)))
    })
}

/// Consume the longest run of characters satisfying `pred`, possibly empty.
pub fn take_while0<F>(pred: F) -> Parser<String>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    Parser::new(move |input, offset| {
        let span = take_while_span(input, offset, &pred);
        Ok(Some(Match::new(input.slice(span).to_string(), span)))
    })
}

// =========================================================================
// Sequencing
// =========================================================================

/// Run each parser where the previous one ended and collect the values that
/// were not suppressed.
pub fn sequence<T, I, P>(parsers: I) -> Parser<Vec<T>>
where
    T: 'static,
    I: IntoIterator<Item = P>,
    P: IntoParser<T>,
{
    let parsers: Vec<Parser<T>> = parsers.into_iter().map(IntoParser::into_parser).collect();
    Parser::new(move |input, offset| {
        let mut values = Vec::with_capacity(parsers.len());
        let mut end = offset;
        for parser in &parsers {
            let m = matched!(parser.parse_at(input, end));
            end = m.span.end;
            if !m.suppressed {
                values.push(m.value);
            }
        }
        Ok(Some(Match::new(values, Span::new(offset, end))))
    })
}

/// Two parsers in sequence, keeping both values.
pub fn pair<A, B>(a: impl IntoParser<A>, b: impl IntoParser<B>) -> Parser<(A, B)>
where
    A: 'static,
    B: 'static,
{
    let a = a.into_parser();
    let b = b.into_parser();
    Parser::new(move |input, offset| {
        let first = matched!(a.parse_at(input, offset));
        let second = matched!(b.parse_at(input, first.span.end));
        let span = Span::new(offset, second.span.end);
        Ok(Some(Match::new((first.value, second.value), span)))
    })
}

/// Three parsers in sequence, keeping all values.
pub fn triple<A, B, C>(
    a: impl IntoParser<A>,
    b: impl IntoParser<B>,
    c: impl IntoParser<C>,
) -> Parser<(A, B, C)>
where
    A: 'static,
    B: 'static,
    C: 'static,
{
    let a = a.into_parser();
    let b = b.into_parser();
    let c = c.into_parser();
    Parser::new(move |input, offset| {
        let first = matched!(a.parse_at(input, offset));
        let second = matched!(b.parse_at(input, first.span.end));
        let third = matched!(c.parse_at(input, second.span.end));
        let span = Span::new(offset, third.span.end);
        Ok(Some(Match::new(
            (first.value, second.value, third.value),
            span,
        )))
    })
}

/// `a` then `b`, returning `b`'s value over the combined span.
pub fn preceded<A, B>(a: impl IntoParser<A>, b: impl IntoParser<B>) -> Parser<B>
where
    A: 'static,
    B: 'static,
{
    let a = a.into_parser();
    let b = b.into_parser();
    Parser::new(move |input, offset| {
        let first = matched!(a.parse_at(input, offset));
        let second = matched!(b.parse_at(input, first.span.end));
        Ok(Some(second.with_start(offset)))
    })
}

/// `a` then `b`, returning `a`'s value over the combined span.
pub fn succeeded<A, B>(a: impl IntoParser<A>, b: impl IntoParser<B>) -> Parser<A>
where
    A: 'static,
    B: 'static,
{
    let a = a.into_parser();
    let b = b.into_parser();
    Parser::new(move |input, offset| {
        let first = matched!(a.parse_at(input, offset));
        let second = matched!(b.parse_at(input, first.span.end));
        Ok(Some(first.with_end(second.span.end)))
    })
}

/// `a`, `b`, `c` in sequence, returning `b`'s value over the combined span.
pub fn delimited<A, B, C>(
    a: impl IntoParser<A>,
    b: impl IntoParser<B>,
    c: impl IntoParser<C>,
) -> Parser<B>
where
    A: 'static,
    B: 'static,
    C: 'static,
{
    let a = a.into_parser();
    let b = b.into_parser();
    let c = c.into_parser();
    Parser::new(move |input, offset| {
        let first = matched!(a.parse_at(input, offset));
        let second = matched!(b.parse_at(input, first.span.end));
        let third = matched!(c.parse_at(input, second.span.end));
        Ok(Some(second.with_span(Span::new(offset, third.span.end))))
    })
}

// =========================================================================
// Choice and repetition
// =========================================================================

/// Ordered alternation: the first branch that matches wins.
pub fn alt<T, I, P>(parsers: I) -> Parser<T>
where
    T: 'static,
    I: IntoIterator<Item = P>,
    P: IntoParser<T>,
{
    let parsers: Vec<Parser<T>> = parsers.into_iter().map(IntoParser::into_parser).collect();
    Parser::new(move |input, offset| {
        for parser in &parsers {
            if let Some(m) = parser.parse_at(input, offset)? {
                return Ok(Some(m));
            }
        }
        Ok(None)
    })
}

/// Never a non-match: `None` with a zero-width span when `p` does not match.
pub fn optional<T: 'static>(p: impl IntoParser<T>) -> Parser<Option<T>> {
    let p = p.into_parser();
    Parser::new(move |input, offset| match p.parse_at(input, offset)? {
        Some(m) => Ok(Some(m.map_value(Some))),
        None => Ok(Some(Match::new(None, Span::empty(offset)))),
    })
}

/// Like [`optional`], but falls back to `default` instead of `None`.
pub fn optional_or<T>(p: impl IntoParser<T>, default: T) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    let p = p.into_parser();
    Parser::new(move |input, offset| match p.parse_at(input, offset)? {
        Some(m) => Ok(Some(m)),
        None => Ok(Some(Match::new(default.clone(), Span::empty(offset)))),
    })
}

/// Greedy repetition, at least once.
///
/// Stops at end of input, and after any repetition that consumed nothing,
/// so parsers able to match the empty string cannot spin forever.
pub fn one_or_more<T: 'static>(p: impl IntoParser<T>) -> Parser<Vec<T>> {
    let p = p.into_parser();
    Parser::new(move |input, offset| {
        let mut values = Vec::new();
        let mut end = offset;
        while let Some(m) = p.parse_at(input, end)? {
            let advanced = m.span.end > end;
            end = m.span.end;
            values.push(m.value);
            if !advanced || end >= input.len() {
                break;
            }
        }
        if values.is_empty() {
            return Ok(None);
        }
        Ok(Some(Match::new(values, Span::new(offset, end))))
    })
}

/// Greedy repetition; zero repetitions yield an empty `Vec` and a zero-width span.
pub fn zero_or_more<T: 'static>(p: impl IntoParser<T>) -> Parser<Vec<T>> {
    map(optional(one_or_more(p)), |_, values| values.unwrap_or_default())
}

// =========================================================================
// Transformation
// =========================================================================

pub fn map<T, U, F>(p: impl IntoParser<T>, f: F) -> Parser<U>
where
    T: 'static,
    U: 'static,
    F: Fn(Span, T) -> U + Send + Sync + 'static,
{
    try_map(p, move |span, value| Ok(f(span, value)))
}

/// Transform a match with a callback that may fail; its error becomes the
/// hard failure of the whole parse.
pub fn try_map<T, U, F>(p: impl IntoParser<T>, f: F) -> Parser<U>
where
    T: 'static,
    U: 'static,
    F: Fn(Span, T) -> Result<U, ParseError> + Send + Sync + 'static,
{
    let p = p.into_parser();
    Parser::new(move |input, offset| {
        let m = matched!(p.parse_at(input, offset));
        let value = f(m.span, m.value)?;
        Ok(Some(Match {
            value,
            span: m.span,
            suppressed: m.suppressed,
        }))
    })
}

/// Replace `p`'s value with the raw text it consumed.
pub fn recognize<T: 'static>(p: impl IntoParser<T>) -> Parser<String> {
    let p = p.into_parser();
    Parser::new(move |input, offset| {
        let m = matched!(p.parse_at(input, offset));
        Ok(Some(Match::new(input.slice(m.span).to_string(), m.span)))
    })
}

/// Keep `p`'s span but hide its value from [`sequence`].
pub fn suppress<T: 'static>(p: impl IntoParser<T>) -> Parser<T> {
    let p = p.into_parser();
    Parser::new(move |input, offset| -> Outcome<T> {
        let m = matched!(p.parse_at(input, offset));
        Ok(Some(m.suppress()))
    })
}
