use std::cell::{Cell, RefCell};

use super::error::ParseError;
use super::locations::Location;
use super::tokenizer::{Token, TokenType};

#[derive(Debug)]
pub enum ParseResult<'a, Output> {
    Ok((Output, ParserInput<'a>)),
    Err,
}

/// The furthest point the parser failed at, and what it would have accepted
/// there.
#[derive(Debug)]
pub(crate) struct Failure {
    remaining: usize,
    found: Option<Token>,
    expected: Vec<&'static str>,
    fatal: bool,
}

impl Failure {
    pub(crate) fn new() -> Self {
        Self {
            remaining: usize::MAX,
            found: None,
            expected: vec![],
            fatal: false,
        }
    }

    fn record(&mut self, input: &[Token], expected: &'static str) {
        if self.fatal {
            return;
        }
        if input.len() < self.remaining {
            self.remaining = input.len();
            self.found = input.first().cloned();
            self.expected.clear();
        }
        if input.len() == self.remaining && !self.expected.contains(&expected) {
            self.expected.push(expected);
        }
    }

    pub(crate) fn is_fatal(&self) -> bool {
        self.fatal
    }

    // Replaces whatever was recorded so far and keeps later failures out.
    fn record_fatal(&mut self, input: &[Token], expected: &'static str) {
        if self.fatal {
            return;
        }
        self.remaining = input.len();
        self.found = input.first().cloned();
        self.expected = vec![expected];
        self.fatal = true;
    }

    fn expectation(&self) -> String {
        match self.expected.as_slice() {
            [] => "an expression".to_string(),
            [only] => only.to_string(),
            many => format!("one of {}", many.join(", ")),
        }
    }

    /// `end` is where input ran out, used when the failure happened there.
    pub(crate) fn into_error(self, end: Location) -> ParseError {
        let expected = self.expectation();
        match self.found {
            Some(token) => ParseError::UnexpectedToken {
                found: token.lexeme,
                expected,
                location: token.span.start,
            },
            None => ParseError::UnexpectedEndOfInput {
                expected,
                location: end,
            },
        }
    }
}

/// How many brackets may be open at once.
pub(crate) const MAX_NESTING: usize = 100;

/// Shared by every parser of one statement: the furthest failure and the
/// current bracket depth.
#[derive(Debug, Clone, Copy)]
pub struct ParserState<'a>(&'a RefCell<Failure>, &'a Cell<usize>);

impl<'a> ParserState<'a> {
    pub(crate) fn new(failure: &'a RefCell<Failure>, depth: &'a Cell<usize>) -> Self {
        Self(failure, depth)
    }

    pub(super) fn report_error(&self, input: &[Token], expected: &'static str) {
        self.0.borrow_mut().record(input, expected);
    }

    pub(super) fn depth(&self) -> &'a Cell<usize> {
        self.1
    }

    pub(super) fn report_fatal(&self, input: &[Token], expected: &'static str) {
        self.0.borrow_mut().record_fatal(input, expected);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParserInput<'a>(&'a [Token], ParserState<'a>);

impl<'a> ParserInput<'a> {
    pub(crate) fn new(input: &'a [Token], state: ParserState<'a>) -> Self {
        Self(input, state)
    }

    pub(crate) fn tokens(&self) -> &'a [Token] {
        self.0
    }
}

impl<'a, T> ParseResult<'a, T> {
    pub(super) fn or_else<O>(self, op: O) -> Self
    where
        O: FnOnce() -> Self,
    {
        match self {
            Self::Ok(inner) => Self::Ok(inner),
            Self::Err => op(),
        }
    }
    pub(super) fn map<U, F>(self, op: F) -> ParseResult<'a, U>
    where
        F: FnOnce((T, ParserInput<'a>)) -> (U, ParserInput<'a>),
    {
        match self {
            Self::Ok(inner) => ParseResult::Ok(op(inner)),
            Self::Err => ParseResult::Err,
        }
    }
    pub(super) fn and_then<U, F>(self, op: F) -> ParseResult<'a, U>
    where
        F: FnOnce((T, ParserInput<'a>)) -> ParseResult<'a, U>,
    {
        match self {
            Self::Ok(inner) => op(inner),
            Self::Err => ParseResult::Err,
        }
    }
}

pub(super) trait Parser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output>;
    fn map<F, MappedOutput>(self, map_fn: F) -> BoxedParser<'a, MappedOutput>
    where
        Self: Sized + 'a,
        Output: 'a,
        MappedOutput: 'a,
        F: Fn(Output) -> MappedOutput + 'a,
    {
        BoxedParser::new(map(self, map_fn))
    }
    fn or(self, parser: impl Parser<'a, Output> + 'a) -> BoxedParser<'a, Output>
    where
        Self: Sized + 'a,
        Output: 'a,
    {
        let alternative = move |input: ParserInput<'a>| {
            self.parse(input).or_else(|| parser.parse(input))
        };
        BoxedParser::new(alternative)
    }
}

impl<'a, F, Output> Parser<'a, Output> for F
where
    F: Fn(ParserInput<'a>) -> ParseResult<'a, Output>,
{
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self(input)
    }
}

pub(super) struct BoxedParser<'a, Output> {
    parser: Box<dyn Parser<'a, Output> + 'a>,
}

impl<'a, Output> BoxedParser<'a, Output> {
    fn new(parser: impl Parser<'a, Output> + 'a) -> Self {
        Self {
            parser: Box::new(parser),
        }
    }
}

impl<'a, Output> Parser<'a, Output> for BoxedParser<'a, Output> {
    fn parse(&self, input: ParserInput<'a>) -> ParseResult<'a, Output> {
        self.parser.parse(input)
    }
}

pub(super) fn pair<'a, R1, R2>(
    parser1: impl Parser<'a, R1>,
    parser2: impl Parser<'a, R2>,
) -> impl Parser<'a, (R1, R2)> {
    move |input: ParserInput<'a>| {
        parser1.parse(input).and_then(|(result1, next_input)| {
            parser2
                .parse(next_input)
                .map(|(result2, rest)| ((result1, result2), rest))
        })
    }
}

pub(super) fn map<'a, F, A, B>(
    parser: impl Parser<'a, A>,
    map_fn: F,
) -> impl Fn(ParserInput<'a>) -> ParseResult<'a, B>
where
    F: Fn(A) -> B,
{
    move |input| {
        parser
            .parse(input)
            .map(|(result, rest)| (map_fn(result), rest))
    }
}

pub(super) fn left<'a, A, B>(
    left_parser: impl Parser<'a, A>,
    right_parser: impl Parser<'a, B>,
) -> impl Parser<'a, A> {
    map(pair(left_parser, right_parser), |(left, _right)| left)
}

pub(super) fn zero_or_more<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Vec<R>> {
    move |input: ParserInput<'a>| {
        let mut result = Vec::new();
        let mut tmp_input = input;
        while let ParseResult::Ok((next, rest)) = parser.parse(tmp_input) {
            tmp_input = rest;
            result.push(next);
        }
        ParseResult::Ok((result, tmp_input))
    }
}

/// Matches the opening bracket `open`, then runs `parser` one nesting level
/// deeper. Past [`MAX_NESTING`] levels the whole statement is rejected at the
/// bracket.
pub(super) fn nested<'a, R>(
    open: TokenType,
    parser: impl Parser<'a, R>,
) -> impl Parser<'a, (Token, R)> {
    move |input: ParserInput<'a>| {
        tok(open).parse(input).and_then(|(bracket, rest)| {
            let depth = input.1.depth();
            if depth.get() >= MAX_NESTING {
                input.1.report_fatal(input.0, "less deeply nested expression");
                return ParseResult::Err;
            }
            depth.set(depth.get() + 1);
            let result = parser.parse(rest);
            depth.set(depth.get() - 1);
            result.map(|(inner, rest)| ((bracket, inner), rest))
        })
    }
}

pub(super) fn maybe<'a, R>(parser: impl Parser<'a, R>) -> impl Parser<'a, Option<R>> {
    move |input: ParserInput<'a>| match parser.parse(input) {
        ParseResult::Ok((value, rest)) => ParseResult::Ok((Some(value), rest)),
        ParseResult::Err => ParseResult::Ok((None, input)),
    }
}

pub(super) fn tok<'a>(expected_type: TokenType) -> impl Fn(ParserInput<'a>) -> ParseResult<'a, Token> {
    move |input| match input.0.first() {
        Some(token) if token.typ == expected_type => {
            ParseResult::Ok((token.clone(), ParserInput(&input.0[1..], input.1)))
        }
        _ => {
            input.1.report_error(input.0, expected_type.describe());
            ParseResult::Err
        }
    }
}

pub(super) fn sep_by<'a, R>(parser: impl Parser<'a, R>, sep: TokenType) -> impl Parser<'a, Vec<R>> {
    move |input: ParserInput<'a>| {
        if let ParseResult::Ok((first, rest)) = parser.parse(input) {
            let mut result = Vec::new();
            let mut tmp_input = rest;
            result.push(first);
            while let ParseResult::Ok((next, rest)) =
                tok(sep).parse(tmp_input).and_then(|(_, s)| parser.parse(s))
            {
                tmp_input = rest;
                result.push(next)
            }
            return ParseResult::Ok((result, tmp_input));
        }
        ParseResult::Err
    }
}

pub(super) fn end_of_input(input: ParserInput) -> ParseResult<()> {
    if input.0.is_empty() {
        ParseResult::Ok(((), input))
    } else {
        input.1.report_error(input.0, "end of input");
        ParseResult::Err
    }
}
