use super::ast::*;
use super::tokenizer::Token;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub(crate) fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub trait Locatable {
    fn span(&self) -> Span;
}

/// A source range. `end` points one column past the last character.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl std::fmt::Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}..{}:{}",
            self.start.line, self.start.column, self.end.line, self.end.column
        )
    }
}

impl Span {
    pub(crate) fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start: Location::new(start_line, start_col),
            end: Location::new(end_line, end_col),
        }
    }

    pub(crate) fn till<R: Locatable>(&self, other: &R) -> Self {
        Self {
            start: self.start,
            end: other.span().end,
        }
    }
}

impl Locatable for Span {
    fn span(&self) -> Span {
        *self
    }
}

impl Locatable for Token {
    fn span(&self) -> Span {
        self.span
    }
}

impl<R> Locatable for Box<R>
where
    R: Locatable,
{
    fn span(&self) -> Span {
        (**self).span()
    }
}

impl Locatable for Name {
    fn span(&self) -> Span {
        self.span
    }
}

impl Locatable for Expression {
    fn span(&self) -> Span {
        match self {
            Self::Literal(_, s) => *s,
            Self::Name(name) => name.span(),
            Self::BinaryOperation(_, operands, _) => {
                let mut first = &operands.0;
                while let Self::BinaryOperation(_, inner, _) = first {
                    first = &inner.0;
                }
                first.span().till(&operands.1)
            }
            Self::List(_, s) => *s,
            Self::Dict(_, s) => *s,
        }
    }
}

impl Locatable for Statement {
    fn span(&self) -> Span {
        match self {
            Self::Assignment(name, value) => name.span().till(value),
            Self::Expression(expr) => expr.span(),
        }
    }
}
