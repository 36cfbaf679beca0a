use derivative::Derivative;

use super::locations::Span;
use super::tokenizer::{Token, TokenType as TT};
use crate::interpreter::Value;

/// One top-level unit of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment(Name, Expression),
    Expression(Expression),
}

#[derive(Clone, Derivative)]
#[derivative(PartialEq)]
pub struct Name {
    pub(crate) name: String,
    #[derivative(PartialEq = "ignore")]
    pub(crate) span: Span,
}

impl Name {
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Name(\"{}\")", self.name)
    }
}

impl From<Token> for Name {
    fn from(value: Token) -> Self {
        debug_assert_eq!(value.typ, TT::NAME);
        Self {
            name: value.lexeme,
            span: value.span,
        }
    }
}

/// Expression tree. Spans are carried for diagnostics and are ignored by
/// equality and `Debug`.
#[derive(Clone, Derivative)]
#[derivative(Debug, PartialEq)]
pub enum Expression {
    Literal(
        Value,
        #[derivative(Debug = "ignore", PartialEq = "ignore")] Span,
    ),
    Name(Name),
    /// The span is the operator's.
    BinaryOperation(
        Operator,
        Box<(Expression, Expression)>,
        #[derivative(Debug = "ignore", PartialEq = "ignore")] Span,
    ),
    List(
        Vec<Expression>,
        #[derivative(Debug = "ignore", PartialEq = "ignore")] Span,
    ),
    Dict(
        Vec<(Expression, Expression)>,
        #[derivative(Debug = "ignore", PartialEq = "ignore")] Span,
    ),
}

// Deeply left-nested operation chains are taken apart with an explicit stack
// instead of the recursive drop glue.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

impl Expression {
    fn detach_children(&mut self, out: &mut Vec<Expression>) {
        match self {
            Self::BinaryOperation(_, operands, _) => {
                let empty = || Self::List(Vec::new(), Span::default());
                let (left, right) = std::mem::replace(&mut **operands, (empty(), empty()));
                out.push(left);
                out.push(right);
            }
            Self::List(elements, _) => out.append(elements),
            Self::Dict(pairs, _) => {
                for (key, value) in pairs.drain(..) {
                    out.push(key);
                    out.push(value);
                }
            }
            Self::Literal(..) | Self::Name(_) => {}
        }
    }
}

/// Folds `head (op operand)*` into left-nested operations. The span of each
/// operation is the span of its operator.
pub(super) fn fold_left(
    head: Expression,
    tail: Vec<((Operator, Span), Expression)>,
) -> Expression {
    tail.into_iter().fold(head, |left, ((op, span), right)| {
        Expression::BinaryOperation(op, Box::new((left, right)), span)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Plus,
    Minus,
    Times,
    Divide,
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Times => "*",
            Self::Divide => "/",
        };
        write!(f, "{symbol}")
    }
}
