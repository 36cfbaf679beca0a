// # ========================= START OF THE GRAMMAR =========================
//
// # General grammatical elements and rules:
// #
// # * Upper case names (NAME) denote tokens produced by the tokenizer
// # * Strings with single quotes (') denote punctuation and operator tokens
// #
// # Grammar Syntax:
// #
// # e1 e2     Match e1, then match e2.
// # e1 | e2   Match e1 or e2, trying e1 first.
// # [ e ]     Optionally match e.
// # e*        Match zero or more occurrences of e.
// # s.e+      Match one or more occurrences of e, separated by s.
// #
// # Binary operators are read as `head (op operand)*` and folded into
// # left-nested operations, so that `1 - 2 - 3` means `(1 - 2) - 3`.
// # Brackets nest at most MAX_NESTING levels deep.

use std::cell::{Cell, RefCell};

use super::ast::*;
use super::combinators::*;
use super::error::ParseError;
use super::locations::{Location, Span};
use super::tokenizer::{Token, TokenType as TT};

/// Parses a single statement that must cover all of `input`.
pub fn parse(input: &[Token]) -> Result<Statement, ParseError> {
    let failure = RefCell::new(Failure::new());
    let depth = Cell::new(0);
    let tokens = ParserInput::new(input, ParserState::new(&failure, &depth));
    let parsed = left(statement, end_of_input).parse(tokens);
    match parsed {
        ParseResult::Ok((stmt, _)) => Ok(stmt),
        ParseResult::Err => Err(failure.replace(Failure::new()).into_error(end_of(input))),
    }
}

/// Parses one statement from the front of `input` and returns it together
/// with the tokens that follow it.
pub fn parse_statement(input: &[Token]) -> Result<(Statement, &[Token]), ParseError> {
    let failure = RefCell::new(Failure::new());
    let depth = Cell::new(0);
    let tokens = ParserInput::new(input, ParserState::new(&failure, &depth));
    let parsed = statement(tokens);
    match parsed {
        ParseResult::Ok((stmt, rest)) if !failure.borrow().is_fatal() => {
            let consumed = input.len() - rest.tokens().len();
            Ok((stmt, &input[consumed..]))
        }
        _ => Err(failure.replace(Failure::new()).into_error(end_of(input))),
    }
}

fn end_of(input: &[Token]) -> Location {
    input
        .last()
        .map(|token| token.span.end)
        .unwrap_or(Location::new(1, 1))
}

// # STATEMENTS
// # ==========

// # NOTE: assignment MUST precede expression, an identifier on its own is a
// # valid expression.
// statement:
//     | assignment
//     | expression
fn statement(input: ParserInput) -> ParseResult<Statement> {
    assignment
        .or(expression.map(Statement::Expression))
        .parse(input)
}

// assignment: NAME '=' expression
fn assignment(input: ParserInput) -> ParseResult<Statement> {
    pair(left(name, tok(TT::EQUAL)), expression)
        .map(|(n, e)| Statement::Assignment(n, e))
        .parse(input)
}

fn name(input: ParserInput) -> ParseResult<Name> {
    tok(TT::NAME).map(Name::from).parse(input)
}

// # EXPRESSIONS
// # ===========

// expression:
//     | term (('+' | '-') term)*
fn expression(input: ParserInput) -> ParseResult<Expression> {
    pair(term, zero_or_more(pair(additive, term)))
        .map(|(head, tail)| fold_left(head, tail))
        .parse(input)
}

fn additive(input: ParserInput) -> ParseResult<(Operator, Span)> {
    tok(TT::PLUS)
        .map(|t| (Operator::Plus, t.span))
        .or(tok(TT::MINUS).map(|t| (Operator::Minus, t.span)))
        .parse(input)
}

// term:
//     | factor (('*' | '/') factor)*
fn term(input: ParserInput) -> ParseResult<Expression> {
    pair(factor, zero_or_more(pair(multiplicative, factor)))
        .map(|(head, tail)| fold_left(head, tail))
        .parse(input)
}

fn multiplicative(input: ParserInput) -> ParseResult<(Operator, Span)> {
    tok(TT::STAR)
        .map(|t| (Operator::Times, t.span))
        .or(tok(TT::SLASH).map(|t| (Operator::Divide, t.span)))
        .parse(input)
}

// factor:
//     | literal
//     | NAME
//     | list
//     | dict
//     | group
fn factor(input: ParserInput) -> ParseResult<Expression> {
    literal
        .or(name.map(Expression::Name))
        .or(list)
        .or(dict)
        .or(group)
        .parse(input)
}

// literal:
//     | INTEGER
//     | FLOAT
//     | STRING
//     | BOOLEAN
fn literal(input: ParserInput) -> ParseResult<Expression> {
    tok(TT::INTEGER)
        .or(tok(TT::FLOAT))
        .or(tok(TT::STRING))
        .or(tok(TT::BOOLEAN))
        .parse(input)
        .and_then(into_literal)
}

fn string(input: ParserInput) -> ParseResult<Expression> {
    tok(TT::STRING).parse(input).and_then(into_literal)
}

fn into_literal((token, rest): (Token, ParserInput)) -> ParseResult<Expression> {
    match token.value {
        Some(value) => ParseResult::Ok((Expression::Literal(value, token.span), rest)),
        None => ParseResult::Err,
    }
}

// group: '(' expression ')'
fn group(input: ParserInput) -> ParseResult<Expression> {
    nested(TT::LPAR, left(expression, tok(TT::RPAR)))
        .map(|(_, inner)| inner)
        .parse(input)
}

// # Lists
// # -----

// list:
//     | '[' [','.expression+] ']'
fn list(input: ParserInput) -> ParseResult<Expression> {
    nested(
        TT::LSQB,
        pair(maybe(sep_by(expression, TT::COMMA)), tok(TT::RSQB)),
    )
    .map(|(open, (elements, close))| {
        Expression::List(elements.unwrap_or_default(), open.span.till(&close))
    })
    .parse(input)
}

// # Dicts
// # -----

// dict:
//     | '{' [','.kvpair+] '}'
fn dict(input: ParserInput) -> ParseResult<Expression> {
    nested(
        TT::LBRACE,
        pair(maybe(sep_by(kvpair, TT::COMMA)), tok(TT::RBRACE)),
    )
    .map(|(open, (pairs, close))| Expression::Dict(pairs.unwrap_or_default(), open.span.till(&close)))
    .parse(input)
}

// kvpair: STRING ':' expression
fn kvpair(input: ParserInput) -> ParseResult<(Expression, Expression)> {
    pair(left(string, tok(TT::COLON)), expression).parse(input)
}
