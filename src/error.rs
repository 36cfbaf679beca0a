use thiserror::Error;

use crate::interpreter::EvalError;
use crate::parser::{LexError, ParseError};

/// A failure of one statement, tagged with the stage that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KexError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}
