use thiserror::Error;

use super::ValueKind;
use crate::parser::{Location, Operator};

/// Errors raised while evaluating a parsed statement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("name '{name}' is not defined at {location}")]
    UndefinedVariable { name: String, location: Location },
    #[error("unsupported operand types for {operator}: '{left}' and '{right}' at {location}")]
    TypeMismatch {
        operator: Operator,
        left: ValueKind,
        right: ValueKind,
        location: Location,
    },
    #[error("division by zero at {location}")]
    DivisionByZero { location: Location },
    #[error("integer overflow in {operator} at {location}")]
    IntegerOverflow { operator: Operator, location: Location },
    #[error("dictionary keys must be strings, found {kind} at {location}")]
    InvalidKey { kind: ValueKind, location: Location },
}
