use super::{EvalError, Value};
use crate::parser::{Location, Operator};

/// Applies a binary operator to two evaluated operands.
///
/// Two integers stay integers for `+`, `-` and `*`; any other numeric pair is
/// computed in floating point. `/` always produces a float. `+` also
/// concatenates two strings. Everything else is a type mismatch.
pub(super) fn apply(
    operator: Operator,
    left: Value,
    right: Value,
    location: Location,
) -> Result<Value, EvalError> {
    match operator {
        Operator::Plus => match (left, right) {
            (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
            (l, r) => arithmetic(operator, &l, &r, location, i64::checked_add, |x, y| x + y),
        },
        Operator::Minus => {
            arithmetic(operator, &left, &right, location, i64::checked_sub, |x, y| x - y)
        }
        Operator::Times => {
            arithmetic(operator, &left, &right, location, i64::checked_mul, |x, y| x * y)
        }
        Operator::Divide => divide(&left, &right, location),
    }
}

fn arithmetic(
    operator: Operator,
    left: &Value,
    right: &Value,
    location: Location,
    on_integers: fn(i64, i64) -> Option<i64>,
    on_floats: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    if let (Value::Integer(l), Value::Integer(r)) = (left, right) {
        return on_integers(*l, *r)
            .map(Value::Integer)
            .ok_or(EvalError::IntegerOverflow { operator, location });
    }
    match (left.as_float(), right.as_float()) {
        (Some(x), Some(y)) => Ok(Value::Float(on_floats(x, y))),
        _ => Err(mismatch(operator, left, right, location)),
    }
}

fn divide(left: &Value, right: &Value, location: Location) -> Result<Value, EvalError> {
    match (left.as_float(), right.as_float()) {
        (Some(_), Some(y)) if y == 0.0 => Err(EvalError::DivisionByZero { location }),
        (Some(x), Some(y)) => Ok(Value::Float(x / y)),
        _ => Err(mismatch(Operator::Divide, left, right, location)),
    }
}

fn mismatch(operator: Operator, left: &Value, right: &Value, location: Location) -> EvalError {
    EvalError::TypeMismatch {
        operator,
        left: left.kind(),
        right: right.kind(),
        location,
    }
}
