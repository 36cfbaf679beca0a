use indexmap::IndexMap;

use crate::parser::{Expression, Locatable, Statement};

mod error;
mod operators;
mod symbols;
mod value;

pub use error::EvalError;
pub use symbols::SymbolTable;
pub use value::{Value, ValueKind};

/// What a successfully evaluated statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Value(Value),
    Assigned(String, Value),
}

impl Outcome {
    pub fn value(&self) -> &Value {
        match self {
            Self::Value(v) | Self::Assigned(_, v) => v,
        }
    }

    /// The value an interactive driver should print; assignments print
    /// nothing.
    pub fn echo(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Assigned(..) => None,
        }
    }
}

/// Evaluates one statement against `table`.
///
/// An assignment binds its name only after the right-hand side evaluated
/// without error, so a failing statement leaves the table untouched.
pub fn evaluate(statement: &Statement, table: &mut SymbolTable) -> Result<Outcome, EvalError> {
    match statement {
        Statement::Assignment(name, expr) => {
            let value = evaluate_expr(expr, table)?;
            table.set(name.as_str(), value.clone());
            Ok(Outcome::Assigned(name.as_str().to_string(), value))
        }
        Statement::Expression(expr) => evaluate_expr(expr, table).map(Outcome::Value),
    }
}

/// Evaluates an expression. Operands and container elements are evaluated
/// left to right, the first error wins.
pub fn evaluate_expr(expression: &Expression, table: &SymbolTable) -> Result<Value, EvalError> {
    match expression {
        Expression::Literal(value, _) => Ok(value.clone()),
        Expression::Name(name) => {
            table
                .get(name.as_str())
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable {
                    name: name.as_str().to_string(),
                    location: name.span().start,
                })
        }
        Expression::BinaryOperation(..) => {
            // The left spine is walked with a loop, recursion only follows
            // right operands, whose depth is bounded by bracket nesting.
            let mut chain = Vec::new();
            let mut first = expression;
            while let Expression::BinaryOperation(op, operands, span) = first {
                chain.push((*op, &operands.1, span.start));
                first = &operands.0;
            }
            let mut value = evaluate_expr(first, table)?;
            for (op, operand, location) in chain.into_iter().rev() {
                let right = evaluate_expr(operand, table)?;
                value = operators::apply(op, value, right, location)?;
            }
            Ok(value)
        }
        Expression::List(elements, _) => elements
            .iter()
            .map(|element| evaluate_expr(element, table))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Expression::Dict(pairs, _) => {
            let mut entries = IndexMap::with_capacity(pairs.len());
            for (key_expr, value_expr) in pairs {
                let key = match evaluate_expr(key_expr, table)? {
                    Value::String(key) => key,
                    other => {
                        return Err(EvalError::InvalidKey {
                            kind: other.kind(),
                            location: key_expr.span().start,
                        })
                    }
                };
                let value = evaluate_expr(value_expr, table)?;
                entries.insert(key, value);
            }
            Ok(Value::Dictionary(entries))
        }
    }
}
