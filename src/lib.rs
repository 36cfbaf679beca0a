mod error;
pub use error::KexError;

mod parser;
pub use parser::{
    parse, parse_statement, tokenize, Expression, LexError, Locatable, Location, Name, Operator,
    ParseError, Span, Statement, Token, TokenType, Tokenizer, TokenizerState,
};

mod interpreter;
pub use interpreter::{evaluate, evaluate_expr, EvalError, Outcome, SymbolTable, Value, ValueKind};

mod session;
pub use session::{Session, Step};
