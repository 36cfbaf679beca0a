use thiserror::Error;

use super::locations::Location;

/// Errors raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unterminated string starting at {0}")]
    UnterminatedString(Location),
    #[error("unterminated comment starting at {0}")]
    UnterminatedComment(Location),
    #[error("invalid character '{0}' at {1}")]
    InvalidCharacter(char, Location),
    #[error("integer literal {0} is too large at {1}")]
    IntegerOverflow(String, Location),
    #[error("float literal {0} is out of range at {1}")]
    FloatOverflow(String, Location),
}

impl LexError {
    pub fn location(&self) -> Location {
        match self {
            Self::UnterminatedString(loc)
            | Self::UnterminatedComment(loc)
            | Self::InvalidCharacter(_, loc)
            | Self::IntegerOverflow(_, loc)
            | Self::FloatOverflow(_, loc) => *loc,
        }
    }
}

/// Errors raised while building a statement from tokens. Parsing stops at the
/// first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected token '{found}' at {location}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        location: Location,
    },
    #[error("unexpected end of input at {location}, expected {expected}")]
    UnexpectedEndOfInput { expected: String, location: Location },
}

impl ParseError {
    pub fn location(&self) -> Location {
        match self {
            Self::UnexpectedToken { location, .. } | Self::UnexpectedEndOfInput { location, .. } => {
                *location
            }
        }
    }
}
