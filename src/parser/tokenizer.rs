use super::error::LexError;
use super::locations::{Location, Span};
use crate::interpreter::Value;
use const_format::concatcp;
use derivative::Derivative;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Clone, Debug, Derivative)]
#[derivative(PartialEq)]
pub struct Token {
    pub(crate) typ: TokenType,
    pub(crate) lexeme: String,
    pub(crate) value: Option<Value>,
    #[derivative(PartialEq = "ignore")]
    pub(crate) span: Span,
}

impl Token {
    pub fn typ(&self) -> TokenType {
        self.typ
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// The decoded literal for integer, float, string and boolean tokens.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}('{}')", self.typ, self.lexeme)
    }
}

#[allow(non_camel_case_types)]
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenType {
    INTEGER,
    FLOAT,
    STRING,
    BOOLEAN,
    NAME,
    EQUAL,
    PLUS,
    MINUS,
    STAR,
    SLASH,
    LPAR,
    RPAR,
    LSQB,
    RSQB,
    LBRACE,
    RBRACE,
    COLON,
    COMMA,
}

impl TokenType {
    /// How the token kind is named in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::INTEGER => "integer",
            Self::FLOAT => "float",
            Self::STRING => "string",
            Self::BOOLEAN => "boolean",
            Self::NAME => "identifier",
            Self::EQUAL => "'='",
            Self::PLUS => "'+'",
            Self::MINUS => "'-'",
            Self::STAR => "'*'",
            Self::SLASH => "'/'",
            Self::LPAR => "'('",
            Self::RPAR => "')'",
            Self::LSQB => "'['",
            Self::RSQB => "']'",
            Self::LBRACE => "'{'",
            Self::RBRACE => "'}'",
            Self::COLON => "':'",
            Self::COMMA => "','",
        }
    }
}

const EQUAL: (&str, TokenType) = ("=", TokenType::EQUAL);
const PLUS: (&str, TokenType) = ("+", TokenType::PLUS);
const MINUS: (&str, TokenType) = ("-", TokenType::MINUS);
const STAR: (&str, TokenType) = ("*", TokenType::STAR);
const SLASH: (&str, TokenType) = ("/", TokenType::SLASH);
const LPAR: (&str, TokenType) = ("(", TokenType::LPAR);
const RPAR: (&str, TokenType) = (")", TokenType::RPAR);
const LSQB: (&str, TokenType) = ("[", TokenType::LSQB);
const RSQB: (&str, TokenType) = ("]", TokenType::RSQB);
const LBRACE: (&str, TokenType) = ("{", TokenType::LBRACE);
const RBRACE: (&str, TokenType) = ("}", TokenType::RBRACE);
const COLON: (&str, TokenType) = (":", TokenType::COLON);
const COMMA: (&str, TokenType) = (",", TokenType::COMMA);

const SIMPLE_TOKENS: [(&str, TokenType); 13] = [
    EQUAL, PLUS, MINUS, STAR, SLASH, LPAR, RPAR, LSQB, RSQB, LBRACE, RBRACE, COLON, COMMA,
];

macro_rules! alternative {
    ($t:expr) => {{
        $t
    }};
    ($t:expr, $($ts:expr),+) => {{
        concatcp!($t, "|", alternative!($($ts),+))
    }}
}

macro_rules! group {
    ($($ts:expr),+) => {{
        concatcp!(r"(", alternative!($($ts),+), ")")
    }}
}

const S_WHITESPACE: &str = r"^\s+";
const S_LINE_COMMENT: &str = r"^//";
const S_BLOCK_COMMENT_START: &str = r"^/\*";
const S_BLOCK_COMMENT_END: &str = r"\*/";
const S_DIGITS: &str = r"[0-9]+";
const S_INTEGER: &str = concatcp!("^", S_DIGITS);
const S_FLOAT: &str = concatcp!("^", S_DIGITS, r"\.", S_DIGITS);
const S_BOOLEAN: &str = concatcp!("^", group!("true", "false"), r"\b");
const S_NAME: &str = r"^[_\p{L}][_\p{L}\p{N}]*";
const S_STRING: &str = r#"^"[^"]*""#;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_WHITESPACE).expect("Error compiling regex."));
static LINE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_LINE_COMMENT).expect("Error compiling regex."));
static BLOCK_COMMENT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_BLOCK_COMMENT_START).expect("Error compiling regex."));
static BLOCK_COMMENT_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(S_BLOCK_COMMENT_END).expect("Error compiling regex."));
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(S_INTEGER).expect("Error compiling regex."));
static FLOAT: Lazy<Regex> = Lazy::new(|| Regex::new(S_FLOAT).expect("Error compiling regex."));
static BOOLEAN: Lazy<Regex> = Lazy::new(|| Regex::new(S_BOOLEAN).expect("Error compiling regex."));
static NAME: Lazy<Regex> = Lazy::new(|| Regex::new(S_NAME).expect("Error compiling regex."));
static STRING: Lazy<Regex> = Lazy::new(|| Regex::new(S_STRING).expect("Error compiling regex."));

/// Line-at-a-time tokenizer. State that outlives a line (an open block
/// comment, unbalanced brackets, the line counter) is kept between calls to
/// [`Tokenizer::tokenize`] so a statement may span several lines.
#[derive(Debug, Default)]
pub struct Tokenizer {
    tokens: Vec<Token>,
    start: usize,
    line: usize,
    paren_lvl: isize,
    in_comment: Option<Location>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokenize<S: AsRef<str>>(&mut self, input: impl Iterator<Item = S>) -> TokenizerState {
        for line in input {
            self.line += 1;
            if let Err(e) = self.tokenize_line(line.as_ref()) {
                return TokenizerState::Error(e);
            }
        }
        if self.in_comment.is_some() || self.paren_lvl > 0 {
            return TokenizerState::ContinuationNeeded;
        }
        TokenizerState::Ok
    }

    /// Hands out the collected tokens. Fails if a block comment is still open.
    pub fn finalize(self) -> Result<Vec<Token>, LexError> {
        match self.in_comment {
            Some(start) => Err(LexError::UnterminatedComment(start)),
            None => Ok(self.tokens),
        }
    }

    fn tokenize_line(&mut self, line: &str) -> Result<(), LexError> {
        self.start = 0;

        while self.start < line.len() {
            let rest = &line[self.start..];
            if self.in_comment.is_some() {
                match BLOCK_COMMENT_END.find(rest) {
                    Some(m) => {
                        self.in_comment = None;
                        self.start += m.end();
                        continue;
                    }
                    None => break,
                }
            }

            if let Some(m) = WHITESPACE.find(rest) {
                self.start += m.end();
                continue;
            }
            if LINE_COMMENT.is_match(rest) {
                break;
            }
            if let Some(m) = BLOCK_COMMENT_START.find(rest) {
                self.in_comment = Some(self.location());
                self.start += m.end();
                continue;
            }

            if self.find_by_regex(&FLOAT, TokenType::FLOAT, rest)? {
                continue;
            }
            if self.find_by_regex(&INTEGER, TokenType::INTEGER, rest)? {
                continue;
            }
            if self.find_by_regex(&BOOLEAN, TokenType::BOOLEAN, rest)? {
                continue;
            }
            if self.find_by_regex(&NAME, TokenType::NAME, rest)? {
                continue;
            }
            if rest.starts_with('"') {
                if self.find_by_regex(&STRING, TokenType::STRING, rest)? {
                    continue;
                }
                return Err(LexError::UnterminatedString(self.location()));
            }
            if self.find_simple(rest) {
                continue;
            }

            return match rest.chars().next() {
                Some(chr) => Err(LexError::InvalidCharacter(chr, self.location())),
                None => Ok(()),
            };
        }
        Ok(())
    }

    fn location(&self) -> Location {
        Location::new(self.line, self.start + 1)
    }

    fn push(&mut self, typ: TokenType, lexeme: String, value: Option<Value>, len: usize) {
        let span = Span::new(self.line, self.start + 1, self.line, self.start + len + 1);
        self.tokens.push(Token {
            typ,
            lexeme,
            value,
            span,
        });
        self.start += len;
    }

    fn find_simple(&mut self, rest: &str) -> bool {
        for (lexeme, tok_type) in SIMPLE_TOKENS {
            if rest.starts_with(lexeme) {
                match tok_type {
                    TokenType::LPAR | TokenType::LSQB | TokenType::LBRACE => self.paren_lvl += 1,
                    TokenType::RPAR | TokenType::RSQB | TokenType::RBRACE => self.paren_lvl -= 1,
                    _ => {}
                }
                self.push(tok_type, lexeme.to_string(), None, lexeme.len());
                return true;
            }
        }
        false
    }

    fn find_by_regex(
        &mut self,
        regex: &Regex,
        token_type: TokenType,
        rest: &str,
    ) -> Result<bool, LexError> {
        if let Some(m) = regex.find(rest) {
            let text = m.as_str();
            let value = match token_type {
                TokenType::INTEGER => match text.parse::<i64>() {
                    Ok(n) => Some(Value::Integer(n)),
                    Err(_) => {
                        return Err(LexError::IntegerOverflow(text.to_string(), self.location()))
                    }
                },
                TokenType::FLOAT => match text.parse::<f64>() {
                    Ok(x) if x.is_finite() => Some(Value::Float(x)),
                    _ => return Err(LexError::FloatOverflow(text.to_string(), self.location())),
                },
                TokenType::BOOLEAN => Some(Value::Boolean(text == "true")),
                // quotes are not part of the value
                TokenType::STRING => Some(Value::String(text[1..text.len() - 1].to_string())),
                _ => None,
            };
            self.push(token_type, text.to_string(), value, m.end());
            return Ok(true);
        }
        Ok(false)
    }
}

/// Where the tokenizer stands after a batch of lines.
#[derive(Debug, PartialEq)]
pub enum TokenizerState {
    Ok,
    ContinuationNeeded,
    Error(LexError),
}

/// Tokenizes a complete source text in one go.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new();
    if let TokenizerState::Error(e) = tokenizer.tokenize(source.lines()) {
        return Err(e);
    }
    tokenizer.finalize()
}
