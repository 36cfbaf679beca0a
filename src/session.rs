use crate::error::KexError;
use crate::interpreter::{evaluate, Outcome, SymbolTable};
use crate::parser::{parse, tokenize, Token, Tokenizer, TokenizerState};

/// Result of feeding one line to a [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A block comment or a bracket is still open, more lines are needed.
    Incomplete,
    /// The statement contained no tokens.
    Empty,
    Done(Outcome),
}

/// One interactive session: a symbol table plus the lines of a statement that
/// is still being typed. Each statement runs through tokenizer, parser and
/// evaluator in turn and stops at the first error; nothing is bound unless the
/// whole statement succeeded.
#[derive(Debug, Default)]
pub struct Session {
    symbols: SymbolTable,
    tokenizer: Tokenizer,
    pending: bool,
    trace: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dumps tokens and the parsed statement to stderr before evaluating.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// True while a statement spans several lines and is not complete yet.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Runs `source` as a single statement. Returns `None` if it holds
    /// nothing but whitespace and comments.
    pub fn run(&mut self, source: &str) -> Result<Option<Outcome>, KexError> {
        let tokens = tokenize(source)?;
        self.execute(&tokens)
    }

    /// Adds one line to the pending statement and runs it once it is complete.
    pub fn feed(&mut self, line: &str) -> Result<Step, KexError> {
        match self.tokenizer.tokenize(std::iter::once(line)) {
            TokenizerState::ContinuationNeeded => {
                self.pending = true;
                Ok(Step::Incomplete)
            }
            TokenizerState::Error(e) => {
                self.reset();
                Err(e.into())
            }
            TokenizerState::Ok => self.complete(),
        }
    }

    /// Runs whatever is pending as if input ended here. Open comments become
    /// errors, open brackets are left to the parser to report.
    pub fn finish(&mut self) -> Result<Step, KexError> {
        if !self.pending {
            return Ok(Step::Empty);
        }
        self.complete()
    }

    /// Drops the pending statement. The symbol table is kept.
    pub fn reset(&mut self) {
        self.tokenizer = Tokenizer::new();
        self.pending = false;
    }

    fn complete(&mut self) -> Result<Step, KexError> {
        let tokens = std::mem::take(&mut self.tokenizer).finalize();
        self.pending = false;
        match self.execute(&tokens?)? {
            Some(outcome) => Ok(Step::Done(outcome)),
            None => Ok(Step::Empty),
        }
    }

    fn execute(&mut self, tokens: &[Token]) -> Result<Option<Outcome>, KexError> {
        if tokens.is_empty() {
            return Ok(None);
        }
        if self.trace {
            eprintln!("Tokens:");
            for token in tokens.iter() {
                eprintln!("  {}", token);
            }
        }
        let statement = parse(tokens)?;
        if self.trace {
            eprintln!("Parsed result:\n  {:?}", statement);
        }
        Ok(Some(evaluate(&statement, &mut self.symbols)?))
    }
}
