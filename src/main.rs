use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use kex::{Session, Step};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};

const PROMPT: &str = "kex> ";
const CONTINUATION_PROMPT: &str = "...  ";
#[cfg(feature = "with-file-history")]
const HISTORY_FILE: &str = ".kex_history";

struct Options {
    script: Option<String>,
    trace: bool,
}

impl Options {
    fn from_args(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut options = Options {
            script: None,
            trace: false,
        };
        for arg in args {
            if arg == "--trace" {
                options.trace = true;
            } else if arg.starts_with("--") {
                return Err(format!("Unknown option {arg}."));
            } else if options.script.is_none() {
                options.script = Some(arg);
            } else {
                return Err(format!("Unexpected argument {arg}."));
            }
        }
        Ok(options)
    }
}

fn main() -> Result<(), String> {
    let options = Options::from_args(std::env::args().skip(1))?;
    let session = Session::new().with_trace(options.trace);
    match options.script {
        Some(filename) => run_script(&filename, session)?,
        None => run_repl(session).map_err(|err| err.to_string())?,
    }
    Ok(())
}

fn echo(step: Step) {
    if let Step::Done(outcome) = step {
        if let Some(value) = outcome.echo() {
            println!("{value}");
        }
    }
}

fn run_script(filename: &str, mut session: Session) -> Result<(), String> {
    let lines = read_lines(filename)
        .map_err(|_| format!("{filename} not found. No such file or directory."))?;
    for (lineno, line) in lines.enumerate() {
        let line = line.map_err(|err| err.to_string())?;
        match session.feed(&line) {
            Ok(step) => echo(step),
            Err(err) => return Err(format!("{filename}, line {}: {err}", lineno + 1)),
        }
    }
    match session.finish() {
        Ok(step) => echo(step),
        Err(err) => return Err(format!("{filename}, end of file: {err}")),
    }
    Ok(())
}

fn run_repl(mut session: Session) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    #[cfg(feature = "with-file-history")]
    if rl.load_history(HISTORY_FILE).is_err() {
        println!("No previous history.");
    }
    println!("Welcome to Kex! Type 'exit' to quit.");
    loop {
        let prompt = if session.is_pending() {
            CONTINUATION_PROMPT
        } else {
            PROMPT
        };
        match rl.readline(prompt) {
            Ok(line) => {
                if !session.is_pending() && line.trim().eq_ignore_ascii_case("exit") {
                    break;
                }
                if !line.trim().is_empty() {
                    rl.add_history_entry(line.as_str())?;
                }
                match session.feed(&line) {
                    Ok(step) => echo(step),
                    Err(err) => println!("Error: {err}"),
                }
            }
            Err(ReadlineError::Interrupted) if session.is_pending() => {
                session.reset();
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    #[cfg(feature = "with-file-history")]
    rl.save_history(HISTORY_FILE)?;
    println!("Goodbye!");
    Ok(())
}

fn read_lines<P>(filename: P) -> io::Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}
