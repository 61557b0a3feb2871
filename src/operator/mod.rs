// ABOUTME: Operator I/O seam: blocking questions, answers and informational lines.
// ABOUTME: Defines the Operator trait, yes/no parsing, and the stdin/stdout implementation.

use std::io::{self, BufRead, Write};
use thiserror::Error;

/// Characters that make an answer affirmative when they lead it.
pub const AFFIRMATIVE: [char; 2] = ['y', 'Y'];

/// Errors reading from the operator.
#[derive(Debug, Error)]
pub enum OperatorError {
    /// Input was closed before an answer arrived.
    #[error("operator input closed")]
    Closed,

    #[error("failed to read operator input: {0}")]
    Io(#[from] io::Error),
}

/// Outcome of a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

impl Confirmation {
    /// An answer is `Yes` iff its first character is in [`AFFIRMATIVE`].
    /// Everything else, including the empty answer, is `No`.
    pub fn parse(answer: &str) -> Self {
        match answer.chars().next() {
            Some(c) if AFFIRMATIVE.contains(&c) => Confirmation::Yes,
            _ => Confirmation::No,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Confirmation::Yes
    }
}

/// The human running the release.
///
/// All methods block until the operator responds; there is no timeout.
pub trait Operator {
    /// Ask a free-text question and return the answer without its line ending.
    fn ask(&self, question: &str) -> Result<String, OperatorError>;

    /// Show an informational line.
    fn tell(&self, message: &str);

    /// Ask a yes/no question.
    fn confirm(&self, question: &str) -> Result<Confirmation, OperatorError> {
        self.ask(&format!("{question} [y/N] "))
            .map(|answer| Confirmation::parse(&answer))
    }
}

/// Operator on the process's terminal: prompts on stdout, answers from stdin.
#[derive(Debug, Default)]
pub struct ConsoleOperator;

impl Operator for ConsoleOperator {
    fn ask(&self, question: &str) -> Result<String, OperatorError> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question}")?;
        stdout.flush()?;
        drop(stdout);

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            return Err(OperatorError::Closed);
        }

        Ok(strip_line_ending(&line).to_string())
    }

    fn tell(&self, message: &str) {
        println!("{message}");
    }
}

/// Drop a trailing `\n` or `\r\n`, keeping any other whitespace the operator typed.
fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_y_is_affirmative() {
        assert_eq!(Confirmation::parse("y"), Confirmation::Yes);
        assert_eq!(Confirmation::parse("Y"), Confirmation::Yes);
        assert_eq!(Confirmation::parse("yes please"), Confirmation::Yes);
        assert_eq!(Confirmation::parse("Yikes"), Confirmation::Yes);
    }

    #[test]
    fn anything_else_is_negative() {
        assert_eq!(Confirmation::parse(""), Confirmation::No);
        assert_eq!(Confirmation::parse("n"), Confirmation::No);
        assert_eq!(Confirmation::parse(" y"), Confirmation::No);
        assert_eq!(Confirmation::parse("ok"), Confirmation::No);
    }

    #[test]
    fn line_endings_are_stripped() {
        assert_eq!(strip_line_ending("y\n"), "y");
        assert_eq!(strip_line_ending("42\r\n"), "42");
        assert_eq!(strip_line_ending(" n \n"), " n ");
    }
}
