//! Diagnostics shared by the scanner and the parser.

use std::error;
use std::fmt;
use std::ops::Deref;

use thiserror::Error;

use crate::token::{Lexeme, Token};

/// Line number (starting at one).
pub type Position = u32;

/// Where on its line a syntax error was detected.
#[derive(Debug, PartialEq, Clone)]
pub enum Location {
    /// Scanner errors are only known by line.
    Line,
    AtEnd,
    At(String),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line => Ok(()),
            Location::AtEnd => write!(f, " at end"),
            Location::At(lexeme) => write!(f, " at '{}'", lexeme),
        }
    }
}

/// A lexical or syntactic error.
#[derive(Debug, PartialEq, Clone, Error)]
#[error("[line {pos}] Error{location}: {message}")]
pub struct SyntaxError {
    pub pos: Position,
    pub location: Location,
    pub message: String,
}

impl SyntaxError {
    pub fn at_line(pos: Position, message: impl Into<String>) -> SyntaxError {
        SyntaxError {
            pos,
            location: Location::Line,
            message: message.into(),
        }
    }

    pub fn at_lexeme(lexeme: &Lexeme, message: impl Into<String>) -> SyntaxError {
        let location = match lexeme.token {
            Token::Eof => Location::AtEnd,
            _ => Location::At(lexeme.text.clone()),
        };
        SyntaxError {
            pos: lexeme.line,
            location,
            message: message.into(),
        }
    }
}

/// Every syntax error reported for one input, in source order.
#[derive(Debug, PartialEq, Clone)]
pub struct SyntaxErrors(pub Vec<SyntaxError>);

impl Deref for SyntaxErrors {
    type Target = [SyntaxError];

    fn deref(&self) -> &[SyntaxError] {
        &self.0
    }
}

impl fmt::Display for SyntaxErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

impl error::Error for SyntaxErrors {}

impl From<Vec<SyntaxError>> for SyntaxErrors {
    fn from(errors: Vec<SyntaxError>) -> SyntaxErrors {
        SyntaxErrors(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_error_has_no_location() {
        assert_eq!(
            SyntaxError::at_line(3, "Unexpected character @.").to_string(),
            "[line 3] Error: Unexpected character @."
        );
    }

    #[test]
    fn error_at_lexeme() {
        let lexeme = Lexeme::new(Token::Semicolon, ";", 2);
        assert_eq!(
            SyntaxError::at_lexeme(&lexeme, "Expect expression.").to_string(),
            "[line 2] Error at ';': Expect expression."
        );
    }

    #[test]
    fn error_at_end() {
        assert_eq!(
            SyntaxError::at_lexeme(&Lexeme::eof(1), "Expect ';' after value.").to_string(),
            "[line 1] Error at end: Expect ';' after value."
        );
    }

    #[test]
    fn several_errors_one_per_line() {
        let errors = SyntaxErrors(vec![
            SyntaxError::at_line(1, "Unexpected character ?."),
            SyntaxError::at_lexeme(&Lexeme::eof(2), "Expect expression."),
        ]);
        assert_eq!(
            errors.to_string(),
            "[line 1] Error: Unexpected character ?.\n[line 2] Error at end: Expect expression."
        );
    }
}
