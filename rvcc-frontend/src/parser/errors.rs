//! Parse error types

use crate::lexer::Token;
use rvcc_common::{CompilerError, SourceLocation};
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: Token },

    #[error("Translation unit contains no function definitions at {location}")]
    EmptyTranslationUnit { location: SourceLocation },
}

impl From<ParseError> for CompilerError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnexpectedToken { expected, found } => CompilerError::parse_error(
                format!("Expected {}, found '{}'", expected, found.token_type),
                found.span.start,
            ),
            ParseError::EmptyTranslationUnit { location } => {
                CompilerError::parse_error("Translation unit contains no function definitions", location)
            }
        }
    }
}
