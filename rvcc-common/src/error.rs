//! Error handling for the RISC-V C compiler
//!
//! `CompilerError` covers every failure that happens before code
//! generation starts: reading the source, lexing and parsing it.

use crate::source_loc::SourceLocation;
use thiserror::Error;

pub type CompilerResult<T> = Result<T, CompilerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("Lexical error at {location}: {message}")]
    LexError {
        location: SourceLocation,
        message: String,
    },

    #[error("Parse error at {location}: {message}")]
    ParseError {
        location: SourceLocation,
        message: String,
    },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CompilerError {
    pub fn lexer_error(message: impl Into<String>, location: SourceLocation) -> Self {
        CompilerError::LexError {
            location,
            message: message.into(),
        }
    }

    pub fn parse_error(message: impl Into<String>, location: SourceLocation) -> Self {
        CompilerError::ParseError {
            location,
            message: message.into(),
        }
    }

    /// True for failures caused by the source text itself
    pub fn is_input_error(&self) -> bool {
        matches!(self, CompilerError::LexError { .. } | CompilerError::ParseError { .. })
    }
}

impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}
