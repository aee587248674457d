//! Code generation errors
//!
//! Resolution failures and constructs outside the supported subset. Broken
//! internal invariants are not represented here; those panic.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Unbound identifier '{name}'")]
    UnboundIdentifier { name: String },

    #[error("Redefinition of '{name}'")]
    Redefinition { name: String },

    #[error("Unsupported construct: {construct}")]
    Unsupported { construct: String },

    #[error("Ran out of scratch registers in function '{function}'")]
    OutOfRegisters { function: String },

    #[error("Failed to write assembly: {0}")]
    Io(#[from] std::io::Error),
}

impl CodegenError {
    pub fn unsupported(construct: impl Into<String>) -> Self {
        CodegenError::Unsupported {
            construct: construct.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_offender() {
        let err = CodegenError::UnboundIdentifier { name: "x".to_string() };
        assert_eq!(err.to_string(), "Unbound identifier 'x'");

        let err = CodegenError::unsupported("statement after return");
        assert_eq!(err.to_string(), "Unsupported construct: statement after return");
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: CodegenError = io.into();
        assert!(matches!(err, CodegenError::Io(_)));
    }
}
