//! RISC-V C Compiler - Common Types and Utilities
//!
//! Shared source-location tracking and the error type every compiler
//! phase reports through.

pub mod error;
pub mod source_loc;

pub use error::{CompilerError, CompilerResult};
pub use source_loc::{SourceLocation, SourceSpan};
