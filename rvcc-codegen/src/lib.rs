//! RISC-V C Compiler - Code Generation Backend
//!
//! Walks the AST and writes RISC-V assembly text. It includes:
//!
//! - Assembly instruction model
//! - ABI implementation (calling convention, stack frames)
//! - The compilation `Context` (symbols, frame, scratch registers, labels)
//! - `EmitAssembly` for every node kind

pub mod abi;
pub mod asm;
pub mod context;
pub mod emit;
pub mod error;

pub use abi::{CallingConvention, Frame, Target};
pub use asm::{AsmInst, Reg};
pub use context::{Context, Location};
pub use emit::EmitAssembly;
pub use error::CodegenError;

use log::debug;
use rvcc_frontend::Node;
use std::io::Write;

/// Code generation options
#[derive(Debug, Clone, Copy, Default)]
pub struct CodegenOptions {
    pub target: Target,
}

/// Emit assembly for a whole translation unit using a fresh `Context`
pub fn emit_program(root: &Node, out: &mut dyn Write, options: &CodegenOptions) -> Result<(), CodegenError> {
    debug!("emitting {} for {:?}", root.kind_name(), options.target);
    let mut ctx = Context::new(options.target);
    root.emit_assembly(out, &mut ctx)
}

/// Main entry point for code generation
pub fn generate_assembly(root: &Node, options: &CodegenOptions) -> Result<String, CodegenError> {
    let mut out = Vec::new();
    emit_program(root, &mut out, options)?;
    String::from_utf8(out).map_err(|err| {
        CodegenError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    })
}
