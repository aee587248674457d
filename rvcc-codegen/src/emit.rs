//! Assembly emission
//!
//! `EmitAssembly` is implemented for `Node` and for each of its variants.
//! Dispatch on `Node` is an exhaustive match, so a new node kind does not
//! compile until it knows how to emit itself.

use crate::abi::CallingConvention;
use crate::asm::{fits_imm12, AsmInst, Directive, Width};
use crate::context::{Context, Location};
use crate::error::CodegenError;
use log::debug;
use rvcc_frontend::{
    DirectDeclarator, FunctionDefinition, Identifier, IntConstant, Node, NodeList, ReturnStatement,
};
use std::io::Write;

pub trait EmitAssembly {
    /// Write complete assembly lines for this node to `out`
    fn emit_assembly(&self, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError>;
}

/// Write one instruction, indenting everything but labels and directives
pub fn write_inst(out: &mut dyn Write, inst: &AsmInst) -> Result<(), CodegenError> {
    if inst.is_flush_left() {
        writeln!(out, "{}", inst)?;
    } else {
        writeln!(out, "    {}", inst)?;
    }
    Ok(())
}

fn write_all(out: &mut dyn Write, code: &[AsmInst]) -> Result<(), CodegenError> {
    for inst in code {
        write_inst(out, inst)?;
    }
    Ok(())
}

impl EmitAssembly for Node {
    fn emit_assembly(&self, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError> {
        match self {
            Node::Identifier(node) => node.emit_assembly(out, ctx),
            Node::IntConstant(node) => node.emit_assembly(out, ctx),
            Node::ReturnStatement(node) => node.emit_assembly(out, ctx),
            Node::DirectDeclarator(node) => node.emit_assembly(out, ctx),
            Node::FunctionDefinition(node) => node.emit_assembly(out, ctx),
            Node::NodeList(node) => node.emit_assembly(out, ctx),
        }
    }
}

/// An identifier in declarator position: the bare name, no newline
impl EmitAssembly for Identifier {
    fn emit_assembly(&self, out: &mut dyn Write, _ctx: &mut Context) -> Result<(), CodegenError> {
        write!(out, "{}", self.name())?;
        Ok(())
    }
}

/// Loads the constant into the return-value register
impl EmitAssembly for IntConstant {
    fn emit_assembly(&self, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError> {
        if !ctx.in_function() {
            return Err(CodegenError::unsupported(format!(
                "integer constant {} outside a function",
                self.value()
            )));
        }
        let value = i32::try_from(self.value()).map_err(|_| {
            CodegenError::unsupported(format!("integer constant {} does not fit in int", self.value()))
        })?;
        write_inst(out, &AsmInst::Li(CallingConvention::RETURN_VALUE, value as i64))
    }
}

/// The label naming the declared entity
impl EmitAssembly for DirectDeclarator {
    fn emit_assembly(&self, out: &mut dyn Write, _ctx: &mut Context) -> Result<(), CodegenError> {
        write_inst(out, &AsmInst::Label(self.name().to_string()))
    }
}

impl EmitAssembly for ReturnStatement {
    fn emit_assembly(&self, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError> {
        if !ctx.in_function() {
            return Err(CodegenError::unsupported("return statement outside a function"));
        }
        if let Some(expression) = self.expression() {
            emit_return_value(expression, out, ctx)?;
        }
        let epilogue = ctx.frame().gen_epilogue();
        write_all(out, &epilogue)?;
        ctx.mark_returned();
        Ok(())
    }
}

/// Place the value of a returned expression in `a0`
fn emit_return_value(expression: &Node, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError> {
    match expression {
        Node::IntConstant(constant) => constant.emit_assembly(out, ctx),
        Node::Identifier(identifier) => emit_load_identifier(identifier, out, ctx),
        other => Err(CodegenError::unsupported(format!(
            "{} as a return value",
            other.kind_name()
        ))),
    }
}

/// An identifier used as an rvalue
fn emit_load_identifier(identifier: &Identifier, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError> {
    let rv = CallingConvention::RETURN_VALUE;
    match ctx.lookup(identifier.name())? {
        Location::Stack { offset } => {
            let offset = *offset;
            let fp = CallingConvention::FRAME_PTR;
            if fits_imm12(offset as i64) {
                write_inst(out, &AsmInst::Load(Width::Word, rv, offset, fp))
            } else {
                let scratch = CallingConvention::SCRATCH;
                write_all(
                    out,
                    &[
                        AsmInst::Li(scratch, offset as i64),
                        AsmInst::Add(scratch, fp, scratch),
                        AsmInst::Load(Width::Word, rv, 0, scratch),
                    ],
                )
            }
        }
        Location::Register(reg) => write_inst(out, &AsmInst::Mv(rv, *reg)),
        Location::Function { .. } => Err(CodegenError::unsupported(format!(
            "function designator '{}' as a return value",
            identifier.name()
        ))),
    }
}

impl EmitAssembly for NodeList {
    fn emit_assembly(&self, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError> {
        for node in self.iter() {
            ctx.check_reachable()?;
            check_list_entry(node, ctx)?;
            node.emit_assembly(out, ctx)?;
        }
        Ok(())
    }
}

/// Expressions and declarators only appear inside other nodes; as a list
/// entry they would emit a stray fragment.
fn check_list_entry(node: &Node, ctx: &Context) -> Result<(), CodegenError> {
    match node {
        Node::ReturnStatement(_) | Node::NodeList(_) | Node::FunctionDefinition(_) => Ok(()),
        Node::Identifier(_) | Node::IntConstant(_) | Node::DirectDeclarator(_) => {
            let position = if ctx.in_function() {
                "a statement"
            } else {
                "a top-level item"
            };
            Err(CodegenError::unsupported(format!("{} as {}", node.kind_name(), position)))
        }
    }
}

impl EmitAssembly for FunctionDefinition {
    fn emit_assembly(&self, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError> {
        ctx.begin_function(self.name())?;

        // The prologue depends on everything the body allocates, so the body
        // is generated first.
        let mut body = Vec::new();
        let result = emit_function_body(self, &mut body, ctx);
        let frame = ctx.end_function();
        result?;

        debug!(
            "function '{}' ({}): {} byte frame",
            self.name(),
            self.type_specifier(),
            frame.total_size()
        );

        write_inst(out, &AsmInst::Directive(Directive::Text))?;
        write_inst(out, &AsmInst::Directive(Directive::Globl(self.name().to_string())))?;
        self.declarator().emit_assembly(out, ctx)?;
        write_all(out, &frame.gen_prologue())?;
        out.write_all(&body)?;
        Ok(())
    }
}

fn emit_function_body(function: &FunctionDefinition, out: &mut dyn Write, ctx: &mut Context) -> Result<(), CodegenError> {
    if let Some(body) = function.body() {
        body.emit_assembly(out, ctx)?;
    }
    if !ctx.has_returned() {
        let epilogue = ctx.frame().gen_epilogue();
        write_all(out, &epilogue)?;
        ctx.mark_returned();
    }
    Ok(())
}
