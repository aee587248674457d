//! Compilation Context
//!
//! Mutable state threaded through the emission walk: a scoped symbol table
//! mapping names to storage locations, and the per-function frame, scratch
//! register and label counters. One `Context` serves exactly one compilation.

use crate::abi::{CallingConvention, Frame, Target};
use crate::asm::Reg;
use crate::error::CodegenError;
use log::{debug, trace};
use std::collections::HashMap;

/// Where a named value lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// `s0`-relative stack slot
    Stack { offset: i32 },
    Register(Reg),
    /// A function designator; only its label is known
    Function { label: String },
}

/// State of the function currently being emitted
#[derive(Debug)]
struct FunctionState {
    name: String,
    frame: Frame,
    next_scratch: usize,
    next_label: u32,
    returned: bool,
}

#[derive(Debug)]
pub struct Context {
    target: Target,
    /// Scope 0 is the translation unit and is never popped
    scopes: Vec<HashMap<String, Location>>,
    function: Option<FunctionState>,
}

impl Context {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            scopes: vec![HashMap::new()],
            function: None,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
        trace!("entered scope {}", self.scopes.len() - 1);
    }

    /// Leave the innermost scope, dropping its bindings.
    ///
    /// Panics when asked to pop the translation-unit scope.
    pub fn pop_scope(&mut self) {
        assert!(self.scopes.len() > 1, "attempted to pop the translation-unit scope");
        self.scopes.pop();
        trace!("left scope {}", self.scopes.len());
    }

    /// Bind `name` in the innermost scope. Shadowing an outer binding is
    /// allowed; rebinding within the same scope is a `Redefinition`.
    pub fn bind(&mut self, name: &str, location: Location) -> Result<(), CodegenError> {
        let depth = self.scopes.len() - 1;
        let scope = &mut self.scopes[depth];
        if scope.contains_key(name) {
            return Err(CodegenError::Redefinition {
                name: name.to_string(),
            });
        }
        trace!("bind '{}' -> {:?} in scope {}", name, location, depth);
        scope.insert(name.to_string(), location);
        Ok(())
    }

    /// Resolve `name`, innermost scope first
    pub fn lookup(&self, name: &str) -> Result<&Location, CodegenError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| CodegenError::UnboundIdentifier {
                name: name.to_string(),
            })
    }

    /// Start emitting function `name`: bind it at translation-unit scope,
    /// reset the counters and open the function's scope.
    pub fn begin_function(&mut self, name: &str) -> Result<(), CodegenError> {
        if let Some(outer) = &self.function {
            return Err(CodegenError::unsupported(format!(
                "function '{}' defined inside '{}'",
                name, outer.name
            )));
        }
        let label = name.to_string();
        let unit_scope = &mut self.scopes[0];
        if unit_scope.contains_key(name) {
            return Err(CodegenError::Redefinition {
                name: name.to_string(),
            });
        }
        unit_scope.insert(name.to_string(), Location::Function { label });

        self.function = Some(FunctionState {
            name: name.to_string(),
            frame: Frame::new(self.target),
            next_scratch: 0,
            next_label: 0,
            returned: false,
        });
        self.push_scope();
        debug!("begin function '{}'", name);
        Ok(())
    }

    /// Finish the current function and hand back its frame
    pub fn end_function(&mut self) -> Frame {
        let state = self
            .function
            .take()
            .expect("end_function called outside a function");
        self.pop_scope();
        debug!(
            "end function '{}': frame {} bytes, locals {}, saved {:?}",
            state.name,
            state.frame.total_size(),
            state.frame.locals_size(),
            state.frame.saved_regs()
        );
        state.frame
    }

    pub fn in_function(&self) -> bool {
        self.function.is_some()
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function.as_ref().map(|state| state.name.as_str())
    }

    fn state(&self) -> &FunctionState {
        self.function
            .as_ref()
            .expect("function state accessed outside a function")
    }

    fn state_mut(&mut self) -> &mut FunctionState {
        self.function
            .as_mut()
            .expect("function state accessed outside a function")
    }

    /// The frame as laid out so far
    pub fn frame(&self) -> &Frame {
        &self.state().frame
    }

    /// Reserve a stack slot in the current frame, returning its `s0` offset
    pub fn allocate_slot(&mut self, size: u32) -> i32 {
        let offset = self.state_mut().frame.allocate_local(size);
        trace!("allocated {} byte slot at {}(s0)", size, offset);
        offset
    }

    /// Hand out a scratch register that has not been used yet in this
    /// function. Callee-saved registers join the frame's saved set.
    pub fn next_scratch(&mut self) -> Result<Reg, CodegenError> {
        let state = self.state_mut();
        let index = state.next_scratch;
        let temps = CallingConvention::TEMPORARIES.len();

        let reg = if index < temps {
            CallingConvention::TEMPORARIES[index]
        } else if let Some(&reg) = CallingConvention::CALLEE_SAVED.get(index - temps) {
            state.frame.add_saved_reg(reg);
            reg
        } else {
            return Err(CodegenError::OutOfRegisters {
                function: state.name.clone(),
            });
        };

        state.next_scratch += 1;
        trace!("scratch register {} handed out in '{}'", reg, state.name);
        Ok(reg)
    }

    /// Next local label, `.L<function>_<n>`
    pub fn next_label(&mut self) -> String {
        let state = self.state_mut();
        let label = format!(".L{}_{}", state.name, state.next_label);
        state.next_label += 1;
        label
    }

    pub fn mark_returned(&mut self) {
        self.state_mut().returned = true;
    }

    pub fn has_returned(&self) -> bool {
        self.function.as_ref().is_some_and(|state| state.returned)
    }

    /// Nothing may be emitted after the function's return
    pub fn check_reachable(&self) -> Result<(), CodegenError> {
        if self.has_returned() {
            return Err(CodegenError::unsupported("statement after return"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unbound() {
        let ctx = Context::new(Target::Rv32);
        let err = ctx.lookup("x").unwrap_err();
        assert!(matches!(err, CodegenError::UnboundIdentifier { ref name } if name == "x"));
    }

    #[test]
    fn test_failed_lookup_leaves_bindings_intact() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.bind("a", Location::Register(Reg::T1)).unwrap();
        assert!(ctx.lookup("b").is_err());
        assert_eq!(ctx.lookup("a").unwrap(), &Location::Register(Reg::T1));
    }

    #[test]
    fn test_shadowing_and_scope_exit() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.bind("x", Location::Stack { offset: -8 }).unwrap();
        ctx.push_scope();
        ctx.bind("x", Location::Register(Reg::T2)).unwrap();
        assert_eq!(ctx.lookup("x").unwrap(), &Location::Register(Reg::T2));
        ctx.pop_scope();
        assert_eq!(ctx.lookup("x").unwrap(), &Location::Stack { offset: -8 });
    }

    #[test]
    fn test_rebinding_in_same_scope() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.bind("x", Location::Stack { offset: -8 }).unwrap();
        let err = ctx.bind("x", Location::Stack { offset: -12 }).unwrap_err();
        assert!(matches!(err, CodegenError::Redefinition { .. }));
    }

    #[test]
    #[should_panic(expected = "translation-unit scope")]
    fn test_popping_unit_scope_panics() {
        Context::new(Target::Rv32).pop_scope();
    }

    #[test]
    fn test_function_binds_its_name_and_scope() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.begin_function("main").unwrap();
        assert!(ctx.in_function());
        assert_eq!(ctx.function_name(), Some("main"));
        ctx.bind("local", Location::Stack { offset: -8 }).unwrap();

        ctx.end_function();
        assert!(!ctx.in_function());
        assert!(ctx.lookup("local").is_err());
        assert_eq!(
            ctx.lookup("main").unwrap(),
            &Location::Function { label: "main".to_string() }
        );
    }

    #[test]
    fn test_duplicate_function() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.begin_function("f").unwrap();
        ctx.end_function();
        let err = ctx.begin_function("f").unwrap_err();
        assert!(matches!(err, CodegenError::Redefinition { ref name } if name == "f"));
    }

    #[test]
    fn test_nested_function_is_unsupported() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.begin_function("outer").unwrap();
        let err = ctx.begin_function("inner").unwrap_err();
        assert!(matches!(err, CodegenError::Unsupported { .. }));
        // the failed attempt must not have bound the inner name
        ctx.end_function();
        assert!(ctx.lookup("inner").is_err());
    }

    #[test]
    fn test_scratch_registers_spill_into_callee_saved() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.begin_function("f").unwrap();
        let regs: Vec<Reg> = (0..8).map(|_| ctx.next_scratch().unwrap()).collect();
        assert_eq!(
            regs,
            vec![Reg::T1, Reg::T2, Reg::T3, Reg::T4, Reg::T5, Reg::T6, Reg::S1, Reg::S2]
        );
        assert_eq!(ctx.frame().saved_regs(), &[Reg::S1, Reg::S2]);
    }

    #[test]
    fn test_out_of_registers() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.begin_function("greedy").unwrap();
        for _ in 0..17 {
            ctx.next_scratch().unwrap();
        }
        let err = ctx.next_scratch().unwrap_err();
        assert!(matches!(err, CodegenError::OutOfRegisters { ref function } if function == "greedy"));
    }

    #[test]
    fn test_counters_reset_per_function() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.begin_function("f").unwrap();
        assert_eq!(ctx.next_label(), ".Lf_0");
        assert_eq!(ctx.next_label(), ".Lf_1");
        ctx.next_scratch().unwrap();
        ctx.end_function();

        ctx.begin_function("g").unwrap();
        assert_eq!(ctx.next_label(), ".Lg_0");
        assert_eq!(ctx.next_scratch().unwrap(), Reg::T1);
    }

    #[test]
    fn test_slots_come_from_current_frame() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.begin_function("f").unwrap();
        assert_eq!(ctx.allocate_slot(4), -8);
        let frame = ctx.end_function();
        assert_eq!(frame.locals_size(), 4);
    }

    #[test]
    fn test_reachability() {
        let mut ctx = Context::new(Target::Rv32);
        ctx.begin_function("f").unwrap();
        assert!(ctx.check_reachable().is_ok());
        ctx.mark_returned();
        assert!(matches!(
            ctx.check_reachable().unwrap_err(),
            CodegenError::Unsupported { .. }
        ));
        ctx.end_function();
        assert!(!ctx.has_returned());
    }

    #[test]
    #[should_panic(expected = "outside a function")]
    fn test_slot_outside_function_panics() {
        Context::new(Target::Rv32).allocate_slot(4);
    }
}
