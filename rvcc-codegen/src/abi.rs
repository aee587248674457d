//! RISC-V ABI Implementation
//!
//! Calling convention constants for the standard integer ABI (ILP32 and
//! LP64), stack frame layout, and function prologue/epilogue generation.

use crate::asm::{fits_imm12, AsmInst, Reg, Width};

/// Target base ISA. Selects the register width used for saves/restores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Rv32,
    Rv64,
}

impl Target {
    /// Register width in bytes
    pub fn word_size(&self) -> u32 {
        match self {
            Target::Rv32 => 4,
            Target::Rv64 => 8,
        }
    }

    /// Memory access width for a full register
    pub fn word_width(&self) -> Width {
        match self {
            Target::Rv32 => Width::Word,
            Target::Rv64 => Width::Double,
        }
    }
}

/// RISC-V standard calling convention
///
/// Register Usage:
/// - a0: return value
/// - t0: reserved for frame arithmetic in prologues/epilogues
/// - t1-t6: scratch registers handed out to expressions (caller-saved)
/// - s0: frame pointer
/// - s1-s11: callee-saved, saved by the prologue when used
/// - sp: stack pointer, 16-byte aligned at every function boundary
pub struct CallingConvention;

impl CallingConvention {
    pub const RETURN_VALUE: Reg = Reg::A0;
    pub const STACK_PTR: Reg = Reg::Sp;
    pub const FRAME_PTR: Reg = Reg::S0;
    pub const SCRATCH: Reg = Reg::T0;

    /// Caller-saved registers available as scratch
    pub const TEMPORARIES: [Reg; 6] = [Reg::T1, Reg::T2, Reg::T3, Reg::T4, Reg::T5, Reg::T6];

    /// Registers that must be preserved by the callee
    pub const CALLEE_SAVED: [Reg; 11] = [
        Reg::S1, Reg::S2, Reg::S3, Reg::S4, Reg::S5, Reg::S6,
        Reg::S7, Reg::S8, Reg::S9, Reg::S10, Reg::S11,
    ];

    pub const STACK_ALIGNMENT: u32 = 16;
}

/// Round `value` up to a multiple of `align` (a power of two)
pub fn align_to(value: u32, align: u32) -> u32 {
    debug_assert!(align.is_power_of_two());
    (value + align - 1) & !(align - 1)
}

/// Stack Frame Layout
///
/// The stack grows downward and `s0` points at the caller's `sp`. With
/// `W` the word size and `N` the total frame size:
///
/// ```text
///   s0 - W            saved s0
///   s0 - W - locals   local slots, allocated downward
///   ...               padding up to 16-byte alignment
///   sp + W*i          saved callee registers, first-use order
///   sp = s0 - N
/// ```
///
/// Locals are addressed from `s0` and saved registers from `sp`, so
/// neither offset depends on how much of the other area ends up used.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    target: Target,
    locals_size: u32,
    saved_regs: Vec<Reg>,
}

impl Frame {
    /// Leaves room for the saved registers and padding while the whole
    /// frame size still fits an `i32` offset.
    const MAX_LOCALS_SIZE: u32 = i32::MAX as u32 - 256;

    pub fn new(target: Target) -> Self {
        Self {
            target,
            locals_size: 0,
            saved_regs: Vec::new(),
        }
    }

    /// Reserve a local slot of `size` bytes and return its `s0`-relative
    /// (negative) offset.
    ///
    /// Panics on a zero-sized request or one that overflows the frame: the
    /// caller is a broken emitter.
    pub fn allocate_local(&mut self, size: u32) -> i32 {
        assert!(size > 0, "stack slot request of zero bytes");
        let word = self.target.word_size();
        let align = if size >= word { word } else { size.next_power_of_two() };
        let Some(end) = self
            .locals_size
            .checked_add(size)
            .filter(|&end| end <= Self::MAX_LOCALS_SIZE)
        else {
            panic!("stack slot of {} bytes overflows the frame", size);
        };
        self.locals_size = align_to(end, align);
        -((word + self.locals_size) as i32)
    }

    /// Record a callee-saved register used by the body
    pub fn add_saved_reg(&mut self, reg: Reg) {
        assert!(
            CallingConvention::CALLEE_SAVED.contains(&reg),
            "{} is not a callee-saved register the frame can preserve",
            reg
        );
        if !self.saved_regs.contains(&reg) {
            self.saved_regs.push(reg);
        }
    }

    pub fn saved_regs(&self) -> &[Reg] {
        &self.saved_regs
    }

    pub fn locals_size(&self) -> u32 {
        self.locals_size
    }

    /// Total frame size, rounded up to the stack alignment
    pub fn total_size(&self) -> u32 {
        let word = self.target.word_size();
        let raw = word + self.locals_size + word * self.saved_regs.len() as u32;
        align_to(raw, CallingConvention::STACK_ALIGNMENT)
    }

    fn fits_immediates(&self) -> bool {
        fits_imm12(self.total_size() as i64)
    }

    /// Generate function prologue
    ///
    /// 1. Allocates the frame
    /// 2. Saves the caller's frame pointer
    /// 3. Saves callee registers used by the body
    /// 4. Points s0 at the caller's stack pointer
    pub fn gen_prologue(&self) -> Vec<AsmInst> {
        let word = self.target.word_size() as i32;
        let width = self.target.word_width();
        let size = self.total_size() as i32;
        let sp = CallingConvention::STACK_PTR;
        let fp = CallingConvention::FRAME_PTR;
        let scratch = CallingConvention::SCRATCH;
        let mut code = Vec::new();

        if self.fits_immediates() {
            code.push(AsmInst::Addi(sp, sp, -size));
            code.push(AsmInst::Store(width, fp, size - word, sp));
            code.extend(self.save_callee_regs());
            code.push(AsmInst::Addi(fp, sp, size));
        } else {
            code.push(AsmInst::Li(scratch, size as i64));
            code.push(AsmInst::Sub(sp, sp, scratch));
            code.push(AsmInst::Add(scratch, sp, scratch));
            code.push(AsmInst::Store(width, fp, -word, scratch));
            code.extend(self.save_callee_regs());
            code.push(AsmInst::Mv(fp, scratch));
        }

        code
    }

    /// Generate function epilogue
    ///
    /// 1. Restores callee registers (in reverse order)
    /// 2. Restores the caller's frame pointer
    /// 3. Releases the frame
    /// 4. Returns to caller
    pub fn gen_epilogue(&self) -> Vec<AsmInst> {
        let word = self.target.word_size() as i32;
        let width = self.target.word_width();
        let size = self.total_size() as i32;
        let sp = CallingConvention::STACK_PTR;
        let fp = CallingConvention::FRAME_PTR;
        let scratch = CallingConvention::SCRATCH;
        let mut code = self.restore_callee_regs();

        if self.fits_immediates() {
            code.push(AsmInst::Load(width, fp, size - word, sp));
            code.push(AsmInst::Addi(sp, sp, size));
        } else {
            code.push(AsmInst::Mv(scratch, fp));
            code.push(AsmInst::Load(width, fp, -word, scratch));
            code.push(AsmInst::Mv(sp, scratch));
        }

        code.push(AsmInst::Ret);
        code
    }

    fn save_callee_regs(&self) -> Vec<AsmInst> {
        let word = self.target.word_size() as i32;
        self.saved_regs
            .iter()
            .enumerate()
            .map(|(i, &reg)| {
                AsmInst::Store(self.target.word_width(), reg, i as i32 * word, CallingConvention::STACK_PTR)
            })
            .collect()
    }

    fn restore_callee_regs(&self) -> Vec<AsmInst> {
        let word = self.target.word_size() as i32;
        self.saved_regs
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &reg)| {
                AsmInst::Load(self.target.word_width(), reg, i as i32 * word, CallingConvention::STACK_PTR)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(0, 16), 0);
        assert_eq!(align_to(4, 16), 16);
        assert_eq!(align_to(16, 16), 16);
        assert_eq!(align_to(17, 16), 32);
    }

    #[test]
    fn test_empty_frame_is_sixteen_bytes() {
        let frame = Frame::new(Target::Rv32);
        assert_eq!(frame.total_size(), 16);
        assert_eq!(
            frame.gen_prologue(),
            vec![
                AsmInst::Addi(Reg::Sp, Reg::Sp, -16),
                AsmInst::Store(Width::Word, Reg::S0, 12, Reg::Sp),
                AsmInst::Addi(Reg::S0, Reg::Sp, 16),
            ]
        );
        assert_eq!(
            frame.gen_epilogue(),
            vec![
                AsmInst::Load(Width::Word, Reg::S0, 12, Reg::Sp),
                AsmInst::Addi(Reg::Sp, Reg::Sp, 16),
                AsmInst::Ret,
            ]
        );
    }

    #[test]
    fn test_local_slots_grow_downward() {
        let mut frame = Frame::new(Target::Rv32);
        assert_eq!(frame.allocate_local(4), -8);
        assert_eq!(frame.allocate_local(4), -12);
        assert_eq!(frame.allocate_local(1), -13);
        // realigned to a word
        assert_eq!(frame.allocate_local(4), -20);
        assert_eq!(frame.locals_size(), 16);
        assert_eq!(frame.total_size(), 32);
    }

    #[test]
    fn test_rv64_uses_doubleword_saves() {
        let mut frame = Frame::new(Target::Rv64);
        assert_eq!(frame.allocate_local(4), -12);
        frame.add_saved_reg(Reg::S1);
        assert_eq!(frame.total_size(), 32);

        let prologue = frame.gen_prologue();
        assert!(prologue.contains(&AsmInst::Store(Width::Double, Reg::S0, 24, Reg::Sp)));
        assert!(prologue.contains(&AsmInst::Store(Width::Double, Reg::S1, 0, Reg::Sp)));
    }

    #[test]
    fn test_saved_registers_restored_in_reverse() {
        let mut frame = Frame::new(Target::Rv32);
        frame.add_saved_reg(Reg::S1);
        frame.add_saved_reg(Reg::S2);
        frame.add_saved_reg(Reg::S1);
        assert_eq!(frame.saved_regs(), &[Reg::S1, Reg::S2]);

        assert_eq!(
            frame.gen_epilogue(),
            vec![
                AsmInst::Load(Width::Word, Reg::S2, 4, Reg::Sp),
                AsmInst::Load(Width::Word, Reg::S1, 0, Reg::Sp),
                AsmInst::Load(Width::Word, Reg::S0, 12, Reg::Sp),
                AsmInst::Addi(Reg::Sp, Reg::Sp, 16),
                AsmInst::Ret,
            ]
        );
    }

    #[test]
    fn test_large_frame_uses_scratch_register() {
        let mut frame = Frame::new(Target::Rv32);
        frame.allocate_local(4000);
        assert_eq!(frame.total_size(), 4016);

        assert_eq!(
            frame.gen_prologue(),
            vec![
                AsmInst::Li(Reg::T0, 4016),
                AsmInst::Sub(Reg::Sp, Reg::Sp, Reg::T0),
                AsmInst::Add(Reg::T0, Reg::Sp, Reg::T0),
                AsmInst::Store(Width::Word, Reg::S0, -4, Reg::T0),
                AsmInst::Mv(Reg::S0, Reg::T0),
            ]
        );
        assert_eq!(
            frame.gen_epilogue(),
            vec![
                AsmInst::Mv(Reg::T0, Reg::S0),
                AsmInst::Load(Width::Word, Reg::S0, -4, Reg::T0),
                AsmInst::Mv(Reg::Sp, Reg::T0),
                AsmInst::Ret,
            ]
        );
    }

    #[test]
    #[should_panic(expected = "zero bytes")]
    fn test_zero_sized_slot_is_a_contract_violation() {
        Frame::new(Target::Rv32).allocate_local(0);
    }

    #[test]
    #[should_panic(expected = "overflows the frame")]
    fn test_oversized_slot_is_a_contract_violation() {
        let mut frame = Frame::new(Target::Rv32);
        frame.allocate_local(1 << 30);
        frame.allocate_local(1 << 30);
        frame.allocate_local(1 << 30);
    }

    #[test]
    #[should_panic(expected = "overflows the frame")]
    fn test_slot_size_wraparound_is_a_contract_violation() {
        Frame::new(Target::Rv64).allocate_local(u32::MAX);
    }

    #[test]
    #[should_panic(expected = "not a callee-saved register")]
    fn test_only_callee_saved_registers_are_preserved() {
        Frame::new(Target::Rv32).add_saved_reg(Reg::T1);
    }
}
