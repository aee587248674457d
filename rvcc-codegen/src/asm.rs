//! RISC-V Assembly Instruction Definitions
//!
//! This module defines the register model and the subset of RV32I/RV64I
//! instructions, pseudo-instructions and assembler directives the code
//! generator emits. `Display` renders each item as assembler source text.

use std::fmt;

/// RISC-V integer registers, by ABI name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reg {
    Zero,
    Ra,
    Sp,
    Gp,
    Tp,
    T0, T1, T2, T3, T4, T5, T6,
    S0, S1, S2, S3, S4, S5, S6, S7, S8, S9, S10, S11,
    A0, A1, A2, A3, A4, A5, A6, A7,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg::Zero => "zero",
            Reg::Ra => "ra",
            Reg::Sp => "sp",
            Reg::Gp => "gp",
            Reg::Tp => "tp",
            Reg::T0 => "t0",
            Reg::T1 => "t1",
            Reg::T2 => "t2",
            Reg::T3 => "t3",
            Reg::T4 => "t4",
            Reg::T5 => "t5",
            Reg::T6 => "t6",
            Reg::S0 => "s0",
            Reg::S1 => "s1",
            Reg::S2 => "s2",
            Reg::S3 => "s3",
            Reg::S4 => "s4",
            Reg::S5 => "s5",
            Reg::S6 => "s6",
            Reg::S7 => "s7",
            Reg::S8 => "s8",
            Reg::S9 => "s9",
            Reg::S10 => "s10",
            Reg::S11 => "s11",
            Reg::A0 => "a0",
            Reg::A1 => "a1",
            Reg::A2 => "a2",
            Reg::A3 => "a3",
            Reg::A4 => "a4",
            Reg::A5 => "a5",
            Reg::A6 => "a6",
            Reg::A7 => "a7",
        };
        f.write_str(name)
    }
}

/// Width of a memory access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// 32 bits (`lw`/`sw`)
    Word,
    /// 64 bits (`ld`/`sd`), RV64 only
    Double,
}

impl Width {
    fn suffix(&self) -> char {
        match self {
            Width::Word => 'w',
            Width::Double => 'd',
        }
    }
}

/// Assembler directives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Text,
    Globl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AsmInst {
    Directive(Directive),
    Label(String),

    Add(Reg, Reg, Reg),           // rd = rs1 + rs2
    Sub(Reg, Reg, Reg),           // rd = rs1 - rs2
    Addi(Reg, Reg, i32),          // rd = rs1 + imm12

    Load(Width, Reg, i32, Reg),   // rd = mem[base + offset]
    Store(Width, Reg, i32, Reg),  // mem[base + offset] = rs

    // Pseudo-instructions
    Li(Reg, i64),                 // rd = immediate
    Mv(Reg, Reg),                 // rd = rs
    Ret,                          // jalr zero, 0(ra)
}

impl AsmInst {
    /// Labels and directives start in column 0; everything else is indented
    pub fn is_flush_left(&self) -> bool {
        matches!(self, AsmInst::Directive(_) | AsmInst::Label(_))
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::Directive(Directive::Text) => write!(f, ".text"),
            AsmInst::Directive(Directive::Globl(name)) => write!(f, ".globl {}", name),
            AsmInst::Label(label) => write!(f, "{}:", label),

            AsmInst::Add(rd, rs1, rs2) => write!(f, "add {}, {}, {}", rd, rs1, rs2),
            AsmInst::Sub(rd, rs1, rs2) => write!(f, "sub {}, {}, {}", rd, rs1, rs2),
            AsmInst::Addi(rd, rs1, imm) => write!(f, "addi {}, {}, {}", rd, rs1, imm),

            AsmInst::Load(width, rd, offset, base) => {
                write!(f, "l{} {}, {}({})", width.suffix(), rd, offset, base)
            }
            AsmInst::Store(width, rs, offset, base) => {
                write!(f, "s{} {}, {}({})", width.suffix(), rs, offset, base)
            }

            AsmInst::Li(rd, imm) => write!(f, "li {}, {}", rd, imm),
            AsmInst::Mv(rd, rs) => write!(f, "mv {}, {}", rd, rs),
            AsmInst::Ret => write!(f, "ret"),
        }
    }
}

/// Whether `value` fits the signed 12-bit immediate of I/S-type instructions
pub fn fits_imm12(value: i64) -> bool {
    (-2048..=2047).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_display() {
        assert_eq!(Reg::Zero.to_string(), "zero");
        assert_eq!(Reg::S0.to_string(), "s0");
        assert_eq!(Reg::S11.to_string(), "s11");
        assert_eq!(Reg::A0.to_string(), "a0");
    }

    #[test]
    fn test_instruction_display() {
        assert_eq!(AsmInst::Li(Reg::A0, 5).to_string(), "li a0, 5");
        assert_eq!(AsmInst::Addi(Reg::Sp, Reg::Sp, -16).to_string(), "addi sp, sp, -16");
        assert_eq!(AsmInst::Store(Width::Word, Reg::S0, 12, Reg::Sp).to_string(), "sw s0, 12(sp)");
        assert_eq!(AsmInst::Load(Width::Double, Reg::S1, 0, Reg::Sp).to_string(), "ld s1, 0(sp)");
        assert_eq!(AsmInst::Mv(Reg::A0, Reg::T1).to_string(), "mv a0, t1");
        assert_eq!(AsmInst::Sub(Reg::Sp, Reg::Sp, Reg::T0).to_string(), "sub sp, sp, t0");
        assert_eq!(AsmInst::Ret.to_string(), "ret");
    }

    #[test]
    fn test_directives_and_labels() {
        let globl = AsmInst::Directive(Directive::Globl("main".to_string()));
        assert_eq!(AsmInst::Directive(Directive::Text).to_string(), ".text");
        assert_eq!(globl.to_string(), ".globl main");
        assert_eq!(AsmInst::Label("main".to_string()).to_string(), "main:");
        assert!(globl.is_flush_left());
        assert!(!AsmInst::Ret.is_flush_left());
    }

    #[test]
    fn test_imm12_range() {
        assert!(fits_imm12(2047));
        assert!(fits_imm12(-2048));
        assert!(!fits_imm12(2048));
        assert!(!fits_imm12(-2049));
    }
}
