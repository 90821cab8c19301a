//! Pipeline control signals.
//!
//! This module defines the signals generated in decode that steer the later
//! stages. It performs:
//! 1. **Operation classification:** The five ALU operations.
//! 2. **Operand selection:** ALU input B source and write-back value source.
//! 3. **Destination selection:** R-type `rd`, I-type `rt`, or the link
//!    register for `JAL`.

use crate::common::constants::REG_LINK;
use crate::isa::Instruction;

/// ALU operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Addition (default; also computes load/store addresses).
    #[default]
    Add,
    /// Subtraction.
    Sub,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Set less than (signed compare, 1 or 0).
    Slt,
}

/// Destination register selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RegDst {
    /// R-type destination field `rd`.
    #[default]
    Rd,
    /// I-type destination field `rt`.
    Rt,
    /// The link register `$r7` (written by `JAL`).
    Link,
}

/// Write-back value selection (the MemToReg mux).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WbSrc {
    /// ALU result.
    #[default]
    Alu,
    /// Data loaded from memory.
    Mem,
    /// The sequential return address (`JAL` link value).
    PcPlus1,
}

/// Control signals latched with an instruction in decode.
///
/// A bubble carries the all-false default, so downstream stages never commit
/// architectural changes for invalid latches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Enable the register-file write in write-back.
    pub reg_write: bool,
    /// Enable the data-memory read in the memory stage.
    pub mem_read: bool,
    /// Enable the data-memory write in the memory stage.
    pub mem_write: bool,
    /// Select the immediate (instead of `rt`) as ALU input B.
    pub alu_src: bool,
    /// Destination register selection.
    pub reg_dst: RegDst,
    /// Write-back value selection.
    pub wb_src: WbSrc,
    /// ALU operation.
    pub alu: AluOp,
}

/// Derives the control signals for a decoded instruction.
///
/// Control transfers resolve in decode, so `JUMP`, `JR`, and taken branches
/// never carry live signals downstream; `JAL` does, to route the link value
/// through write-back.
pub fn control_for(inst: &Instruction) -> ControlSignals {
    let mut c = ControlSignals::default();
    match inst {
        Instruction::Add { .. } => {
            c.reg_write = true;
        }
        Instruction::Sub { .. } => {
            c.reg_write = true;
            c.alu = AluOp::Sub;
        }
        Instruction::And { .. } => {
            c.reg_write = true;
            c.alu = AluOp::And;
        }
        Instruction::Or { .. } => {
            c.reg_write = true;
            c.alu = AluOp::Or;
        }
        Instruction::Slt { .. } => {
            c.reg_write = true;
            c.alu = AluOp::Slt;
        }
        Instruction::Jr { .. } | Instruction::Jump { .. } => {}
        Instruction::Lw { .. } => {
            c.reg_write = true;
            c.mem_read = true;
            c.alu_src = true;
            c.reg_dst = RegDst::Rt;
            c.wb_src = WbSrc::Mem;
        }
        Instruction::Sw { .. } => {
            c.mem_write = true;
            c.alu_src = true;
        }
        Instruction::Addi { .. } => {
            c.reg_write = true;
            c.alu_src = true;
            c.reg_dst = RegDst::Rt;
        }
        Instruction::Subi { .. } => {
            c.reg_write = true;
            c.alu_src = true;
            c.reg_dst = RegDst::Rt;
            c.alu = AluOp::Sub;
        }
        Instruction::Slti { .. } => {
            c.reg_write = true;
            c.alu_src = true;
            c.reg_dst = RegDst::Rt;
            c.alu = AluOp::Slt;
        }
        Instruction::Andi { .. } => {
            c.reg_write = true;
            c.alu_src = true;
            c.reg_dst = RegDst::Rt;
            c.alu = AluOp::And;
        }
        Instruction::Beq { .. } | Instruction::Bne { .. } => {
            c.alu = AluOp::Sub;
        }
        Instruction::Jal { .. } => {
            c.reg_write = true;
            c.reg_dst = RegDst::Link;
            c.wb_src = WbSrc::PcPlus1;
        }
    }
    c
}

/// Resolves the destination register index for an instruction, or 0 when it
/// writes no register.
pub fn destination_of(inst: &Instruction, ctrl: &ControlSignals) -> usize {
    if !ctrl.reg_write {
        return 0;
    }
    let (_, rt) = inst.source_fields();
    match ctrl.reg_dst {
        RegDst::Rd => match *inst {
            Instruction::Add { rd, .. }
            | Instruction::Sub { rd, .. }
            | Instruction::And { rd, .. }
            | Instruction::Or { rd, .. }
            | Instruction::Slt { rd, .. } => rd,
            _ => 0,
        },
        RegDst::Rt => rt,
        RegDst::Link => REG_LINK,
    }
}
