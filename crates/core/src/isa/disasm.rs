//! Canonical disassembler.
//!
//! Converts a 16-bit encoding into the stable mnemonic string used as a
//! display key by the timeline and the serialized latch views, e.g.
//! `ADD $r3,$r1,$r2`. The zero word disassembles to `NOP`.

use crate::common::constants::NOP_WORD;
use crate::isa::decode::decode;
use crate::isa::instruction::Instruction;

/// Register display names for `$r0`..`$r7`.
const REG_NAMES: [&str; 8] = ["$r0", "$r1", "$r2", "$r3", "$r4", "$r5", "$r6", "$r7"];

/// Returns the display name for a register index.
#[inline]
pub fn reg_name(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("$r?")
}

/// Disassembles a raw word into its canonical string.
pub fn disassemble(raw: u16) -> String {
    if raw == NOP_WORD {
        return "NOP".to_string();
    }
    let inst = decode(raw);
    let mn = inst.mnemonic();
    match inst {
        Instruction::Add { rs, rt, rd }
        | Instruction::Sub { rs, rt, rd }
        | Instruction::And { rs, rt, rd }
        | Instruction::Or { rs, rt, rd }
        | Instruction::Slt { rs, rt, rd } => {
            format!("{mn} {},{},{}", reg_name(rd), reg_name(rs), reg_name(rt))
        }
        Instruction::Jr { rs } => format!("{mn} {}", reg_name(rs)),
        Instruction::Lw { rs, rt, imm } | Instruction::Sw { rs, rt, imm } => {
            format!("{mn} {},{imm}({})", reg_name(rt), reg_name(rs))
        }
        Instruction::Addi { rs, rt, imm }
        | Instruction::Subi { rs, rt, imm }
        | Instruction::Slti { rs, rt, imm }
        | Instruction::Andi { rs, rt, imm } => {
            format!("{mn} {},{},{imm}", reg_name(rt), reg_name(rs))
        }
        Instruction::Beq { rs, rt, offset } | Instruction::Bne { rs, rt, offset } => {
            format!("{mn} {},{},{offset}", reg_name(rs), reg_name(rt))
        }
        Instruction::Jump { addr } | Instruction::Jal { addr } => format!("{mn} {addr}"),
    }
}
