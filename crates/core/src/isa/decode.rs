//! Total decoder from raw 16-bit words to typed instructions.

use crate::isa::instruction::{Instruction, InstructionBits};
use crate::isa::opcodes::{self, funct};

/// Decodes a raw word into its typed instruction.
///
/// The decoder is total: encodings outside the defined opcode and funct
/// space decay to the canonical NOP, matching how the zero word behaves.
/// The assembler never emits such encodings.
pub fn decode(raw: u16) -> Instruction {
    let rs = raw.rs();
    let rt = raw.rt();
    match raw.opcode() {
        opcodes::OP_RTYPE => {
            let rd = raw.rd();
            match raw.funct() {
                funct::ADD => Instruction::Add { rs, rt, rd },
                funct::SUB => Instruction::Sub { rs, rt, rd },
                funct::AND => Instruction::And { rs, rt, rd },
                funct::OR => Instruction::Or { rs, rt, rd },
                funct::SLT => Instruction::Slt { rs, rt, rd },
                funct::JR => Instruction::Jr { rs },
                _ => Instruction::NOP,
            }
        }
        opcodes::OP_LW => Instruction::Lw { rs, rt, imm: raw.imm6() },
        opcodes::OP_SW => Instruction::Sw { rs, rt, imm: raw.imm6() },
        opcodes::OP_ADDI => Instruction::Addi { rs, rt, imm: raw.imm6() },
        opcodes::OP_SUBI => Instruction::Subi { rs, rt, imm: raw.imm6() },
        opcodes::OP_SLTI => Instruction::Slti { rs, rt, imm: raw.imm6() },
        opcodes::OP_BEQ => Instruction::Beq { rs, rt, offset: raw.imm6() },
        opcodes::OP_BNE => Instruction::Bne { rs, rt, offset: raw.imm6() },
        opcodes::OP_ANDI => Instruction::Andi { rs, rt, imm: raw.imm6() },
        opcodes::OP_JUMP => Instruction::Jump { addr: raw.addr12() },
        opcodes::OP_JAL => Instruction::Jal { addr: raw.addr12() },
        _ => Instruction::NOP,
    }
}
