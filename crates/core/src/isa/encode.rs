//! Exact encoder from typed instructions to raw 16-bit words.

use crate::isa::instruction::{
    ADDR12_MASK, IMM6_MASK, Instruction, OPCODE_SHIFT, RD_SHIFT, RS_SHIFT, RT_SHIFT,
};
use crate::isa::opcodes::{self, funct};

fn rtype(rs: usize, rt: usize, rd: usize, fcode: u16) -> u16 {
    ((rs as u16) << RS_SHIFT) | ((rt as u16) << RT_SHIFT) | ((rd as u16) << RD_SHIFT) | fcode
}

fn itype(op: u16, rs: usize, rt: usize, imm: i16) -> u16 {
    (op << OPCODE_SHIFT)
        | ((rs as u16) << RS_SHIFT)
        | ((rt as u16) << RT_SHIFT)
        | ((imm as u16) & IMM6_MASK)
}

fn jtype(op: u16, addr: u16) -> u16 {
    (op << OPCODE_SHIFT) | (addr & ADDR12_MASK)
}

/// Encodes a typed instruction into its raw word.
///
/// Inverse of [`crate::isa::decode`] for every constructible instruction
/// whose fields are within range.
pub fn encode(inst: &Instruction) -> u16 {
    match *inst {
        Instruction::Add { rs, rt, rd } => rtype(rs, rt, rd, funct::ADD),
        Instruction::Sub { rs, rt, rd } => rtype(rs, rt, rd, funct::SUB),
        Instruction::And { rs, rt, rd } => rtype(rs, rt, rd, funct::AND),
        Instruction::Or { rs, rt, rd } => rtype(rs, rt, rd, funct::OR),
        Instruction::Slt { rs, rt, rd } => rtype(rs, rt, rd, funct::SLT),
        Instruction::Jr { rs } => rtype(rs, 0, 0, funct::JR),
        Instruction::Lw { rs, rt, imm } => itype(opcodes::OP_LW, rs, rt, imm),
        Instruction::Sw { rs, rt, imm } => itype(opcodes::OP_SW, rs, rt, imm),
        Instruction::Addi { rs, rt, imm } => itype(opcodes::OP_ADDI, rs, rt, imm),
        Instruction::Subi { rs, rt, imm } => itype(opcodes::OP_SUBI, rs, rt, imm),
        Instruction::Slti { rs, rt, imm } => itype(opcodes::OP_SLTI, rs, rt, imm),
        Instruction::Andi { rs, rt, imm } => itype(opcodes::OP_ANDI, rs, rt, imm),
        Instruction::Beq { rs, rt, offset } => itype(opcodes::OP_BEQ, rs, rt, offset),
        Instruction::Bne { rs, rt, offset } => itype(opcodes::OP_BNE, rs, rt, offset),
        Instruction::Jump { addr } => jtype(opcodes::OP_JUMP, addr),
        Instruction::Jal { addr } => jtype(opcodes::OP_JAL, addr),
    }
}
