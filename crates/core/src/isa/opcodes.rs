//! Opcode and funct constant tables.

/// R-type instruction group (funct selects the operation).
pub const OP_RTYPE: u16 = 0b0000;
/// Load word: `LW rt, imm(rs)`.
pub const OP_LW: u16 = 0b0001;
/// Store word: `SW rt, imm(rs)`.
pub const OP_SW: u16 = 0b0010;
/// Add immediate: `ADDI rt, rs, imm`.
pub const OP_ADDI: u16 = 0b0011;
/// Subtract immediate: `SUBI rt, rs, imm`.
pub const OP_SUBI: u16 = 0b0100;
/// Set-less-than immediate (signed): `SLTI rt, rs, imm`.
pub const OP_SLTI: u16 = 0b0101;
/// Branch if equal: `BEQ rs, rt, off`.
pub const OP_BEQ: u16 = 0b0110;
/// Branch if not equal: `BNE rs, rt, off`.
pub const OP_BNE: u16 = 0b0111;
/// And immediate: `ANDI rt, rs, imm`.
pub const OP_ANDI: u16 = 0b1000;
/// Unconditional jump: `JUMP addr`.
pub const OP_JUMP: u16 = 0b1001;
/// Jump and link (writes the return address to `$r7`): `JAL addr`.
pub const OP_JAL: u16 = 0b1010;

/// Funct field values for the R-type group.
pub mod funct {
    /// `ADD rd, rs, rt`.
    pub const ADD: u16 = 0b000;
    /// `SUB rd, rs, rt`.
    pub const SUB: u16 = 0b001;
    /// `AND rd, rs, rt`.
    pub const AND: u16 = 0b010;
    /// `OR rd, rs, rt`.
    pub const OR: u16 = 0b011;
    /// `SLT rd, rs, rt` (signed compare).
    pub const SLT: u16 = 0b100;
    /// `JR rs` (register indirect jump).
    pub const JR: u16 = 0b101;
}
