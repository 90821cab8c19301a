//! Architectural constants.
//!
//! This module centralizes the fixed parameters of the 16-bit architecture:
//! 1. **Memory geometry:** Instruction and data memory sizes and address masks.
//! 2. **Register file:** Register count and the special zero/link indices.
//! 3. **Encoding limits:** Immediate and jump-address ranges.

/// Number of 16-bit words in instruction memory.
pub const IMEM_WORDS: usize = 512;

/// Mask reducing a 16-bit ALU result to a data-memory word address (9 bits).
pub const DMEM_ADDR_MASK: u16 = 0x01FF;

/// Number of architectural registers (`$r0`..`$r7`).
pub const REG_COUNT: usize = 8;

/// Index of the hard-wired zero register.
pub const REG_ZERO: usize = 0;

/// Index of the link register written by `JAL`.
pub const REG_LINK: usize = 7;

/// Smallest encodable I-type immediate (6-bit two's complement).
pub const IMM_MIN: i64 = -32;

/// Largest encodable I-type immediate (6-bit two's complement).
pub const IMM_MAX: i64 = 31;

/// Largest encodable J-type target address (12 bits).
pub const JUMP_ADDR_MAX: i64 = 0x0FFF;

/// The all-zero word: the canonical NOP encoding.
pub const NOP_WORD: u16 = 0;
