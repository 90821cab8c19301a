//! General-purpose register file.
//!
//! Eight 16-bit registers `$r0`..`$r7`. `$r0` is hard-wired to zero: writes
//! to it are silently dropped and reads always return 0.

use crate::common::constants::{REG_COUNT, REG_ZERO};

/// The architectural register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u16; REG_COUNT],
}

impl RegisterFile {
    /// Creates a register file with all registers zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register. Index 0 always returns 0.
    #[inline]
    pub fn read(&self, idx: usize) -> u16 {
        if idx == REG_ZERO { 0 } else { self.regs[idx] }
    }

    /// Writes a register. Writes to index 0 are dropped.
    #[inline]
    pub fn write(&mut self, idx: usize, val: u16) {
        if idx != REG_ZERO {
            self.regs[idx] = val;
        }
    }

    /// Returns all register values in index order.
    pub fn snapshot(&self) -> [u16; REG_COUNT] {
        self.regs
    }
}
