//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the buffers that connect the five stages. It
//! implements:
//! 1. **Bubble tracking:** Every latch is a [`Latch`], whose `Bubble` variant
//!    replaces valid-flag bookkeeping with exhaustive case analysis.
//! 2. **Instruction flow:** One entry struct per stage boundary carrying the
//!    captured data and control signals.
//!
//! Invariant: a `Bubble` propagates as a NOP; downstream stages never commit
//! architectural changes for it.

use crate::core::pipeline::signals::ControlSignals;

/// A pipeline latch: either a bubble or a captured stage entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Latch<T> {
    /// Invalid contents; behaves as a NOP everywhere downstream.
    Bubble,
    /// A live instruction crossing this stage boundary.
    Stage(T),
}

impl<T> Default for Latch<T> {
    fn default() -> Self {
        Self::Bubble
    }
}

impl<T> Latch<T> {
    /// Returns the captured entry, or `None` for a bubble.
    #[inline]
    pub fn stage(&self) -> Option<&T> {
        match self {
            Self::Bubble => None,
            Self::Stage(entry) => Some(entry),
        }
    }

    /// Whether this latch holds no instruction.
    #[inline]
    pub fn is_bubble(&self) -> bool {
        matches!(self, Self::Bubble)
    }
}

/// Entry in the IF/ID latch (fetch to decode).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IfIdEntry {
    /// Sequential successor of the fetch address.
    pub pc_plus1: u16,
    /// Raw instruction encoding.
    pub raw: u16,
}

/// Entry in the ID/EX latch (decode to execute).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdExEntry {
    /// Sequential successor of the fetch address.
    pub pc_plus1: u16,
    /// Raw instruction encoding.
    pub raw: u16,
    /// First source register field.
    pub rs: usize,
    /// Second register field (destination for I-type arithmetic and loads).
    pub rt: usize,
    /// Resolved destination register (0 when no register is written).
    pub write_reg: usize,
    /// Value read for `rs` (with in-stage forwarding applied in decode).
    pub rs_val: u16,
    /// Value read for `rt` (with in-stage forwarding applied in decode).
    pub rt_val: u16,
    /// Sign-extended immediate.
    pub imm: i16,
    /// Control signals for the remaining stages.
    pub ctrl: ControlSignals,
}

/// Entry in the EX/MEM latch (execute to memory).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExMemEntry {
    /// Sequential successor of the fetch address.
    pub pc_plus1: u16,
    /// Raw instruction encoding.
    pub raw: u16,
    /// ALU result (the address for loads and stores).
    pub alu_result: u16,
    /// Store data: the post-forwarding `rt` value captured in execute.
    pub store_data: u16,
    /// Resolved destination register (0 when no register is written).
    pub write_reg: usize,
    /// Control signals for the remaining stages.
    pub ctrl: ControlSignals,
}

/// Entry in the MEM/WB latch (memory to write-back).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemWbEntry {
    /// Sequential successor of the fetch address.
    pub pc_plus1: u16,
    /// Raw instruction encoding.
    pub raw: u16,
    /// ALU result carried past the memory stage.
    pub alu_result: u16,
    /// Data loaded from memory (0 for non-loads).
    pub mem_data: u16,
    /// Resolved destination register (0 when no register is written).
    pub write_reg: usize,
    /// Control signals for write-back.
    pub ctrl: ControlSignals,
}
