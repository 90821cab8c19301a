//! Architectural state: register file and memories.

/// The eight-entry register file with a hard-wired zero register.
pub mod gpr;
/// Instruction and data memories.
pub mod mem;

pub use gpr::RegisterFile;
pub use mem::{DataMemory, InstrMemory};
