//! Instruction Fetch (IF) stage.

use crate::common::constants::NOP_WORD;
use crate::core::arch::InstrMemory;
use crate::core::pipeline::latches::{IfIdEntry, Latch};

/// Fetches the instruction at `pc`.
///
/// The zero word is the canonical NOP and enters the pipeline as a bubble;
/// this is what lets the machine drain at the end of a program instead of
/// retiring an endless stream of NOPs.
pub fn fetch_stage(pc: u16, imem: &InstrMemory) -> Latch<IfIdEntry> {
    let raw = imem.fetch(pc);
    if raw == NOP_WORD {
        Latch::Bubble
    } else {
        Latch::Stage(IfIdEntry {
            pc_plus1: pc.wrapping_add(1),
            raw,
        })
    }
}
