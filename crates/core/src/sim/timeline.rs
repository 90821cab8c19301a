//! Timeline reconstruction.
//!
//! Rebuilds the per-instruction pipeline diagram from the per-cycle trace:
//! for every instruction (keyed by its 16-bit encoding, in first-appearance
//! order) the first cycle it occupied IF, every cycle it occupied ID, EX,
//! and MEM (repetition marks a stall), and the first cycle it reached WB.
//! ID cells carry a stall flag for cycles in which the hazard unit froze
//! the front end.

use serde::Serialize;

use crate::core::pipeline::CycleEvents;
use crate::isa::disassemble;
use crate::sim::view::{ForwardView, StallView};

/// Pipeline stage names as displayed on the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StageName {
    /// Instruction fetch.
    If,
    /// Instruction decode.
    Id,
    /// Execute.
    Ex,
    /// Memory access.
    Mem,
    /// Write-back.
    Wb,
}

/// One occupied cell of the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TimelineCell {
    /// Cycle number (1-based).
    pub cycle: u64,
    /// Stage occupied during that cycle.
    pub stage: StageName,
    /// Whether a stall was asserted while the instruction sat in decode.
    pub stalled: bool,
}

/// The timeline of one instruction encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimelineRow {
    /// Encoding formatted as `0xHHHH` (the row key).
    pub instr: String,
    /// Canonical disassembly for display.
    pub disasm: String,
    /// Occupied cells in cycle order.
    pub cells: Vec<TimelineCell>,
}

/// One stall event on the stall history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StallRecord {
    /// Cycle the stall was asserted in (1-based).
    pub cycle: u64,
    /// What stalled.
    pub info: StallView,
}

/// All forwards fired during one cycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForwardRecord {
    /// Cycle the forwards fired in (1-based).
    pub cycle: u64,
    /// Every forward of that cycle (execute and decode stage).
    pub forwards: Vec<ForwardView>,
}

/// Rebuilds the per-instruction timeline from the cycle trace.
pub fn build_timeline(trace: &[CycleEvents]) -> Vec<TimelineRow> {
    let mut keys: Vec<u16> = Vec::new();
    let mut rows: Vec<TimelineRow> = Vec::new();

    for events in trace {
        let occupancy = [
            (StageName::If, events.stages.fetch),
            (StageName::Id, events.stages.decode),
            (StageName::Ex, events.stages.execute),
            (StageName::Mem, events.stages.memory),
            (StageName::Wb, events.stages.writeback),
        ];
        for (stage, occupant) in occupancy {
            let Some(raw) = occupant else { continue };
            let idx = match keys.iter().position(|&k| k == raw) {
                Some(idx) => idx,
                None => {
                    keys.push(raw);
                    rows.push(TimelineRow {
                        instr: format!("0x{raw:04X}"),
                        disasm: disassemble(raw),
                        cells: Vec::new(),
                    });
                    rows.len() - 1
                }
            };
            let row = &mut rows[idx];

            // IF and WB report only their first cycle; the middle stages
            // repeat, and repetition is how a stall shows up.
            let first_only = matches!(stage, StageName::If | StageName::Wb);
            if first_only && row.cells.iter().any(|c| c.stage == stage) {
                continue;
            }
            row.cells.push(TimelineCell {
                cycle: events.cycle,
                stage,
                stalled: stage == StageName::Id && events.stall.is_some(),
            });
        }
    }

    rows
}

/// Extracts the cycles in which the hazard unit asserted a stall.
pub fn stall_history(trace: &[CycleEvents]) -> Vec<StallRecord> {
    trace
        .iter()
        .filter_map(|events| {
            events.stall.map(|cause| StallRecord {
                cycle: events.cycle,
                info: StallView::from_cause(&cause),
            })
        })
        .collect()
}

/// Extracts the cycles in which at least one forwarding path fired.
pub fn forward_history(trace: &[CycleEvents]) -> Vec<ForwardRecord> {
    trace
        .iter()
        .filter(|events| events.any_forward())
        .map(|events| ForwardRecord {
            cycle: events.cycle,
            forwards: events
                .forward_a
                .iter()
                .chain(events.forward_b.iter())
                .chain(events.id_forwards.iter())
                .map(ForwardView::from_forward)
                .collect(),
        })
        .collect()
}
