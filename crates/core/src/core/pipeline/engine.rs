//! The pipeline engine: one clock edge per call.
//!
//! `tick` evaluates the combinational outputs of all five stages against the
//! cycle-start latches, then commits the new latch values, architectural
//! writes, and counters in one step. Evaluation order within the cycle:
//! 1. **Hazard check** on the cycle-start latches.
//! 2. **WB** first, so decode observes same-cycle register writes.
//! 3. **EX** and **MEM**, both reading cycle-start latches.
//! 4. **ID** with early forwarding (including the EX result just computed),
//!    resolving control transfers.
//! 5. **IF**, suppressed by a stall (front end frozen) or a redirect (the
//!    wrong-path fetch is flushed to a bubble).

use tracing::{debug, trace};

use crate::common::constants::NOP_WORD;
use crate::core::Cpu;
use crate::core::pipeline::hazards::{Forward, StallCause, detect_stall};
use crate::core::pipeline::latches::{ExMemEntry, Latch};
use crate::core::pipeline::stages::{
    MemoryWarning, Redirect, decode_stage, execute_stage, fetch_stage, memory_stage,
    writeback_stage,
};

/// Which instruction occupied each stage during a cycle (`None` = bubble).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageOccupancy {
    /// Encoding being fetched.
    pub fetch: Option<u16>,
    /// Encoding being decoded (IF/ID).
    pub decode: Option<u16>,
    /// Encoding being executed (ID/EX).
    pub execute: Option<u16>,
    /// Encoding in the memory stage (EX/MEM).
    pub memory: Option<u16>,
    /// Encoding in write-back (MEM/WB).
    pub writeback: Option<u16>,
}

/// Everything observable about one executed cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CycleEvents {
    /// The cycle number this record describes (1-based).
    pub cycle: u64,
    /// Stage occupancy at the start of the cycle.
    pub stages: StageOccupancy,
    /// Stall asserted by the hazard unit, if any.
    pub stall: Option<StallCause>,
    /// Forward that satisfied ALU input A.
    pub forward_a: Option<Forward>,
    /// Forward that satisfied ALU input B.
    pub forward_b: Option<Forward>,
    /// Early forwards fired in decode for branch compare or `JR`.
    pub id_forwards: Vec<Forward>,
    /// Control transfer resolved in decode, if any.
    pub control: Option<Redirect>,
    /// Whether a latch was flushed this cycle.
    pub flush: bool,
    /// Uninitialized-read warning from the memory stage.
    pub memory_warning: Option<MemoryWarning>,
    /// Whether a valid instruction retired this cycle.
    pub retired: bool,
}

impl CycleEvents {
    /// Whether any forwarding path (execute or decode) fired this cycle.
    pub fn any_forward(&self) -> bool {
        self.forward_a.is_some() || self.forward_b.is_some() || !self.id_forwards.is_empty()
    }
}

/// Advances the machine by exactly one clock edge.
pub fn tick(cpu: &mut Cpu) -> CycleEvents {
    let fetch_word = cpu.imem.fetch(cpu.pc);
    let stages = StageOccupancy {
        fetch: (fetch_word != NOP_WORD).then_some(fetch_word),
        decode: cpu.if_id.stage().map(|e| e.raw),
        execute: cpu.id_ex.stage().map(|e| e.raw),
        memory: cpu.ex_mem.stage().map(|e| e.raw),
        writeback: cpu.mem_wb.stage().map(|e| e.raw),
    };

    let stall = detect_stall(&cpu.if_id, &cpu.id_ex, &cpu.ex_mem);

    // Write-back commits first: a register written and read in the same
    // cycle must read the new value.
    let wb = writeback_stage(&cpu.mem_wb, &mut cpu.regs);

    let ex_out = execute_stage(&cpu.id_ex, &cpu.ex_mem, wb.forward.as_ref());
    let mem_out = memory_stage(&cpu.ex_mem, &mut cpu.dmem);

    let mut id_forwards = Vec::new();
    let mut control = None;
    let mut flush = false;
    let next_if_id;
    let next_id_ex;
    let next_pc;

    if let Some(cause) = stall {
        // Freeze the front end for one cycle and bubble ID/EX.
        trace!(cycle = cpu.cycle + 1, kind = cause.kind(), "stall");
        next_if_id = cpu.if_id;
        next_id_ex = Latch::Bubble;
        next_pc = cpu.pc;
    } else {
        let ex_bypass = bypass_of(&ex_out.ex_mem);
        let dec = decode_stage(
            &cpu.if_id,
            &cpu.regs,
            ex_bypass.as_ref(),
            &cpu.ex_mem,
            wb.forward.as_ref(),
        );
        id_forwards = dec.forwards;
        next_id_ex = dec.id_ex;

        if let Some(redirect) = dec.redirect {
            debug!(
                cycle = cpu.cycle + 1,
                target = redirect.target,
                kind = ?redirect.kind,
                "control transfer"
            );
            // The instruction fetched this cycle is on the wrong path.
            next_if_id = Latch::Bubble;
            next_pc = redirect.target;
            flush = true;
            control = Some(redirect);
        } else {
            next_if_id = fetch_stage(cpu.pc, &cpu.imem);
            next_pc = cpu.pc.wrapping_add(1);
        }
    }

    // Commit the edge.
    cpu.mem_wb = mem_out.mem_wb;
    cpu.ex_mem = ex_out.ex_mem;
    cpu.id_ex = next_id_ex;
    cpu.if_id = next_if_id;
    cpu.pc = next_pc;
    cpu.cycle += 1;

    cpu.counters.cycles += 1;
    if wb.retired {
        cpu.counters.instructions_retired += 1;
    }
    if stall.is_some() {
        cpu.counters.stalls += 1;
    }
    if flush {
        cpu.counters.flushes += 1;
    }

    let events = CycleEvents {
        cycle: cpu.cycle,
        stages,
        stall,
        forward_a: ex_out.forward_a,
        forward_b: ex_out.forward_b,
        id_forwards,
        control,
        flush,
        memory_warning: mem_out.warning,
        retired: wb.retired,
    };
    if events.any_forward() {
        cpu.counters.forwards += 1;
        for f in events
            .forward_a
            .iter()
            .chain(events.forward_b.iter())
            .chain(events.id_forwards.iter())
        {
            trace!(cycle = cpu.cycle, %f, "forward");
        }
    }
    events
}

/// The register write the execute stage is producing this cycle, used as
/// the highest-priority early forwarding source in decode. Loads are
/// excluded: their data does not exist until the memory stage completes.
fn bypass_of(ex_mem: &Latch<ExMemEntry>) -> Option<(usize, u16)> {
    let entry = ex_mem.stage()?;
    if entry.ctrl.reg_write && !entry.ctrl.mem_read && entry.write_reg != 0 {
        let value = match entry.ctrl.wb_src {
            crate::core::pipeline::signals::WbSrc::PcPlus1 => entry.pc_plus1,
            _ => entry.alu_result,
        };
        Some((entry.write_reg, value))
    } else {
        None
    }
}
