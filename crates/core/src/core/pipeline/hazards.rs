//! Hazard detection and operand forwarding.
//!
//! This module keeps pipelined execution consistent with sequential
//! semantics. It provides:
//! 1. **Stall detection:** The two front-end freeze conditions (load-use,
//!    and a branch in decode depending on a load still in memory).
//! 2. **Execute forwarding:** Priority-encoded selection of ALU operands
//!    from EX/MEM over MEM/WB.
//! 3. **Decode forwarding:** Early operand bypass for branch comparison and
//!    `JR` targets, with priority ID/EX over EX/MEM over MEM/WB.
//!
//! Forwarding never satisfies a load whose data only becomes available at
//! MEM/WB; that is exactly what the stall conditions exist for.

use crate::isa::{InstructionBits, opcodes, reg_name};
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, IfIdEntry, Latch, MemWbEntry};
use crate::core::pipeline::signals::WbSrc;

/// Why the front end was frozen for one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StallCause {
    /// An instruction in decode uses the register a load in execute is about
    /// to produce.
    LoadUse {
        /// The contested register.
        reg: usize,
    },
    /// A branch resolving in decode needs the register a load still in the
    /// memory stage is about to produce.
    BranchLoad {
        /// The contested register.
        reg: usize,
    },
}

impl StallCause {
    /// Stable kind name used in serialized views.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LoadUse { .. } => "LoadUse",
            Self::BranchLoad { .. } => "BranchLoad",
        }
    }

    /// The contested register.
    pub fn reg(&self) -> usize {
        match *self {
            Self::LoadUse { reg } | Self::BranchLoad { reg } => reg,
        }
    }
}

/// A forwarding event: one operand satisfied from a pipeline latch instead
/// of the register file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Forward {
    /// Which latch supplied the value.
    pub source: ForwardSource,
    /// The register being satisfied.
    pub reg: usize,
    /// The forwarded value.
    pub value: u16,
}

/// The latch a forwarded value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForwardSource {
    /// The execute result being computed this cycle (decode-stage bypass).
    IdEx,
    /// The EX/MEM latch.
    ExMem,
    /// The MEM/WB latch (the write-back mux output for this cycle).
    MemWb,
}

impl ForwardSource {
    /// Stable source name used in serialized views.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IdEx => "ID_EX",
            Self::ExMem => "EX_MEM",
            Self::MemWb => "MEM_WB",
        }
    }
}

/// The register write that write-back performs this cycle, reusable as the
/// lowest-priority forwarding source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WbForward {
    /// Destination register (never 0).
    pub dest: usize,
    /// The write-back mux output.
    pub value: u16,
}

/// Checks whether the front end must stall this cycle.
///
/// Register uses are matched on the raw IF/ID register fields, as the
/// hardware would: the comparators do not know whether the instruction in
/// decode actually reads those fields.
pub fn detect_stall(
    if_id: &Latch<IfIdEntry>,
    id_ex: &Latch<IdExEntry>,
    ex_mem: &Latch<ExMemEntry>,
) -> Option<StallCause> {
    let fetched = if_id.stage()?;
    let rs = fetched.raw.rs();
    let rt = fetched.raw.rt();

    // Load-use: the load is still computing its address in execute.
    if let Some(ex) = id_ex.stage() {
        if ex.ctrl.mem_read && ex.rt != 0 && (ex.rt == rs || ex.rt == rt) {
            return Some(StallCause::LoadUse { reg: ex.rt });
        }
    }

    // A branch resolves in decode; a load in the memory stage cannot be
    // forwarded there until it reaches MEM/WB.
    let opcode = fetched.raw.opcode();
    if opcode == opcodes::OP_BEQ || opcode == opcodes::OP_BNE {
        if let Some(mem) = ex_mem.stage() {
            if mem.ctrl.mem_read
                && mem.write_reg != 0
                && (mem.write_reg == rs || mem.write_reg == rt)
            {
                return Some(StallCause::BranchLoad { reg: mem.write_reg });
            }
        }
    }

    None
}

/// The value an EX/MEM entry would write back, for forwarding.
///
/// Loads are excluded from forwarding out of EX/MEM (their data does not
/// exist yet), so the only non-ALU case is the `JAL` link value.
fn ex_mem_value(entry: &ExMemEntry) -> u16 {
    match entry.ctrl.wb_src {
        WbSrc::PcPlus1 => entry.pc_plus1,
        WbSrc::Alu | WbSrc::Mem => entry.alu_result,
    }
}

/// Computes the write-back mux output of a MEM/WB entry, gated on a live
/// register write.
pub fn wb_forward(mem_wb: &Latch<MemWbEntry>) -> Option<WbForward> {
    let entry = mem_wb.stage()?;
    if !entry.ctrl.reg_write || entry.write_reg == 0 {
        return None;
    }
    let value = match entry.ctrl.wb_src {
        WbSrc::Alu => entry.alu_result,
        WbSrc::Mem => entry.mem_data,
        WbSrc::PcPlus1 => entry.pc_plus1,
    };
    Some(WbForward {
        dest: entry.write_reg,
        value,
    })
}

/// Execute-stage forwarding for one ALU operand: EX/MEM over MEM/WB.
pub fn forward_operand_ex(
    reg: usize,
    ex_mem: &Latch<ExMemEntry>,
    wb: Option<&WbForward>,
) -> Option<Forward> {
    if reg == 0 {
        return None;
    }
    if let Some(mem) = ex_mem.stage() {
        if mem.ctrl.reg_write && !mem.ctrl.mem_read && mem.write_reg == reg {
            return Some(Forward {
                source: ForwardSource::ExMem,
                reg,
                value: ex_mem_value(mem),
            });
        }
    }
    if let Some(wb) = wb {
        if wb.dest == reg {
            return Some(Forward {
                source: ForwardSource::MemWb,
                reg,
                value: wb.value,
            });
        }
    }
    None
}

/// Decode-stage forwarding for branch comparison and `JR` targets:
/// ID/EX (the execute result of this very cycle) over EX/MEM over MEM/WB.
pub fn forward_operand_id(
    reg: usize,
    ex_bypass: Option<&(usize, u16)>,
    ex_mem: &Latch<ExMemEntry>,
    wb: Option<&WbForward>,
) -> Option<Forward> {
    if reg == 0 {
        return None;
    }
    if let Some(&(dest, value)) = ex_bypass {
        if dest == reg {
            return Some(Forward {
                source: ForwardSource::IdEx,
                reg,
                value,
            });
        }
    }
    if let Some(mem) = ex_mem.stage() {
        if mem.ctrl.reg_write && !mem.ctrl.mem_read && mem.write_reg == reg {
            return Some(Forward {
                source: ForwardSource::ExMem,
                reg,
                value: ex_mem_value(mem),
            });
        }
    }
    if let Some(wb) = wb {
        if wb.dest == reg {
            return Some(Forward {
                source: ForwardSource::MemWb,
                reg,
                value: wb.value,
            });
        }
    }
    None
}

impl std::fmt::Display for Forward {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} <- {} ({})",
            reg_name(self.reg),
            self.value,
            self.source.name()
        )
    }
}
