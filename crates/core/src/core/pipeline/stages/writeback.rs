//! Write-back (WB) stage.
//!
//! Commits the register write selected by the write-back mux. The engine
//! runs this stage before decode so a register written and read in the same
//! cycle reads the new value.

use crate::core::arch::RegisterFile;
use crate::core::pipeline::hazards::{WbForward, wb_forward};
use crate::core::pipeline::latches::{Latch, MemWbEntry};

/// Result of the write-back stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WbOutcome {
    /// Whether a valid instruction committed this cycle.
    pub retired: bool,
    /// The register write performed, reusable as a forwarding source.
    pub forward: Option<WbForward>,
}

/// Executes the WB stage on the cycle-start MEM/WB latch.
pub fn writeback_stage(mem_wb: &Latch<MemWbEntry>, regs: &mut RegisterFile) -> WbOutcome {
    let retired = !mem_wb.is_bubble();
    let forward = wb_forward(mem_wb);
    if let Some(wb) = &forward {
        regs.write(wb.dest, wb.value);
    }
    WbOutcome { retired, forward }
}
