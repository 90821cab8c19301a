//! Memory (MEM) stage.
//!
//! Performs the data-memory write and/or read for the instruction in EX/MEM.
//! Addresses are the low 9 bits of the ALU result. Reads of never-written
//! addresses return 0 and raise a non-fatal uninitialized-read warning on
//! the cycle's snapshot.

use crate::common::constants::DMEM_ADDR_MASK;
use crate::core::arch::DataMemory;
use crate::core::pipeline::latches::{ExMemEntry, Latch, MemWbEntry};

/// A non-fatal warning raised by the memory stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryWarning {
    /// The word address that was read before ever being written.
    pub address: u16,
}

/// Combinational outputs of the memory stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryOutput {
    /// The new MEM/WB latch value.
    pub mem_wb: Latch<MemWbEntry>,
    /// Uninitialized-read warning, if one occurred.
    pub warning: Option<MemoryWarning>,
}

/// Executes the MEM stage on the cycle-start EX/MEM latch.
pub fn memory_stage(ex_mem: &Latch<ExMemEntry>, dmem: &mut DataMemory) -> MemoryOutput {
    let Some(entry) = ex_mem.stage() else {
        return MemoryOutput::default();
    };

    let address = entry.alu_result & DMEM_ADDR_MASK;

    if entry.ctrl.mem_write {
        dmem.write(address, entry.store_data);
    }

    let mut warning = None;
    let mem_data = if entry.ctrl.mem_read {
        let (value, initialized) = dmem.read(address);
        if !initialized {
            warning = Some(MemoryWarning { address });
        }
        value
    } else {
        0
    };

    MemoryOutput {
        mem_wb: Latch::Stage(MemWbEntry {
            pc_plus1: entry.pc_plus1,
            raw: entry.raw,
            alu_result: entry.alu_result,
            mem_data,
            write_reg: entry.write_reg,
            ctrl: entry.ctrl,
        }),
        warning,
    }
}
