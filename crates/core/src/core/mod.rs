//! CPU architectural and microarchitectural state.

/// Register file and memories.
pub mod arch;
/// The five-stage pipeline.
pub mod pipeline;

use crate::asm::Program;
use crate::common::constants::NOP_WORD;
use crate::core::arch::{DataMemory, InstrMemory, RegisterFile};
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, IfIdEntry, Latch, MemWbEntry};
use crate::stats::PerfCounters;

/// Complete machine state: architectural registers and memories, the
/// program counter, the four pipeline latches, and performance counters.
///
/// Created when a program is assembled; mutated only by
/// [`pipeline::tick`]; replaced wholesale by reset or re-assembly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cpu {
    /// Word address of the next instruction to fetch.
    pub pc: u16,
    /// Number of clock edges executed since reset.
    pub cycle: u64,
    /// The architectural register file.
    pub regs: RegisterFile,
    /// Instruction memory, populated from the assembled program.
    pub imem: InstrMemory,
    /// Sparse data memory.
    pub dmem: DataMemory,
    /// Fetch-to-decode latch.
    pub if_id: Latch<IfIdEntry>,
    /// Decode-to-execute latch.
    pub id_ex: Latch<IdExEntry>,
    /// Execute-to-memory latch.
    pub ex_mem: Latch<ExMemEntry>,
    /// Memory-to-write-back latch.
    pub mem_wb: Latch<MemWbEntry>,
    /// Running performance counters.
    pub counters: PerfCounters,
}

impl Cpu {
    /// Creates a zeroed machine with the given program loaded.
    pub fn with_program(program: &Program) -> Self {
        let mut imem = InstrMemory::new();
        for record in &program.instructions {
            imem.store(record.address, record.raw);
        }
        Self {
            imem,
            ..Self::default()
        }
    }

    /// Whether execution has halted: the PC addresses the all-zero NOP word
    /// and all four latches have drained to bubbles.
    pub fn halted(&self) -> bool {
        self.imem.fetch(self.pc) == NOP_WORD
            && self.if_id.is_bubble()
            && self.id_ex.is_bubble()
            && self.ex_mem.is_bubble()
            && self.mem_wb.is_bubble()
    }
}
