//! Serialized state views.
//!
//! These types define the external snapshot schema. Every observer-facing
//! structure here is an owned deep copy: later steps can never mutate a view
//! that has already been handed out. Word values are displayed as
//! two's-complement signed integers; encodings as `0xHHHH` strings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::Cpu;
use crate::core::pipeline::hazards::{Forward, StallCause};
use crate::core::pipeline::latches::Latch;
use crate::core::pipeline::stages::{MemoryWarning, Redirect, RedirectKind};
use crate::core::pipeline::CycleEvents;
use crate::isa::{disassemble, reg_name};
use crate::sim::timeline::{self, ForwardRecord, StallRecord, TimelineRow};

/// The complete serialized machine view returned by every operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CpuState {
    /// Word address of the next fetch.
    pub pc: u16,
    /// Clock edges executed since reset.
    pub cycle: u64,
    /// Register values `$r0`..`$r7`, displayed signed.
    pub registers: [i16; 8],
    /// Written data-memory words, address ascending, displayed signed.
    pub data_memory: BTreeMap<u16, i16>,
    /// Fetch-to-decode latch.
    #[serde(rename = "IF_ID")]
    pub if_id: IfIdView,
    /// Decode-to-execute latch.
    #[serde(rename = "ID_EX")]
    pub id_ex: IdExView,
    /// Execute-to-memory latch.
    #[serde(rename = "EX_MEM")]
    pub ex_mem: ExMemView,
    /// Memory-to-write-back latch.
    #[serde(rename = "MEM_WB")]
    pub mem_wb: MemWbView,
    /// Forward that satisfied ALU input A in the last cycle.
    pub forward_a: Option<ForwardView>,
    /// Forward that satisfied ALU input B in the last cycle.
    pub forward_b: Option<ForwardView>,
    /// Whether the hazard unit asserted a stall in the last cycle.
    pub is_stalling: bool,
    /// What stalled, when `is_stalling`.
    pub stall_info: Option<StallView>,
    /// Control transfer resolved in the last cycle.
    pub control_hazard: Option<ControlHazardView>,
    /// Whether a latch was flushed in the last cycle.
    pub flush_occurred: bool,
    /// Uninitialized-read warning from the last cycle.
    pub memory_warning: Option<MemoryWarningView>,
    /// Per-instruction pipeline timeline since reset.
    pub pipeline_history: Vec<TimelineRow>,
    /// Stall events since reset.
    pub stall_history: Vec<StallRecord>,
    /// Forward events since reset.
    pub forward_history: Vec<ForwardRecord>,
    /// Performance counters and derived rates.
    pub performance: PerformanceView,
}

/// IF/ID latch view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IfIdView {
    /// False for a bubble.
    pub valid: bool,
    /// Canonical disassembly of the held instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disasm: Option<String>,
    /// Held encoding as `0xHHHH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    /// Sequential successor of the fetch address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc_plus1: Option<u16>,
}

/// ID/EX latch view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IdExView {
    /// False for a bubble.
    pub valid: bool,
    /// Canonical disassembly of the held instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disasm: Option<String>,
    /// Captured `rs` operand value (signed display).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rs_val: Option<i16>,
    /// Captured `rt` operand value (signed display).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt_val: Option<i16>,
    /// Sign-extended immediate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imm: Option<i16>,
    /// Destination register, when one is written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_reg: Option<String>,
}

/// EX/MEM latch view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExMemView {
    /// False for a bubble.
    pub valid: bool,
    /// Canonical disassembly of the held instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disasm: Option<String>,
    /// ALU result (signed display).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alu_result: Option<i16>,
    /// Store data captured in execute (signed display).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_data: Option<i16>,
    /// Destination register, when one is written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_reg: Option<String>,
}

/// MEM/WB latch view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemWbView {
    /// False for a bubble.
    pub valid: bool,
    /// Canonical disassembly of the held instruction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disasm: Option<String>,
    /// ALU result carried past memory (signed display).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alu_result: Option<i16>,
    /// Loaded data (signed display).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mem_data: Option<i16>,
    /// Destination register, when one is written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_reg: Option<String>,
}

/// One forwarding event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ForwardView {
    /// Supplying latch: `EX_MEM`, `MEM_WB`, or `ID_EX`.
    pub source: String,
    /// Satisfied register as `$rN`.
    pub reg: String,
    /// Forwarded value (signed display).
    pub value: i16,
}

impl ForwardView {
    /// Converts an internal forwarding event to its view.
    pub fn from_forward(f: &Forward) -> Self {
        Self {
            source: f.source.name().to_string(),
            reg: reg_name(f.reg).to_string(),
            value: f.value as i16,
        }
    }
}

/// One stall event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StallView {
    /// Stall kind: `LoadUse` or `BranchLoad`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The contested register as `$rN`.
    pub reg: String,
}

impl StallView {
    /// Converts an internal stall cause to its view.
    pub fn from_cause(cause: &StallCause) -> Self {
        Self {
            kind: cause.kind().to_string(),
            reg: reg_name(cause.reg()).to_string(),
        }
    }
}

/// A resolved control transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ControlHazardView {
    /// Transfer kind: `Branch`, `Jump`, or `JR`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The redirected fetch address.
    pub target_address: u16,
}

impl ControlHazardView {
    /// Converts an internal redirect to its view.
    pub fn from_redirect(r: &Redirect) -> Self {
        let kind = match r.kind {
            RedirectKind::Branch => "Branch",
            RedirectKind::Jump | RedirectKind::Jal => "Jump",
            RedirectKind::Jr => "JR",
        };
        Self {
            kind: kind.to_string(),
            target_address: r.target,
        }
    }
}

/// A non-fatal memory warning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemoryWarningView {
    /// Warning kind; always `UninitializedRead`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The word address that was read.
    pub address: u16,
}

impl MemoryWarningView {
    /// Converts an internal memory warning to its view.
    pub fn from_warning(w: &MemoryWarning) -> Self {
        Self {
            kind: "UninitializedRead".to_string(),
            address: w.address,
        }
    }
}

/// Performance counters and derived rates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformanceView {
    /// Total clock cycles.
    pub cycles: u64,
    /// Instructions retired.
    pub instructions: u64,
    /// Cycles per instruction; `null` until the first retirement.
    pub cpi: Option<f64>,
    /// Fraction of cycles stalled.
    pub stall_rate: f64,
    /// Fraction of cycles with at least one forward.
    pub forward_rate: f64,
    /// Number of flush cycles.
    pub flush_count: u64,
}

/// Builds the complete serialized view of a machine and its cycle trace.
pub fn cpu_state(cpu: &Cpu, trace: &[CycleEvents]) -> CpuState {
    let last = trace.last();

    let registers = {
        let snap = cpu.regs.snapshot();
        let mut out = [0i16; 8];
        for (dst, src) in out.iter_mut().zip(snap.iter()) {
            *dst = *src as i16;
        }
        out
    };

    CpuState {
        pc: cpu.pc,
        cycle: cpu.cycle,
        registers,
        data_memory: cpu.dmem.iter().map(|(a, v)| (a, v as i16)).collect(),
        if_id: if_id_view(&cpu.if_id),
        id_ex: id_ex_view(&cpu.id_ex),
        ex_mem: ex_mem_view(&cpu.ex_mem),
        mem_wb: mem_wb_view(&cpu.mem_wb),
        forward_a: last.and_then(|e| e.forward_a.as_ref().map(ForwardView::from_forward)),
        forward_b: last.and_then(|e| e.forward_b.as_ref().map(ForwardView::from_forward)),
        is_stalling: last.is_some_and(|e| e.stall.is_some()),
        stall_info: last.and_then(|e| e.stall.as_ref().map(StallView::from_cause)),
        control_hazard: last.and_then(|e| e.control.as_ref().map(ControlHazardView::from_redirect)),
        flush_occurred: last.is_some_and(|e| e.flush),
        memory_warning: last
            .and_then(|e| e.memory_warning.as_ref().map(MemoryWarningView::from_warning)),
        pipeline_history: timeline::build_timeline(trace),
        stall_history: timeline::stall_history(trace),
        forward_history: timeline::forward_history(trace),
        performance: PerformanceView {
            cycles: cpu.counters.cycles,
            instructions: cpu.counters.instructions_retired,
            cpi: cpu.counters.cpi(),
            stall_rate: cpu.counters.stall_rate(),
            forward_rate: cpu.counters.forward_rate(),
            flush_count: cpu.counters.flushes,
        },
    }
}

fn write_reg_view(write_reg: usize) -> Option<String> {
    (write_reg != 0).then(|| reg_name(write_reg).to_string())
}

fn if_id_view(latch: &Latch<crate::core::pipeline::latches::IfIdEntry>) -> IfIdView {
    match latch.stage() {
        None => IfIdView::default(),
        Some(e) => IfIdView {
            valid: true,
            disasm: Some(disassemble(e.raw)),
            instruction: Some(format!("0x{:04X}", e.raw)),
            pc_plus1: Some(e.pc_plus1),
        },
    }
}

fn id_ex_view(latch: &Latch<crate::core::pipeline::latches::IdExEntry>) -> IdExView {
    match latch.stage() {
        None => IdExView::default(),
        Some(e) => IdExView {
            valid: true,
            disasm: Some(disassemble(e.raw)),
            rs_val: Some(e.rs_val as i16),
            rt_val: Some(e.rt_val as i16),
            imm: Some(e.imm),
            write_reg: write_reg_view(e.write_reg),
        },
    }
}

fn ex_mem_view(latch: &Latch<crate::core::pipeline::latches::ExMemEntry>) -> ExMemView {
    match latch.stage() {
        None => ExMemView::default(),
        Some(e) => ExMemView {
            valid: true,
            disasm: Some(disassemble(e.raw)),
            alu_result: Some(e.alu_result as i16),
            store_data: Some(e.store_data as i16),
            write_reg: write_reg_view(e.write_reg),
        },
    }
}

fn mem_wb_view(latch: &Latch<crate::core::pipeline::latches::MemWbEntry>) -> MemWbView {
    match latch.stage() {
        None => MemWbView::default(),
        Some(e) => MemWbView {
            valid: true,
            disasm: Some(disassemble(e.raw)),
            alu_result: Some(e.alu_result as i16),
            mem_data: Some(e.mem_data as i16),
            write_reg: write_reg_view(e.write_reg),
        },
    }
}
