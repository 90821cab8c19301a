//! Execute (EX) stage.
//!
//! Selects ALU operands through the forwarding network (EX/MEM over MEM/WB),
//! applies the immediate mux, and evaluates the ALU. The post-forwarding
//! `rt` value is captured as store data before the immediate mux, so a
//! forwarded store writes the freshest value.

use crate::core::pipeline::hazards::{Forward, WbForward, forward_operand_ex};
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, Latch};
use crate::core::pipeline::signals::AluOp;

/// Combinational outputs of the execute stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExecuteOutput {
    /// The new EX/MEM latch value.
    pub ex_mem: Latch<ExMemEntry>,
    /// Forward that satisfied ALU input A, if any.
    pub forward_a: Option<Forward>,
    /// Forward that satisfied ALU input B, if any.
    pub forward_b: Option<Forward>,
}

/// Executes the EX stage on the cycle-start ID/EX latch.
pub fn execute_stage(
    id_ex: &Latch<IdExEntry>,
    ex_mem: &Latch<ExMemEntry>,
    wb: Option<&WbForward>,
) -> ExecuteOutput {
    let Some(entry) = id_ex.stage() else {
        return ExecuteOutput::default();
    };

    let forward_a = forward_operand_ex(entry.rs, ex_mem, wb);
    let forward_b = forward_operand_ex(entry.rt, ex_mem, wb);

    let a = forward_a.map_or(entry.rs_val, |f| f.value);
    let b_reg = forward_b.map_or(entry.rt_val, |f| f.value);
    let b = if entry.ctrl.alu_src {
        entry.imm as u16
    } else {
        b_reg
    };

    ExecuteOutput {
        ex_mem: Latch::Stage(ExMemEntry {
            pc_plus1: entry.pc_plus1,
            raw: entry.raw,
            alu_result: alu_eval(entry.ctrl.alu, a, b),
            store_data: b_reg,
            write_reg: entry.write_reg,
            ctrl: entry.ctrl,
        }),
        forward_a,
        forward_b,
    }
}

/// Evaluates one ALU operation on 16-bit operands.
///
/// `SLT` compares as two's-complement signed values.
pub fn alu_eval(op: AluOp, a: u16, b: u16) -> u16 {
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Slt => u16::from((a as i16) < (b as i16)),
    }
}
