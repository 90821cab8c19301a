//! Instruction Decode (ID) stage.
//!
//! This module implements the second pipeline stage. It performs:
//! 1. **Decoding:** Raw bits to typed instruction and control signals.
//! 2. **Register read:** Source operands from the register file, after the
//!    same-cycle write-back update.
//! 3. **Early forwarding:** Operand bypass for branch comparison and `JR`
//!    targets (ID/EX over EX/MEM over MEM/WB).
//! 4. **Control-flow resolution:** Branch, `JUMP`/`JAL`, and `JR` targets,
//!    reported to the engine as a redirect.

use crate::core::arch::RegisterFile;
use crate::core::pipeline::hazards::{Forward, WbForward, forward_operand_id};
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, IfIdEntry, Latch};
use crate::core::pipeline::signals::{control_for, destination_of};
use crate::isa::{Instruction, decode};

/// Kind of control transfer resolved in decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedirectKind {
    /// A taken conditional branch.
    Branch,
    /// `JUMP` (no link).
    Jump,
    /// `JAL` (link value flows on to write-back).
    Jal,
    /// `JR` through a register.
    Jr,
}

/// A resolved control transfer: the next PC and what caused it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// What kind of transfer fired.
    pub kind: RedirectKind,
    /// The word address to fetch next.
    pub target: u16,
}

/// Combinational outputs of the decode stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodeOutput {
    /// The new ID/EX latch value.
    pub id_ex: Latch<IdExEntry>,
    /// Control transfer resolved this cycle, if any.
    pub redirect: Option<Redirect>,
    /// Early forwards that fired for branch comparison or `JR`.
    pub forwards: Vec<Forward>,
}

/// Executes the decode stage on the cycle-start IF/ID latch.
///
/// `ex_bypass` is the register write the execute stage is producing this
/// very cycle (destination and value), the highest-priority early source.
/// A bubble in IF/ID yields a bubble and no redirect.
pub fn decode_stage(
    if_id: &Latch<IfIdEntry>,
    regs: &RegisterFile,
    ex_bypass: Option<&(usize, u16)>,
    ex_mem: &Latch<ExMemEntry>,
    wb: Option<&WbForward>,
) -> DecodeOutput {
    let Some(fetched) = if_id.stage() else {
        return DecodeOutput::default();
    };

    let inst = decode(fetched.raw);
    let ctrl = control_for(&inst);
    let (rs, rt) = inst.source_fields();
    let write_reg = destination_of(&inst, &ctrl);
    let imm = inst.immediate();

    let mut rs_val = regs.read(rs);
    let mut rt_val = regs.read(rt);
    let mut forwards = Vec::new();
    let mut redirect = None;

    match inst {
        Instruction::Beq { offset, .. } | Instruction::Bne { offset, .. } => {
            if let Some(f) = forward_operand_id(rs, ex_bypass, ex_mem, wb) {
                rs_val = f.value;
                forwards.push(f);
            }
            if let Some(f) = forward_operand_id(rt, ex_bypass, ex_mem, wb) {
                rt_val = f.value;
                forwards.push(f);
            }
            let equal = rs_val == rt_val;
            let taken = match inst {
                Instruction::Beq { .. } => equal,
                _ => !equal,
            };
            if taken {
                redirect = Some(Redirect {
                    kind: RedirectKind::Branch,
                    target: fetched.pc_plus1.wrapping_add(offset as u16),
                });
            }
        }
        Instruction::Jump { addr } => {
            redirect = Some(Redirect {
                kind: RedirectKind::Jump,
                target: jump_target(fetched.pc_plus1, addr),
            });
        }
        Instruction::Jal { addr } => {
            redirect = Some(Redirect {
                kind: RedirectKind::Jal,
                target: jump_target(fetched.pc_plus1, addr),
            });
        }
        Instruction::Jr { rs } => {
            if let Some(f) = forward_operand_id(rs, ex_bypass, ex_mem, wb) {
                rs_val = f.value;
                forwards.push(f);
            }
            redirect = Some(Redirect {
                kind: RedirectKind::Jr,
                target: rs_val,
            });
        }
        _ => {}
    }

    // Squash everything that transferred control, except JAL: its link write
    // still has to travel to write-back.
    let id_ex = match redirect {
        Some(r) if r.kind != RedirectKind::Jal => Latch::Bubble,
        _ => Latch::Stage(IdExEntry {
            pc_plus1: fetched.pc_plus1,
            raw: fetched.raw,
            rs,
            rt,
            write_reg,
            rs_val,
            rt_val,
            imm,
            ctrl,
        }),
    };

    DecodeOutput {
        id_ex,
        redirect,
        forwards,
    }
}

/// Composes a J-type target: the upper four bits of the successor PC with
/// the 12-bit encoded address.
fn jump_target(pc_plus1: u16, addr: u16) -> u16 {
    (pc_plus1 & 0xF000) | addr
}
