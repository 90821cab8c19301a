//! Forwarding network tests.
//!
//! Covers the two priority-encoded muxes: execute-stage operand selection
//! (EX/MEM over MEM/WB) and decode-stage early forwarding (ID/EX over
//! EX/MEM over MEM/WB), plus the write-back value mux that feeds both.

use pipevis_core::core::pipeline::hazards::{
    ForwardSource, forward_operand_ex, forward_operand_id, wb_forward,
};
use pipevis_core::core::pipeline::latches::{ExMemEntry, Latch, MemWbEntry};
use pipevis_core::core::pipeline::signals::{ControlSignals, WbSrc};

fn alu_in_mem(write_reg: usize, alu_result: u16) -> Latch<ExMemEntry> {
    Latch::Stage(ExMemEntry {
        write_reg,
        alu_result,
        ctrl: ControlSignals {
            reg_write: true,
            ..Default::default()
        },
        ..Default::default()
    })
}

fn load_in_mem(write_reg: usize, address: u16) -> Latch<ExMemEntry> {
    Latch::Stage(ExMemEntry {
        write_reg,
        alu_result: address,
        ctrl: ControlSignals {
            reg_write: true,
            mem_read: true,
            wb_src: WbSrc::Mem,
            ..Default::default()
        },
        ..Default::default()
    })
}

fn retiring(write_reg: usize, wb_src: WbSrc, alu: u16, mem: u16, pc_plus1: u16) -> Latch<MemWbEntry> {
    Latch::Stage(MemWbEntry {
        write_reg,
        alu_result: alu,
        mem_data: mem,
        pc_plus1,
        ctrl: ControlSignals {
            reg_write: true,
            wb_src,
            ..Default::default()
        },
        ..Default::default()
    })
}

// ══════════════════════════════════════════════════════════
// 1. Write-back value mux
// ══════════════════════════════════════════════════════════

#[test]
fn wb_mux_selects_alu_memory_or_link() {
    let alu = wb_forward(&retiring(1, WbSrc::Alu, 42, 0, 0)).unwrap();
    assert_eq!(alu.value, 42);

    let mem = wb_forward(&retiring(1, WbSrc::Mem, 9, 77, 0)).unwrap();
    assert_eq!(mem.value, 77, "loads forward their memory data");

    let link = wb_forward(&retiring(7, WbSrc::PcPlus1, 0, 0, 5)).unwrap();
    assert_eq!(link.value, 5, "JAL forwards its return address");
}

#[test]
fn wb_mux_gates_on_register_write() {
    let mut entry = MemWbEntry {
        write_reg: 3,
        alu_result: 42,
        ..Default::default()
    };
    assert_eq!(wb_forward(&Latch::Stage(entry)), None, "no RegWrite, no forward");

    entry.ctrl.reg_write = true;
    entry.write_reg = 0;
    assert_eq!(wb_forward(&Latch::Stage(entry)), None, "$r0 is never forwarded");
}

// ══════════════════════════════════════════════════════════
// 2. Execute-stage priority: EX/MEM over MEM/WB
// ══════════════════════════════════════════════════════════

#[test]
fn ex_mem_wins_over_mem_wb() {
    let newer = alu_in_mem(4, 100);
    let older = wb_forward(&retiring(4, WbSrc::Alu, 200, 0, 0));

    let fwd = forward_operand_ex(4, &newer, older.as_ref()).unwrap();
    assert_eq!(fwd.source, ForwardSource::ExMem);
    assert_eq!(fwd.value, 100, "the younger producer's value wins");
}

#[test]
fn mem_wb_fills_in_when_ex_mem_misses() {
    let unrelated = alu_in_mem(2, 100);
    let older = wb_forward(&retiring(4, WbSrc::Alu, 200, 0, 0));

    let fwd = forward_operand_ex(4, &unrelated, older.as_ref()).unwrap();
    assert_eq!(fwd.source, ForwardSource::MemWb);
    assert_eq!(fwd.value, 200);
}

#[test]
fn loads_never_forward_from_ex_mem() {
    // A load in EX/MEM has only its address; the dependent must take the
    // MEM/WB path (or, without an intervening instruction, a stall).
    let load = load_in_mem(4, 0x10);
    assert_eq!(forward_operand_ex(4, &load, None), None);
}

#[test]
fn r0_is_never_forwarded() {
    let producer = alu_in_mem(0, 99);
    assert_eq!(forward_operand_ex(0, &producer, None), None);
}

// ══════════════════════════════════════════════════════════
// 3. Decode-stage priority: ID/EX over EX/MEM over MEM/WB
// ══════════════════════════════════════════════════════════

#[test]
fn current_cycle_execute_result_wins_in_decode() {
    let bypass = (6usize, 11u16);
    let mem = alu_in_mem(6, 22);
    let wb = wb_forward(&retiring(6, WbSrc::Alu, 33, 0, 0));

    let fwd = forward_operand_id(6, Some(&bypass), &mem, wb.as_ref()).unwrap();
    assert_eq!(fwd.source, ForwardSource::IdEx);
    assert_eq!(fwd.value, 11);
}

#[test]
fn decode_falls_back_through_the_priority_chain() {
    let mem = alu_in_mem(6, 22);
    let wb = wb_forward(&retiring(6, WbSrc::Alu, 33, 0, 0));

    let fwd = forward_operand_id(6, None, &mem, wb.as_ref()).unwrap();
    assert_eq!(fwd.source, ForwardSource::ExMem);
    assert_eq!(fwd.value, 22);

    let fwd = forward_operand_id(6, None, &Latch::Bubble, wb.as_ref()).unwrap();
    assert_eq!(fwd.source, ForwardSource::MemWb);
    assert_eq!(fwd.value, 33);

    assert_eq!(forward_operand_id(6, None, &Latch::Bubble, None), None);
}
