//! Session lifecycle tests: operation ordering, error surfacing, and the
//! quantified invariants every step must preserve.

use pipevis_core::common::SimError;
use pipevis_core::Session;

use crate::common::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Operation ordering
// ══════════════════════════════════════════════════════════

#[test]
fn step_before_assemble_fails_with_no_program() {
    let mut session = Session::new();
    assert_eq!(session.step().unwrap_err(), SimError::NoProgram);
}

#[test]
fn step_after_halt_fails_with_halted() {
    let mut ctx = TestContext::load("ADDI $r1,$r0,1\n");
    ctx.run_to_halt();
    assert_eq!(ctx.session.step().unwrap_err(), SimError::Halted);
}

#[test]
fn reset_without_a_program_yields_the_zero_state() {
    let mut session = Session::new();
    let view = session.reset();
    assert_eq!(view.cpu_state.pc, 0);
    assert_eq!(view.cpu_state.cycle, 0);
    assert_eq!(view.cpu_state.registers, [0; 8]);
}

#[test]
fn reset_retains_the_program_and_clears_history() {
    let mut ctx = TestContext::load("ADDI $r1,$r0,3\nADD $r2,$r1,$r1\n");
    ctx.run_to_halt();
    assert_eq!(ctx.reg(2), 6);
    assert!(ctx.session.can_step_back());

    let view = ctx.session.reset();
    assert_eq!(view.cpu_state.cycle, 0);
    assert!(!ctx.session.can_step_back());
    assert_eq!(ctx.reg(1), 0, "architectural state is zeroed");

    // The program survived: the same run works again.
    ctx.run_to_halt();
    assert_eq!(ctx.reg(2), 6);
}

#[test]
fn failed_assembly_leaves_state_untouched() {
    let mut ctx = TestContext::load("ADDI $r1,$r0,3\n");
    let _ = ctx.step();
    let before = ctx.session.machine().clone();

    assert!(ctx.session.assemble("FROB $r1").is_err());
    assert_eq!(
        ctx.session.machine(),
        &before,
        "a rejected assemble must not alter the running machine"
    );

    // The original program still steps.
    let _ = ctx.step();
}

#[test]
fn reassembly_replaces_state_and_history() {
    let mut ctx = TestContext::load("ADDI $r1,$r0,3\n");
    ctx.run_to_halt();

    let view = ctx.session.assemble("ADDI $r2,$r0,9\n").unwrap();
    assert_eq!(view.cpu_state.cycle, 0);
    assert!(!ctx.session.can_step_back());

    ctx.run_to_halt();
    assert_eq!(ctx.reg(1), 0);
    assert_eq!(ctx.reg(2), 9);
}

// ══════════════════════════════════════════════════════════
// 2. Quantified invariants
// ══════════════════════════════════════════════════════════

#[test]
fn r0_reads_zero_after_every_step() {
    // The program tries hard to dirty $r0; writes are dropped.
    let mut ctx = TestContext::load(
        "ADDI $r0,$r0,31\n\
         ADD $r0,$r0,$r0\n\
         ADDI $r1,$r0,2\n",
    );
    while !ctx.session.is_halted() {
        let _ = ctx.step();
        assert_eq!(ctx.reg(0), 0);
    }
    assert_eq!(ctx.reg(1), 2, "$r0 reads as zero for consumers too");
}

#[test]
fn cycle_counter_increases_by_one_per_step() {
    let mut ctx = TestContext::load("ADDI $r1,$r0,1\nADD $r2,$r1,$r1\n");
    let mut expected = 0;
    while !ctx.session.is_halted() {
        let view = ctx.step();
        expected += 1;
        assert_eq!(view.cpu_state.cycle, expected);
    }
}

#[test]
fn uninitialized_reads_return_zero_with_a_warning() {
    let mut ctx = TestContext::load("LW $r1,3($r0)\n");

    let mut warned = false;
    while !ctx.session.is_halted() {
        let view = ctx.step();
        if let Some(warning) = view.cpu_state.memory_warning {
            assert_eq!(warning.kind, "UninitializedRead");
            assert_eq!(warning.address, 3);
            warned = true;
        }
    }
    assert!(warned);
    assert_eq!(ctx.reg(1), 0);
}

#[test]
fn written_memory_reads_back_without_warning() {
    let mut ctx = TestContext::load(
        "ADDI $r1,$r0,7\n\
         SW $r1,2($r0)\n\
         NOP\n\
         LW $r2,2($r0)\n",
    );
    ctx.run_to_halt();

    assert_eq!(ctx.reg(2), 7);
    let warned = ctx
        .session
        .machine()
        .trace
        .iter()
        .any(|e| e.memory_warning.is_some());
    assert!(!warned);

    let state = ctx.session.cpu_state();
    assert_eq!(state.data_memory.get(&2), Some(&7));
}

#[test]
fn stall_cycles_freeze_pc_and_if_id() {
    let mut ctx = TestContext::load(
        "LW $r1,0($r0)\n\
         ADD $r2,$r1,$r1\n",
    );

    // Step until the stall cycle fires, checking the freeze across it.
    let mut seen_stall = false;
    let mut prev_pc = ctx.pc();
    let mut prev_if_id = ctx.session.machine().cpu.if_id;
    while !ctx.session.is_halted() {
        let view = ctx.step();
        let machine = ctx.session.machine();
        if view.cpu_state.is_stalling {
            seen_stall = true;
            assert_eq!(machine.cpu.pc, prev_pc, "PC must not advance on a stall");
            assert_eq!(machine.cpu.if_id, prev_if_id, "IF/ID must hold on a stall");
            assert!(machine.cpu.id_ex.is_bubble(), "ID/EX takes the bubble");
        }
        prev_pc = machine.cpu.pc;
        prev_if_id = machine.cpu.if_id;
    }
    assert!(seen_stall);
}
