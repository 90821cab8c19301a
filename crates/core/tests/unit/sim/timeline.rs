//! Timeline reconstruction tests.

use pipevis_core::sim::timeline::StageName;

use crate::common::TestContext;

#[test]
fn rows_appear_in_first_fetch_order() {
    let mut ctx = TestContext::load(
        "ADDI $r1,$r0,5\n\
         ADDI $r2,$r0,7\n\
         ADD $r3,$r1,$r2\n",
    );
    ctx.run_to_halt();

    let state = ctx.session.cpu_state();
    let rows: Vec<&str> = state
        .pipeline_history
        .iter()
        .map(|r| r.disasm.as_str())
        .collect();
    assert_eq!(rows, vec![
        "ADDI $r1,$r0,5",
        "ADDI $r2,$r0,7",
        "ADD $r3,$r1,$r2"
    ]);
}

#[test]
fn an_unstalled_instruction_walks_the_five_stages_in_order() {
    let mut ctx = TestContext::load("ADDI $r1,$r0,5\n");
    ctx.run_to_halt();

    let state = ctx.session.cpu_state();
    let row = &state.pipeline_history[0];
    let stages: Vec<StageName> = row.cells.iter().map(|c| c.stage).collect();
    assert_eq!(stages, vec![
        StageName::If,
        StageName::Id,
        StageName::Ex,
        StageName::Mem,
        StageName::Wb
    ]);

    let cycles: Vec<u64> = row.cells.iter().map(|c| c.cycle).collect();
    assert_eq!(cycles, vec![1, 2, 3, 4, 5]);
    assert!(row.cells.iter().all(|c| !c.stalled));
}

#[test]
fn a_stalled_consumer_repeats_its_decode_cell() {
    let mut ctx = TestContext::load(
        "LW $r1,0($r0)\n\
         ADD $r2,$r1,$r1\n",
    );
    ctx.run_to_halt();

    let state = ctx.session.cpu_state();
    let add_row = state
        .pipeline_history
        .iter()
        .find(|r| r.disasm == "ADD $r2,$r1,$r1")
        .unwrap();

    let id_cells: Vec<_> = add_row
        .cells
        .iter()
        .filter(|c| c.stage == StageName::Id)
        .collect();
    assert_eq!(id_cells.len(), 2, "held in decode across the stall");
    assert!(
        id_cells.iter().any(|c| c.stalled),
        "the stalled decode cycle is flagged"
    );

    let if_cells = add_row
        .cells
        .iter()
        .filter(|c| c.stage == StageName::If)
        .count();
    assert_eq!(if_cells, 1, "IF reports only its first cycle");
}

#[test]
fn duplicate_encodings_share_one_row() {
    let mut ctx = TestContext::load(
        "ADDI $r1,$r0,9\n\
         ADDI $r1,$r0,9\n",
    );
    ctx.run_to_halt();

    let state = ctx.session.cpu_state();
    assert_eq!(
        state.pipeline_history.len(),
        1,
        "rows are keyed by encoding"
    );
}

#[test]
fn stall_and_forward_histories_carry_cycle_numbers() {
    let mut ctx = TestContext::load(
        "ADDI $r1,$r0,4\n\
         SW $r1,0($r0)\n\
         LW $r2,0($r0)\n\
         ADD $r3,$r2,$r1\n",
    );
    ctx.run_to_halt();

    let state = ctx.session.cpu_state();

    assert_eq!(state.stall_history.len(), 1);
    assert_eq!(state.stall_history[0].info.kind, "LoadUse");
    assert_eq!(state.stall_history[0].info.reg, "$r2");

    assert!(!state.forward_history.is_empty());
    for record in &state.forward_history {
        assert!(record.cycle >= 1);
        assert!(!record.forwards.is_empty());
        for fwd in &record.forwards {
            assert!(["EX_MEM", "MEM_WB", "ID_EX"].contains(&fwd.source.as_str()));
        }
    }
}
