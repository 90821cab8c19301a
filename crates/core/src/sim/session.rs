//! The stateful session facade.
//!
//! A [`Session`] owns the loaded program, the live machine state, and the
//! snapshot history, and exposes the four external operations:
//! 1. **assemble:** Translate source, rebuild machine state, clear history.
//! 2. **step:** Save the current state, advance one cycle, report the view.
//! 3. **step_back:** Restore and discard the most recent snapshot.
//! 4. **reset:** Zero machine state and history, keeping the program.
//!
//! Every operation is atomic from an observer's perspective: it either
//! completes and returns a deep-copied view or fails with a typed error
//! without touching state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::asm::{self, InstructionRecord, Program};
use crate::common::error::{AsmError, SimError};
use crate::core::Cpu;
use crate::core::pipeline::{self, CycleEvents};
use crate::sim::history::History;
use crate::sim::view::{self, CpuState};

/// The live machine: CPU state plus the per-cycle trace it accumulated.
///
/// The trace travels with the state through history snapshots, so stepping
/// back also rewinds the timeline and the stall/forward histories.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MachineState {
    /// Architectural and microarchitectural state.
    pub cpu: Cpu,
    /// One record per executed cycle since reset.
    pub trace: Vec<CycleEvents>,
}

impl MachineState {
    fn with_program(program: &Program) -> Self {
        Self {
            cpu: Cpu::with_program(program),
            trace: Vec::new(),
        }
    }
}

/// Result of a successful `assemble`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssembleView {
    /// Assembled instruction records in address order.
    pub machine_code: Vec<InstructionRecord>,
    /// Label definitions mapped to word addresses.
    pub symbols: BTreeMap<String, u16>,
    /// The freshly rebuilt machine view.
    pub cpu_state: CpuState,
}

/// Result of a successful `step`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepView {
    /// False once the pipeline has drained at the end of the program.
    pub running: bool,
    /// Whether a snapshot is available to step back to.
    pub can_step_back: bool,
    /// The post-step machine view.
    pub cpu_state: CpuState,
}

/// Result of a successful `step_back`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepBackView {
    /// Whether another snapshot remains.
    pub can_step_back: bool,
    /// The restored machine view.
    pub cpu_state: CpuState,
}

/// Result of a `reset`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResetView {
    /// The zeroed machine view (program retained).
    pub cpu_state: CpuState,
}

/// The stateful simulation session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    program: Option<Program>,
    state: MachineState,
    history: History,
}

impl Session {
    /// Creates an empty session with no program loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles source text and loads the result.
    ///
    /// On success the machine state is rebuilt from the new program and the
    /// history is cleared. On failure nothing changes.
    pub fn assemble(&mut self, source: &str) -> Result<AssembleView, AsmError> {
        let program = asm::assemble(source)?;
        self.state = MachineState::with_program(&program);
        self.history.clear();
        let view = AssembleView {
            machine_code: program.instructions.clone(),
            symbols: program.symbols.clone(),
            cpu_state: self.cpu_state(),
        };
        self.program = Some(program);
        Ok(view)
    }

    /// Advances the machine by one clock cycle.
    ///
    /// The pre-step state is snapshotted to history first, so the step is
    /// reversible. `running == false` on the returned view means the
    /// pipeline has drained; the next `step` fails with [`SimError::Halted`].
    pub fn step(&mut self) -> Result<StepView, SimError> {
        if self.program.is_none() {
            return Err(SimError::NoProgram);
        }
        if self.state.cpu.halted() {
            return Err(SimError::Halted);
        }

        self.history.push(self.state.clone());
        let events = pipeline::tick(&mut self.state.cpu);
        self.state.trace.push(events);

        Ok(StepView {
            running: !self.state.cpu.halted(),
            can_step_back: true,
            cpu_state: self.cpu_state(),
        })
    }

    /// Restores the most recent snapshot and discards it.
    pub fn step_back(&mut self) -> Result<StepBackView, SimError> {
        let snapshot = self.history.pop().ok_or(SimError::NoHistory)?;
        self.state = snapshot;
        Ok(StepBackView {
            can_step_back: !self.history.is_empty(),
            cpu_state: self.cpu_state(),
        })
    }

    /// Zeroes machine state and history, retaining the loaded program.
    pub fn reset(&mut self) -> ResetView {
        self.state = match &self.program {
            Some(program) => MachineState::with_program(program),
            None => MachineState::default(),
        };
        self.history.clear();
        ResetView {
            cpu_state: self.cpu_state(),
        }
    }

    /// Steps until the machine halts or `max_cycles` cycles have run.
    ///
    /// Returns the number of cycles executed.
    pub fn run_to_halt(&mut self, max_cycles: u64) -> Result<u64, SimError> {
        let mut executed = 0;
        while executed < max_cycles {
            if self.is_halted() {
                break;
            }
            let view = self.step()?;
            executed += 1;
            if !view.running {
                break;
            }
        }
        Ok(executed)
    }

    /// Builds the serialized view of the current state.
    pub fn cpu_state(&self) -> CpuState {
        view::cpu_state(&self.state.cpu, &self.state.trace)
    }

    /// Whether a program is loaded and its pipeline has drained.
    pub fn is_halted(&self) -> bool {
        self.program.is_some() && self.state.cpu.halted()
    }

    /// Whether a snapshot is available to step back to.
    pub fn can_step_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// The loaded program, if any.
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// Read access to the live machine state (tests and tooling).
    pub fn machine(&self) -> &MachineState {
        &self.state
    }
}
