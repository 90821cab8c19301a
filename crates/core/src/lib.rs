//! Cycle-accurate simulator for a 16-bit pedagogical pipelined RISC CPU.
//!
//! This crate implements the complete simulation core behind a pipeline
//! visualizer:
//! 1. **Assembler:** Two-pass translation of assembly text into a 16-bit
//!    three-format encoding, with source mapping and canonical disassembly.
//! 2. **Machine:** Eight registers (hard-wired `$r0`), 512-word instruction
//!    memory, sparse data memory, and the four pipeline latches.
//! 3. **Pipeline:** Five in-order stages with decode-stage branch
//!    resolution, load-use and branch-after-load stalls, and two
//!    priority-encoded forwarding networks.
//! 4. **History:** Full-state snapshots after every cycle, reverse stepping,
//!    and per-instruction timeline reconstruction.
//! 5. **Session:** A stateful facade exposing assemble/step/step-back/reset
//!    and a deep-copied, serialized state view.

/// Two-pass assembler: lexing, labels, encoding, instruction records.
pub mod asm;
/// Common constants and error types.
pub mod common;
/// CPU state (registers, memories) and the pipeline.
pub mod core;
/// Instruction set: encoding, decoding, and disassembly.
pub mod isa;
/// Session facade, history, timeline, views, and protocol.
pub mod sim;
/// Performance counters and derived metrics.
pub mod stats;

/// Assembly and simulation error types.
pub use crate::common::{AsmError, SimError};
/// The machine state type; owned by a session, mutated only by the engine.
pub use crate::core::Cpu;
/// The session facade; one per connected observer.
pub use crate::sim::Session;
