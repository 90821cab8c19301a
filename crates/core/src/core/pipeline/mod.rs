//! The five-stage in-order pipeline.
//!
//! Stage layout: IF -> ID -> EX -> MEM -> WB, with branches, jumps, and `JR`
//! resolving in ID. Hazards are handled by a one-cycle front-end stall
//! (load-use, branch-after-load) and two forwarding networks (execute and
//! decode), each a priority-encoded mux.

/// The per-cycle engine.
pub mod engine;
/// Hazard detection and forwarding.
pub mod hazards;
/// Latches between adjacent stages.
pub mod latches;
/// Control signal definitions and derivation.
pub mod signals;
/// The five stages.
pub mod stages;

pub use engine::{CycleEvents, StageOccupancy, tick};
pub use hazards::{Forward, ForwardSource, StallCause};
pub use latches::{ExMemEntry, IdExEntry, IfIdEntry, Latch, MemWbEntry};
pub use signals::{AluOp, ControlSignals, RegDst, WbSrc};
pub use stages::{MemoryWarning, Redirect, RedirectKind};
