//! Simulation session: history, serialized views, and the request facade.

/// Snapshot history supporting reverse stepping.
pub mod history;
/// The stateful session facade.
pub mod session;
/// Timeline reconstruction from per-cycle traces.
pub mod timeline;
/// Serialized state views (the external snapshot schema).
pub mod view;
/// Tagged request/response protocol over the session.
pub mod protocol;

pub use history::History;
pub use protocol::{Request, handle};
pub use session::{AssembleView, MachineState, ResetView, Session, StepBackView, StepView};
pub use view::CpuState;
