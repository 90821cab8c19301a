//! Tagged request/response protocol over the session.
//!
//! The session's four operations exchange JSON-shaped payloads so any
//! transport (HTTP, IPC, an in-process call) can drive the simulator with
//! the same schema. Responses always carry a `success` flag; failures add
//! the stable error kind, a human-readable message, and (for assembly
//! errors) the offending source line.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::sim::session::Session;

/// A request to the session, tagged by operation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Assemble source text and load the program.
    Assemble {
        /// The assembly source.
        code: String,
    },
    /// Advance one clock cycle.
    Step,
    /// Restore the previous cycle.
    StepBack,
    /// Zero machine state, keeping the program.
    Reset,
}

/// Dispatches one request against a session, producing the response value.
pub fn handle(session: &mut Session, request: &Request) -> Value {
    match request {
        Request::Assemble { code } => match session.assemble(code) {
            Ok(view) => ok(&view),
            Err(err) => json!({
                "success": false,
                "error": err.kind(),
                "line": err.line(),
                "message": err.to_string(),
            }),
        },
        Request::Step => match session.step() {
            Ok(view) => ok(&view),
            Err(err) => fail(err.kind(), &err.to_string()),
        },
        Request::StepBack => match session.step_back() {
            Ok(view) => ok(&view),
            Err(err) => fail(err.kind(), &err.to_string()),
        },
        Request::Reset => ok(&session.reset()),
    }
}

/// Serializes a view and stamps `success: true` onto it.
fn ok<T: Serialize>(view: &T) -> Value {
    let mut value = serde_json::to_value(view).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        let _ = map.insert("success".to_string(), Value::Bool(true));
    }
    value
}

fn fail(kind: &str, message: &str) -> Value {
    json!({
        "success": false,
        "error": kind,
        "message": message,
    })
}
