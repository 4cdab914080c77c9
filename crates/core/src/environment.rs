//! Environment — where actions actually run.
//!
//! [`Environment::execute_action`] never fails: handler errors and handler
//! panics are both captured and returned as a failed [`ExecutionResult`], so
//! the model sees its own tool failures on the next turn.

use chrono::{Local, SecondsFormat};
use futures::FutureExt;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::any::Any;
use std::error::Error as StdError;
use std::fmt::Write as _;
use std::panic::AssertUnwindSafe;
use tracing::{debug, warn};

use crate::action::Action;
use crate::error::ActionError;

/// The normalized outcome of one action execution.
///
/// Serializes as `{"tool_executed": true, "result": ..., "timestamp": ...}`
/// or `{"tool_executed": false, "error": ..., "traceback": ...}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Completed { result: Value, timestamp: String },
    Failed { error: String, traceback: String },
}

impl ExecutionResult {
    pub fn completed(result: Value) -> Self {
        Self::Completed {
            result,
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    /// A failure built from an action error and its source chain.
    pub fn failed(err: &ActionError) -> Self {
        Self::Failed {
            error: err.to_string(),
            traceback: traceback(err),
        }
    }

    pub fn tool_executed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            Self::Completed { result, .. } => Some(result),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Completed { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    /// JSON text of the result, as stored in memory.
    pub fn to_json_string(&self) -> String {
        // Serializing a map of strings and `Value`s cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

impl Serialize for ExecutionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        match self {
            Self::Completed { result, timestamp } => {
                map.serialize_entry("tool_executed", &true)?;
                map.serialize_entry("result", result)?;
                map.serialize_entry("timestamp", timestamp)?;
            }
            Self::Failed { error, traceback } => {
                map.serialize_entry("tool_executed", &false)?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("traceback", traceback)?;
            }
        }
        map.end()
    }
}

/// Executes resolved actions against their arguments.
#[derive(Debug, Clone, Default)]
pub struct Environment;

impl Environment {
    pub fn new() -> Self {
        Self
    }

    /// Run `action` with `args`, capturing every failure as data.
    pub async fn execute_action(&self, action: &Action, args: Value) -> ExecutionResult {
        debug!(action = action.name(), "Executing action");

        let outcome = AssertUnwindSafe(action.execute(args)).catch_unwind().await;

        match outcome {
            Ok(Ok(value)) => ExecutionResult::completed(value),
            Ok(Err(err)) => {
                warn!(action = action.name(), error = %err, "Action failed");
                ExecutionResult::failed(&err)
            }
            Err(payload) => {
                let err = ActionError::Panicked(panic_message(payload.as_ref()));
                warn!(action = action.name(), error = %err, "Action panicked");
                ExecutionResult::failed(&err)
            }
        }
    }
}

fn traceback(err: &ActionError) -> String {
    let mut out = format!("{err:?}");
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, "\nCaused by: {cause}");
        source = cause.source();
    }
    out
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
