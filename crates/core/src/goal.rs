//! Goals — what the agent is trying to accomplish.

use serde::{Deserialize, Serialize};

/// A single goal that frames every prompt.
///
/// Goals are rendered in the order the caller supplies them; `priority` is
/// informational and never used for sorting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub priority: i32,
    pub name: String,
    pub description: String,
}

impl Goal {
    pub fn new(priority: i32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            priority,
            name: name.into(),
            description: description.into(),
        }
    }
}
