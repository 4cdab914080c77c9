//! Prompt message types.
//!
//! A [`Message`] is one role-tagged turn of the request sent to the
//! generation service. Memory entries map onto messages when a prompt is
//! built; system messages only ever come from the encoding strategy.

use serde::{Deserialize, Serialize};

use crate::memory::MemoryRole;

/// The role of a message in a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions from the encoding strategy (goals, action catalog)
    System,
    /// The task and environment feedback
    User,
    /// Earlier model replies
    Assistant,
}

impl From<MemoryRole> for Role {
    fn from(role: MemoryRole) -> Self {
        match role {
            MemoryRole::User => Role::User,
            MemoryRole::Assistant => Role::Assistant,
        }
    }
}

/// A single message in a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
