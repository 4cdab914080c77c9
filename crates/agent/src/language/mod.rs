//! Agent languages — how goals, memory and actions become a prompt, and how
//! a reply becomes an [`Invocation`].
//!
//! Two strategies ship with ActLoop:
//!
//! - [`JsonActionLanguage`]: the action catalog is embedded in a system
//!   message and the model answers in free text ending with a fenced
//!   ```` ```action ```` block.
//! - [`FunctionCallingLanguage`]: the catalog travels in the prompt's `tools`
//!   channel and the backend answers with a `{tool, args}` object.
//!
//! Both render goals in caller order and memory oldest-first.

pub mod function_calling;
pub mod json_action;

pub use function_calling::FunctionCallingLanguage;
pub use json_action::{JsonActionLanguage, render_action_block};

use actloop_core::{Action, DecodeError, Goal, Invocation, Memory, Message, Prompt};

/// Separator placed around each goal description.
const GOAL_SEPARATOR: &str = "\n-------------------\n";

/// A pluggable encoding strategy.
pub trait AgentLanguage: Send + Sync {
    /// Short identifier for logs (e.g., "json_action").
    fn name(&self) -> &str;

    /// Build the request for the next turn.
    fn build_request(&self, goals: &[Goal], memory: &Memory, actions: &[&Action]) -> Prompt;

    /// Decode a raw reply into the action it selects.
    fn decode_reply(&self, response: &str) -> Result<Invocation, DecodeError>;
}

/// Goals as a single system message.
pub(crate) fn format_goals(goals: &[Goal]) -> Vec<Message> {
    if goals.is_empty() {
        return Vec::new();
    }

    let instructions = goals
        .iter()
        .map(|goal| format!("{}:{GOAL_SEPARATOR}{}{GOAL_SEPARATOR}", goal.name, goal.description))
        .collect::<Vec<_>>()
        .join("\n\n");

    vec![Message::system(instructions)]
}

/// Memory entries as conversational turns, oldest first.
pub(crate) fn format_memory(memory: &Memory) -> Vec<Message> {
    memory
        .iter()
        .map(|entry| Message {
            role: entry.role.into(),
            content: entry.content.clone(),
        })
        .collect()
}
