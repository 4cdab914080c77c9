//! The agent loop for ActLoop.
//!
//! An [`Agent`] combines four things:
//!
//! - **Goals** describing what it should accomplish
//! - An **action catalog** of what it can do
//! - A **language** deciding how goals, memory and actions are encoded
//!   into a prompt and how replies are decoded back into invocations
//! - An **environment** that executes actions and captures failures
//!
//! Each iteration builds a prompt, asks the generator for a reply, decodes
//! it into an action, executes it, and records the reply and its result in
//! memory. The run stops when a terminal action is selected or the iteration
//! ceiling is reached.

pub mod error;
pub mod language;
pub mod loop_runner;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::AgentError;
pub use language::{
    AgentLanguage, FunctionCallingLanguage, JsonActionLanguage, render_action_block,
};
pub use loop_runner::{Agent, ErrorPolicy, RunReport, RunState, RunSummary};
