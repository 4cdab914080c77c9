//! Structured function-calling language.
//!
//! The action catalog is sent through the prompt's `tools` channel rather
//! than as text, and the generator is expected to answer with a JSON object
//! `{"tool": ..., "args": {...}}`. Anything else is read as the model giving
//! up: the reply is decoded as a call to `terminate` carrying the raw text.

use actloop_core::{Action, DecodeError, Goal, Invocation, Memory, Prompt, ToolDefinition};
use serde_json::{Map, Value};
use tracing::debug;

use super::{AgentLanguage, format_goals, format_memory};

/// Longest description forwarded in a tool definition, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1024;

/// The action a non-JSON reply is mapped onto.
pub const FALLBACK_TOOL: &str = "terminate";

#[derive(Debug, Clone, Default)]
pub struct FunctionCallingLanguage;

impl FunctionCallingLanguage {
    pub fn new() -> Self {
        Self
    }

    fn format_actions(&self, actions: &[&Action]) -> Vec<ToolDefinition> {
        actions
            .iter()
            .map(|action| {
                let mut def = action.to_definition();
                if def.description.chars().count() > MAX_DESCRIPTION_CHARS {
                    def.description = def.description.chars().take(MAX_DESCRIPTION_CHARS).collect();
                }
                def
            })
            .collect()
    }
}

impl AgentLanguage for FunctionCallingLanguage {
    fn name(&self) -> &str {
        "function_calling"
    }

    fn build_request(&self, goals: &[Goal], memory: &Memory, actions: &[&Action]) -> Prompt {
        let mut messages = format_goals(goals);
        messages.extend(format_memory(memory));
        Prompt::new(messages).with_tools(self.format_actions(actions))
    }

    /// Never fails; see the module docs for the fallback.
    fn decode_reply(&self, response: &str) -> Result<Invocation, DecodeError> {
        let decoded = serde_json::from_str::<Value>(response)
            .map_err(|e| DecodeError::InvalidJson(e.to_string()))
            .and_then(Invocation::from_value);

        match decoded {
            Ok(invocation) => Ok(invocation),
            Err(err) => {
                debug!(error = %err, "Reply is not a function call, falling back to terminate");
                let mut args = Map::new();
                args.insert("message".into(), Value::String(response.to_string()));
                Ok(Invocation::new(FALLBACK_TOOL, args))
            }
        }
    }
}
