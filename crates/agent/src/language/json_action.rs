//! Free-text language with an embedded ```` ```action ```` block.
//!
//! # Wire format
//!
//! ````text
//! <free-form reasoning>
//!
//! ```action
//! {
//!     "tool": "<name>",
//!     "args": { ... }
//! }
//! ```
//! ````
//!
//! Extraction takes the text strictly between the **first** opening marker
//! and the **last** closing marker after it, in the trimmed reply. Last
//! closing marker wins: a bare ```` ``` ```` in trailing commentary after
//! the block therefore swallows that commentary into the block, which then
//! fails to parse. This is a known limitation of the format.

use actloop_core::{Action, DecodeError, Goal, Invocation, Memory, Message, Prompt};
use serde_json::{Value, json};
use tracing::debug;

use super::{AgentLanguage, format_goals, format_memory};

/// Opening fence of an action block.
pub const ACTION_OPEN: &str = "```action";

/// Closing fence of an action block.
pub const ACTION_CLOSE: &str = "```";

const ACTION_FORMAT: &str = r#"
<Stop and think step by step. Insert your thoughts here.>

```action
{
    "tool": "tool_name",
    "args": {...fill in arguments...}
}
```"#;

#[derive(Debug, Clone, Default)]
pub struct JsonActionLanguage;

impl JsonActionLanguage {
    pub fn new() -> Self {
        Self
    }

    /// The system message listing the available actions and the reply format.
    fn format_actions(&self, actions: &[&Action]) -> Message {
        let descriptions: Vec<Value> = actions
            .iter()
            .map(|action| {
                json!({
                    "name": action.name(),
                    "description": action.description(),
                    "args": action.parameters(),
                })
            })
            .collect();

        let catalog = serde_json::to_string_pretty(&descriptions).unwrap_or_else(|_| "[]".to_string());

        Message::system(format!("\nAvailable Tools: {catalog}\n\n{ACTION_FORMAT}\n"))
    }
}

/// Render an invocation in the exact block format the parser accepts.
pub fn render_action_block(reasoning: &str, invocation: &Invocation) -> String {
    let body = serde_json::to_string_pretty(&json!({
        "tool": invocation.tool,
        "args": invocation.args,
    }))
    .unwrap_or_else(|_| "{}".to_string());

    format!("{reasoning}\n\n{ACTION_OPEN}\n{body}\n{ACTION_CLOSE}")
}

impl AgentLanguage for JsonActionLanguage {
    fn name(&self) -> &str {
        "json_action"
    }

    fn build_request(&self, goals: &[Goal], memory: &Memory, actions: &[&Action]) -> Prompt {
        let mut messages = format_goals(goals);
        messages.push(self.format_actions(actions));
        messages.extend(format_memory(memory));
        Prompt::new(messages)
    }

    fn decode_reply(&self, response: &str) -> Result<Invocation, DecodeError> {
        let stripped = response.trim();

        let start = stripped
            .find(ACTION_OPEN)
            .ok_or(DecodeError::MissingOpeningMarker)?;
        let after_open = &stripped[start + ACTION_OPEN.len()..];

        let end = after_open
            .rfind(ACTION_CLOSE)
            .ok_or(DecodeError::MissingClosingMarker)?;
        let block = after_open[..end].trim();

        let value: Value = serde_json::from_str(block).map_err(|e| {
            debug!(error = %e, "Action block is not valid JSON");
            DecodeError::InvalidJson(e.to_string())
        })?;

        Invocation::from_value(value)
    }
}
