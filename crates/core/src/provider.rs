//! Generator trait — the abstraction over language-generation backends.
//!
//! The loop depends on exactly one operation: turn a [`Prompt`] into raw
//! reply text. How a backend honours the `tools` channel (native function
//! calling, or ignoring it) is the adapter's business.
//!
//! Implementations: OpenAI-compatible endpoints, scripted test doubles,
//! plain closures via [`FnGenerator`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Message;

/// The request handed to a generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// Role-tagged conversation
    pub messages: Vec<Message>,

    /// Structured tool catalog, sent beside the messages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

impl Prompt {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            tools: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// A tool definition sent to the model so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The core Generator trait.
///
/// The agent loop calls `generate()` once per iteration without knowing
/// which backend answers. Errors are never retried by the loop.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this backend (e.g., "openai", "scripted").
    fn name(&self) -> &str;

    /// Send a prompt and get the raw reply text.
    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError>;
}

/// Adapts a synchronous closure into a [`Generator`].
pub struct FnGenerator<F> {
    name: String,
    f: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(&Prompt) -> Result<String, ProviderError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

#[async_trait]
impl<F> Generator for FnGenerator<F>
where
    F: Fn(&Prompt) -> Result<String, ProviderError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        (self.f)(prompt)
    }
}
