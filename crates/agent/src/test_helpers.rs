//! Shared test helpers for agent tests.

use actloop_core::{Action, ActionCatalog, ActionError, Generator, Prompt, ProviderError};
use serde_json::Value;
use std::sync::Mutex;

/// A generator that returns a sequence of scripted replies.
///
/// Each call to `generate` returns the next reply in the queue and records
/// the prompt it was given. Panics if more calls are made than replies
/// provided.
pub struct ScriptedGenerator {
    replies: Vec<String>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedGenerator {
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// The same reply, `times` times.
    pub fn repeating(reply: &str, times: usize) -> Self {
        Self::new(std::iter::repeat_n(reply, times))
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Generator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let mut prompts = self.prompts.lock().unwrap();
        let call = prompts.len();
        if call >= self.replies.len() {
            panic!(
                "ScriptedGenerator: no more replies (call #{}, have {})",
                call,
                self.replies.len()
            );
        }
        prompts.push(prompt.clone());
        Ok(self.replies[call].clone())
    }
}

/// A generator whose backend is always down.
pub struct FailingGenerator;

#[async_trait::async_trait]
impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &Prompt) -> Result<String, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

/// `terminate(message)` plus a non-terminal `list_files` and an action that
/// always fails.
pub fn sample_catalog() -> ActionCatalog {
    let mut catalog = ActionCatalog::new();
    catalog.register(
        Action::from_fn("list_files", |_| Ok(serde_json::json!(["a.rs", "b.rs"])))
            .description("Returns a list of files in the directory.")
            .tags(["file_operations", "read"])
            .build(),
    );
    catalog.register(
        Action::from_fn("flaky", |_| Err(ActionError::Failed("backend unavailable".into())))
            .description("Always fails.")
            .tags(["debug"])
            .build(),
    );
    catalog.register(
        Action::from_fn("terminate", |args: Value| Ok(args["message"].clone()))
            .description("Terminates the conversation.")
            .terminal(true)
            .tags(["system"])
            .build(),
    );
    catalog
}
