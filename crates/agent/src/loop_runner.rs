//! The agent loop implementation.

use actloop_core::{
    Action, ActionCatalog, Environment, ExecutionResult, Generator, Goal, Invocation, Memory,
    MemoryEntry, Prompt,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::AgentError;
use crate::language::AgentLanguage;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// A terminal action was selected
    Terminated,
    /// The iteration ceiling was reached first
    Exhausted,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Terminated => write!(f, "terminated"),
            RunState::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// What to do when a reply cannot be decoded or names an unknown action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Abort the run with the error (default)
    #[default]
    FailFast,
    /// Record the reply and the error in memory and keep going; the
    /// iteration still counts against the ceiling
    Feedback,
}

/// Outcome of [`Agent::run_with_memory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub state: RunState,
    pub iterations: u32,
}

/// Outcome of [`Agent::run`]: the final memory plus how the run ended.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub memory: Memory,
    pub state: RunState,
    pub iterations: u32,
}

/// The agent: goals, a language, an action catalog, a generator and an
/// environment. It holds no conversation state; memory is passed per run.
pub struct Agent {
    goals: Vec<Goal>,
    language: Arc<dyn AgentLanguage>,
    actions: Arc<ActionCatalog>,
    generator: Arc<dyn Generator>,
    environment: Environment,
    error_policy: ErrorPolicy,
}

impl Agent {
    pub fn new(
        goals: Vec<Goal>,
        language: Arc<dyn AgentLanguage>,
        actions: Arc<ActionCatalog>,
        generator: Arc<dyn Generator>,
        environment: Environment,
    ) -> Self {
        Self {
            goals,
            language,
            actions,
            generator,
            environment,
            error_policy: ErrorPolicy::default(),
        }
    }

    /// Choose how decode and lookup failures are handled.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn actions(&self) -> &ActionCatalog {
        &self.actions
    }

    /// Build the prompt for the next turn from goals, memory and every
    /// action in the catalog.
    pub fn construct_prompt(&self, memory: &Memory) -> Prompt {
        self.language
            .build_request(&self.goals, memory, &self.actions.list_actions())
    }

    /// Decode a reply and resolve the action it names.
    pub fn get_action(&self, response: &str) -> Result<(&Action, Invocation), AgentError> {
        let invocation = self.language.decode_reply(response)?;
        let action = self.actions.get_action(&invocation.tool)?;
        Ok((action, invocation))
    }

    /// Run `task` against a fresh memory.
    pub async fn run(&self, task: &str, max_iterations: u32) -> Result<RunReport, AgentError> {
        let mut memory = Memory::new();
        let summary = self.run_with_memory(task, &mut memory, max_iterations).await?;
        Ok(RunReport {
            memory,
            state: summary.state,
            iterations: summary.iterations,
        })
    }

    /// Run `task`, appending to a caller-owned memory.
    ///
    /// Each iteration:
    /// 1. Builds the prompt from goals, memory and the catalog
    /// 2. Asks the generator for a reply
    /// 3. Decodes the reply and resolves the action
    /// 4. Executes it in the environment
    /// 5. Appends the reply and the JSON result to memory
    /// 6. Stops if the action is terminal
    ///
    /// The memory keeps everything recorded so far even when this returns
    /// an error.
    pub async fn run_with_memory(
        &self,
        task: &str,
        memory: &mut Memory,
        max_iterations: u32,
    ) -> Result<RunSummary, AgentError> {
        info!(
            language = self.language.name(),
            generator = self.generator.name(),
            actions = self.actions.len(),
            max_iterations,
            "Agent run starting"
        );

        self.set_current_task(memory, task);

        for iteration in 1..=max_iterations {
            let prompt = self.construct_prompt(memory);

            debug!(iteration, messages = prompt.messages.len(), "Agent thinking...");
            let response = self.generator.generate(&prompt).await?;
            debug!(iteration, decision = %response, "Agent decision");

            let (action, invocation) = match self.get_action(&response) {
                Ok(resolved) => resolved,
                Err(err) => {
                    warn!(iteration, error = %err, "Could not act on reply");
                    match self.error_policy {
                        ErrorPolicy::FailFast => return Err(err),
                        ErrorPolicy::Feedback => {
                            self.record_failure(memory, &response, &err);
                            continue;
                        }
                    }
                }
            };

            let result = self
                .environment
                .execute_action(action, invocation.args_value())
                .await;
            debug!(
                iteration,
                action = action.name(),
                tool_executed = result.tool_executed(),
                "Action result"
            );

            self.update_memory(memory, &response, &result);

            if action.is_terminal() {
                info!(iterations = iteration, action = action.name(), "Agent terminated");
                return Ok(RunSummary {
                    state: RunState::Terminated,
                    iterations: iteration,
                });
            }
        }

        warn!(max_iterations, "Max iterations reached without a terminal action");
        Ok(RunSummary {
            state: RunState::Exhausted,
            iterations: max_iterations,
        })
    }

    fn set_current_task(&self, memory: &mut Memory, task: &str) {
        memory.add_memory(MemoryEntry::user(task));
    }

    /// Record the agent's decision and the environment's response.
    fn update_memory(&self, memory: &mut Memory, response: &str, result: &ExecutionResult) {
        memory.add_memory(MemoryEntry::assistant(response));
        memory.add_memory(MemoryEntry::user(result.to_json_string()));
    }

    fn record_failure(&self, memory: &mut Memory, response: &str, err: &AgentError) {
        let feedback = serde_json::json!({
            "tool_executed": false,
            "error": err.to_string(),
        });
        memory.add_memory(MemoryEntry::assistant(response));
        memory.add_memory(MemoryEntry::user(feedback.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{FunctionCallingLanguage, JsonActionLanguage};
    use crate::test_helpers::{FailingGenerator, ScriptedGenerator, sample_catalog};
    use actloop_core::{CatalogError, DecodeError, MemoryRole};
    use serde_json::Value;

    const TERMINATE: &str = r#"{"tool": "terminate", "args": {"message": "done"}}"#;
    const LIST: &str = r#"{"tool": "list_files", "args": {}}"#;

    fn agent(language: Arc<dyn AgentLanguage>, generator: Arc<dyn Generator>) -> Agent {
        Agent::new(
            vec![Goal::new(1, "Explore Files", "List files, then terminate")],
            language,
            Arc::new(sample_catalog()),
            generator,
            Environment::new(),
        )
    }

    fn result_at(memory: &Memory, idx: usize) -> Value {
        serde_json::from_str(&memory.snapshot()[idx].content).unwrap()
    }

    #[tokio::test]
    async fn terminal_action_ends_after_one_iteration() {
        let generator = Arc::new(ScriptedGenerator::new([TERMINATE]));
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), generator.clone());

        let report = agent.run("Say done", 10).await.unwrap();

        assert_eq!(report.state, RunState::Terminated);
        assert_eq!(report.iterations, 1);
        assert_eq!(report.memory.len(), 3);
        assert_eq!(generator.call_count(), 1);

        let entries = report.memory.snapshot();
        assert_eq!(entries[0], MemoryEntry::user("Say done"));
        assert_eq!(entries[1], MemoryEntry::assistant(TERMINATE));
        assert_eq!(entries[2].role, MemoryRole::User);
        assert_eq!(result_at(&report.memory, 2)["result"], "done");
    }

    #[tokio::test]
    async fn ceiling_exhausts_the_run() {
        let generator = Arc::new(ScriptedGenerator::repeating(LIST, 3));
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), generator.clone());

        let report = agent.run("Keep listing", 3).await.unwrap();

        assert_eq!(report.state, RunState::Exhausted);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.memory.len(), 7);
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn zero_ceiling_records_only_the_task() {
        let generator = Arc::new(ScriptedGenerator::new(Vec::<String>::new()));
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), generator.clone());

        let report = agent.run("Nothing to do", 0).await.unwrap();

        assert_eq!(report.state, RunState::Exhausted);
        assert_eq!(report.iterations, 0);
        assert_eq!(report.memory.len(), 1);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn each_prompt_sees_the_growing_memory() {
        let generator = Arc::new(ScriptedGenerator::new([LIST, TERMINATE]));
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), generator.clone());

        agent.run("List then stop", 5).await.unwrap();

        let prompts = generator.prompts();
        // goals + task
        assert_eq!(prompts[0].messages.len(), 2);
        // goals + task + reply + result
        assert_eq!(prompts[1].messages.len(), 4);
        assert_eq!(prompts[1].messages[2].content, LIST);
        assert_eq!(prompts[0].tools.len(), 3);
    }

    #[tokio::test]
    async fn handler_failures_do_not_halt() {
        let generator = Arc::new(ScriptedGenerator::new([
            r#"{"tool": "flaky", "args": {}}"#,
            TERMINATE,
        ]));
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), generator);

        let report = agent.run("Try the flaky one", 5).await.unwrap();

        assert_eq!(report.state, RunState::Terminated);
        assert_eq!(report.iterations, 2);
        let failure = result_at(&report.memory, 2);
        assert_eq!(failure["tool_executed"], false);
        assert!(failure["error"].as_str().unwrap().contains("backend unavailable"));
    }

    #[tokio::test]
    async fn unparsable_structured_reply_terminates_gracefully() {
        let generator = Arc::new(ScriptedGenerator::new(["I give up"]));
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), generator);

        let report = agent.run("Impossible task", 5).await.unwrap();

        assert_eq!(report.state, RunState::Terminated);
        assert_eq!(result_at(&report.memory, 2)["result"], "I give up");
    }

    #[tokio::test]
    async fn malformed_block_fails_fast_and_keeps_memory() {
        let generator = Arc::new(ScriptedGenerator::new(["I will just chat instead."]));
        let agent = agent(Arc::new(JsonActionLanguage::new()), generator);

        let mut memory = Memory::new();
        let err = agent
            .run_with_memory("Do something", &mut memory, 5)
            .await
            .unwrap_err();

        assert!(matches!(err, AgentError::Decode(DecodeError::MissingOpeningMarker)));
        assert_eq!(memory.len(), 1);
    }

    #[tokio::test]
    async fn unknown_action_fails_fast() {
        let generator = Arc::new(ScriptedGenerator::new([r#"{"tool": "rm_rf", "args": {}}"#]));
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), generator);

        let err = agent.run("Clean up", 5).await.unwrap_err();
        assert!(matches!(
            err,
            AgentError::UnknownAction(CatalogError::UnknownAction(ref name)) if name == "rm_rf"
        ));
    }

    #[tokio::test]
    async fn feedback_policy_continues_after_bad_replies() {
        let generator = Arc::new(ScriptedGenerator::new([
            "no block here",
            "```action\n{\"tool\": \"nope\", \"args\": {}}\n```",
            "```action\n{\"tool\": \"terminate\", \"args\": {\"message\": \"ok\"}}\n```",
        ]));
        let agent = agent(Arc::new(JsonActionLanguage::new()), generator)
            .with_error_policy(ErrorPolicy::Feedback);

        let report = agent.run("Recover please", 5).await.unwrap();

        assert_eq!(report.state, RunState::Terminated);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.memory.len(), 7);
        let first = result_at(&report.memory, 2);
        assert_eq!(first["tool_executed"], false);
        assert!(first["error"].as_str().unwrap().contains("opening"));
        let second = result_at(&report.memory, 4);
        assert!(second["error"].as_str().unwrap().contains("Unknown action: nope"));
    }

    #[tokio::test]
    async fn feedback_policy_still_respects_the_ceiling() {
        let generator = Arc::new(ScriptedGenerator::repeating("still no block", 2));
        let agent = agent(Arc::new(JsonActionLanguage::new()), generator)
            .with_error_policy(ErrorPolicy::Feedback);

        let report = agent.run("Loop forever", 2).await.unwrap();
        assert_eq!(report.state, RunState::Exhausted);
        assert_eq!(report.memory.len(), 5);
    }

    #[tokio::test]
    async fn generation_failures_propagate() {
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), Arc::new(FailingGenerator));
        let err = agent.run("Anything", 5).await.unwrap_err();
        assert!(matches!(err, AgentError::Generation(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn prepopulated_memory_is_extended() {
        let generator = Arc::new(ScriptedGenerator::new([TERMINATE]));
        let agent = agent(Arc::new(FunctionCallingLanguage::new()), generator.clone());

        let mut memory = Memory::from_entries([
            MemoryEntry::user("earlier task"),
            MemoryEntry::assistant("earlier reply"),
        ]);
        let summary = agent.run_with_memory("follow-up", &mut memory, 5).await.unwrap();

        assert_eq!(summary.state, RunState::Terminated);
        assert_eq!(memory.len(), 5);
        assert_eq!(memory.snapshot()[2], MemoryEntry::user("follow-up"));
        assert_eq!(generator.prompts()[0].messages[1].content, "earlier task");
    }

    #[test]
    fn run_state_display() {
        assert_eq!(RunState::Terminated.to_string(), "terminated");
        assert_eq!(RunState::Exhausted.to_string(), "exhausted");
    }
}
