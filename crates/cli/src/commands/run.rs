//! `actloop run` — drive the agent loop on a single task.

use actloop_agent::{
    Agent, AgentLanguage, ErrorPolicy, FunctionCallingLanguage, JsonActionLanguage, RunState,
};
use actloop_config::{AppConfig, LanguageKind, OnError};
use actloop_core::{Environment, Generator, Goal, Memory};
use actloop_providers::OpenAiCompatGenerator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct RunOverrides {
    pub max_iterations: Option<u32>,
    pub language: Option<LanguageKind>,
    pub tags: Option<Vec<String>>,
    pub root: Option<PathBuf>,
    pub on_error: Option<OnError>,
    pub model: Option<String>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub max_iterations: u32,
    pub language: LanguageKind,
    pub tags: Vec<String>,
    pub root: PathBuf,
    pub on_error: OnError,
}

impl RunSettings {
    pub fn resolve(config: &AppConfig, overrides: RunOverrides) -> Self {
        Self {
            max_iterations: overrides
                .max_iterations
                .unwrap_or(config.agent.max_iterations),
            language: overrides.language.unwrap_or(config.agent.language),
            tags: overrides.tags.unwrap_or_else(|| config.tools.tags.clone()),
            root: overrides.root.unwrap_or_else(|| config.tools.root.clone()),
            on_error: overrides.on_error.unwrap_or(config.agent.on_error),
        }
    }
}

pub fn default_goals() -> Vec<Goal> {
    vec![
        Goal::new(
            1,
            "Explore Files",
            "Explore files in the current directory by listing and reading them",
        ),
        Goal::new(
            2,
            "Terminate",
            "Terminate the session when tasks are complete with a helpful summary",
        ),
    ]
}

fn language_for(kind: LanguageKind) -> Arc<dyn AgentLanguage> {
    match kind {
        LanguageKind::FunctionCalling => Arc::new(FunctionCallingLanguage::new()),
        LanguageKind::JsonAction => Arc::new(JsonActionLanguage::new()),
    }
}

fn policy_for(on_error: OnError) -> ErrorPolicy {
    match on_error {
        OnError::FailFast => ErrorPolicy::FailFast,
        OnError::Feedback => ErrorPolicy::Feedback,
    }
}

/// Wire the file-explorer agent around any generator.
pub fn build_agent(settings: &RunSettings, generator: Arc<dyn Generator>) -> Agent {
    let catalog = actloop_tools::catalog_for_tags(&settings.root, settings.tags.as_slice());
    Agent::new(
        default_goals(),
        language_for(settings.language),
        Arc::new(catalog),
        generator,
        Environment::new(),
    )
    .with_error_policy(policy_for(settings.on_error))
}

pub async fn run(task: &str, overrides: RunOverrides) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    if let Some(model) = overrides.model.clone() {
        config.model = model;
    }

    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set ACTLOOP_API_KEY (or OPENAI_API_KEY), or add api_key to:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let settings = RunSettings::resolve(&config, overrides);
    let generator = Arc::new(OpenAiCompatGenerator::from_config(&config)?);
    let agent = build_agent(&settings, generator);

    info!(
        model = %config.model,
        language = ?settings.language,
        actions = agent.actions().len(),
        root = %settings.root.display(),
        "Starting run"
    );

    let mut memory = Memory::new();
    let outcome = agent
        .run_with_memory(task, &mut memory, settings.max_iterations)
        .await;

    // The memory is printed even when the run aborted
    println!("{}", serde_json::to_string_pretty(&memory)?);

    let summary = outcome?;
    match summary.state {
        RunState::Terminated => eprintln!("Terminated after {} iteration(s)", summary.iterations),
        RunState::Exhausted => eprintln!(
            "Stopped after {} iteration(s) without terminating",
            summary.iterations
        ),
    }

    Ok(())
}
