//! Error types for the ActLoop domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator of the loop has its own error enum; the loop itself
//! composes them in `actloop_agent::AgentError`.

use thiserror::Error;

/// Lookup failures in an [`ActionCatalog`](crate::ActionCatalog).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// A reply that could not be decoded into an [`Invocation`](crate::Invocation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Malformed action: no opening ```action marker found")]
    MissingOpeningMarker,

    #[error("Malformed action: no closing ``` marker found after the action block")]
    MissingClosingMarker,

    #[error("Malformed action: block is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Malformed action: block has no string \"tool\" field")]
    MissingTool,

    #[error("Malformed action: \"args\" must be a JSON object: {0}")]
    InvalidArgs(String),
}

/// Failures raised inside an action handler.
///
/// These never escape [`Environment::execute_action`](crate::Environment::execute_action);
/// they are folded into a failed `ExecutionResult`.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Invalid action arguments: {0}")]
    InvalidArguments(String),

    #[error("Action failed: {0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Action panicked: {0}")]
    Panicked(String),
}

/// Failures of the generation service. Never caught by the loop.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}
