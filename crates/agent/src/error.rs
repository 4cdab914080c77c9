//! Errors that end a run early.

use actloop_core::{CatalogError, DecodeError, ProviderError};
use thiserror::Error;

/// Why a run aborted instead of reaching a terminal state.
///
/// Handler failures never appear here; the environment turns them into
/// memory entries.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    UnknownAction(#[from] CatalogError),

    #[error("Generation failed: {0}")]
    Generation(#[from] ProviderError),
}
