//! # ActLoop Core
//!
//! Domain types, traits, and error definitions for the ActLoop agent runtime.
//! This crate has **no runtime or transport dependencies**: it defines the
//! GAME model (Goals, Actions, Memory, Environment) that the other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator of the agent loop is a value or a trait here:
//! - [`Generator`] is the only boundary to a language model
//! - [`ActionHandler`] is the only boundary to side-effecting tools
//! - [`ActionCatalog`] is populated explicitly at composition time; there is
//!   no process-wide registry
//! - [`Environment`] turns every handler outcome into data

pub mod action;
pub mod catalog;
pub mod environment;
pub mod error;
pub mod goal;
pub mod invocation;
pub mod memory;
pub mod message;
pub mod provider;
pub mod schema;

// Re-export key types at crate root for ergonomics
pub use action::{Action, ActionBuilder, ActionHandler, FnHandler, TypedHandler};
pub use catalog::ActionCatalog;
pub use environment::{Environment, ExecutionResult};
pub use error::{ActionError, CatalogError, DecodeError, ProviderError};
pub use goal::Goal;
pub use invocation::Invocation;
pub use memory::{Memory, MemoryEntry, MemoryRole};
pub use message::{Message, Role};
pub use provider::{FnGenerator, Generator, Prompt, ToolDefinition};
pub use schema::{JsonSchemaType, JsonType, ObjectSchema, empty_object_schema};
