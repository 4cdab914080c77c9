//! Generation backends for ActLoop.
//!
//! All backends implement the `actloop_core::Generator` trait.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatGenerator;
