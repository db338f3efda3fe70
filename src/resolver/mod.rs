//! LLM-backed column resolver.
//!
//! Maps raw spreadsheet headers (in any language or naming convention) to
//! the six semantic roles plus a currency symbol, using an OpenAI
//! chat-completions call constrained to the [`SemanticColumnMap`] JSON
//! schema. The core engine never depends on this module; it only consumes
//! the resulting mapping.
//!
//! [`SemanticColumnMap`]: crate::schema::SemanticColumnMap

pub mod client;
pub mod prompts;

pub use client::*;
