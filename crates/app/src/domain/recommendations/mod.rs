//! Recommendations
//!
//! Product suggestions from a language model, validated against the catalog
//! and backfilled from popular products.

pub mod model;
mod repository;
pub mod service;

pub use model::{LanguageModel, MockLanguageModel, ModelConfig, ModelError, OpenAiCompatibleModel};
pub use service::*;
