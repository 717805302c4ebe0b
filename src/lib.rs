//! RVC model installer library
//!
//! Provides the catalog of predictor and embedder models, the streaming
//! fetcher and the installer behind the `rvc-models` CLI.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
