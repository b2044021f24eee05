// src/core/mod.rs
//! Completion plumbing shared by every analysis

pub mod completion_client;
pub mod json_extract;

pub use completion_client::{CompletionBackend, CompletionError, CompletionRequest, GrokClient};
pub use json_extract::{extract_json, ExtractError};
