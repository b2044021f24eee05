pub mod analysis;
pub mod cli;
pub mod core;
pub mod environment;
pub mod utils;
pub mod web;

use anyhow::Result;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::core::GrokClient;
use crate::environment::EnvironmentConfig;

pub use web::{build_rocket, start_web_server};

/// Analyzer wired to the configured completion API
pub fn build_analyzer(config: &EnvironmentConfig) -> Result<Analyzer> {
    let client = GrokClient::new(config.completion.clone(), config.api_key())?;
    Ok(Analyzer::new(Arc::new(client), config.limits.clone()))
}
