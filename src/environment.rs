// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub server: ServerSettings,
    pub completion: CompletionSettings,
    pub limits: LimitSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
    pub port: u16,
    pub route_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub api_url: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_input_chars: usize,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: EnvironmentConfig,
    #[serde(default)]
    production: EnvironmentConfig,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
            route_prefix: "/api".to_string(),
        }
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.x.ai/v1/chat/completions".to_string(),
            model: "grok-4-1-fast-reasoning".to_string(),
            api_key_env: "GROK_API_KEY".to_string(),
            temperature: 0.0,
            timeout_seconds: 120,
            max_retries: 2,
            retry_base_delay_ms: 500,
        }
    }
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_input_chars: 50_000,
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration based on environment
    pub fn load(config_path: &Path) -> Result<Self> {
        let environment = Self::get_environment();
        info!(
            "Loading configuration for environment: {} from {}",
            environment,
            config_path.display()
        );

        Self::load_from_path(config_path, &environment)
    }

    fn get_environment() -> String {
        std::env::var("ATS_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_path(config_path: &Path, environment: &str) -> Result<Self> {
        if !config_path.exists() {
            warn!(
                "{} not found, falling back to built-in defaults",
                config_path.display()
            );
            return Ok(Self::default().with_env_overrides());
        }

        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Ok(Self::from_yaml(&config_content, environment)?.with_env_overrides())
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        env_config.validate()?;
        Ok(env_config)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(port) = std::env::var("ROCKET_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.server.route_prefix.starts_with('/') {
            anyhow::bail!(
                "server.route_prefix must start with '/': {}",
                self.server.route_prefix
            );
        }
        if self.limits.max_input_chars == 0 {
            anyhow::bail!("limits.max_input_chars must be greater than zero");
        }
        Ok(())
    }

    /// Read the completion API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.completion.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn log_file() -> Option<PathBuf> {
        std::env::var("ATS_LOG_FILE").ok().map(PathBuf::from)
    }
}
