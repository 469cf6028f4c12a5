use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, TravelPlannerError};

/// Main configuration structure for the travel planner
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
    pub bind: String,
    /// Optional bearer token guarding every route except `/health`
    #[serde(default)]
    pub bearer_token: Option<String>,
    /// Sessions untouched for this long are discarded
    #[serde(default = "default_session_idle_ttl_secs")]
    pub session_idle_ttl_secs: u64,
}

fn default_session_idle_ttl_secs() -> u64 {
    30 * 60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Never written to config files; read from `GOOGLE_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// Per-attempt timeout for a single generateContent call
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_base: f64,
    pub jitter_factor: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "travel-planner".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            bind: "127.0.0.1:8501".to_string(),
            bearer_token: None,
            session_idle_ttl_secs: default_session_idle_ttl_secs(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-pro".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            temperature: 0.2,
            top_p: 0.85,
            max_output_tokens: 2048,
            request_timeout_secs: 60,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 500,
            max_delay_ms: 8000,
            backoff_base: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides.
    /// Never fails; a missing API key is reported by [`Config::require_api_key`].
    pub fn load() -> Self {
        match [".env", "../.env"]
            .into_iter()
            .find(|path| dotenvy::from_path(path).is_ok())
        {
            Some(path) => tracing::info!(path, "Loaded .env"),
            None => tracing::debug!("No .env file found, using process environment only"),
        }

        let config_path =
            env::var("TP_CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

        let mut config = Self::from_file(&config_path);
        config.apply_env_overrides();

        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "Configuration has out-of-range values, continuing");
        }

        config
    }

    fn from_file(config_path: &str) -> Self {
        if !Path::new(config_path).exists() {
            tracing::info!("Config file not found at {} - using defaults", config_path);
            return Self::default();
        }

        match fs::read_to_string(config_path) {
            Ok(contents) => Self::from_yaml(&contents).unwrap_or_else(|e| {
                tracing::error!(
                    "Failed to parse config file {}: {} - using defaults",
                    config_path,
                    e
                );
                Self::default()
            }),
            Err(e) => {
                tracing::error!(
                    "Failed to read config file {}: {} - using defaults",
                    config_path,
                    e
                );
                Self::default()
            }
        }
    }

    pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
        let config = serde_yaml::from_str::<Config>(contents)?;
        tracing::info!("Loaded configuration from YAML");
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Server overrides
        if let Some(bind) = lookup("TP_HTTP_BIND") {
            self.server.bind = bind;
        }
        if let Some(token) = lookup("TP_BEARER_TOKEN") {
            if !token.is_empty() {
                self.server.bearer_token = Some(token);
            }
        }

        if let Some(ttl) = lookup("TP_SESSION_IDLE_TTL_SECS") {
            if let Ok(secs) = ttl.parse() {
                self.server.session_idle_ttl_secs = secs;
            }
        }

        // Gemini overrides
        if let Some(api_key) = lookup("GOOGLE_API_KEY") {
            self.gemini.api_key = Some(api_key);
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            self.gemini.base_url = base_url;
        }
        if let Some(timeout) = lookup("TP_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.gemini.request_timeout_secs = secs;
            }
        }

        // Retry overrides
        if let Some(attempts) = lookup("TP_RETRY_MAX_ATTEMPTS") {
            if let Ok(n) = attempts.parse() {
                self.retry.max_attempts = n;
            }
        }
        if let Some(jitter) = lookup("TP_RETRY_JITTER_FACTOR") {
            if let Ok(jitter_val) = jitter.parse() {
                self.retry.jitter_factor = jitter_val;
            }
        }
    }

    /// Validate configuration
    fn validate(&self) -> std::result::Result<(), Box<dyn std::error::Error>> {
        if self.retry.max_attempts == 0 {
            return Err("Retry max_attempts cannot be 0".into());
        }
        if self.retry.jitter_factor < 0.0 || self.retry.jitter_factor > 1.0 {
            return Err("Retry jitter factor must be between 0.0 and 1.0".into());
        }
        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            return Err("Gemini temperature must be between 0.0 and 2.0".into());
        }
        if !(0.0..=1.0).contains(&self.gemini.top_p) {
            return Err("Gemini top_p must be between 0.0 and 1.0".into());
        }
        if self.server.session_idle_ttl_secs == 0 {
            return Err("Session idle TTL cannot be 0".into());
        }
        if self.gemini.request_timeout_secs == 0 {
            return Err("Gemini request timeout cannot be 0".into());
        }
        Ok(())
    }

    /// The model API key, or the fatal startup error naming the missing setting
    pub fn require_api_key(&self) -> Result<&str> {
        match self.gemini.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(TravelPlannerError::Configuration(
                "GOOGLE_API_KEY is not set. Add it to your environment or .env file.".to_string(),
            )),
        }
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.server.session_idle_ttl_secs)
    }

    /// Get the per-attempt request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini.request_timeout_secs)
    }
}
