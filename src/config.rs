//! Configuration management for Weather Chat.
//!
//! Configuration can be set via environment variables (a `.env` file in the
//! working directory is loaded first by the binary):
//! - `OPENAI_API_KEY` - Required. API key for the LLM provider.
//! - `WEATHER_API_KEY` - Required. API key for weatherapi.com.
//! - `LLM_MODEL` - Optional. Chat model identifier. Defaults to `gpt-4o-mini`.
//! - `LLM_TEMPERATURE` - Optional. Sampling temperature. Defaults to `0.0`.
//! - `LLM_BASE_URL` - Optional. OpenAI-compatible API base. Defaults to `https://api.openai.com/v1`.
//! - `WEATHER_BASE_URL` - Optional. Weather API base. Defaults to `http://api.weatherapi.com/v1`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `7860`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations per turn. Defaults to `10`.

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_WEATHER_BASE_URL: &str = "http://api.weatherapi.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Config {
    /// LLM provider API key
    pub llm_api_key: String,

    /// Weather provider API key
    pub weather_api_key: String,

    /// Chat model identifier
    pub model: String,

    /// Sampling temperature passed to the model
    pub temperature: f32,

    /// Base URL of the OpenAI-compatible API
    pub llm_base_url: String,

    /// Base URL of the weather API
    pub weather_base_url: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENAI_API_KEY` or
    /// `WEATHER_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let llm_api_key = required("OPENAI_API_KEY")?;
        let weather_api_key = required("WEATHER_API_KEY")?;

        let model = lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = parse_var(&lookup, "LLM_TEMPERATURE", 0.0f32)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidValue(
                "LLM_TEMPERATURE".to_string(),
                format!("{} is outside 0.0..=2.0", temperature),
            ));
        }

        let llm_base_url =
            lookup("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());

        let weather_base_url =
            lookup("WEATHER_BASE_URL").unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string());

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = parse_var(&lookup, "PORT", 7860u16)?;

        let max_iterations = parse_var(&lookup, "MAX_ITERATIONS", 10usize)?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_ITERATIONS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            llm_api_key,
            weather_api_key,
            model,
            temperature,
            llm_base_url,
            weather_base_url,
            host,
            port,
            max_iterations,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(llm_api_key: String, weather_api_key: String) -> Self {
        Self {
            llm_api_key,
            weather_api_key,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 7860,
            max_iterations: 10,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}
