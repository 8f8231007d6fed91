// Configuration: read once from the environment (after dotenvy loads .env).
//
// CLI flags override these values in main; nothing else reads env vars.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::extractor::openai::DEFAULT_BASE_URL;
use crate::extractor::topic::{
    ExtractionSettings, UnexpectedFailurePolicy, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};

/// Central configuration loaded from environment variables.
///
/// Built once at startup and passed down; nothing else reads the environment.
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    /// Chat-completions base URL (defaults to https://api.openai.com/v1)
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f32,
    /// Response cap for topic requests, in tokens
    pub max_tokens: u32,
    pub on_unexpected: UnexpectedFailurePolicy,
    /// Per-request timeout; unset means the HTTP client default
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the API key, which is only checked
    /// by commands that call the model (see `require_api_key`).
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. `load` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let temperature = match lookup("POSTPREP_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .with_context(|| format!("POSTPREP_TEMPERATURE is not a number: '{raw}'"))?,
            None => DEFAULT_TEMPERATURE,
        };

        let max_tokens = match lookup("POSTPREP_MAX_TOKENS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("POSTPREP_MAX_TOKENS is not a whole number: '{raw}'"))?,
            None => DEFAULT_MAX_TOKENS,
        };

        let on_unexpected = match lookup("POSTPREP_ON_UNEXPECTED") {
            Some(raw) => raw
                .parse::<UnexpectedFailurePolicy>()
                .map_err(|e| anyhow::anyhow!("POSTPREP_ON_UNEXPECTED: {e}"))?,
            // "degrade" or unset both keep the batch going
            None => UnexpectedFailurePolicy::Degrade,
        };

        let request_timeout = match lookup("POSTPREP_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().with_context(|| {
                    format!("POSTPREP_REQUEST_TIMEOUT_SECS is not a whole number: '{raw}'")
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: lookup("POSTPREP_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
            max_tokens,
            on_unexpected,
            request_timeout,
        })
    }

    /// Check that the API key is configured.
    /// Call this before any operation that extracts topics.
    pub fn require_api_key(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Extraction parameters derived from this config.
    pub fn extraction_settings(&self) -> ExtractionSettings {
        ExtractionSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            on_unexpected: self.on_unexpected,
        }
    }
}
