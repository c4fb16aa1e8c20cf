//! Configuration handling for the bot.
//!
//! Everything is read from environment variables with development defaults,
//! so a bare `cargo run` works against the console dispatcher. Values that
//! reach a network call (timeouts, endpoint URL) are validated up front; a bad
//! value stops startup instead of surfacing as an odd failure mid-pipeline.

use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable names. Public so tests and the binary can refer to
/// them.
pub const ENV_LLM_API_URL: &str = "LLM_API_URL";
pub const ENV_LLM_API_KEY: &str = "LLM_API_KEY";
pub const ENV_LLM_MODEL: &str = "LLM_MODEL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
pub const ENV_MAX_CHUNK_CHARS: &str = "MAX_CHUNK_CHARS";
pub const ENV_CANONICAL_HASHTAG: &str = "CANONICAL_HASHTAG";
pub const ENV_BOT_ID: &str = "BOT_ID";

/// Default development values used when environment variables are absent.
const DEFAULT_LLM_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CHUNK_CHARS: usize = 1950;
pub const DEFAULT_CANONICAL_HASHTAG: &str = "#глянец";
const DEFAULT_BOT_ID: &str = "glossy-bot";

const FETCH_TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=10;
const LLM_TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 5..=30;
const MIN_CHUNK_CHARS: usize = 64;

/// Bot runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    llm_api_url: Url,
    llm_api_key: String,
    llm_model: String,
    fetch_timeout: Duration,
    llm_timeout: Duration,
    max_chunk_chars: usize,
    canonical_hashtag: String,
    bot_id: String,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_api_url = env_or(ENV_LLM_API_URL, DEFAULT_LLM_API_URL);
        let llm_api_url = Url::parse(&llm_api_url).map_err(|e| ConfigError::InvalidValue {
            field: ENV_LLM_API_URL,
            reason: e.to_string(),
        })?;

        let llm_api_key = env::var(ENV_LLM_API_KEY).unwrap_or_default();

        let llm_model = env_or(ENV_LLM_MODEL, DEFAULT_LLM_MODEL);
        if llm_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: ENV_LLM_MODEL,
                reason: "must not be empty".to_string(),
            });
        }

        let fetch_timeout_secs =
            parse_env(ENV_FETCH_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS)?;
        if !FETCH_TIMEOUT_RANGE.contains(&fetch_timeout_secs) {
            return Err(ConfigError::OutOfRange {
                field: ENV_FETCH_TIMEOUT_SECS,
                value: fetch_timeout_secs.to_string(),
                expected: "1..=10",
            });
        }

        let llm_timeout_secs = parse_env(ENV_LLM_TIMEOUT_SECS, DEFAULT_LLM_TIMEOUT_SECS)?;
        if !LLM_TIMEOUT_RANGE.contains(&llm_timeout_secs) {
            return Err(ConfigError::OutOfRange {
                field: ENV_LLM_TIMEOUT_SECS,
                value: llm_timeout_secs.to_string(),
                expected: "5..=30",
            });
        }

        let max_chunk_chars = parse_env(ENV_MAX_CHUNK_CHARS, DEFAULT_MAX_CHUNK_CHARS)?;
        if max_chunk_chars < MIN_CHUNK_CHARS {
            return Err(ConfigError::OutOfRange {
                field: ENV_MAX_CHUNK_CHARS,
                value: max_chunk_chars.to_string(),
                expected: ">= 64",
            });
        }

        let canonical_hashtag = env_or(ENV_CANONICAL_HASHTAG, DEFAULT_CANONICAL_HASHTAG);
        if !canonical_hashtag.starts_with('#')
            || canonical_hashtag.len() < 2
            || canonical_hashtag.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::InvalidValue {
                field: ENV_CANONICAL_HASHTAG,
                reason: "must be a single '#' tag without whitespace".to_string(),
            });
        }

        let bot_id = env_or(ENV_BOT_ID, DEFAULT_BOT_ID);
        if bot_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: ENV_BOT_ID,
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            llm_api_url,
            llm_api_key,
            llm_model,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            llm_timeout: Duration::from_secs(llm_timeout_secs),
            max_chunk_chars,
            canonical_hashtag,
            bot_id,
        })
    }

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    pub fn llm_api_url(&self) -> &Url {
        &self.llm_api_url
    }
    /// Bearer token for the text service. Empty means unauthenticated.
    pub fn llm_api_key(&self) -> &str {
        &self.llm_api_key
    }
    pub fn llm_model(&self) -> &str {
        &self.llm_model
    }
    /// Total timeout of a single page or image fetch.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    /// Timeout of a single text service call.
    pub fn llm_timeout(&self) -> Duration {
        self.llm_timeout
    }
    /// Platform message limit, in chars.
    pub fn max_chunk_chars(&self) -> usize {
        self.max_chunk_chars
    }
    pub fn canonical_hashtag(&self) -> &str {
        &self.canonical_hashtag
    }
    /// Identity of the bot on the chat platform; its own events are ignored.
    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    /// Point the text service at another endpoint (tests use a mock server).
    pub fn with_llm_api_url(mut self, url: Url) -> Self {
        self.llm_api_url = url;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_url: Url::parse(DEFAULT_LLM_API_URL).expect("default API URL is valid"),
            llm_api_key: String::new(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            llm_timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            canonical_hashtag: DEFAULT_CANONICAL_HASHTAG.to_string(),
            bot_id: DEFAULT_BOT_ID.to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: key,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("value {value} for '{field}' out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}
