//! Configuration file parser for ~/.config/marquee/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings so typos show up
//! in the log.
use crate::api::{ApiConfig, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the API bearer token.
pub const TOKEN_ENV_VAR: &str = "TMDB_API_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("No API token: set TMDB_API_TOKEN or `api_token` in the config file")]
    MissingToken,
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Top-level application configuration.
///
/// Every key is optional; missing keys fall back to `Default::default()`.
/// `Debug` masks `api_token`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the catalog REST API.
    pub api_base_url: String,

    /// Root of the image CDN; sizes and paths are appended.
    pub image_base_url: String,

    /// `language` query value for localized endpoints.
    pub language: String,

    /// Bearer token (alternative to the TMDB_API_TOKEN env var).
    /// The env var takes precedence.
    pub api_token: Option<String>,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Seconds between hero carousel slides.
    pub hero_interval_secs: u64,

    /// Seconds between automatic advances of the unfocused rows.
    pub carousel_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            language: "en-US".to_string(),
            api_token: None,
            request_timeout_secs: 20,
            hero_interval_secs: 4,
            carousel_interval_secs: 4,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("image_base_url", &self.image_base_url)
            .field("language", &self.language)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("hero_interval_secs", &self.hero_interval_secs)
            .field("carousel_interval_secs", &self.carousel_interval_secs)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "api_base_url",
        "image_base_url",
        "language",
        "api_token",
        "request_timeout_secs",
        "hero_interval_secs",
        "carousel_interval_secs",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Invalid TOML or wrong value types → `Err(ConfigError::Parse)`
    /// - Over 1 MB → `Err(ConfigError::TooLarge)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), api_base_url = %config.api_base_url, "Loaded configuration");
        Ok(config)
    }

    /// Pick the bearer token: `env_token` (from TMDB_API_TOKEN) first, then
    /// the file's `api_token`. Blank values count as missing.
    pub fn resolve_token(&self, env_token: Option<String>) -> Result<SecretString, ConfigError> {
        env_token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.api_token.clone().filter(|t| !t.trim().is_empty()))
            .map(|t| SecretString::from(t.trim().to_string()))
            .ok_or(ConfigError::MissingToken)
    }

    /// Connection settings for [`crate::api::CatalogClient`].
    pub fn api_config(&self, token: SecretString) -> ApiConfig {
        ApiConfig {
            base_url: self.api_base_url.clone(),
            language: self.language.clone(),
            token,
            request_timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
        }
    }

    pub fn hero_interval(&self) -> Duration {
        Duration::from_secs(self.hero_interval_secs.max(1))
    }

    pub fn carousel_interval(&self) -> Duration {
        Duration::from_secs(self.carousel_interval_secs.max(1))
    }
}

// ============================================================================
// Tests
// ============================================================================
