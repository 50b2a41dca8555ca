//! Text analysis and key derivation configuration
//!
//! Loaded once at startup (JSON or builder) and never mutated afterwards;
//! the analyzer copies what it needs into immutable engine types.

use std::path::Path;

use feedlens_engine::{Tokenizer, UrlCleaner, DEFAULT_ALLOWED_SCHEMES, DEFAULT_STOPWORDS, MIN_TOKEN_LEN};
use serde::{Deserialize, Serialize};

use crate::error::{FeedResult, FeedlensError};

/// Header carrying the client address when running behind the reverse proxy
pub const DEFAULT_PROXY_IP_HEADER: &str = "HTTP_X_CLUSTER_CLIENT_IP";
/// Direct-connection address key
pub const DEFAULT_REMOTE_ADDR_KEY: &str = "REMOTE_ADDR";
/// POST field holding the feedback text
pub const DEFAULT_DESCRIPTION_FIELD: &str = "description";
/// Digest input when the description field is missing
pub const DEFAULT_DESCRIPTION_PLACEHOLDER: &str = "no description";

/// Tokenizer options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    pub stopwords: Vec<String>,
    pub min_token_len: usize,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| (*s).to_string()).collect(),
            min_token_len: MIN_TOKEN_LEN,
        }
    }
}

/// URL cleaning options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlOptions {
    pub allowed_schemes: Vec<String>,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            allowed_schemes: DEFAULT_ALLOWED_SCHEMES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Rate-limit key options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyOptions {
    /// Meta key set by the trusted reverse proxy
    pub proxy_ip_header: String,
    /// Meta key of the direct connection address
    pub remote_addr_key: String,
    pub description_field: String,
    pub description_placeholder: String,
    /// Hash only this many leading chars of the description; `None` hashes all of it
    pub digest_prefix_chars: Option<usize>,
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self {
            proxy_ip_header: DEFAULT_PROXY_IP_HEADER.to_string(),
            remote_addr_key: DEFAULT_REMOTE_ADDR_KEY.to_string(),
            description_field: DEFAULT_DESCRIPTION_FIELD.to_string(),
            description_placeholder: DEFAULT_DESCRIPTION_PLACEHOLDER.to_string(),
            digest_prefix_chars: None,
        }
    }
}

/// Complete analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub tokenizer: TokenizerOptions,
    pub url: UrlOptions,
    pub keys: KeyOptions,
}

impl AnalysisConfig {
    pub fn from_json_str(json: &str) -> FeedResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> FeedResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading analysis config from {}", path.display());
        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde can't express.
    pub fn validate(&self) -> FeedResult<()> {
        if self.tokenizer.min_token_len == 0 {
            return Err(FeedlensError::ConfigError(
                "tokenizer.min_token_len must be at least 1".to_string(),
            ));
        }
        if self.url.allowed_schemes.iter().any(|s| s.is_empty()) {
            return Err(FeedlensError::ConfigError(
                "url.allowed_schemes must not contain empty entries".to_string(),
            ));
        }
        if self.keys.proxy_ip_header.is_empty() || self.keys.remote_addr_key.is_empty() {
            return Err(FeedlensError::ConfigError(
                "keys.proxy_ip_header and keys.remote_addr_key must be set".to_string(),
            ));
        }
        if self.keys.description_field.is_empty() {
            return Err(FeedlensError::ConfigError(
                "keys.description_field must be set".to_string(),
            ));
        }
        if self.keys.digest_prefix_chars == Some(0) {
            return Err(FeedlensError::ConfigError(
                "keys.digest_prefix_chars must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn build_tokenizer(&self) -> FeedResult<Tokenizer> {
        Ok(Tokenizer::new(&self.tokenizer.stopwords, self.tokenizer.min_token_len)?)
    }

    pub fn build_url_cleaner(&self) -> UrlCleaner {
        UrlCleaner::new(&self.url.allowed_schemes)
    }
}

/// Chained builder for [`AnalysisConfig`]
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopwords<I, S>(mut self, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.tokenizer.stopwords = stopwords.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_token_len(mut self, len: usize) -> Self {
        self.config.tokenizer.min_token_len = len;
        self
    }

    pub fn allowed_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.url.allowed_schemes = schemes.into_iter().map(Into::into).collect();
        self
    }

    pub fn proxy_ip_header(mut self, header: impl Into<String>) -> Self {
        self.config.keys.proxy_ip_header = header.into();
        self
    }

    pub fn remote_addr_key(mut self, key: impl Into<String>) -> Self {
        self.config.keys.remote_addr_key = key.into();
        self
    }

    pub fn description_field(mut self, field: impl Into<String>) -> Self {
        self.config.keys.description_field = field.into();
        self
    }

    pub fn description_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.keys.description_placeholder = placeholder.into();
        self
    }

    pub fn digest_prefix_chars(mut self, chars: Option<usize>) -> Self {
        self.config.keys.digest_prefix_chars = chars;
        self
    }

    pub fn build(self) -> FeedResult<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
