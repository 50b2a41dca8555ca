//! Global error type
use feedlens_engine::CoreError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedlensError {
    // Engine errors (rate expressions, tokenizer settings)
    #[error("Engine error: {0}")]
    Core(#[from] CoreError),

    // Request errors
    #[error("Missing request meta key: {0}")]
    MissingMeta(String),

    // Rate limiting errors
    #[error("Invalid rule name `{0}`: only ASCII letters are allowed")]
    InvalidRuleName(String),
    #[error("Counter backend failed: {0}")]
    BackendError(String),

    // Configuration / initialization errors
    #[error("Config invalid: {0}")]
    ConfigError(String),
    #[error("Analyzer initialization failed: {0}")]
    AnalyzerInitError(String),

    // Serialization errors
    #[error("JSON parse failed: {0}")]
    JsonError(#[from] SerdeJsonError),

    // Base errors
    #[error("IO failed: {0}")]
    IoError(#[from] IoError),
}

// Global Result alias
pub type FeedResult<T> = Result<T, FeedlensError>;
