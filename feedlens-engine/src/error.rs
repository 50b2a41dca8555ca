//! feedlens-engine error definitions
//! Covers the few fallible operations of the engine; the text and URL
//! extractors themselves are total and never return these.
use thiserror::Error;

/// Engine error enum
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    // ===================== Rate expressions =====================
    /// Rate expression is not `<count>/<period>`
    #[error("Invalid rate expression `{0}`: {1}")]
    InvalidRate(String, &'static str),

    // ===================== Configuration =====================
    /// A configuration value is out of its accepted range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Engine-level Result alias
pub type CoreResult<T> = Result<T, CoreError>;
