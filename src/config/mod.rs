//! Configuration: analysis settings and rate-limit rules
pub mod analysis;
pub mod ratelimit;

pub use self::analysis::{AnalysisConfig, AnalysisConfigBuilder, KeyOptions, TokenizerOptions, UrlOptions};
pub use self::ratelimit::{KeyKind, RateLimitConfig, RateLimitRuleConfig, DEFAULT_RATE};
