//! feedlens - text-feature extraction for feedback collection
//!
//! Prepares free-text feedback for indexing and throttling: tokens and
//! bigrams from descriptions, cleaned URLs, and rate-limit keys derived from
//! the client address and a digest of the submitted text.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod ratelimit;
pub mod request;
pub mod utils;

// Global error type
pub use self::error::{FeedResult, FeedlensError};

// Configuration and builders
pub use crate::config::{
    AnalysisConfig, AnalysisConfigBuilder, KeyKind, KeyOptions, RateLimitConfig, RateLimitRuleConfig,
};

// Analysis facade
pub use crate::analyzer::{
    global_analyzer, init_global_analyzer, FeedbackAnalyzer, FeedbackFeatures,
};

// Request abstraction
pub use crate::request::{FeedbackRequest, RequestMeta};

// Rate limiting
pub use crate::ratelimit::{
    actual_ip, actual_ip_plus_desc, CounterBackend, KeyBuilder, LogMetrics, MemoryBackend,
    MemoryMetrics, MetricsSink, NoopMetrics, RateLimiter, RateLimiterBuilder, Ratelimited,
};

// Engine re-exports
pub use feedlens_engine::{compute_grams, CoreError, Rate, Tokenizer, UrlCleaner};
