//! Feedback analysis facade and its process-wide instance
pub mod feedback_analyzer;
pub mod global;

pub use self::feedback_analyzer::{FeedbackAnalyzer, FeedbackFeatures};
pub use self::global::{global_analyzer, init_global_analyzer, is_global_analyzer_initialized};
