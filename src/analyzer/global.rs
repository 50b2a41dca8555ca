//! Process-wide analyzer instance
//!
//! 1. `init_global_analyzer` installs an analyzer built from startup config
//! 2. `global_analyzer` hands out the shared instance, falling back to defaults
//! 3. the instance is read-only once installed

use std::sync::Arc;

use once_cell::sync::OnceCell;

use super::feedback_analyzer::FeedbackAnalyzer;
use crate::config::AnalysisConfig;
use crate::error::{FeedResult, FeedlensError};

static GLOBAL_ANALYZER: OnceCell<Arc<FeedbackAnalyzer>> = OnceCell::new();

/// Installs the process-wide analyzer.
///
/// Idempotent: when an analyzer is already installed this returns `Ok(())`
/// and keeps the existing one.
pub fn init_global_analyzer(config: &AnalysisConfig) -> FeedResult<()> {
    if GLOBAL_ANALYZER.get().is_some() {
        log::debug!("Global analyzer already initialized, skip reinitialization");
        return Ok(());
    }

    let analyzer = FeedbackAnalyzer::new(config).map_err(|e| {
        FeedlensError::AnalyzerInitError(format!("Failed to build FeedbackAnalyzer: {}", e))
    })?;

    GLOBAL_ANALYZER.set(Arc::new(analyzer)).map_err(|_| {
        FeedlensError::AnalyzerInitError(
            "Global analyzer initialization failed: instance already initialized by another thread".to_string(),
        )
    })?;

    log::info!("Global FeedbackAnalyzer initialized");
    Ok(())
}

/// Shared analyzer; built with default configuration on first use if
/// [`init_global_analyzer`] never ran.
pub fn global_analyzer() -> Arc<FeedbackAnalyzer> {
    GLOBAL_ANALYZER
        .get_or_init(|| {
            log::debug!("Lazy initializing global FeedbackAnalyzer with default config");
            Arc::new(FeedbackAnalyzer::default())
        })
        .clone()
}

/// Whether an analyzer has been installed (explicitly or lazily)
pub fn is_global_analyzer_initialized() -> bool {
    GLOBAL_ANALYZER.get().is_some()
}
