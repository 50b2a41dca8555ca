use std::borrow::Cow;
use std::sync::Arc;

use feedlens_engine::{compute_grams, Tokenizer, UrlCleaner};
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::FeedResult;
use crate::ratelimit::KeyBuilder;
use crate::request::RequestMeta;
use crate::utils::preview_compact;

/// Derived fields stored next to a feedback document in the search index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackFeatures {
    pub description_bigrams: Vec<String>,
    pub url: String,
}

/// Tokenizer, URL cleaner and key builder built from one configuration.
///
/// Immutable once built; share it by reference or `Arc` across request handlers.
#[derive(Debug, Clone)]
pub struct FeedbackAnalyzer {
    tokenizer: Tokenizer,
    url_cleaner: UrlCleaner,
    keys: Arc<KeyBuilder>,
}

impl Default for FeedbackAnalyzer {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::default(),
            url_cleaner: UrlCleaner::default(),
            keys: Arc::new(KeyBuilder::default()),
        }
    }
}

impl FeedbackAnalyzer {
    pub fn new(config: &AnalysisConfig) -> FeedResult<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: config.build_tokenizer()?,
            url_cleaner: config.build_url_cleaner(),
            keys: Arc::new(KeyBuilder::new(config.keys.clone())),
        })
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn url_cleaner(&self) -> &UrlCleaner {
        &self.url_cleaner
    }

    /// Shared key builder, for wiring rate limiters with the same options
    pub fn key_builder(&self) -> Arc<KeyBuilder> {
        self.keys.clone()
    }

    pub fn tokenize<'a>(&self, text: impl Into<Option<&'a str>>) -> Vec<String> {
        self.tokenizer.tokenize(text)
    }

    pub fn compute_grams<'a>(&self, text: impl Into<Option<&'a str>>) -> Vec<String> {
        compute_grams(&self.tokenizer, text)
    }

    pub fn clean_url<'a>(&self, url: &'a str) -> Cow<'a, str> {
        self.url_cleaner.clean_url(url)
    }

    pub fn actual_ip(&self, req: &dyn RequestMeta) -> FeedResult<String> {
        self.keys.actual_ip(req).map(str::to_string)
    }

    pub fn actual_ip_plus_desc(&self, req: &dyn RequestMeta) -> FeedResult<String> {
        self.keys.actual_ip_plus_desc(req)
    }

    /// Bigrams of the description plus the cleaned URL, ready for indexing.
    pub fn extract_features(&self, description: Option<&str>, url: Option<&str>) -> FeedbackFeatures {
        let description_bigrams = self.compute_grams(description);
        let url = url.map(|u| self.clean_url(u).into_owned()).unwrap_or_default();
        log::debug!(
            "Extracted {} bigrams from \"{}\"",
            description_bigrams.len(),
            preview_compact(description.unwrap_or(""), 40)
        );
        FeedbackFeatures {
            description_bigrams,
            url,
        }
    }
}
