//! Feedback text tokenizer
//!
//! Turns free text into lowercase word tokens for indexing:
//!
//! 1. lowercase the whole text
//! 2. split on runs of ASCII whitespace and the punctuation `. , / \ ? ; : " * & ^ % $ # @ !`
//! 3. drop stopwords and tokens shorter than the minimum length
//!
//! Every other character, non-ASCII letters and Unicode punctuation included,
//! stays part of its token. Output keeps source order and duplicates.
//!
//! ```
//! use feedlens_engine::tokenizer::Tokenizer;
//!
//! let tokenizer = Tokenizer::default();
//! assert_eq!(tokenizer.tokenize("The Quick, brown fox!"), vec!["quick", "brown", "fox"]);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::error::{CoreError, CoreResult};
use crate::stopwords::default_stopword_set;

/// Minimum token length in chars; shorter tokens are dropped.
pub const MIN_TOKEN_LEN: usize = 2;

/// Separator class: ASCII whitespace plus the fixed punctuation set.
static TOKEN_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[ \t\n\x0B\x0C\r.,/\\?;:"*&^%$#@!]+"#).expect("token split regex is a valid constant")
});

/// Stopword-filtering tokenizer.
///
/// The stopword set and minimum length are fixed at construction; a
/// `Tokenizer` is immutable afterwards and can be shared across threads.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: FxHashSet<String>,
    min_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            stopwords: default_stopword_set(),
            min_len: MIN_TOKEN_LEN,
        }
    }
}

impl Tokenizer {
    /// Builds a tokenizer from an explicit stopword list and minimum token length.
    ///
    /// Stopwords are lowercased so they compare against lowercased tokens.
    pub fn new<I, S>(stopwords: I, min_len: usize) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if min_len == 0 {
            return Err(CoreError::InvalidConfig(
                "minimum token length must be at least 1".to_string(),
            ));
        }
        let stopwords = stopwords
            .into_iter()
            .map(|s| s.as_ref().to_lowercase())
            .collect();
        Ok(Self { stopwords, min_len })
    }

    /// Default minimum length with a custom stopword list.
    pub fn with_stopwords<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
            min_len: MIN_TOKEN_LEN,
        }
    }

    pub fn stopwords(&self) -> &FxHashSet<String> {
        &self.stopwords
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    #[inline]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Tokenizes `text`. `None` and `""` both yield an empty vector.
    pub fn tokenize<'a>(&self, text: impl Into<Option<&'a str>>) -> Vec<String> {
        let Some(text) = text.into() else {
            return Vec::new();
        };
        if text.is_empty() {
            return Vec::new();
        }

        let lowered = text.to_lowercase();
        TOKEN_SPLIT_RE
            .split(&lowered)
            .filter(|token| self.keep(token))
            .map(str::to_string)
            .collect()
    }

    #[inline]
    fn keep(&self, token: &str) -> bool {
        // char count, not bytes: "éa" is a two-letter token
        token.chars().take(self.min_len).count() == self.min_len && !self.is_stopword(token)
    }
}
