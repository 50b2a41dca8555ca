//! Bigram extraction
//!
//! A bigram is two adjacent tokens rendered as `"<min> <max>"`, so
//! "youtube crash" and "crash youtube" land on the same key.

use rustc_hash::FxHashSet;

use crate::tokenizer::Tokenizer;

/// Renders the canonical form of an adjacent token pair.
#[inline]
pub fn canonical_pair(a: &str, b: &str) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut pair = String::with_capacity(lo.len() + hi.len() + 1);
    pair.push_str(lo);
    pair.push(' ');
    pair.push_str(hi);
    pair
}

/// Builds the deduplicated bigram list from an already tokenized sequence.
///
/// Order is first occurrence; treat the result as a set.
pub fn bigrams_from_tokens<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    if tokens.len() < 2 {
        return Vec::new();
    }

    let mut seen = FxHashSet::default();
    let mut grams = Vec::with_capacity(tokens.len() - 1);
    for window in tokens.windows(2) {
        let pair = canonical_pair(window[0].as_ref(), window[1].as_ref());
        if seen.insert(pair.clone()) {
            grams.push(pair);
        }
    }
    grams
}

/// Tokenizes `text` and returns its bigrams.
///
/// Empty or absent text, or fewer than two surviving tokens, gives an empty list.
///
/// ```
/// use feedlens_engine::{bigram::compute_grams, tokenizer::Tokenizer};
///
/// let mut grams = compute_grams(&Tokenizer::default(), "The quick brown fox jumped");
/// grams.sort();
/// assert_eq!(grams, vec!["brown fox", "brown quick", "fox jumped"]);
/// ```
pub fn compute_grams<'a>(tokenizer: &Tokenizer, text: impl Into<Option<&'a str>>) -> Vec<String> {
    match text.into() {
        Some(text) if !text.is_empty() => bigrams_from_tokens(&tokenizer.tokenize(text)),
        _ => Vec::new(),
    }
}
