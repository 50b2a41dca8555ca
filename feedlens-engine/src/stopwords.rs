//! Default English stopword list used by the tokenizer when no list is configured.

use rustc_hash::FxHashSet;

/// Common English words that carry little discrimination value in feedback search.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she", "should",
    "so", "some", "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then",
    "there", "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
    "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why",
    "will", "with", "you", "your", "yours", "yourself", "yourselves",
];

/// Builds an owned set from [`DEFAULT_STOPWORDS`].
pub fn default_stopword_set() -> FxHashSet<String> {
    DEFAULT_STOPWORDS.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_is_lowercase_and_unique() {
        let set = default_stopword_set();
        assert_eq!(set.len(), DEFAULT_STOPWORDS.len());
        assert!(set.iter().all(|w| w.chars().all(|c| c.is_ascii_lowercase())));
    }

    #[test]
    fn default_list_contains_articles() {
        let set = default_stopword_set();
        assert!(set.contains("the"));
        assert!(set.contains("a"));
        assert!(!set.contains("firefox"));
    }
}
