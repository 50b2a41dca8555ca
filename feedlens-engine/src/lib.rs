//! feedlens-engine - text-feature extraction core
//!
//! Pure, synchronous building blocks used by the `feedlens` facade:
//! tokenizing feedback text, deriving bigrams, cleaning submitted URLs,
//! digesting text for rate-limit keys and parsing rate expressions.

// Error types
pub mod error;
// Stopword defaults
pub mod stopwords;
// Text -> tokens
pub mod tokenizer;
// Tokens -> canonical bigrams
pub mod bigram;
// Submitted URL cleaning
pub mod url;
// MD5 text digests for keys
pub mod digest;
// `<count>/<period>` rate expressions
pub mod rate;
// Log helpers
pub mod utils;

// Top-level re-exports
pub use bigram::{bigrams_from_tokens, canonical_pair, compute_grams};
pub use digest::{prefix_digest, text_digest, DIGEST_HEX_LEN};
pub use error::{CoreError, CoreResult};
pub use rate::Rate;
pub use stopwords::{default_stopword_set, DEFAULT_STOPWORDS};
pub use tokenizer::{Tokenizer, MIN_TOKEN_LEN};
pub use self::url::{UrlCleaner, DEFAULT_ALLOWED_SCHEMES};
pub use utils::preview_compact;
