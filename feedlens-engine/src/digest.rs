//! Text digests for rate-limit keys
//!
//! MD5 is used for speed and uniform spread only: the digest groups
//! double-submits and is not a security boundary.

/// Length of the hex digest in chars.
pub const DIGEST_HEX_LEN: usize = 32;

/// Lowercase hex MD5 of the UTF-8 bytes of `text`.
#[inline]
pub fn text_digest(text: &str) -> String {
    format!("{:x}", md5::compute(text.as_bytes()))
}

/// Digest of the first `prefix_chars` chars of `text`, or of all of it when `None`.
pub fn prefix_digest(text: &str, prefix_chars: Option<usize>) -> String {
    match prefix_chars {
        Some(n) => text_digest(char_prefix(text, n)),
        None => text_digest(text),
    }
}

/// Borrows at most `n` chars from the front of `text` without splitting a char.
pub fn char_prefix(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
