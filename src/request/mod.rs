//! Request abstraction consumed by key functions and the rate limiter
//!
//! The web layer owns real requests; this crate only needs meta lookup,
//! POST field lookup, the HTTP method and a per-request "limited" flag.
pub mod feedback_request;

pub use self::feedback_request::FeedbackRequest;

use http::Method;

use crate::error::{FeedResult, FeedlensError};

/// Read access to the parts of a request used for key derivation.
pub trait RequestMeta {
    /// Meta value (CGI-style key such as `REMOTE_ADDR`)
    fn meta(&self, key: &str) -> Option<&str>;

    /// Submitted form field
    fn post(&self, field: &str) -> Option<&str>;

    fn method(&self) -> &Method;

    /// Whether an earlier limiter already throttled this request
    fn is_limited(&self) -> bool;

    fn set_limited(&mut self, limited: bool);

    /// Meta lookup that reports a missing key as an error.
    fn require_meta(&self, key: &str) -> FeedResult<&str> {
        self.meta(key)
            .ok_or_else(|| FeedlensError::MissingMeta(key.to_string()))
    }
}
