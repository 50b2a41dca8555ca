//! Rate-limit key derivation
//!
//! Keys group requests for throttling and double-submit detection. They are
//! not credentials: collisions are harmless and MD5 is used for speed.

use std::sync::Arc;

use feedlens_engine::prefix_digest;
use once_cell::sync::Lazy;

use crate::config::{KeyKind, KeyOptions};
use crate::error::FeedResult;
use crate::request::RequestMeta;

/// Key function signature used by the rate limiter
pub type KeyFn = Arc<dyn Fn(&dyn RequestMeta) -> FeedResult<String> + Send + Sync>;

static DEFAULT_KEY_BUILDER: Lazy<KeyBuilder> = Lazy::new(KeyBuilder::default);

/// Derives keys according to [`KeyOptions`]
#[derive(Debug, Clone, Default)]
pub struct KeyBuilder {
    options: KeyOptions,
}

impl KeyBuilder {
    pub fn new(options: KeyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &KeyOptions {
        &self.options
    }

    /// Client address: the trusted proxy header when present, otherwise the
    /// direct connection address. A request with neither is a lookup error.
    pub fn actual_ip<'r>(&self, req: &'r dyn RequestMeta) -> FeedResult<&'r str> {
        match req.meta(&self.options.proxy_ip_header) {
            Some(ip) => Ok(ip),
            None => req.require_meta(&self.options.remote_addr_key),
        }
    }

    /// `"<client address>:<md5 hex of description>"`
    ///
    /// A missing description field hashes the configured placeholder instead.
    pub fn actual_ip_plus_desc(&self, req: &dyn RequestMeta) -> FeedResult<String> {
        let desc = req
            .post(&self.options.description_field)
            .unwrap_or(self.options.description_placeholder.as_str());
        let digest = prefix_digest(desc, self.options.digest_prefix_chars);
        let ip = self.actual_ip(req)?;

        let mut key = String::with_capacity(ip.len() + 1 + digest.len());
        key.push_str(ip);
        key.push(':');
        key.push_str(&digest);
        Ok(key)
    }
}

/// [`KeyBuilder::actual_ip`] with default options
pub fn actual_ip(req: &dyn RequestMeta) -> FeedResult<String> {
    DEFAULT_KEY_BUILDER.actual_ip(req).map(str::to_string)
}

/// [`KeyBuilder::actual_ip_plus_desc`] with default options
pub fn actual_ip_plus_desc(req: &dyn RequestMeta) -> FeedResult<String> {
    DEFAULT_KEY_BUILDER.actual_ip_plus_desc(req)
}

/// Wraps a builder method as a [`KeyFn`]
pub fn ip_key_fn(builder: Arc<KeyBuilder>) -> KeyFn {
    Arc::new(move |req: &dyn RequestMeta| builder.actual_ip(req).map(str::to_string))
}

pub fn ip_plus_desc_key_fn(builder: Arc<KeyBuilder>) -> KeyFn {
    Arc::new(move |req: &dyn RequestMeta| builder.actual_ip_plus_desc(req))
}

impl KeyKind {
    /// Key function this kind selects
    pub fn key_fn(self, builder: Arc<KeyBuilder>) -> KeyFn {
        match self {
            KeyKind::Ip => ip_key_fn(builder),
            KeyKind::IpPlusDescription => ip_plus_desc_key_fn(builder),
        }
    }
}
