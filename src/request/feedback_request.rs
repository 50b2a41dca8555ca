use http::{HeaderMap, Method};
use rustc_hash::FxHashMap;

use super::RequestMeta;
use crate::config::analysis::DEFAULT_REMOTE_ADDR_KEY;
use crate::utils::HeaderConverter;

/// Owned request snapshot handed over by the web layer
#[derive(Debug, Clone)]
pub struct FeedbackRequest {
    method: Method,
    meta: FxHashMap<String, String>,
    post: FxHashMap<String, String>,
    limited: bool,
}

impl FeedbackRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            meta: FxHashMap::default(),
            post: FxHashMap::default(),
            limited: false,
        }
    }

    pub fn post_request() -> Self {
        Self::new(Method::POST)
    }

    /// Builds meta from HTTP headers plus the peer address under `REMOTE_ADDR`.
    pub fn from_headers(method: Method, headers: &HeaderMap, remote_addr: Option<&str>) -> Self {
        let mut meta = HeaderConverter::to_meta_map(headers);
        if let Some(addr) = remote_addr {
            meta.insert(DEFAULT_REMOTE_ADDR_KEY.to_string(), addr.to_string());
        }
        Self {
            method,
            meta,
            post: FxHashMap::default(),
            limited: false,
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn with_post(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.post.insert(field.into(), value.into());
        self
    }
}

impl RequestMeta for FeedbackRequest {
    fn meta(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    fn post(&self, field: &str) -> Option<&str> {
        self.post.get(field).map(String::as_str)
    }

    fn method(&self) -> &Method {
        &self.method
    }

    fn is_limited(&self) -> bool {
        self.limited
    }

    fn set_limited(&mut self, limited: bool) {
        self.limited = limited;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedlensError;
    use http::HeaderValue;

    #[test]
    fn builder_populates_maps() {
        let req = FeedbackRequest::post_request()
            .with_meta("REMOTE_ADDR", "10.0.0.1")
            .with_post("description", "it broke");

        assert_eq!(req.method(), &Method::POST);
        assert_eq!(req.meta("REMOTE_ADDR"), Some("10.0.0.1"));
        assert_eq!(req.post("description"), Some("it broke"));
        assert_eq!(req.post("url"), None);
        assert!(!req.is_limited());
    }

    #[test]
    fn require_meta_reports_missing_key() {
        let req = FeedbackRequest::new(Method::GET);
        let err = req.require_meta("REMOTE_ADDR").unwrap_err();
        assert!(matches!(err, FeedlensError::MissingMeta(ref k) if k == "REMOTE_ADDR"));
    }

    #[test]
    fn from_headers_maps_proxy_header_and_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-cluster-client-ip", HeaderValue::from_static("198.51.100.4"));

        let req = FeedbackRequest::from_headers(Method::POST, &headers, Some("10.0.0.2"));
        assert_eq!(req.meta("HTTP_X_CLUSTER_CLIENT_IP"), Some("198.51.100.4"));
        assert_eq!(req.meta("REMOTE_ADDR"), Some("10.0.0.2"));
    }

    #[test]
    fn limited_flag_toggles() {
        let mut req = FeedbackRequest::post_request();
        req.set_limited(true);
        assert!(req.is_limited());
    }
}
