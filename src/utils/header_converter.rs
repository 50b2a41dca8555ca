//! HTTP header to request-meta conversion
use http::header::HeaderMap;
use log::warn;
use rustc_hash::FxHashMap;

/// Upper bound on headers read from one request
const MAX_HEADER_ITER: usize = 1000;

/// Header conversion helper
pub struct HeaderConverter;

impl HeaderConverter {
    /// Maps an `http::HeaderMap` to CGI-style meta keys.
    ///
    /// `X-Cluster-Client-IP` becomes `HTTP_X_CLUSTER_CLIENT_IP`; `Content-Type`
    /// and `Content-Length` keep their unprefixed CGI names. The first value
    /// of a repeated header wins. Values that aren't visible ASCII are skipped.
    pub fn to_meta_map(headers: &HeaderMap) -> FxHashMap<String, String> {
        let mut meta = FxHashMap::default();

        for (iter_count, (name, value)) in headers.iter().enumerate() {
            if iter_count >= MAX_HEADER_ITER {
                warn!("Header iteration exceeded {} entries, stopping", MAX_HEADER_ITER);
                break;
            }

            let Ok(value) = value.to_str() else {
                warn!("Skipping non-ASCII value of header {}", name.as_str());
                continue;
            };

            meta.entry(Self::meta_key(name.as_str()))
                .or_insert_with(|| value.to_string());
        }
        meta
    }

    /// CGI meta key for one header name
    pub fn meta_key(header_name: &str) -> String {
        let upper = header_name.to_ascii_uppercase().replace('-', "_");
        match upper.as_str() {
            "CONTENT_TYPE" | "CONTENT_LENGTH" => upper,
            _ => format!("HTTP_{}", upper),
        }
    }
}
