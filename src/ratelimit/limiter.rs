//! Rate-limiting interceptor
//!
//! Wraps a request handler: every POST request is counted under the key the
//! key function derives, and when the count for the current window goes over
//! the rule's rate a `throttled.<rule>` metric is emitted. The handler always
//! runs; whether to answer 429 is up to the web layer, which can consult
//! [`RequestMeta::is_limited`].

use std::sync::Arc;

use feedlens_engine::Rate;
use http::Method;
use once_cell::sync::Lazy;
use regex::Regex;

use super::backend::{CounterBackend, MemoryBackend};
use super::keys::{KeyBuilder, KeyFn};
use super::metrics::{throttled_metric, LogMetrics, MetricsSink};
use crate::config::{KeyKind, RateLimitRuleConfig, DEFAULT_RATE};
use crate::error::{FeedResult, FeedlensError};
use crate::request::RequestMeta;
use crate::utils::preview_compact;

static RULE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]+$").expect("rule name regex is a valid constant"));

/// Rule names end up in metric names, so only ASCII letters are accepted.
pub fn validate_rule_name(name: &str) -> FeedResult<()> {
    if RULE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(FeedlensError::InvalidRuleName(name.to_string()))
    }
}

/// One named throttling rule bound to its key function, counter store and metrics sink.
#[derive(Clone)]
pub struct RateLimiter {
    rule: String,
    metric: String,
    rate: Rate,
    key_fn: KeyFn,
    backend: Arc<dyn CounterBackend>,
    metrics: Arc<dyn MetricsSink>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("rule", &self.rule)
            .field("rate", &self.rate)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    pub fn builder(rule: impl Into<String>) -> RateLimiterBuilder {
        RateLimiterBuilder::new(rule)
    }

    /// Builds a limiter from a configured rule.
    pub fn from_config(
        rule: &RateLimitRuleConfig,
        keys: Arc<KeyBuilder>,
        backend: Arc<dyn CounterBackend>,
        metrics: Arc<dyn MetricsSink>,
    ) -> FeedResult<Self> {
        RateLimiterBuilder::new(rule.name.clone())
            .rate(rule.rate)
            .key_builder(keys)
            .key_kind(rule.key)
            .backend(backend)
            .metrics(metrics)
            .build()
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn rate(&self) -> &Rate {
        &self.rate
    }

    /// Counts the request and reports whether this rule limits it.
    ///
    /// Only POST requests are counted. A key that can't be derived, or a
    /// backend failure, leaves the request uncounted. The metric fires at most
    /// once per request across stacked limiters.
    pub fn check(&self, req: &mut dyn RequestMeta) -> bool {
        if *req.method() != Method::POST {
            return false;
        }

        let key = match (self.key_fn)(&*req) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("Rate limit rule {}: key derivation failed: {}", self.rule, e);
                return false;
            }
        };

        let hits = match self.backend.incr(&self.rule, &key, &self.rate) {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("Rate limit rule {}: counter backend failed: {}", self.rule, e);
                return false;
            }
        };

        if !self.rate.is_exceeded_by(hits) {
            return false;
        }

        if !req.is_limited() {
            self.metrics.incr(&self.metric);
            log::info!(
                "Rate limit rule {} exceeded ({} hits, rate {}) for key {}",
                self.rule,
                hits,
                self.rate,
                preview_compact(&key, 48)
            );
        }
        req.set_limited(true);
        true
    }

    /// Runs [`check`](Self::check), then the handler, returning the handler's value.
    pub fn call<R, T, F>(&self, req: &mut R, handler: F) -> T
    where
        R: RequestMeta,
        F: FnOnce(&mut R) -> T,
    {
        self.check(req);
        handler(req)
    }

    /// Binds this limiter to a handler.
    pub fn wrap<H>(&self, handler: H) -> Ratelimited<H> {
        Ratelimited {
            limiter: self.clone(),
            handler,
        }
    }
}

/// A handler guarded by a [`RateLimiter`]
pub struct Ratelimited<H> {
    limiter: RateLimiter,
    handler: H,
}

impl<H> Ratelimited<H> {
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn handle<R, T>(&self, req: &mut R) -> T
    where
        R: RequestMeta,
        H: Fn(&mut R) -> T,
    {
        self.limiter.call(req, |r| (self.handler)(r))
    }
}

/// Builder for [`RateLimiter`]; defaults: rate `5/m`, key = client address,
/// in-memory counters, log metrics.
pub struct RateLimiterBuilder {
    rule: String,
    rate: Rate,
    rate_expr: Option<String>,
    key_kind: KeyKind,
    key_builder: Option<Arc<KeyBuilder>>,
    key_fn: Option<KeyFn>,
    backend: Option<Arc<dyn CounterBackend>>,
    metrics: Option<Arc<dyn MetricsSink>>,
}

impl RateLimiterBuilder {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            rate: DEFAULT_RATE,
            rate_expr: None,
            key_kind: KeyKind::Ip,
            key_builder: None,
            key_fn: None,
            backend: None,
            metrics: None,
        }
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = rate;
        self.rate_expr = None;
        self
    }

    /// Rate as `"<count>/<period>"`; parsed by [`build`](Self::build).
    pub fn rate_expr(mut self, expr: impl Into<String>) -> Self {
        self.rate_expr = Some(expr.into());
        self
    }

    pub fn key_kind(mut self, kind: KeyKind) -> Self {
        self.key_kind = kind;
        self
    }

    /// Options used by the built-in key functions
    pub fn key_builder(mut self, builder: Arc<KeyBuilder>) -> Self {
        self.key_builder = Some(builder);
        self
    }

    /// Custom key function; overrides `key_kind`.
    pub fn key_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn RequestMeta) -> FeedResult<String> + Send + Sync + 'static,
    {
        let key_fn: KeyFn = Arc::new(f);
        self.key_fn = Some(key_fn);
        self
    }

    pub fn backend(mut self, backend: Arc<dyn CounterBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> FeedResult<RateLimiter> {
        validate_rule_name(&self.rule)?;

        let rate = match &self.rate_expr {
            Some(expr) => Rate::parse(expr)?,
            None => self.rate,
        };

        let key_fn = match self.key_fn {
            Some(f) => f,
            None => {
                let builder = self.key_builder.unwrap_or_default();
                self.key_kind.key_fn(builder)
            }
        };

        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(MemoryBackend::new()) as Arc<dyn CounterBackend>);
        let metrics = self
            .metrics
            .unwrap_or_else(|| Arc::new(LogMetrics) as Arc<dyn MetricsSink>);

        log::debug!("Rate limit rule {} built with rate {}", self.rule, rate);
        Ok(RateLimiter {
            metric: throttled_metric(&self.rule),
            rule: self.rule,
            rate,
            key_fn,
            backend,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::backend::Clock;
    use crate::ratelimit::metrics::MemoryMetrics;
    use crate::request::FeedbackRequest;
    use std::cell::Cell;

    fn fixed_backend() -> Arc<MemoryBackend> {
        let clock: Clock = Arc::new(|| 1_000);
        Arc::new(MemoryBackend::with_clock(clock))
    }

    fn post_from(ip: &str) -> FeedbackRequest {
        FeedbackRequest::post_request()
            .with_meta("REMOTE_ADDR", ip)
            .with_post("description", "firefox crashes")
    }

    fn limiter(rule: &str, rate: &str, metrics: Arc<MemoryMetrics>) -> RateLimiter {
        RateLimiter::builder(rule)
            .rate_expr(rate)
            .backend(fixed_backend())
            .metrics(metrics)
            .build()
            .unwrap()
    }

    #[test]
    fn builder_defaults() {
        let limiter = RateLimiter::builder("feedback").build().unwrap();
        assert_eq!(limiter.rule(), "feedback");
        assert_eq!(limiter.rate(), &DEFAULT_RATE);
    }

    #[test]
    fn rejects_bad_rule_names_and_rates() {
        for bad in ["", "feed-back", "feedback1", "throttled.x"] {
            let err = RateLimiter::builder(bad).build().unwrap_err();
            assert!(matches!(err, FeedlensError::InvalidRuleName(_)), "{:?}", bad);
        }
        let err = RateLimiter::builder("feedback").rate_expr("5/y").build().unwrap_err();
        assert!(matches!(err, FeedlensError::Core(_)));
    }

    #[test]
    fn get_requests_are_not_counted() {
        let metrics = Arc::new(MemoryMetrics::new());
        let backend = fixed_backend();
        let limiter = RateLimiter::builder("feedback")
            .rate_expr("1/m")
            .backend(backend.clone())
            .metrics(metrics.clone())
            .build()
            .unwrap();

        for _ in 0..5 {
            let mut req = FeedbackRequest::new(Method::GET).with_meta("REMOTE_ADDR", "10.0.0.1");
            assert!(!limiter.check(&mut req));
            assert!(!req.is_limited());
        }
        assert!(backend.is_empty());
        assert_eq!(metrics.total(), 0);
    }

    #[test]
    fn exceeding_rate_emits_metric_and_still_runs_handler() {
        let metrics = Arc::new(MemoryMetrics::new());
        let limiter = limiter("feedback", "2/m", metrics.clone());
        let calls = Cell::new(0);

        let mut limited = Vec::new();
        for _ in 0..4 {
            let mut req = post_from("10.0.0.1");
            let out = limiter.call(&mut req, |r| {
                calls.set(calls.get() + 1);
                r.is_limited()
            });
            limited.push(out);
        }

        assert_eq!(limited, vec![false, false, true, true]);
        assert_eq!(calls.get(), 4);
        assert_eq!(metrics.get("throttled.feedback"), 2);
    }

    #[test]
    fn clients_counted_separately() {
        let metrics = Arc::new(MemoryMetrics::new());
        let limiter = limiter("feedback", "1/m", metrics.clone());

        assert!(!limiter.check(&mut post_from("10.0.0.1")));
        assert!(!limiter.check(&mut post_from("10.0.0.2")));
        assert!(limiter.check(&mut post_from("10.0.0.1")));
        assert_eq!(metrics.total(), 1);
    }

    #[test]
    fn stacked_limiters_emit_once_per_request() {
        let metrics = Arc::new(MemoryMetrics::new());
        let outer = limiter("alpha", "1/m", metrics.clone());
        let inner = limiter("beta", "1/m", metrics.clone());

        for _ in 0..2 {
            let mut req = post_from("10.0.0.1");
            let body = outer.call(&mut req, |r| inner.call(r, |_| "ok"));
            assert_eq!(body, "ok");
        }

        assert_eq!(metrics.get("throttled.alpha"), 1);
        assert_eq!(metrics.get("throttled.beta"), 0);
    }

    #[test]
    fn missing_address_is_not_counted() {
        let _ = env_logger::builder().is_test(true).try_init();
        let metrics = Arc::new(MemoryMetrics::new());
        let limiter = limiter("feedback", "1/m", metrics.clone());

        for _ in 0..3 {
            let mut req = FeedbackRequest::post_request();
            let ran = limiter.call(&mut req, |_| true);
            assert!(ran);
            assert!(!req.is_limited());
        }
        assert_eq!(metrics.total(), 0);
    }

    #[test]
    fn description_key_separates_submissions() {
        let metrics = Arc::new(MemoryMetrics::new());
        let limiter = RateLimiter::builder("doublesubmit")
            .rate_expr("1/m")
            .key_kind(KeyKind::IpPlusDescription)
            .backend(fixed_backend())
            .metrics(metrics.clone())
            .build()
            .unwrap();

        let submit = |desc: &str| {
            let mut req = FeedbackRequest::post_request()
                .with_meta("REMOTE_ADDR", "10.0.0.1")
                .with_post("description", desc);
            limiter.check(&mut req)
        };

        assert!(!submit("page is blank"));
        assert!(!submit("video has no sound"));
        assert!(submit("page is blank"));
        assert_eq!(metrics.get("throttled.doublesubmit"), 1);
    }

    #[test]
    fn custom_key_fn() {
        let metrics = Arc::new(MemoryMetrics::new());
        let limiter = RateLimiter::builder("global")
            .rate_expr("1/m")
            .key_fn(|_| Ok("everyone".to_string()))
            .backend(fixed_backend())
            .metrics(metrics.clone())
            .build()
            .unwrap();

        assert!(!limiter.check(&mut post_from("10.0.0.1")));
        assert!(limiter.check(&mut post_from("10.0.0.2")));
    }

    #[test]
    fn from_config_uses_rule_settings() {
        let metrics = Arc::new(MemoryMetrics::new());
        let rule = RateLimitRuleConfig::new("feedback", Rate::parse("1/h").unwrap(), KeyKind::Ip);
        let limiter = RateLimiter::from_config(
            &rule,
            Arc::new(KeyBuilder::default()),
            fixed_backend(),
            metrics.clone(),
        )
        .unwrap();

        assert_eq!(limiter.rate().to_string(), "1/h");
        limiter.check(&mut post_from("10.0.0.1"));
        assert!(limiter.check(&mut post_from("10.0.0.1")));
        assert_eq!(metrics.get("throttled.feedback"), 1);
    }

    #[test]
    fn wrapped_handler() {
        let metrics = Arc::new(MemoryMetrics::new());
        let guarded = limiter("feedback", "1/m", metrics.clone())
            .wrap(|req: &mut FeedbackRequest| if req.is_limited() { 429 } else { 201 });

        assert_eq!(guarded.handle(&mut post_from("10.0.0.1")), 201);
        assert_eq!(guarded.handle(&mut post_from("10.0.0.1")), 429);
        assert_eq!(guarded.limiter().rule(), "feedback");
    }
}
