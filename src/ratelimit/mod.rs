//! Rate limiting: key derivation, counter backends, metrics and the interceptor
pub mod backend;
pub mod keys;
pub mod limiter;
pub mod metrics;

pub use self::backend::{Clock, CounterBackend, MemoryBackend};
pub use self::keys::{actual_ip, actual_ip_plus_desc, KeyBuilder, KeyFn};
pub use self::limiter::{RateLimiter, RateLimiterBuilder, Ratelimited};
pub use self::metrics::{LogMetrics, MemoryMetrics, MetricsSink, NoopMetrics};
