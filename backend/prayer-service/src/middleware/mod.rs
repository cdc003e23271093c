/// HTTP middleware for the prayer service
///
/// - `JwtAuthMiddleware` / `UserId`: bearer session tokens
/// - `MetricsMiddleware`: per-route Prometheus counters and latency
pub mod jwt_auth;
pub mod metrics;

pub use jwt_auth::{JwtAuthMiddleware, UserId};
pub use metrics::MetricsMiddleware;
