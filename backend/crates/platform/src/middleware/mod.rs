//! Request Pipeline and Generic Policies
//!
//! Stages are assembled by the binary in this order: rate limit, response
//! time, security headers, CORS, then the authentication policy from the
//! `auth` crate.

pub mod cors;
pub mod pipeline;
pub mod rate_limit;
pub mod response_time;
pub mod security_headers;

pub use cors::{CorsConfig, CorsPolicy};
pub use pipeline::{Pipeline, PipelineBuilder, Policy, RequestContext, apply_pipeline};
pub use rate_limit::RateLimitPolicy;
pub use response_time::ResponseTimePolicy;
pub use security_headers::SecurityHeadersPolicy;
