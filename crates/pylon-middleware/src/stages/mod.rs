//! Built-in middleware stages.
//!
//! - [`request_id`]: generates or propagates a request ID for log
//!   correlation.
//! - [`validation`]: validates incoming requests against an OpenAPI-style
//!   specification document.

pub mod request_id;
pub mod validation;

pub use request_id::RequestIdMiddleware;
pub use validation::{BufferedBody, OasValidationMiddleware, RequestValues, ResolvedSpec};
