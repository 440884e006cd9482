//! # Pylon Middleware
//!
//! Middleware chain machinery and the OAS request-validation stage.
//!
//! The central piece is [`OasValidationMiddleware`](stages::validation::OasValidationMiddleware):
//! constructed once from a specification document (loaded and
//! dereferenced before construction completes), it yields a per-request
//! stage that checks the requested route and its required parameters
//! before forwarding.
//!
//! ```text
//! Request → RequestId → OasValidation ──▶ next stage / handler
//!                           │
//!                           └──▶ 400 (route not declared,
//!                                or rejected parameters)
//! ```
//!
//! Hosts with their own composition model drive a stage directly through
//! [`Next`](middleware::Next); hosts that want Pylon to own the chain use
//! [`Pipeline`](pipeline::Pipeline).
//!
//! ## Example
//!
//! ```ignore
//! use pylon_middleware::stages::validation::OasValidationMiddleware;
//! use pylon_oas::ValidationConfig;
//!
//! // Construction completes only after the document is dereferenced.
//! let validation =
//!     OasValidationMiddleware::from_file("openapi.yaml", ValidationConfig::default()).await?;
//!
//! let pipeline = pylon_middleware::Pipeline::builder()
//!     .add_stage(validation)
//!     .build();
//! ```

#![doc(html_root_url = "https://docs.rs/pylon-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

// Re-export main types at crate root
pub use context::{RequestContext, RequestId};
pub use middleware::{BoxFuture, Middleware, Next};
pub use pipeline::{BoxedMiddleware, Pipeline, PipelineBuilder};
pub use stages::validation::{
    BufferedBody, OasValidationMiddleware, RequestValues, ResolvedSpec, UNMATCHED_ROUTE_MESSAGE,
};
pub use types::{Request, Response, ResponseExt};
