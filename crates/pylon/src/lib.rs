//! # Pylon
//!
//! **Contract-gate middleware for HTTP services**
//!
//! Pylon validates incoming requests against an OpenAPI-style
//! specification document before they reach your handlers:
//!
//! - **Route gate** – a (path, method) pair not declared in the document
//!   is answered with a structured 400 and never forwarded
//! - **Parameter checks** – required parameters are partitioned into
//!   missing and schema-invalid, with configurable rejection
//! - **Resolved spec forwarding** – downstream stages receive the fully
//!   dereferenced document on the request context
//! - **No startup races** – the document is loaded and dereferenced
//!   before construction completes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pylon::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let validation =
//!         OasValidationMiddleware::from_file("openapi.yaml", ValidationConfig::default())
//!             .await?;
//!
//!     let pipeline = Pipeline::builder()
//!         .add_stage(RequestIdMiddleware::new())
//!         .add_stage(validation)
//!         .build();
//!
//!     // Hand `pipeline` to your host framework's request loop.
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → RequestId → OasValidation ──▶ handler
//!                           │
//!                           └──▶ 400 (route not declared,
//!                                or rejected parameters)
//! ```
//!
//! Route matching is exact-string: template segments such as
//! `/pets/{petId}` are compared literally, never expanded. See
//! [`oas::matcher`] for the rationale.

#![doc(html_root_url = "https://docs.rs/pylon/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export the specification backend
pub use pylon_oas as oas;

// Re-export the middleware machinery
pub use pylon_middleware as middleware;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use pylon::prelude::*;
/// ```
pub mod prelude {
    pub use pylon_middleware::{
        BoxFuture, BufferedBody, Middleware, Next, OasValidationMiddleware, Pipeline,
        PipelineBuilder, Request, RequestContext, RequestId, RequestValues, ResolvedSpec,
        Response, ResponseExt,
    };

    pub use pylon_middleware::stages::request_id::RequestIdMiddleware;

    pub use pylon_oas::{
        check_parameters, contains_route, find_operation, CheckError, JsonSchemaEngine,
        MissingParameter, Operation, ParameterLocation, ParameterSource, ParameterSpec,
        PathItem, PathTable, SchemaEngine, SpecDocument, SpecError, SpecLoader, SpecResult,
        ValidationConfig, ValidationOutcome, Violation,
    };
}
