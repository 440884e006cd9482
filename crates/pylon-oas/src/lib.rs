//! Pylon OAS - OpenAPI specification backend
//!
//! This crate is the specification-document side of Pylon: it loads an
//! OpenAPI-style document, resolves its internal schema references, and
//! answers the two questions the validation middleware asks per request:
//! is this (path, method) pair declared, and do the request's required
//! parameters conform to their schemas.
//!
//! # Architecture
//!
//! ```text
//!                      ┌────────────────────────────┐
//!                      │   spec file (YAML/JSON)    │
//!                      └──────────┬─────────────────┘
//!                                 │ load + dereference ($ref → inline)
//!                      ┌──────────▼─────────────────┐
//!                      │   SpecDocument             │
//!                      └──────────┬─────────────────┘
//!                                 │ shared (Arc) across requests
//!          HTTP request           │
//!              │       ┌──────────▼─────────────────┐
//!              ├──────▶│  matcher: exact (path,     │
//!              │       │  method) lookup            │
//!              │       └──────────┬─────────────────┘
//!              │                  │ matched operation
//!              │       ┌──────────▼─────────────────┐
//!              └──────▶│  checker: required params  │──▶ missing / invalid
//!                      │  (SchemaEngine as judge)   │
//!                      └────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use pylon_oas::{check_parameters, contains_route, JsonSchemaEngine, SpecLoader};
//!
//! let document = SpecLoader::from_file("openapi.yaml").await?;
//! let engine = JsonSchemaEngine::new();
//!
//! if contains_route(&document.paths, "/pets", "get") {
//!     let operation = pylon_oas::find_operation(&document.paths, "/pets", "get").unwrap();
//!     let outcome = check_parameters(operation, &source, &engine)?;
//!     assert!(outcome.is_clean());
//! }
//! ```
//!
//! Route matching is exact-string on both path and method: template
//! segments like `/pets/{petId}` are matched literally, never expanded.
//! See [`matcher`] for why this limitation is preserved.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checker;
pub mod config;
pub mod deref;
pub mod document;
pub mod engine;
pub mod error;
pub mod matcher;

// Re-exports for convenience
pub use checker::{check_parameters, MissingParameter, ParameterSource, ValidationOutcome};
pub use config::ValidationConfig;
pub use deref::dereference;
pub use document::{
    Operation, ParameterLocation, ParameterSpec, PathItem, PathTable, SpecDocument, SpecLoader,
};
pub use engine::{JsonSchemaEngine, SchemaEngine, Violation, KNOWN_FORMATS};
pub use error::{CheckError, SpecError, SpecResult};
pub use matcher::{contains_route, find_operation};
