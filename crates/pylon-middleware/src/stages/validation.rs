//! OAS request-validation middleware.
//!
//! This stage validates each incoming request against an OpenAPI-style
//! specification document. A request whose (path, method) pair is not
//! declared in the document is answered immediately with a 400 and never
//! forwarded; a declared request has its required parameters checked
//! before control passes to the next stage.
//!
//! # Lifecycle
//!
//! The specification is loaded and dereferenced once, at construction
//! time, and construction does not complete until dereferencing has, so
//! the first request can never observe a partially resolved document. After
//! construction the document is immutable, shared state read by every
//! in-flight request.
//!
//! # Forwarded state
//!
//! On forward, the stage records the matched path on the
//! [`RequestContext`] and attaches the resolved document as a
//! [`ResolvedSpec`] extension so downstream stages and handlers can
//! consult it.
//!
//! # Route matching
//!
//! Matching is exact-string: template segments such as `/pets/{petId}`
//! are compared literally and never expanded. See
//! [`pylon_oas::matcher`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;
use tracing::warn;

use pylon_oas::{
    check_parameters, contains_route, find_operation, CheckError, JsonSchemaEngine,
    ParameterLocation, ParameterSource, SchemaEngine, SpecDocument, SpecError, SpecLoader,
    ValidationConfig,
};

use crate::context::RequestContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response, ResponseExt};

/// Response body text sent when the requested route is not declared.
pub const UNMATCHED_ROUTE_MESSAGE: &str = "The requested path is not in the specification file";

/// The resolved specification document, attached to the request context
/// when a validated request is forwarded.
#[derive(Debug, Clone)]
pub struct ResolvedSpec(pub Arc<SpecDocument>);

/// A request body buffered by the host, attached as a request extension.
///
/// Body-located parameters are only observable when the host has buffered
/// the body and inserted this extension; this stage never reads the body
/// stream itself.
#[derive(Debug, Clone)]
pub struct BufferedBody(pub Bytes);

/// Middleware validating requests against a specification document.
#[derive(Clone)]
pub struct OasValidationMiddleware {
    document: Arc<SpecDocument>,
    engine: Arc<dyn SchemaEngine>,
    config: ValidationConfig,
}

impl std::fmt::Debug for OasValidationMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OasValidationMiddleware")
            .field("paths", &self.document.paths.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OasValidationMiddleware {
    /// Loads, dereferences, and wraps a specification file.
    ///
    /// Returns only once the document is fully resolved; await this during
    /// host startup.
    pub async fn from_file(
        path: impl AsRef<Path>,
        config: ValidationConfig,
    ) -> Result<Self, SpecError> {
        let document = SpecLoader::from_file(path).await?;
        Ok(Self::new(document, config))
    }

    /// Wraps an already-loaded document with the default schema engine.
    #[must_use]
    pub fn new(document: SpecDocument, config: ValidationConfig) -> Self {
        Self::with_engine(document, Arc::new(JsonSchemaEngine::new()), config)
    }

    /// Wraps a document with an injected schema engine.
    #[must_use]
    pub fn with_engine(
        document: SpecDocument,
        engine: Arc<dyn SchemaEngine>,
        config: ValidationConfig,
    ) -> Self {
        Self {
            document: Arc::new(document),
            engine,
            config,
        }
    }

    /// Returns the resolved specification document.
    #[must_use]
    pub fn document(&self) -> &Arc<SpecDocument> {
        &self.document
    }

    /// Returns the validation configuration.
    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl Middleware for OasValidationMiddleware {
    fn name(&self) -> &'static str {
        "oas_validation"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            // uri().path() carries no query string; the matcher contract
            // additionally wants a lower-cased method.
            let requested_path = request.uri().path().to_string();
            let method = request.method().as_str().to_ascii_lowercase();

            ctx.set_matched_path(requested_path.clone());

            if !contains_route(&self.document.paths, &requested_path, &method) {
                return Response::json_message(StatusCode::BAD_REQUEST, UNMATCHED_ROUTE_MESSAGE);
            }
            let Some(operation) = find_operation(&self.document.paths, &requested_path, &method)
            else {
                return Response::json_message(StatusCode::BAD_REQUEST, UNMATCHED_ROUTE_MESSAGE);
            };

            let source = RequestValues::from_request(&request);
            let outcome = match check_parameters(operation, &source, self.engine.as_ref()) {
                Ok(outcome) => outcome,
                Err(err @ CheckError::MalformedValue { .. }) => {
                    warn!(
                        request_id = %ctx.request_id(),
                        error = %err,
                        "parameter value could not be coerced"
                    );
                    return Response::json_error(
                        StatusCode::BAD_REQUEST,
                        "MALFORMED_PARAMETER",
                        &err.to_string(),
                    );
                }
            };

            if !outcome.missing.is_empty() {
                let listed: Vec<String> = outcome.missing.iter().map(ToString::to_string).collect();
                warn!(
                    request_id = %ctx.request_id(),
                    missing = ?listed,
                    "required parameters absent from request"
                );
                if self.config.reject_missing_parameters {
                    return Response::json_error(
                        StatusCode::BAD_REQUEST,
                        "MISSING_PARAMETER",
                        &format!("missing required parameters: {}", listed.join(", ")),
                    );
                }
            }

            if !outcome.invalid.is_empty() {
                warn!(
                    request_id = %ctx.request_id(),
                    invalid = ?outcome.invalid,
                    "parameters failed schema validation"
                );
                if self.config.reject_invalid_parameters {
                    return Response::json_error(
                        StatusCode::BAD_REQUEST,
                        "INVALID_PARAMETER",
                        &format!("invalid parameters: {}", outcome.invalid.join(", ")),
                    );
                }
            }

            ctx.set_extension(ResolvedSpec(Arc::clone(&self.document)));
            next.run(ctx, request).await
        })
    }
}

/// The raw parameter values carried by one request.
///
/// Built once per request from the query string, headers, cookies, and
/// (when the host buffered one) a JSON object body. Implements
/// [`ParameterSource`] for the checker.
#[derive(Debug, Default)]
pub struct RequestValues {
    query: HashMap<String, String>,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    body: Option<Value>,
}

impl RequestValues {
    /// Extracts parameter values from a request.
    ///
    /// Query pairs are percent-decoded; when a key repeats, the last
    /// occurrence wins. Header names are compared case-insensitively.
    #[must_use]
    pub fn from_request(request: &Request) -> Self {
        let query = request
            .uri()
            .query()
            .and_then(|qs| serde_urlencoded::from_str::<Vec<(String, String)>>(qs).ok())
            .map(|pairs| pairs.into_iter().collect())
            .unwrap_or_default();

        let mut headers = HashMap::new();
        for (name, value) in request.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), value.to_string());
            }
        }

        let cookies = headers
            .get("cookie")
            .map(|header| parse_cookies(header))
            .unwrap_or_default();

        let body = request
            .extensions()
            .get::<BufferedBody>()
            .and_then(|b| serde_json::from_slice::<Value>(&b.0).ok())
            .filter(Value::is_object);

        Self {
            query,
            headers,
            cookies,
            body,
        }
    }
}

impl ParameterSource for RequestValues {
    fn value(&self, location: ParameterLocation, name: &str) -> Option<String> {
        match location {
            ParameterLocation::Query => self.query.get(name).cloned(),
            ParameterLocation::Header => self.headers.get(&name.to_ascii_lowercase()).cloned(),
            ParameterLocation::Cookie => self.cookies.get(name).cloned(),
            // Exact-string route matching extracts no path segments, so
            // path-located parameters are never observed.
            ParameterLocation::Path => None,
            // Body fields are re-rendered as JSON text so the checker's
            // coercion step round-trips them.
            ParameterLocation::Body => self
                .body
                .as_ref()
                .and_then(|body| body.get(name))
                .map(Value::to_string),
        }
    }
}

/// Parses a `Cookie` header into name/value pairs.
fn parse_cookies(header_value: &str) -> HashMap<String, String> {
    let mut cookies = HashMap::new();
    for cookie in header_value.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            cookies.insert(
                name.trim().to_string(),
                value.trim().trim_matches('"').to_string(),
            );
        }
    }
    cookies
}
