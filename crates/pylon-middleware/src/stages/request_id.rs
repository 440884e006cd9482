//! Request ID middleware.
//!
//! Generates or extracts a unique request ID for each incoming request so
//! log lines emitted by later stages can be correlated. The ID is stored
//! on the [`RequestContext`] and echoed back on the `x-request-id`
//! response header.

use uuid::Uuid;

use crate::context::{RequestContext, RequestId};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};

/// The header used for request ID propagation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that generates or extracts request IDs.
///
/// By default incoming `x-request-id` headers are ignored and a fresh
/// UUID v7 is generated; internal services receiving traffic from trusted
/// peers can opt into propagating the incoming ID instead.
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware {
    /// Whether to trust incoming request ID headers.
    trust_incoming: bool,
}

impl RequestIdMiddleware {
    /// Creates a middleware that always generates fresh IDs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a middleware that trusts incoming `x-request-id` headers.
    #[must_use]
    pub fn trust_incoming() -> Self {
        Self {
            trust_incoming: true,
        }
    }

    /// Extracts a request ID from the headers, if present and valid.
    fn extract_request_id(&self, request: &Request) -> Option<RequestId> {
        if !self.trust_incoming {
            return None;
        }

        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(RequestId::from_uuid)
    }
}

impl Middleware for RequestIdMiddleware {
    fn name(&self) -> &'static str {
        "request_id"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_id = self
                .extract_request_id(&request)
                .unwrap_or_else(RequestId::new);

            ctx.set_request_id(request_id);

            let mut response = next.run(ctx, request).await;

            if let Ok(value) = http::HeaderValue::from_str(&request_id.to_string()) {
                response.headers_mut().insert(REQUEST_ID_HEADER, value);
            }

            response
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request as HttpRequest, Response as HttpResponse, StatusCode};
    use http_body_util::Full;

    fn test_request() -> Request {
        HttpRequest::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn request_with_id(id: &str) -> Request {
        HttpRequest::builder()
            .uri("/test")
            .header(REQUEST_ID_HEADER, id)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn ok_handler() -> Next<'static> {
        Next::handler(|_ctx, _req| {
            Box::pin(async {
                HttpResponse::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::new()))
                    .unwrap()
            })
        })
    }

    #[tokio::test]
    async fn test_generates_id_and_sets_response_header() {
        let middleware = RequestIdMiddleware::new();
        let mut ctx = RequestContext::new();

        let response = middleware.process(&mut ctx, test_request(), ok_handler()).await;

        let header = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert_eq!(header.to_str().unwrap(), ctx.request_id().to_string());
    }

    #[tokio::test]
    async fn test_untrusted_incoming_id_is_replaced() {
        let middleware = RequestIdMiddleware::new();
        let mut ctx = RequestContext::new();
        let incoming = Uuid::now_v7().to_string();

        middleware
            .process(&mut ctx, request_with_id(&incoming), ok_handler())
            .await;

        assert_ne!(ctx.request_id().to_string(), incoming);
    }

    #[tokio::test]
    async fn test_trusted_incoming_id_is_propagated() {
        let middleware = RequestIdMiddleware::trust_incoming();
        let mut ctx = RequestContext::new();
        let incoming = Uuid::now_v7().to_string();

        let response = middleware
            .process(&mut ctx, request_with_id(&incoming), ok_handler())
            .await;

        assert_eq!(ctx.request_id().to_string(), incoming);
        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            incoming.as_str()
        );
    }

    #[tokio::test]
    async fn test_invalid_incoming_id_falls_back_to_generated() {
        let middleware = RequestIdMiddleware::trust_incoming();
        let mut ctx = RequestContext::new();

        middleware
            .process(&mut ctx, request_with_id("not-a-uuid"), ok_handler())
            .await;

        assert_ne!(ctx.request_id().to_string(), "not-a-uuid");
    }
}
