//! Common HTTP types used throughout the middleware chain.

use bytes::Bytes;
use http_body_util::Full;

/// The HTTP request type flowing through the middleware chain.
///
/// A standard `http::Request` with a `Full<Bytes>` body.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced by the middleware chain.
pub type Response = http::Response<Full<Bytes>>;

/// Extension trait for building structured responses.
pub trait ResponseExt {
    /// Creates a plain-text error response.
    fn error(status: http::StatusCode, message: &str) -> Response;

    /// Creates a JSON error response with a `{"error": {"code", "message"}}`
    /// envelope.
    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response;

    /// Creates a JSON response whose body is exactly `{"message": ...}`.
    ///
    /// This is the wire contract for route misses and must not grow
    /// additional fields.
    fn json_message(status: http::StatusCode, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn error(status: http::StatusCode, message: &str) -> Response {
        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(message.to_string())))
            .expect("failed to build error response")
    }

    fn json_error(status: http::StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });

        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("failed to build JSON error response")
    }

    fn json_message(status: http::StatusCode, message: &str) -> Response {
        let body = serde_json::json!({ "message": message });

        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("failed to build JSON message response")
    }
}
