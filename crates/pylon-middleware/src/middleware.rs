//! Core middleware trait and chaining types.
//!
//! A [`Middleware`] processes a request before it reaches the host's
//! handler and may either forward the request by invoking [`Next`] or
//! short-circuit with its own response. The chain types here are public so
//! a host framework can embed a single stage directly: wrap its handler in
//! [`Next::handler`], stack stages with [`Next::stage`], and drive the
//! outermost stage's `process`.

use std::future::Future;
use std::pin::Pin;

use crate::context::RequestContext;
use crate::types::{Request, Response};

/// A boxed future that returns a response.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The core middleware trait.
///
/// # Invariants
///
/// - A stage MUST call `next.run()` exactly once, unless it
///   short-circuits with its own response.
/// - A stage SHOULD NOT suppress errors produced downstream.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the unique name of this stage, used for logging.
    fn name(&self) -> &'static str;

    /// Processes the request through this stage.
    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// Callback invoking the rest of the chain.
///
/// Consumed by `run`, so it can only be invoked once.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// More stages to process.
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    /// End of chain: invoke the host's handler.
    Handler(
        Box<dyn FnOnce(&mut RequestContext, Request) -> BoxFuture<'static, Response> + Send + 'a>,
    ),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that will invoke `middleware`, continuing with
    /// `next` afterwards.
    #[must_use]
    pub fn stage(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Creates a terminal `Next` that invokes the host's handler.
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut RequestContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Invokes the next stage or the handler.
    pub async fn run(self, ctx: &mut RequestContext, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => middleware.process(ctx, request, *next).await,
            NextInner::Handler(handler) => handler(ctx, request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request as HttpRequest, Response as HttpResponse, StatusCode};
    use http_body_util::Full;

    struct TagMiddleware {
        name: &'static str,
    }

    impl Middleware for TagMiddleware {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut RequestContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, Response> {
            Box::pin(async move {
                ctx.set_extension(format!("visited:{}", self.name));
                next.run(ctx, request).await
            })
        }
    }

    struct ShortCircuitMiddleware;

    impl Middleware for ShortCircuitMiddleware {
        fn name(&self) -> &'static str {
            "short_circuit"
        }

        fn process<'a>(
            &'a self,
            _ctx: &'a mut RequestContext,
            _request: Request,
            _next: Next<'a>,
        ) -> BoxFuture<'a, Response> {
            Box::pin(async {
                HttpResponse::builder()
                    .status(StatusCode::FORBIDDEN)
                    .body(Full::new(Bytes::new()))
                    .unwrap()
            })
        }
    }

    fn ok_handler() -> Next<'static> {
        Next::handler(|_ctx, _req| {
            Box::pin(async {
                HttpResponse::builder()
                    .status(StatusCode::OK)
                    .body(Full::new(Bytes::from("OK")))
                    .unwrap()
            })
        })
    }

    fn test_request() -> Request {
        HttpRequest::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_terminal_handler_runs() {
        let mut ctx = RequestContext::new();
        let response = ok_handler().run(&mut ctx, test_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stage_chain_reaches_handler() {
        let mw1 = TagMiddleware { name: "outer" };
        let mw2 = TagMiddleware { name: "inner" };

        let mut ctx = RequestContext::new();
        let chain = Next::stage(&mw1, Next::stage(&mw2, ok_handler()));

        let response = chain.run(&mut ctx, test_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        // Last writer wins: both stages ran.
        assert_eq!(
            ctx.get_extension::<String>().map(String::as_str),
            Some("visited:inner")
        );
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler() {
        let guard = ShortCircuitMiddleware;
        let inner = TagMiddleware { name: "inner" };

        let mut ctx = RequestContext::new();
        let chain = Next::stage(&guard, Next::stage(&inner, ok_handler()));

        let response = chain.run(&mut ctx, test_request()).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(!ctx.has_extension::<String>());
    }
}
