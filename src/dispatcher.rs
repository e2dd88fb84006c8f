//! The request lifecycle.
//!
//! Every request against a [`Resource`] runs the same fixed sequence:
//!
//! ```text
//! START → METHOD_CHECK → AUTH_CHECK → THROTTLE_CHECK → HANDLER_INVOKE → OUTCOME_NORMALIZE → DONE
//!              │              │              │                │
//!              └──────────────┴──────────────┴────────────────┴──→ DONE (early exit)
//! ```
//!
//! - **METHOD_CHECK** — the verb must be declared on the resource, or be
//!   `HEAD`/`OPTIONS`. Otherwise `NOT_ALLOWED` with an `Allow` header.
//!   `OPTIONS` ends here with `ALL_OK`; it never touches auth or throttling.
//!   An allowed verb with no handler ends with `NOT_IMPLEMENTED`.
//! - **AUTH_CHECK** — the method's authorizer (or the fallback). A denial
//!   sends the authorizer's own challenge response.
//! - **THROTTLE_CHECK** — the method's throttle binding. Yes → `THROTTLED`.
//! - **HANDLER_INVOKE** — the handler runs inside a recovery boundary; an
//!   `Err` or a panic becomes `INTERNAL_ERROR`.
//! - **OUTCOME_NORMALIZE** — the [factory](crate::factory) builds the
//!   response. A handler answering `UNAUTHORIZED` with no body gets the
//!   authorizer's challenge instead.
//!
//! A second boundary wraps the whole lifecycle, so a panic in an
//! authorizer, a throttle or the log hook still ends in a 500 response.
//!
//! `HEAD` without its own handler runs the `GET` handler and drops the body.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::{error, warn};

use crate::call::{Call, Target};
use crate::error::{panic_message, Fault, Rejection};
use crate::factory;
use crate::handler::BoxedHandler;
use crate::log::{RequestInfo, RequestLog, TracingLog};
use crate::method::Method;
use crate::outcome::{self, Body};
use crate::request::Request;
use crate::resource::Resource;
use crate::response::Response;

/// Runs requests against resources. Holds no per-request state and is
/// shared by every concurrent request.
#[derive(Clone)]
pub struct Dispatcher {
    debug: bool,
    log: Arc<dyn RequestLog>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self { debug: false, log: Arc::new(TracingLog) }
    }

    /// In debug mode every response carries a `Processing-Time` header
    /// (seconds, microsecond precision).
    pub fn debug(mut self, on: bool) -> Self {
        self.debug = on;
        self
    }

    pub fn log(mut self, hook: impl RequestLog) -> Self {
        self.log = Arc::new(hook);
        self
    }

    /// Runs one request through the lifecycle. Always returns a response.
    ///
    /// `target` is the router's reading of the URL.
    pub async fn dispatch(&self, resource: &Resource, req: Request, target: Target) -> Response {
        let started = Instant::now();
        let lifecycle = self.run(resource, req, target, started);

        match AssertUnwindSafe(lifecycle).catch_unwind().await {
            Ok(response) => response,
            Err(payload) => {
                let fault = Fault::Dispatcher(panic_message(&*payload));
                error!(resource = resource.name(), error = %fault, "request lifecycle aborted");
                factory::resolve(outcome::INTERNAL_ERROR, Body::Empty, &[])
            }
        }
    }

    async fn run(
        &self,
        resource: &Resource,
        req: Request,
        target: Target,
        started: Instant,
    ) -> Response {
        let method = req.method();
        let mut info = RequestInfo::gather(resource.name(), &req);

        // METHOD_CHECK
        if !resource.permits(method) {
            return self.reject(resource, started, &info, Rejection::MethodNotAllowed(method));
        }
        if method == Method::Options {
            let response = factory::resolve(outcome::ALL_OK, Body::Empty, &[allow(resource)]);
            return self.finish(started, &info, outcome::ALL_OK, response);
        }
        let handler = match resolve_handler(resource, method) {
            Ok(handler) => handler,
            Err(rejection) => return self.reject(resource, started, &info, rejection),
        };

        // AUTH_CHECK
        let authorizer = resource.authorizer(method);
        let Some(auth) = authorizer.authenticate(&req) else {
            let rejection = Rejection::Unauthorized(authorizer.name().to_owned());
            return self.finish(started, &info, rejection.outcome(), authorizer.challenge(Body::Empty));
        };
        info.auth = Some(auth.clone());

        // THROTTLE_CHECK
        let binding = resource.throttle(method);
        if binding.throttle.should_throttle(resource.name(), binding.mode) {
            return self.reject(resource, started, &info, Rejection::Throttled);
        }

        // HANDLER_INVOKE
        let call = Call::new(auth, req, target, resource.paging());
        let invocation = async move { handler.call(call).await };
        let returned = match AssertUnwindSafe(invocation).catch_unwind().await {
            Ok(Ok(returned)) => returned,
            Ok(Err(fault)) => return self.fault(resource, started, &info, fault),
            Err(payload) => {
                let fault = Fault::HandlerPanic(panic_message(&*payload));
                return self.fault(resource, started, &info, fault);
            }
        };

        // OUTCOME_NORMALIZE
        if returned.name() == outcome::UNAUTHORIZED && returned.body().is_empty() {
            return self.finish(started, &info, outcome::UNAUTHORIZED, authorizer.challenge(Body::Empty));
        }
        let name = returned.name().to_owned();
        self.finish(started, &info, &name, factory::respond(returned))
    }

    fn reject(
        &self,
        resource: &Resource,
        started: Instant,
        info: &RequestInfo,
        rejection: Rejection,
    ) -> Response {
        let headers = match rejection {
            Rejection::MethodNotAllowed(_) => vec![allow(resource)],
            _ => Vec::new(),
        };
        let response = factory::resolve(rejection.outcome(), Body::Empty, &headers);
        self.finish(started, info, rejection.outcome(), response)
    }

    fn fault(&self, resource: &Resource, started: Instant, info: &RequestInfo, fault: Fault) -> Response {
        warn!(resource = resource.name(), method = %info.method, error = %fault, "handler fault");
        self.reject(resource, started, info, Rejection::Internal(fault))
    }

    /// Common exit: HEAD bodies are dropped, the log hook sees the outcome,
    /// debug timing is attached.
    fn finish(&self, started: Instant, info: &RequestInfo, outcome: &str, mut response: Response) -> Response {
        if info.method == Method::Head {
            response.clear_body();
        }
        self.log.record(started, info, outcome);
        if self.debug {
            let elapsed = format!("{:.6}", started.elapsed().as_secs_f64());
            response.set_header("Processing-Time", &elapsed);
        }
        response
    }
}

impl Default for Dispatcher {
    fn default() -> Self { Self::new() }
}

/// The handler a verb runs. `HEAD` falls back to `GET`.
fn resolve_handler(resource: &Resource, method: Method) -> Result<&BoxedHandler, Rejection> {
    if let Some(handler) = resource.handler(method) {
        return Ok(handler);
    }
    if method != Method::Head {
        return Err(Rejection::NotImplemented(method));
    }
    if !resource.is_allowed(Method::Get) {
        return Err(Rejection::MethodNotAllowed(Method::Head));
    }
    resource.handler(Method::Get).ok_or(Rejection::NotImplemented(Method::Get))
}

fn allow(resource: &Resource) -> (String, String) {
    ("Allow".to_owned(), resource.allow_header().to_owned())
}
