//! Request logging hook.
//!
//! The dispatcher reports every finished request exactly once through a
//! [`RequestLog`], with the time processing began, the metadata gathered
//! along the way, and the final outcome name. It does not format or store
//! anything itself. The default hook, [`TracingLog`], emits one `tracing`
//! event per request.
//!
//! ```rust
//! use std::time::Instant;
//! use restview::{RequestInfo, RequestLog, Router};
//!
//! struct Stdout;
//!
//! impl RequestLog for Stdout {
//!     fn record(&self, started: Instant, info: &RequestInfo, outcome: &str) {
//!         println!("{} {} -> {outcome} in {:?}", info.method, info.path, started.elapsed());
//!     }
//! }
//!
//! let router = Router::new().log(Stdout);
//! ```

use std::time::Instant;

use tracing::info;

use crate::auth::AuthContext;
use crate::method::Method;
use crate::request::Request;

/// Facts about a request that are not part of the request itself.
#[derive(Clone, Debug)]
pub struct RequestInfo {
    pub resource: String,
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub remote_address: Option<String>,
    pub body_len: usize,
    /// Filled in once authorization succeeds.
    pub auth: Option<AuthContext>,
}

impl RequestInfo {
    pub(crate) fn gather(resource: &str, req: &Request) -> Self {
        Self {
            resource: resource.to_owned(),
            method: req.method(),
            path: req.path().to_owned(),
            query: req.query().map(str::to_owned),
            remote_address: req.client_address(),
            body_len: req.body().len(),
            auth: None,
        }
    }
}

/// Receives one record per finished request.
pub trait RequestLog: Send + Sync + 'static {
    fn record(&self, started: Instant, info: &RequestInfo, outcome: &str);
}

/// Logs each request as a `tracing` event on target `restview::request`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLog;

impl RequestLog for TracingLog {
    fn record(&self, started: Instant, info: &RequestInfo, outcome: &str) {
        info!(
            target: "restview::request",
            resource = %info.resource,
            method = %info.method,
            path = %info.path,
            remote = info.remote_address.as_deref().unwrap_or("-"),
            outcome,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "request finished"
        );
    }
}
