//! Incoming HTTP request type.

use std::net::SocketAddr;

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request with its body already collected.
///
/// The server builds these from hyper requests; tests and embedders build
/// them directly and hand them to [`Router::handle`](crate::Router::handle).
///
/// ```rust
/// use restview::{Method, Request};
///
/// let req = Request::new(Method::Get, "/v2/rest_example/1;5?verbose=1")
///     .with_header("Authorization", "ExampleAuth not-so-random-access-key-123456");
///
/// assert_eq!(req.path(), "/v2/rest_example/1;5");
/// assert_eq!(req.query(), Some("verbose=1"));
/// ```
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    headers: Vec<(String, String)>,
    body: Bytes,
    remote_addr: Option<SocketAddr>,
}

impl Request {
    /// `target` is the request-target: a path with an optional `?query`.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_owned(),
            query,
            headers: Vec::new(),
            body: Bytes::new(),
            remote_addr: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The originating client: the first `X-Forwarded-For` hop when a proxy
    /// set one, the socket peer otherwise.
    pub fn client_address(&self) -> Option<String> {
        self.header("x-forwarded-for")
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .or_else(|| self.remote_addr.map(|a| a.ip().to_string()))
    }
}
