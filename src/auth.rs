//! Authorization capability.
//!
//! An [`Authorizer`] decides whether a request may proceed and, if so,
//! produces the [`AuthContext`] the handler receives. When it says no, its
//! [`challenge`](Authorizer::challenge) response goes back to the client
//! as-is, carrying the scheme name in `WWW-Authenticate` so the client knows
//! what to retry with.
//!
//! Authorizers are built once at startup and shared read-only between
//! concurrent requests.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::factory;
use crate::outcome::{self, Body};
use crate::request::Request;
use crate::response::Response;

// ── AuthContext ───────────────────────────────────────────────────────────────

/// Whatever an authorizer learned about the caller (user name, e-mail, …).
///
/// Opaque to the dispatcher; passed by value into the handler.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthContext(Map<String, Value>);

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String-valued entry.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for AuthContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

// ── Authorizer ────────────────────────────────────────────────────────────────

/// Grants or denies access to a resource method.
pub trait Authorizer: Send + Sync + 'static {
    /// Scheme name, echoed in `WWW-Authenticate` on a challenge.
    fn name(&self) -> &str;

    /// `Some(context)` when the request is authenticated, `None` otherwise.
    fn authenticate(&self, req: &Request) -> Option<AuthContext>;

    /// The `401` response sent when authentication fails.
    fn challenge(&self, body: Body) -> Response {
        factory::resolve(
            outcome::UNAUTHORIZED,
            body,
            &[("WWW-Authenticate".to_owned(), self.name().to_owned())],
        )
    }
}

/// Lets every request through with an empty context.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAuthorizer;

impl Authorizer for NoopAuthorizer {
    fn name(&self) -> &str {
        "Noop"
    }

    fn authenticate(&self, _req: &Request) -> Option<AuthContext> {
        Some(AuthContext::new())
    }
}

/// Access-key authorization: `Authorization: <scheme> <key>`.
///
/// The scheme is matched case-insensitively against the authorizer's name;
/// the key must be in the table handed over at construction. The matching
/// record becomes the handler's [`AuthContext`].
///
/// ```rust
/// use restview::{AuthContext, Authorizer, KeyedAuthorizer, Method, Request};
///
/// let auth = KeyedAuthorizer::new("ExampleAuth")
///     .grant("k-1", AuthContext::new().with("user_name", "Ada"));
///
/// let req = Request::new(Method::Get, "/").with_header("Authorization", "exampleauth k-1");
/// assert_eq!(auth.authenticate(&req).unwrap().get_str("user_name"), Some("Ada"));
/// ```
#[derive(Clone, Debug)]
pub struct KeyedAuthorizer {
    name: String,
    keys: HashMap<String, AuthContext>,
}

impl KeyedAuthorizer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), keys: HashMap::new() }
    }

    pub fn grant(mut self, key: impl Into<String>, context: AuthContext) -> Self {
        self.keys.insert(key.into(), context);
        self
    }

    /// The demonstration key table used by the sample API.
    pub fn example() -> Self {
        Self::new("ExampleAuth")
            .grant(
                "not-so-random-access-key-qwerty",
                AuthContext::new().with("user_name", "John").with("email", "john@example.com"),
            )
            .grant(
                "not-so-random-access-key-123456",
                AuthContext::new().with("user_name", "Jane").with("email", "jane@example.com"),
            )
    }
}

impl Authorizer for KeyedAuthorizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn authenticate(&self, req: &Request) -> Option<AuthContext> {
        let header = req.header("authorization").filter(|h| !h.is_empty())?;
        let (scheme, key) = header.split_once(' ')?;
        if !scheme.eq_ignore_ascii_case(&self.name) {
            return None;
        }
        self.keys.get(key).cloned()
    }
}
