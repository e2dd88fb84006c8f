//! Handler results.
//!
//! A handler does not build HTTP responses. It returns an [`Outcome`]: a
//! symbolic name such as [`ALL_OK`] or [`BAD_REQUEST`], an optional [`Body`]
//! and optional extra headers. The [factory](crate::factory) turns that into
//! a [`Response`](crate::Response).
//!
//! ```rust
//! use restview::{outcome, Outcome};
//! use serde_json::json;
//!
//! Outcome::ok(json!({ "id": 7 }));
//! Outcome::new(outcome::CREATED).with_body("Jane");
//! Outcome::new(outcome::DELETED).with_header("x-deleted-id", "7");
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::Fault;

// ── Outcome names ─────────────────────────────────────────────────────────────

pub const ALL_OK: &str = "ALL_OK";
pub const CREATED: &str = "CREATED";
pub const ACCEPTED: &str = "ACCEPTED";
/// 204; the default text is empty.
pub const DELETED: &str = "DELETED";
pub const BAD_REQUEST: &str = "BAD_REQUEST";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const FORBIDDEN: &str = "FORBIDDEN";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const NOT_ALLOWED: &str = "NOT_ALLOWED";
pub const NOT_ACCEPTABLE: &str = "NOT_ACCEPTABLE";
pub const CONFLICT: &str = "CONFLICT";
pub const GONE: &str = "GONE";
pub const REQUEST_ENTITY_TOO_LARGE: &str = "REQUEST_ENTITY_TOO_LARGE";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
pub const THROTTLED: &str = "THROTTLED";

// ── Body ──────────────────────────────────────────────────────────────────────

/// The payload attached to an outcome.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    /// No payload; the response carries the outcome's default text.
    #[default]
    Empty,
    /// Sent verbatim as `text/plain`.
    Text(String),
    /// A mapping or sequence, sent as `application/json`.
    Json(Value),
}

impl Body {
    /// Serializes `value` and classifies the result.
    ///
    /// Fails only when `value` has no JSON form (e.g. a map with non-string
    /// keys).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::from)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Containers become JSON, strings and other scalars become text, `null`
/// becomes [`Body::Empty`].
impl From<Value> for Body {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) => Self::Text(s),
            scalar @ (Value::Bool(_) | Value::Number(_)) => Self::Text(scalar.to_string()),
            container => Self::Json(container),
        }
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl<T: Into<Body>> From<Option<T>> for Body {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Empty, Into::into)
    }
}

// ── Outcome ───────────────────────────────────────────────────────────────────

/// The symbolic result of one handler invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    name: Cow<'static, str>,
    body: Body,
    headers: Vec<(String, String)>,
}

impl Outcome {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into(), body: Body::Empty, headers: Vec::new() }
    }

    /// `ALL_OK` with a body.
    pub fn ok(body: impl Into<Body>) -> Self {
        Self::new(ALL_OK).with_body(body)
    }

    /// An outcome whose body is `value` serialized through serde.
    pub fn json<T: Serialize + ?Sized>(
        name: impl Into<Cow<'static, str>>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(name).with_body(Body::json(value)?))
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn body(&self) -> &Body { &self.body }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    pub(crate) fn into_parts(self) -> (Cow<'static, str>, Body, Vec<(String, String)>) {
        (self.name, self.body, self.headers)
    }
}

// ── IntoOutcome ───────────────────────────────────────────────────────────────

/// Conversion of a handler's return value into an [`Outcome`].
///
/// Implemented for `Outcome` itself and for `Result<Outcome, E>`: an `Err`
/// is a handler fault and resolves to `INTERNAL_ERROR`, so handlers can use
/// `?` freely.
pub trait IntoOutcome {
    fn into_outcome(self) -> Result<Outcome, Fault>;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Result<Outcome, Fault> { Ok(self) }
}

impl<E: fmt::Display> IntoOutcome for Result<Outcome, E> {
    fn into_outcome(self) -> Result<Outcome, Fault> {
        self.map_err(|e| Fault::Handler(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn values_are_classified_by_shape() {
        assert_eq!(Body::from(json!(null)), Body::Empty);
        assert_eq!(Body::from(json!("plain")), Body::Text("plain".into()));
        assert_eq!(Body::from(json!(42)), Body::Text("42".into()));
        assert_eq!(Body::from(json!(true)), Body::Text("true".into()));
        assert_eq!(Body::from(json!([1, 2])), Body::Json(json!([1, 2])));
        assert_eq!(Body::from(json!({ "a": 1 })), Body::Json(json!({ "a": 1 })));
    }

    #[test]
    fn tuples_serialize_as_sequences() {
        let body = Body::json(&(1, "two")).unwrap();
        assert_eq!(body, Body::Json(json!([1, "two"])));
    }

    #[test]
    fn errors_become_handler_faults() {
        let failed: Result<Outcome, &str> = Err("db offline");
        match failed.into_outcome() {
            Err(Fault::Handler(msg)) => assert_eq!(msg, "db offline"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
