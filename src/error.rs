//! Error types.
//!
//! Two families live here. [`Error`] surfaces infrastructure failures
//! (binding a port, reading configuration) to the process that hosts the
//! server. [`Rejection`] and [`Fault`] classify why a single request ended
//! early; they never leave the dispatcher and are always converted into a
//! [`Response`](crate::Response).

use thiserror::Error;

use crate::method::Method;
use crate::outcome;

/// The error type returned by restview's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid value `{value}` for {key}: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Why a request stopped before (or instead of) producing a handler outcome.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("method {0} is not allowed on this resource")]
    MethodNotAllowed(Method),

    #[error("method {0} is allowed but has no handler")]
    NotImplemented(Method),

    #[error("authorization `{0}` denied the request")]
    Unauthorized(String),

    #[error("request throttled")]
    Throttled,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] Fault),
}

impl Rejection {
    /// The outcome name this rejection resolves to.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed(_) => outcome::NOT_ALLOWED,
            Self::NotImplemented(_)   => outcome::NOT_IMPLEMENTED,
            Self::Unauthorized(_)     => outcome::UNAUTHORIZED,
            Self::Throttled           => outcome::THROTTLED,
            Self::BadRequest(_)       => outcome::BAD_REQUEST,
            Self::Internal(_)         => outcome::INTERNAL_ERROR,
        }
    }
}

/// An unexpected failure inside the request lifecycle.
///
/// `Handler*` variants come from the business-logic boundary, `Dispatcher`
/// from the lifecycle bookkeeping around it. Both resolve to
/// `INTERNAL_ERROR`; the split keeps them apart in logs.
#[derive(Debug, Error)]
pub enum Fault {
    #[error("handler failed: {0}")]
    Handler(String),

    #[error("handler panicked: {0}")]
    HandlerPanic(String),

    #[error("dispatcher panicked: {0}")]
    Dispatcher(String),
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_map_to_outcomes() {
        assert_eq!(Rejection::MethodNotAllowed(Method::Put).outcome(), "NOT_ALLOWED");
        assert_eq!(Rejection::NotImplemented(Method::Get).outcome(), "NOT_IMPLEMENTED");
        assert_eq!(Rejection::Unauthorized("Noop".into()).outcome(), "UNAUTHORIZED");
        assert_eq!(Rejection::Throttled.outcome(), "THROTTLED");
        assert_eq!(Rejection::BadRequest("x".into()).outcome(), "BAD_REQUEST");
        let fault: Rejection = Fault::Dispatcher("boom".into()).into();
        assert_eq!(fault.outcome(), "INTERNAL_ERROR");
    }

    #[test]
    fn panic_payloads_are_readable() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*payload), "static");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*payload), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(&*payload), "non-string panic payload");
    }
}
