//! Response factory: outcome name → HTTP response.
//!
//! The status table is fixed. A name the table does not know resolves to
//! `500 Internal Server Error`, so every path through the dispatcher ends in
//! a well-formed response.
//!
//! | outcome | status |
//! |---|---|
//! | `ALL_OK` | 200 |
//! | `CREATED` | 201 |
//! | `ACCEPTED` | 202 |
//! | `DELETED` | 204 |
//! | `BAD_REQUEST` | 400 |
//! | `UNAUTHORIZED` | 401 |
//! | `FORBIDDEN` | 403 |
//! | `NOT_FOUND` | 404 |
//! | `NOT_ALLOWED` | 405 |
//! | `NOT_ACCEPTABLE` | 406 |
//! | `CONFLICT` | 409 |
//! | `GONE` | 410 |
//! | `REQUEST_ENTITY_TOO_LARGE` | 413 |
//! | `INTERNAL_ERROR` | 500 |
//! | `NOT_IMPLEMENTED` | 501 |
//! | `THROTTLED` | 503 |

use tracing::error;

use crate::outcome::{self, Body, Outcome};
use crate::response::Response;
use crate::status::Status;

const STATUS_TABLE: &[(&str, Status, &str)] = &[
    (outcome::ALL_OK,                   Status::Ok,                  "OK"),
    (outcome::CREATED,                  Status::Created,             "Created"),
    (outcome::ACCEPTED,                 Status::Accepted,            "Accepted"),
    (outcome::DELETED,                  Status::NoContent,           ""),
    (outcome::BAD_REQUEST,              Status::BadRequest,          "Bad Request"),
    (outcome::UNAUTHORIZED,             Status::Unauthorized,        "Unauthorized"),
    (outcome::FORBIDDEN,                Status::Forbidden,           "Forbidden"),
    (outcome::NOT_FOUND,                Status::NotFound,            "Not Found"),
    (outcome::NOT_ALLOWED,              Status::MethodNotAllowed,    "Method Not Allowed"),
    (outcome::NOT_ACCEPTABLE,           Status::NotAcceptable,       "Not Acceptable"),
    (outcome::CONFLICT,                 Status::Conflict,            "Conflict"),
    (outcome::GONE,                     Status::Gone,                "Gone"),
    (outcome::REQUEST_ENTITY_TOO_LARGE, Status::ContentTooLarge,     "Request Entity Too Large"),
    (outcome::INTERNAL_ERROR,           Status::InternalServerError, "Internal Server Error"),
    (outcome::NOT_IMPLEMENTED,          Status::NotImplemented,      "Not Implemented"),
    (outcome::THROTTLED,                Status::ServiceUnavailable,  "Service Unavailable"),
];

const FALLBACK: (Status, &str) = (Status::InternalServerError, "Internal Server Error");

fn lookup(name: &str) -> Option<(Status, &'static str)> {
    STATUS_TABLE.iter()
        .find(|(n, _, _)| *n == name)
        .map(|&(_, status, text)| (status, text))
}

/// Builds the response for an outcome name, body and extra headers.
///
/// Extra headers are merged last and replace any header the factory set,
/// `content-type` included.
pub fn resolve(name: &str, body: Body, headers: &[(String, String)]) -> Response {
    let (status, default_text) = lookup(name).unwrap_or(FALLBACK);
    let builder = headers.iter()
        .fold(Response::builder().status(status), |b, (k, v)| b.header(k, v));

    match body {
        Body::Empty => builder.text(default_text),
        Body::Text(text) => builder.text(text),
        Body::Json(value) => match serde_json::to_vec(&value) {
            Ok(bytes) => builder.json(bytes),
            Err(e) => {
                error!(outcome = name, "response body serialization failed: {e}");
                let (status, text) = FALLBACK;
                Response::builder().status(status).text(text)
            }
        },
    }
}

/// [`resolve`] for a whole [`Outcome`].
pub fn respond(outcome: Outcome) -> Response {
    let (name, body, headers) = outcome.into_parts();
    resolve(&name, body, &headers)
}

/// The status code an outcome name maps to, or `-1` if the name is unknown.
pub fn status_code_for(name: &str) -> i32 {
    lookup(name).map_or(-1, |(status, _)| i32::from(status.code()))
}
