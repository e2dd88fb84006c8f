//! HTTP status codes as a typed enum.
//!
//! Only the statuses an [`Outcome`](crate::Outcome) can resolve to are
//! listed. Handlers never pick a status directly; they name an outcome and
//! the [factory](crate::factory) looks the status up.

/// The HTTP statuses a resource can answer with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                     // 200
    Created,                // 201
    Accepted,               // 202
    NoContent,              // 204

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,             // 400
    Unauthorized,           // 401
    Forbidden,              // 403
    NotFound,               // 404
    MethodNotAllowed,       // 405
    NotAcceptable,          // 406
    Conflict,               // 409
    Gone,                   // 410
    ContentTooLarge,        // 413

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError,    // 500
    NotImplemented,         // 501
    ServiceUnavailable,     // 503
}

impl Status {
    /// Numeric status code.
    pub fn code(self) -> u16 {
        self.into()
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::Created             => 201,
            Status::Accepted            => 202,
            Status::NoContent           => 204,
            Status::BadRequest          => 400,
            Status::Unauthorized        => 401,
            Status::Forbidden           => 403,
            Status::NotFound            => 404,
            Status::MethodNotAllowed    => 405,
            Status::NotAcceptable       => 406,
            Status::Conflict            => 409,
            Status::Gone                => 410,
            Status::ContentTooLarge     => 413,
            Status::InternalServerError => 500,
            Status::NotImplemented      => 501,
            Status::ServiceUnavailable  => 503,
        }
    }
}
