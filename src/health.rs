//! Liveness probe.
//!
//! Load balancers ask one question: is the process reachable? `/ping`
//! answers it with `200 OK` and an empty body. It has no dependencies, no
//! authorization and no throttling.
//!
//! ```rust,no_run
//! use restview::{health, Router};
//!
//! let app = Router::new().route("/ping", health::ping());
//! ```
//!
//! To gate on dependency health (database connections, downstream
//! services), register your own resource at the same path instead.

use crate::auth::NoopAuthorizer;
use crate::call::Call;
use crate::method::Method;
use crate::outcome::Outcome;
use crate::resource::Resource;
use crate::throttle::{NoopThrottle, Override};

/// The `/ping` resource: `GET` only, always `ALL_OK` with an empty body.
pub fn ping() -> Resource {
    Resource::builder("ping")
        .allow([Method::Get])
        .authorize(NoopAuthorizer)
        .throttle(NoopThrottle, Override::Inherit)
        .get(pong)
        .build()
}

async fn pong(_call: Call) -> Outcome {
    Outcome::ok("")
}
