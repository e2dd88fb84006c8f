//! A two-version sample API.
//!
//! `rest_example` exists in two versions side by side:
//!
//! - [`v1`] — read-only, bare collection URL only, open to everyone.
//! - [`v2`] — full CRUD with ranged listing; writes need an
//!   `Authorization: ExampleAuth <key>` header, reads are open.
//!
//! [`router`] wires both versions and `/ping` into one [`Router`].

pub mod v1;
pub mod v2;

use crate::config::Config;
use crate::health;
use crate::router::Router;

/// The sample API: `/ping`, `/v1/rest_example/…` and `/v2/rest_example/…`.
pub fn router(config: &Config) -> Router {
    Router::new()
        .debug(config.debug)
        .route("/ping", health::ping())
        .resource("v1", v1::resource())
        .resource("v2", v2::resource())
}
