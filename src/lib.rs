//! # restview
//!
//! A minimal REST resource dispatch scaffold for Rust services.
//!
//! ## The contract
//!
//! A resource declares which verbs it accepts, who may call them, how they
//! are throttled, and one handler per verb. restview runs every request
//! through the same lifecycle and guarantees exactly one well-formed
//! response per request, no matter what the handler does:
//!
//! 1. **Method check** — undeclared verbs get `405` with an `Allow` header;
//!    `OPTIONS` is answered here; a declared verb with no handler gets `501`.
//! 2. **Authorization** — the verb's [`Authorizer`]; a denial sends its
//!    challenge (`401` + `WWW-Authenticate`).
//! 3. **Throttling** — the verb's [`Throttle`]; a yes sends `503`.
//! 4. **Handler** — returns an [`Outcome`]; errors and panics become `500`.
//! 5. **Response** — the [factory] maps the outcome name to a status and
//!    serializes the body as text or JSON.
//!
//! What restview does not do: persistence, real rate limiting, real
//! identity. The bundled authorizers and throttles are stubs to build on.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use restview::{outcome, Call, Config, Method, Outcome, Resource, Router, Server, health};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restview::Error> {
//!     let config = Config::from_env()?;
//!
//!     let books = Resource::builder("books")
//!         .allow([Method::Get, Method::Delete])
//!         .get(get_book)
//!         .delete(delete_book)
//!         .build();
//!
//!     let app = Router::new()
//!         .debug(config.debug)
//!         .route("/ping", health::ping())
//!         .resource("v1", books);
//!
//!     Server::from_config(&config).serve(app).await
//! }
//!
//! async fn get_book(call: Call) -> Outcome {
//!     match call.id() {
//!         Some(id) => Outcome::ok(json!({ "id": id.to_string() })),
//!         None => Outcome::ok(json!([])),
//!     }
//! }
//!
//! async fn delete_book(call: Call) -> Outcome {
//!     if call.id().is_none() {
//!         return Outcome::new(outcome::BAD_REQUEST);
//!     }
//!     Outcome::new(outcome::DELETED)
//! }
//! ```

mod auth;
mod call;
mod config;
mod dispatcher;
mod error;
mod handler;
mod log;
mod method;
mod request;
mod resource;
mod response;
mod router;
mod server;
mod status;

pub mod data;
pub mod factory;
pub mod health;
pub mod outcome;
pub mod sample;
pub mod throttle;

pub use auth::{AuthContext, Authorizer, KeyedAuthorizer, NoopAuthorizer};
pub use call::{Call, ResourceId, Target};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{Error, Fault, Rejection};
pub use handler::Handler;
pub use log::{RequestInfo, RequestLog, TracingLog};
pub use method::Method;
pub use outcome::{Body, IntoOutcome, Outcome};
pub use request::Request;
pub use resource::{IdKind, Resource, ResourceBuilder, ThrottleBinding};
pub use response::{ContentType, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use throttle::{NoopThrottle, Override, StrictThrottle, Throttle};
