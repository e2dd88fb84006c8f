//! Radix-tree resource router.
//!
//! One tree, O(path-length) lookup. Each registered resource gets up to
//! three URL shapes under `/{version}/{name}/`:
//!
//! | shape | example | handler sees |
//! |---|---|---|
//! | collection | `/v2/books/` | [`Target::Collection`] |
//! | range | `/v2/books/1;5` | [`Target::Range`] |
//! | item | `/v2/books/42` | [`Target::Item`] |
//!
//! `HEAD` and `OPTIONS` are answered on all of them. Versions register
//! independently, so `/v1/books/` and `/v2/books/` can be two different
//! resources with their own bindings.

use std::sync::Arc;

use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::call::{ResourceId, Target};
use crate::dispatcher::Dispatcher;
use crate::factory;
use crate::log::RequestLog;
use crate::outcome::{self, Body};
use crate::request::Request;
use crate::resource::{IdKind, Resource};
use crate::response::Response;

const SEGMENT: &str = "segment";

#[derive(Clone, Copy)]
enum Shape {
    Collection,
    Member,
}

struct Entry {
    resource: Arc<Resource>,
    shape: Shape,
}

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve),
/// or drive it directly with [`Router::handle`].
pub struct Router {
    routes: MatchitRouter<Entry>,
    dispatcher: Dispatcher,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: MatchitRouter::new(), dispatcher: Dispatcher::new() }
    }

    /// Registers `resource` under `/{version}/{name}/`, plus the range and
    /// id shapes unless the resource is collection-only.
    ///
    /// # Panics
    ///
    /// Panics if the paths conflict with an existing registration.
    ///
    /// ```rust
    /// # use restview::{Method, Outcome, Resource, Router};
    /// # async fn list(_: restview::Call) -> Outcome { Outcome::ok("") }
    /// let router = Router::new()
    ///     .resource("v1", Resource::builder("books").allow([Method::Get]).get(list).build())
    ///     .resource("v2", Resource::builder("books").allow([Method::Get]).get(list).build());
    /// ```
    pub fn resource(self, version: &str, resource: Resource) -> Self {
        let base = format!("/{version}/{}/", resource.name());
        let resource = Arc::new(resource);
        let members = resource.routes_members();

        let router = self.add(&base, Arc::clone(&resource), Shape::Collection);
        if members {
            router.add(&format!("{base}{{{SEGMENT}}}"), resource, Shape::Member)
        } else {
            router
        }
    }

    /// Registers `resource` at an exact path with the collection shape only.
    pub fn route(self, path: &str, resource: Resource) -> Self {
        self.add(path, Arc::new(resource), Shape::Collection)
    }

    /// See [`Dispatcher::debug`].
    pub fn debug(mut self, on: bool) -> Self {
        self.dispatcher = self.dispatcher.debug(on);
        self
    }

    /// Replaces the default [`TracingLog`](crate::TracingLog) hook.
    pub fn log(mut self, hook: impl RequestLog) -> Self {
        self.dispatcher = self.dispatcher.log(hook);
        self
    }

    fn add(mut self, path: &str, resource: Arc<Resource>, shape: Shape) -> Self {
        self.routes
            .insert(path, Entry { resource, shape })
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Routes and dispatches one request. Unknown paths get `NOT_FOUND`.
    pub async fn handle(&self, req: Request) -> Response {
        let Some((resource, target)) = self.lookup(req.path()) else {
            debug!(path = req.path(), method = %req.method(), "no route");
            return factory::resolve(outcome::NOT_FOUND, Body::Empty, &[]);
        };
        self.dispatcher.dispatch(&resource, req, target).await
    }

    /// The `Allow` header of the resource registered at `path`, whatever
    /// the segment after it holds.
    pub(crate) fn allow_header(&self, path: &str) -> Option<&str> {
        let matched = self.routes.at(path).ok()?;
        Some(matched.value.resource.allow_header())
    }

    fn lookup(&self, path: &str) -> Option<(Arc<Resource>, Target)> {
        let matched = self.routes.at(path).ok()?;
        let entry = matched.value;
        let target = match entry.shape {
            Shape::Collection => Target::Collection,
            Shape::Member => parse_segment(matched.params.get(SEGMENT)?, entry.resource.id_kind())?,
        };
        Some((Arc::clone(&entry.resource), target))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// Reads the segment after the collection URL.
///
/// `lower;upper` is a range of two integers. Anything else is an id. A
/// range with non-integer bounds, or an id that does not parse as the
/// resource's [`IdKind`], does not match the route at all (`None`).
fn parse_segment(segment: &str, kind: IdKind) -> Option<Target> {
    if let Some((lower, upper)) = segment.split_once(';') {
        let (lower, upper) = (lower.parse().ok()?, upper.parse().ok()?);
        return Some(Target::Range { lower, upper });
    }
    let id = match kind {
        IdKind::Int => ResourceId::Int(segment.parse().ok()?),
        IdKind::Str => ResourceId::Str(segment.to_owned()),
    };
    Some(Target::Item(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_need_two_integers() {
        assert_eq!(parse_segment("1;5", IdKind::Int), Some(Target::Range { lower: 1, upper: 5 }));
        assert_eq!(parse_segment("-2;5", IdKind::Str), Some(Target::Range { lower: -2, upper: 5 }));
        assert_eq!(parse_segment("1;x", IdKind::Int), None);
        assert_eq!(parse_segment("1;x", IdKind::Str), None);
        assert_eq!(parse_segment(";", IdKind::Int), None);
    }

    #[test]
    fn ids_follow_the_declared_kind() {
        assert_eq!(parse_segment("42", IdKind::Int), Some(Target::Item(ResourceId::Int(42))));
        assert_eq!(parse_segment("abc", IdKind::Int), None);
        assert_eq!(
            parse_segment("abc", IdKind::Str),
            Some(Target::Item(ResourceId::Str("abc".to_owned())))
        );
    }

    #[test]
    fn allow_header_is_found_for_any_segment() {
        let router = Router::new().resource("v1", Resource::builder("books").build());
        assert_eq!(router.allow_header("/v1/books/"), Some("HEAD, OPTIONS"));
        assert_eq!(router.allow_header("/v1/books/not-an-id"), Some("HEAD, OPTIONS"));
        assert_eq!(router.allow_header("/v1/films/"), None);
    }
}
