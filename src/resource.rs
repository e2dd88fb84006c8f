//! Resource descriptors.
//!
//! A [`Resource`] is the immutable configuration the dispatcher runs a
//! request against: which verbs are allowed, who may call them, how they are
//! throttled, and the handler behind each verb. Build it once at startup
//! with [`Resource::builder`] and register it on a [`Router`](crate::Router).
//!
//! ```rust
//! use restview::{KeyedAuthorizer, Method, NoopAuthorizer, Outcome, Override, Resource, StrictThrottle};
//! # async fn list(_: restview::Call) -> Outcome { Outcome::ok("") }
//! # async fn create(_: restview::Call) -> Outcome { Outcome::ok("") }
//!
//! let books = Resource::builder("books")
//!     .allow([Method::Get, Method::Post])
//!     .authorize(KeyedAuthorizer::example())
//!     .authorize_for(Method::Get, NoopAuthorizer)
//!     .throttle(StrictThrottle, Override::Off)
//!     .get(list)
//!     .post(create)
//!     .build();
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::auth::{Authorizer, NoopAuthorizer};
use crate::call::Paging;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::throttle::{Override, StrictThrottle, Throttle};

/// Widest list window a resource serves unless configured otherwise.
pub const DEFAULT_MAX_WINDOW: i64 = 1000;

/// How the id URL segment is parsed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum IdKind {
    #[default]
    Int,
    Str,
}

/// A throttle together with the override it runs under.
#[derive(Clone)]
pub struct ThrottleBinding {
    pub throttle: Arc<dyn Throttle>,
    pub mode: Override,
}

/// Per-method values with a mandatory fallback for every other method.
#[derive(Clone)]
pub(crate) struct Bindings<T> {
    fallback: T,
    by_method: HashMap<Method, T>,
}

impl<T> Bindings<T> {
    fn new(fallback: T) -> Self {
        Self { fallback, by_method: HashMap::new() }
    }

    pub(crate) fn resolve(&self, method: Method) -> &T {
        self.by_method.get(&method).unwrap_or(&self.fallback)
    }
}

/// Immutable per-resource configuration.
pub struct Resource {
    name: String,
    allowed: BTreeSet<Method>,
    allow_header: String,
    auth: Bindings<Arc<dyn Authorizer>>,
    throttle: Bindings<ThrottleBinding>,
    handlers: HashMap<Method, BoxedHandler>,
    id_kind: IdKind,
    members: bool,
    default_window: i64,
    max_window: i64,
}

impl Resource {
    pub fn builder(name: impl Into<String>) -> ResourceBuilder {
        ResourceBuilder {
            name: name.into(),
            allowed: BTreeSet::new(),
            auth: Bindings::new(Arc::new(NoopAuthorizer)),
            throttle: Bindings::new(ThrottleBinding {
                throttle: Arc::new(StrictThrottle),
                mode: Override::Off,
            }),
            handlers: HashMap::new(),
            id_kind: IdKind::Int,
            members: true,
            default_window: 5,
            max_window: DEFAULT_MAX_WINDOW,
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn id_kind(&self) -> IdKind { self.id_kind }
    pub fn default_window(&self) -> i64 { self.default_window }
    pub fn max_window(&self) -> i64 { self.max_window }

    /// Whether the range and id URL shapes are routed to this resource.
    pub fn routes_members(&self) -> bool { self.members }

    /// Declared verbs plus `HEAD` and `OPTIONS`.
    pub fn permits(&self, method: Method) -> bool {
        self.allowed.contains(&method) || Method::STRUCTURAL.contains(&method)
    }

    pub fn is_allowed(&self, method: Method) -> bool {
        self.allowed.contains(&method)
    }

    /// Comma-separated, sorted list for the `Allow` header.
    pub fn allow_header(&self) -> &str { &self.allow_header }

    pub(crate) fn paging(&self) -> Paging {
        Paging { default_window: self.default_window, max_window: self.max_window }
    }

    pub(crate) fn handler(&self, method: Method) -> Option<&BoxedHandler> {
        self.handlers.get(&method)
    }

    pub(crate) fn authorizer(&self, method: Method) -> &Arc<dyn Authorizer> {
        self.auth.resolve(method)
    }

    pub(crate) fn throttle(&self, method: Method) -> &ThrottleBinding {
        self.throttle.resolve(method)
    }
}

/// Builder for [`Resource`].
///
/// Defaults: no verbs allowed, [`NoopAuthorizer`] for every method,
/// [`StrictThrottle`] switched [`Override::Off`], integer ids, all URL
/// shapes routed, a default list window of 5 and at most
/// [`DEFAULT_MAX_WINDOW`] items per list request.
pub struct ResourceBuilder {
    name: String,
    allowed: BTreeSet<Method>,
    auth: Bindings<Arc<dyn Authorizer>>,
    throttle: Bindings<ThrottleBinding>,
    handlers: HashMap<Method, BoxedHandler>,
    id_kind: IdKind,
    members: bool,
    default_window: i64,
    max_window: i64,
}

impl ResourceBuilder {
    /// Declares the verbs this resource accepts. `HEAD` and `OPTIONS` are
    /// always answered and need not be listed.
    pub fn allow(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.allowed.extend(methods);
        self
    }

    /// Authorizer for every method without a specific binding.
    pub fn authorize(mut self, authorizer: impl Authorizer) -> Self {
        self.auth.fallback = Arc::new(authorizer);
        self
    }

    pub fn authorize_for(mut self, method: Method, authorizer: impl Authorizer) -> Self {
        self.auth.by_method.insert(method, Arc::new(authorizer));
        self
    }

    /// Throttle for every method without a specific binding.
    pub fn throttle(mut self, throttle: impl Throttle, mode: Override) -> Self {
        self.throttle.fallback = ThrottleBinding { throttle: Arc::new(throttle), mode };
        self
    }

    pub fn throttle_for(mut self, method: Method, throttle: impl Throttle, mode: Override) -> Self {
        self.throttle.by_method.insert(method, ThrottleBinding { throttle: Arc::new(throttle), mode });
        self
    }

    /// Registers the handler for `method`.
    ///
    /// # Panics
    ///
    /// Panics for `OPTIONS`, which the dispatcher always answers itself.
    pub fn on(mut self, method: Method, handler: impl Handler) -> Self {
        if method == Method::Options {
            panic!("resource `{}`: OPTIONS is answered by the dispatcher", self.name);
        }
        self.handlers.insert(method, handler.into_boxed_handler());
        self
    }

    pub fn get(self, handler: impl Handler) -> Self { self.on(Method::Get, handler) }
    pub fn head(self, handler: impl Handler) -> Self { self.on(Method::Head, handler) }
    pub fn post(self, handler: impl Handler) -> Self { self.on(Method::Post, handler) }
    pub fn put(self, handler: impl Handler) -> Self { self.on(Method::Put, handler) }
    pub fn patch(self, handler: impl Handler) -> Self { self.on(Method::Patch, handler) }
    pub fn delete(self, handler: impl Handler) -> Self { self.on(Method::Delete, handler) }

    pub fn id_kind(mut self, kind: IdKind) -> Self {
        self.id_kind = kind;
        self
    }

    /// Route only the bare collection URL to this resource.
    pub fn collection_only(mut self) -> Self {
        self.members = false;
        self
    }

    /// List size used when a collection request carries no range.
    pub fn default_window(mut self, size: i64) -> Self {
        self.default_window = size;
        self
    }

    /// Widest window a list request may ask for. Wider ranges leave
    /// [`Call::window`](crate::Call::window) empty.
    pub fn max_window(mut self, size: i64) -> Self {
        self.max_window = size;
        self
    }

    pub fn build(self) -> Resource {
        let allow_header = self.allowed.iter()
            .chain(Method::STRUCTURAL.iter())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Resource {
            name: self.name,
            allowed: self.allowed,
            allow_header,
            auth: self.auth,
            throttle: self.throttle,
            handlers: self.handlers,
            id_kind: self.id_kind,
            members: self.members,
            default_window: self.default_window,
            max_window: self.max_window,
        }
    }
}
