//! Resource method handlers.
//!
//! A handler is any `async fn(Call) -> impl IntoOutcome`. Each one has its
//! own concrete type, so the builder boxes them behind [`ErasedHandler`] and
//! a [`Resource`](crate::Resource) keeps one `BoxedHandler` per verb.
//!
//! ```text
//! Resource::builder(..).get(list)    list.into_boxed_handler() → Arc<FnHandler<_>>
//! dispatch                           handler.call(call) → BoxFuture
//! BoxFuture                          list(call).await.into_outcome()
//! ```
//!
//! A handler's `Err` arrives at the dispatcher as a [`Fault`]; panics are
//! caught there, not here.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::call::Call;
use crate::error::Fault;
use crate::outcome::{IntoOutcome, Outcome};

/// A heap-allocated, type-erased future resolving to the handler's outcome,
/// or to the fault it reported.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Result<Outcome, Fault>> + Send + 'static>>;

/// Object-safe face of a handler. Public only because
/// [`Handler::into_boxed_handler`] names it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, call: Call) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid resource method handler.
///
/// You never implement this yourself. It is satisfied by any `async fn`
/// (or closure returning a future) with the signature:
///
/// ```text
/// async fn name(call: Call) -> impl IntoOutcome
/// ```
///
/// i.e. returning an [`Outcome`] or a `Result<Outcome, E>`.
///
/// The trait is **sealed**: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Call) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Call) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Newtype bridging a concrete handler `F` to [`ErasedHandler`].
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Call) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoOutcome + Send + 'static,
{
    fn call(&self, call: Call) -> BoxFuture {
        let fut = (self.0)(call);
        Box::pin(async move { fut.await.into_outcome() })
    }
}
