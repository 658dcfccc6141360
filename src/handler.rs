//! Handler trait and type erasure.
//!
//! Every `async fn` has its own anonymous future type, so two handlers never
//! share a type the router could store directly. The fix is the usual one:
//! erase the concrete types behind a trait object and keep the routing table
//! homogeneous.
//!
//! ```text
//! async fn list(state: Arc<AppState>, req: Request) -> Response { … }
//!        ↓ router.on(Method::Get, "/api/chirps", list)
//! list.into_boxed_handler()                 via the Handler blanket impl
//!        ↓
//! Arc<dyn ErasedHandler>                    what the routing tree stores
//!        ↓
//! handler.call(state, req)                  per request: one vtable hop
//!        ↓
//! BoxFuture                                 the pinned, boxed response future
//! ```
//!
//! Per request that costs one `Arc` clone and one virtual call — noise next
//! to a socket read.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::state::AppState;

// ── Internal types ────────────────────────────────────────────────────────────

/// A boxed, pinned future resolving to a [`Response`].
///
/// Boxed so every handler's future has one size; pinned because tokio polls
/// futures in place; `Send + 'static` so connection tasks can carry it to
/// any worker thread.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe dispatch interface the routing tree stores.
///
/// `#[doc(hidden)] pub` because it leaks through the signature of
/// [`Handler::into_boxed_handler`]; nothing outside the crate can do
/// anything with it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, state: Arc<AppState>, req: Request) -> BoxFuture;
}

/// A shared, type-erased handler. One `Arc` clone per dispatched request.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Satisfied by every valid route handler.
///
/// Never implemented by hand — any `async fn` shaped like
///
/// ```text
/// async fn name(state: Arc<AppState>, req: Request) -> impl IntoResponse
/// ```
///
/// already qualifies through the blanket impl. The private `Sealed`
/// supertrait keeps it that way: no foreign impls, no accidental second way
/// to be a handler.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

// `Fn(Arc<AppState>, Request) -> Fut` covers named `async fn` items, closures,
// and any hand-rolled struct implementing `Fn`.
impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Arc<AppState>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Arc<AppState>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Holds the concrete handler `F` and bridges it into [`ErasedHandler`].
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Arc<AppState>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, state: Arc<AppState>, req: Request) -> BoxFuture {
        // The concrete future is produced outside the async block so the
        // closure borrowing `self` ends before the box is built.
        let fut = (self.0)(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}
