//! The dispatch boundary between the server core and the application.

use std::future::Future;
use std::pin::Pin;

use crate::parser::HttpRequest;
use crate::server::{Error, HttpResponse};

/// Type alias for a boxed future that returns a Result<HttpResponse, Error>.
pub type DispatchFuture = Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>;

/// Maps a well-formed request to a response.
///
/// The server calls `dispatch` at most once per connection and only for
/// requests that parsed cleanly. An `Err` or a panic inside the returned
/// future is answered with `500 Internal Server Error`. Implementations are
/// shared by every connection task and must handle their own
/// synchronization.
pub trait Dispatch: Send + Sync + 'static {
    fn dispatch(&self, request: HttpRequest) -> DispatchFuture;
}

impl<F, Fut> Dispatch for F
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
{
    fn dispatch(&self, request: HttpRequest) -> DispatchFuture {
        Box::pin(self(request))
    }
}

/// Turn an async closure into a dispatcher.
///
/// Spelling out the `Fn` bounds here lets the compiler infer the closure's
/// argument and error types at the call site.
pub fn dispatch_fn<F, Fut>(f: F) -> F
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
{
    f
}
