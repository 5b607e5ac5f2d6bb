//! Handler and middleware traits for the flash request cycle.
//!
//! Requests and responses are plain `hyper` messages with a buffered
//! [`Bytes`] body, so per-request state travels in their extensions.
//!
//! ## Handler
//!
//! ```rust
//! use reinhardt_flash_middleware::{Handler, Request, Response};
//! use async_trait::async_trait;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> reinhardt_flash_core::Result<Response> {
//!         Ok(Response::new("Hello!".into()))
//!     }
//! }
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use reinhardt_flash_core::Result;
use std::sync::Arc;

/// Buffered HTTP request
pub type Request = hyper::Request<Bytes>;

/// Buffered HTTP response
pub type Response = hyper::Response<Bytes>;

/// Produces a response for a request.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles a request.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Wraps a handler to act before and after it runs.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request, calling `next` to continue the chain.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Whether this middleware runs for the given request.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Composes middleware around a handler.
///
/// Middleware added first is outermost: it sees the request first and the
/// response last.
///
/// # Examples
///
/// ```rust
/// use reinhardt_flash_middleware::{FlashConfig, FlashMiddleware, Handler, MiddlewareChain, Request, Response, SessionMiddleware};
/// use std::sync::Arc;
///
/// struct Page;
///
/// #[async_trait::async_trait]
/// impl Handler for Page {
///     async fn handle(&self, _request: Request) -> reinhardt_flash_core::Result<Response> {
///         Ok(Response::default())
///     }
/// }
///
/// let chain = MiddlewareChain::new(Arc::new(Page))
///     .with_middleware(Arc::new(SessionMiddleware::default()))
///     .with_middleware(Arc::new(FlashMiddleware::new(FlashConfig::default())));
/// ```
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Creates a chain ending in `handler`.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware using the builder pattern.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Adds a middleware.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		let mut current: Arc<dyn Handler> = self.handler.clone();

		for middleware in self
			.middlewares
			.iter()
			.rev()
			.filter(|mw| mw.should_continue(&request))
		{
			current = Arc::new(ComposedHandler {
				middleware: middleware.clone(),
				next: current,
			});
		}

		current.handle(request).await
	}
}

struct ComposedHandler {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for ComposedHandler {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}
