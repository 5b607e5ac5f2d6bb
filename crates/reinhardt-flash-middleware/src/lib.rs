//! HTTP delivery of Reinhardt flash messages
//!
//! Flash messages recorded while a request is handled reach the client one of
//! two ways:
//!
//! - **Header delivery**: for `json` requests and every kind enabled in
//!   [`FlashConfig::render_header`] (`ajax` by default), the queue is consumed
//!   into a response header (`X-Flash` by default) as a JSON array.
//!   Redirects skip this, so the messages survive to the next request.
//! - **Render delivery**: for all other requests, the before-render hook
//!   snapshots the queue into a [`FlashContext`](reinhardt_flash_core::FlashContext)
//!   that the page renderer consumes.
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use reinhardt_flash_middleware::{
//!     FlashConfig, FlashMiddleware, FlashRequest, Handler, MiddlewareChain, Request, Response,
//!     SessionMiddleware,
//! };
//! use std::sync::Arc;
//!
//! struct Save;
//!
//! #[async_trait::async_trait]
//! impl Handler for Save {
//!     async fn handle(&self, request: Request) -> reinhardt_flash_core::Result<Response> {
//!         if let Some(flash) = FlashRequest::from_request(&request) {
//!             flash.recorder().success("Saved")?;
//!         }
//!         Ok(Response::default())
//!     }
//! }
//!
//! # tokio_test();
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn tokio_test() {
//! let chain = MiddlewareChain::new(Arc::new(Save))
//!     .with_middleware(Arc::new(SessionMiddleware::default()))
//!     .with_middleware(Arc::new(FlashMiddleware::new(FlashConfig::default())));
//!
//! let request = hyper::Request::builder()
//!     .uri("/items")
//!     .header("X-Requested-With", "XMLHttpRequest")
//!     .body(Bytes::new())
//!     .unwrap();
//! let response = chain.handle(request).await.unwrap();
//!
//! assert_eq!(
//!     response.headers()["X-Flash"],
//!     r#"[{"type":"success","message":"Saved","params":{}}]"#
//! );
//! # }
//! ```

pub mod config;
pub mod detect;
pub mod flash;
pub mod handler;
pub mod lifecycle;
pub mod session;

pub use config::{DEFAULT_HEADER, FlashConfig};
pub use detect::{Detector, RequestDetectors};
pub use flash::{FlashMiddleware, FlashRequest};
pub use handler::{Handler, Middleware, MiddlewareChain, Request, Response};
pub use lifecycle::{DeliveryMode, FlashLifecycle};
pub use session::{SessionConfig, SessionHandle, SessionMiddleware, SessionStore};
