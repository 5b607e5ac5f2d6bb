//! Flash middleware and the per-request flash handle

use crate::config::FlashConfig;
use crate::detect::RequestDetectors;
use crate::handler::{Handler, Middleware, Request, Response};
use crate::lifecycle::{DeliveryMode, FlashLifecycle};
use crate::session::SessionHandle;
use async_trait::async_trait;
use reinhardt_flash_core::{FlashContext, FlashRecorder, MemorySession, Result};
use std::sync::Arc;

/// Flash access for a handler
///
/// Inserted into the request extensions by [`FlashMiddleware`].
///
/// # Examples
///
/// ```
/// use reinhardt_flash_middleware::{FlashRequest, Handler, Request, Response};
///
/// struct Save;
///
/// #[async_trait::async_trait]
/// impl Handler for Save {
///     async fn handle(&self, request: Request) -> reinhardt_flash_core::Result<Response> {
///         if let Some(flash) = FlashRequest::from_request(&request) {
///             flash.recorder().success("Saved")?;
///         }
///         Ok(Response::default())
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FlashRequest {
	session: MemorySession,
	lifecycle: FlashLifecycle,
	mode: DeliveryMode,
}

impl FlashRequest {
	/// Handle stored in the request extensions, if any
	pub fn from_request(request: &Request) -> Option<Self> {
		request.extensions().get::<Self>().cloned()
	}

	/// Recorder writing to the configured session key
	pub fn recorder(&self) -> FlashRecorder<'_> {
		FlashRecorder::with_key(&self.session, self.lifecycle.config().session_key.as_str())
	}

	/// Run the before-render hook and return the context for the renderer
	///
	/// Header-delivery requests get an empty context.
	pub fn prepare_render(&self) -> FlashContext {
		let mut context = FlashContext::new();
		self.lifecycle
			.before_render_with(self.mode, &self.session, &mut context);
		context
	}

	/// Request session
	pub fn session(&self) -> &MemorySession {
		&self.session
	}

	/// Delivery mode resolved for this request
	pub fn delivery_mode(&self) -> DeliveryMode {
		self.mode
	}

	/// Whether messages go out in a response header
	pub fn uses_header_delivery(&self) -> bool {
		self.mode == DeliveryMode::Header
	}

	/// Delivery configuration
	pub fn config(&self) -> &FlashConfig {
		self.lifecycle.config()
	}
}

/// Wires [`FlashLifecycle`] into a middleware chain
///
/// Must run inside [`SessionMiddleware`](crate::SessionMiddleware). Without a
/// session the request passes through untouched.
pub struct FlashMiddleware {
	lifecycle: FlashLifecycle,
}

impl FlashMiddleware {
	/// Middleware with the built-in request detectors
	pub fn new(config: FlashConfig) -> Self {
		Self::from_lifecycle(FlashLifecycle::new(config))
	}

	/// Middleware with a custom detector registry
	pub fn with_detectors(config: FlashConfig, detectors: RequestDetectors) -> Self {
		Self::from_lifecycle(FlashLifecycle::with_detectors(config, detectors))
	}

	/// Middleware around an existing lifecycle
	pub fn from_lifecycle(lifecycle: FlashLifecycle) -> Self {
		Self { lifecycle }
	}

	/// Lifecycle hooks
	pub fn lifecycle(&self) -> &FlashLifecycle {
		&self.lifecycle
	}
}

impl Default for FlashMiddleware {
	fn default() -> Self {
		Self::new(FlashConfig::default())
	}
}

#[async_trait]
impl Middleware for FlashMiddleware {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let Some(session) = SessionHandle::from_request(&request).map(SessionHandle::into_session)
		else {
			tracing::warn!(
				uri = %request.uri(),
				"no session on request; flash messages are disabled"
			);
			return next.handle(request).await;
		};

		let mode = self.lifecycle.delivery_mode(&request);
		tracing::debug!(?mode, uri = %request.uri(), "resolved flash delivery mode");
		request.extensions_mut().insert(FlashRequest {
			session: session.clone(),
			lifecycle: self.lifecycle.clone(),
			mode,
		});

		let mut response = next.handle(request).await?;
		self.lifecycle
			.after_response_with(mode, &session, &mut response)?;
		Ok(response)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bytes::Bytes;
	use hyper::header::LOCATION;
	use reinhardt_flash_core::{FlashError, FlashQueue, Message};
	use rstest::rstest;

	struct Record {
		redirect: bool,
	}

	#[async_trait]
	impl Handler for Record {
		async fn handle(&self, request: Request) -> Result<Response> {
			let flash = FlashRequest::from_request(&request)
				.ok_or_else(|| FlashError::Internal("no flash handle".into()))?;
			flash.recorder().success("Saved")?;

			let mut builder = hyper::Response::builder();
			if self.redirect {
				builder = builder.status(302).header(LOCATION, "/done");
			}
			builder
				.body(Bytes::new())
				.map_err(|e| FlashError::Internal(e.to_string()))
		}
	}

	fn request(ajax: bool) -> Request {
		let mut builder = hyper::Request::builder().uri("/save");
		if ajax {
			builder = builder.header("X-Requested-With", "XMLHttpRequest");
		}
		let mut request = builder.body(Bytes::new()).unwrap();
		request
			.extensions_mut()
			.insert(SessionHandle::new(MemorySession::with_id("s")));
		request
	}

	#[rstest]
	#[tokio::test]
	async fn test_ajax_request_receives_header() {
		let middleware = FlashMiddleware::default();
		let response = middleware
			.process(request(true), Arc::new(Record { redirect: false }))
			.await
			.unwrap();

		let messages: Vec<Message> =
			serde_json::from_slice(response.headers()["X-Flash"].as_bytes()).unwrap();
		assert_eq!(messages, vec![Message::success("Saved")]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_control_character_does_not_fail_response() {
		let middleware = FlashMiddleware::default();
		let req = request(true);
		let session = SessionHandle::from_request(&req).unwrap().into_session();
		FlashRecorder::new(&session).info("bad\u{7f}char").unwrap();

		let response = middleware
			.process(req, Arc::new(Record { redirect: false }))
			.await
			.unwrap();

		assert_eq!(response.status(), 200);
		let messages: Vec<Message> =
			serde_json::from_slice(response.headers()["X-Flash"].as_bytes()).unwrap();
		assert_eq!(
			messages,
			vec![Message::info("bad\u{7f}char"), Message::success("Saved")]
		);
		assert!(FlashQueue::new(&session).is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_ajax_redirect_keeps_queue() {
		let middleware = FlashMiddleware::default();
		let req = request(true);
		let session = SessionHandle::from_request(&req).unwrap().into_session();

		let response = middleware
			.process(req, Arc::new(Record { redirect: true }))
			.await
			.unwrap();

		assert!(!response.headers().contains_key("X-Flash"));
		assert_eq!(FlashQueue::new(&session).peek(), vec![Message::success("Saved")]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_page_request_leaves_queue_for_renderer() {
		let middleware = FlashMiddleware::default();
		let req = request(false);
		let session = SessionHandle::from_request(&req).unwrap().into_session();

		let response = middleware
			.process(req, Arc::new(Record { redirect: false }))
			.await
			.unwrap();

		assert!(!response.headers().contains_key("X-Flash"));
		assert_eq!(FlashQueue::new(&session).peek().len(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_session_passes_through() {
		struct Plain;

		#[async_trait]
		impl Handler for Plain {
			async fn handle(&self, request: Request) -> Result<Response> {
				assert!(FlashRequest::from_request(&request).is_none());
				Ok(Response::new(Bytes::from_static(b"ok")))
			}
		}

		let middleware = FlashMiddleware::default();
		let req = hyper::Request::builder()
			.uri("/")
			.header("X-Requested-With", "XMLHttpRequest")
			.body(Bytes::new())
			.unwrap();
		let response = middleware.process(req, Arc::new(Plain)).await.unwrap();

		assert_eq!(response.body().as_ref(), b"ok");
		assert!(!response.headers().contains_key("X-Flash"));
	}

	#[rstest]
	fn test_prepare_render() {
		let session = MemorySession::new();
		let flash = FlashRequest {
			session: session.clone(),
			lifecycle: FlashLifecycle::default(),
			mode: DeliveryMode::Render,
		};
		flash.recorder().info("Hi").unwrap();

		let mut context = flash.prepare_render();
		assert_eq!(context.take(), vec![Message::info("Hi")]);

		let header_flash = FlashRequest {
			mode: DeliveryMode::Header,
			..flash
		};
		assert!(!header_flash.prepare_render().has_messages());
		assert!(header_flash.uses_header_delivery());
	}

	#[rstest]
	fn test_recorder_uses_configured_key() {
		let flash = FlashRequest {
			session: MemorySession::new(),
			lifecycle: FlashLifecycle::new(FlashConfig::new().with_session_key("notices")),
			mode: DeliveryMode::Render,
		};
		flash.recorder().warning("w").unwrap();

		assert!(flash.session().contains_key("notices"));
		assert_eq!(flash.config().session_key, "notices");
	}
}
