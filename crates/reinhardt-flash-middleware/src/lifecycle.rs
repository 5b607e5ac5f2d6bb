//! Before-render and after-response hooks deciding how messages are delivered

use crate::config::FlashConfig;
use crate::detect::RequestDetectors;
use crate::handler::{Request, Response};
use hyper::header::{HeaderName, HeaderValue, LOCATION};
use reinhardt_flash_core::{FlashContext, FlashError, FlashQueue, Result, SessionBackend};
use std::sync::Arc;

/// How messages reach the client for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
	/// Serialized into a response header
	Header,
	/// Rendered into the page
	Render,
}

/// Request hooks for flash delivery
///
/// Requests of a header-delivery kind (`json` plus every enabled
/// `render_header` kind) get their queue in a response header; all others
/// get a snapshot for the page renderer.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use reinhardt_flash_core::{FlashContext, FlashRecorder, MemorySession};
/// use reinhardt_flash_middleware::{FlashConfig, FlashLifecycle, Response};
///
/// let lifecycle = FlashLifecycle::new(FlashConfig::default());
/// let session = MemorySession::new();
/// FlashRecorder::new(&session).success("Saved").unwrap();
///
/// let request = hyper::Request::builder()
///     .uri("/items")
///     .header("X-Requested-With", "XMLHttpRequest")
///     .body(Bytes::new())
///     .unwrap();
///
/// let mut context = FlashContext::new();
/// lifecycle.before_render(&request, &session, &mut context);
/// assert!(!context.has_messages());
///
/// let mut response = Response::default();
/// lifecycle.after_response(&request, &session, &mut response).unwrap();
/// assert_eq!(
///     response.headers()["X-Flash"],
///     r#"[{"type":"success","message":"Saved","params":{}}]"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct FlashLifecycle {
	config: Arc<FlashConfig>,
	detectors: Arc<RequestDetectors>,
}

impl FlashLifecycle {
	/// Lifecycle with the built-in request detectors
	pub fn new(config: FlashConfig) -> Self {
		Self::with_detectors(config, RequestDetectors::new())
	}

	/// Lifecycle with a custom detector registry
	pub fn with_detectors(config: FlashConfig, detectors: RequestDetectors) -> Self {
		Self {
			config: Arc::new(config),
			detectors: Arc::new(detectors),
		}
	}

	/// Delivery configuration
	pub fn config(&self) -> &FlashConfig {
		&self.config
	}

	/// Request detectors
	pub fn detectors(&self) -> &RequestDetectors {
		&self.detectors
	}

	/// Delivery mode for `request`
	pub fn delivery_mode(&self, request: &Request) -> DeliveryMode {
		if self
			.detectors
			.is_any(request, self.config.header_delivery_kinds())
		{
			DeliveryMode::Header
		} else {
			DeliveryMode::Render
		}
	}

	/// Whether `request` receives its messages in a response header
	pub fn uses_header_delivery(&self, request: &Request) -> bool {
		self.delivery_mode(request) == DeliveryMode::Header
	}

	/// Stash a snapshot of the queue for the renderer
	///
	/// Does nothing for header-delivery requests. The queue itself is left in
	/// place; the renderer discards it once the snapshot is shown.
	pub fn before_render(
		&self,
		request: &Request,
		session: &dyn SessionBackend,
		context: &mut FlashContext,
	) {
		self.before_render_with(self.delivery_mode(request), session, context);
	}

	/// [`before_render`](Self::before_render) for an already resolved mode
	pub fn before_render_with(
		&self,
		mode: DeliveryMode,
		session: &dyn SessionBackend,
		context: &mut FlashContext,
	) {
		if mode == DeliveryMode::Header {
			return;
		}

		let snapshot = FlashQueue::with_key(session, self.config.session_key.as_str()).peek();
		tracing::debug!(
			count = snapshot.len(),
			"stashed flash messages for rendering"
		);
		context.stash(snapshot);
	}

	/// Move the queue into the response header
	///
	/// Does nothing for render requests. Redirects keep the queue so the
	/// messages survive to the next request. Otherwise the queue is consumed,
	/// and an empty queue still sets the header to `[]`.
	///
	/// The queue is consumed only once the header value is built. Messages that
	/// cannot be carried in a header are logged and left in the session, and
	/// the response is returned unchanged.
	///
	/// # Errors
	///
	/// Returns [`FlashError::InvalidHeader`] if the configured header name is
	/// not a valid header name.
	pub fn after_response(
		&self,
		request: &Request,
		session: &dyn SessionBackend,
		response: &mut Response,
	) -> Result<()> {
		self.after_response_with(self.delivery_mode(request), session, response)
	}

	/// [`after_response`](Self::after_response) for an already resolved mode
	pub fn after_response_with(
		&self,
		mode: DeliveryMode,
		session: &dyn SessionBackend,
		response: &mut Response,
	) -> Result<()> {
		if mode == DeliveryMode::Render {
			return Ok(());
		}

		if response.headers().contains_key(LOCATION) {
			tracing::debug!("redirect response; keeping flash messages for the next request");
			return Ok(());
		}

		let name = HeaderName::from_bytes(self.config.header.as_bytes())
			.map_err(|e| FlashError::InvalidHeader(format!("{}: {}", self.config.header, e)))?;

		let queue = FlashQueue::with_key(session, self.config.session_key.as_str());
		let messages = queue.peek();
		let payload = header_payload(&serde_json::to_string(&messages)?);
		let value = match HeaderValue::from_bytes(payload.as_bytes()) {
			Ok(value) => value,
			Err(e) => {
				tracing::warn!(
					header = %name,
					count = messages.len(),
					error = %e,
					"flash messages are not valid header content; keeping them in the session"
				);
				return Ok(());
			}
		};
		queue.consume();

		tracing::debug!(
			header = %name,
			count = messages.len(),
			"delivered flash messages in response header"
		);
		response.headers_mut().insert(name, value);
		Ok(())
	}
}

/// JSON text safe for a header value
///
/// serde_json escapes control characters below 0x20 but not DEL, which header
/// values reject. DEL only occurs inside JSON strings, where `\u007f` is an
/// equivalent escape.
fn header_payload(json: &str) -> String {
	json.replace('\u{7f}', "\\u007f")
}

impl Default for FlashLifecycle {
	fn default() -> Self {
		Self::new(FlashConfig::default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bytes::Bytes;
	use reinhardt_flash_core::{FlashRecorder, MemorySession, Message};
	use rstest::{fixture, rstest};

	#[fixture]
	fn session() -> MemorySession {
		let session = MemorySession::new();
		FlashRecorder::new(&session)
			.success("a")
			.unwrap()
			.error("b")
			.unwrap();
		session
	}

	fn request(uri: &str, headers: &[(&str, &str)]) -> Request {
		let mut builder = hyper::Request::builder().uri(uri);
		for (name, value) in headers {
			builder = builder.header(*name, *value);
		}
		builder.body(Bytes::new()).unwrap()
	}

	fn ajax() -> Request {
		request("/", &[("X-Requested-With", "XMLHttpRequest")])
	}

	fn header_messages(response: &Response) -> Vec<Message> {
		serde_json::from_slice(response.headers()["X-Flash"].as_bytes()).unwrap()
	}

	#[rstest]
	#[case(ajax(), DeliveryMode::Header)]
	#[case(request("/items.json", &[]), DeliveryMode::Header)]
	#[case(request("/", &[("Accept", "application/json")]), DeliveryMode::Header)]
	#[case(request("/", &[]), DeliveryMode::Render)]
	#[case(request("/feed.xml", &[]), DeliveryMode::Render)]
	fn test_delivery_mode(#[case] request: Request, #[case] expected: DeliveryMode) {
		let lifecycle = FlashLifecycle::default();
		assert_eq!(lifecycle.delivery_mode(&request), expected);
	}

	#[rstest]
	fn test_disabled_ajax_renders() {
		let lifecycle = FlashLifecycle::new(FlashConfig::new().with_render_header("ajax", false));
		assert!(!lifecycle.uses_header_delivery(&ajax()));
		assert!(lifecycle.uses_header_delivery(&request("/a.json", &[])));
	}

	#[rstest]
	fn test_custom_kind_enables_header_delivery() {
		let detectors = RequestDetectors::new()
			.register("pjax", |req: &Request| req.headers().contains_key("x-pjax"));
		let lifecycle = FlashLifecycle::with_detectors(
			FlashConfig::new().with_render_header("pjax", true),
			detectors,
		);
		assert!(lifecycle.uses_header_delivery(&request("/", &[("X-PJAX", "1")])));
	}

	#[rstest]
	fn test_before_render_snapshots_without_consuming(session: MemorySession) {
		let lifecycle = FlashLifecycle::default();
		let mut context = FlashContext::new();
		lifecycle.before_render(&request("/", &[]), &session, &mut context);

		assert_eq!(
			context.snapshot(),
			Some(&[Message::success("a"), Message::error("b")][..])
		);
		assert_eq!(FlashQueue::new(&session).peek().len(), 2);
	}

	#[rstest]
	fn test_before_render_overwrites_previous_snapshot(session: MemorySession) {
		let lifecycle = FlashLifecycle::default();
		let mut context = FlashContext::new();
		context.stash(vec![Message::info("stale")]);

		lifecycle.before_render(&request("/", &[]), &session, &mut context);
		assert_eq!(context.take().len(), 2);
	}

	#[rstest]
	fn test_before_render_skips_header_requests(session: MemorySession) {
		let lifecycle = FlashLifecycle::default();
		let mut context = FlashContext::new();
		lifecycle.before_render(&ajax(), &session, &mut context);
		assert!(context.snapshot().is_none());
	}

	#[rstest]
	fn test_after_response_sets_header_and_consumes(session: MemorySession) {
		let lifecycle = FlashLifecycle::default();
		let mut response = Response::default();
		lifecycle
			.after_response(&ajax(), &session, &mut response)
			.unwrap();

		assert_eq!(
			header_messages(&response),
			vec![Message::success("a"), Message::error("b")]
		);
		assert!(FlashQueue::new(&session).is_empty());
	}

	#[rstest]
	fn test_after_response_empty_queue_emits_empty_array() {
		let lifecycle = FlashLifecycle::default();
		let session = MemorySession::new();
		let mut response = Response::default();
		lifecycle
			.after_response(&ajax(), &session, &mut response)
			.unwrap();
		assert_eq!(response.headers()["X-Flash"], "[]");
	}

	#[rstest]
	fn test_redirect_keeps_queue(session: MemorySession) {
		let lifecycle = FlashLifecycle::default();
		let mut response = hyper::Response::builder()
			.status(302)
			.header(LOCATION, "/next")
			.body(Bytes::new())
			.unwrap();
		lifecycle
			.after_response(&ajax(), &session, &mut response)
			.unwrap();

		assert!(!response.headers().contains_key("X-Flash"));
		assert_eq!(FlashQueue::new(&session).peek().len(), 2);
	}

	#[rstest]
	fn test_render_requests_leave_response_alone(session: MemorySession) {
		let lifecycle = FlashLifecycle::default();
		let mut response = Response::default();
		lifecycle
			.after_response(&request("/", &[]), &session, &mut response)
			.unwrap();

		assert!(response.headers().is_empty());
		assert_eq!(FlashQueue::new(&session).peek().len(), 2);
	}

	#[rstest]
	fn test_custom_header_name(session: MemorySession) {
		let lifecycle = FlashLifecycle::new(FlashConfig::new().with_header("X-Notices"));
		let mut response = Response::default();
		lifecycle
			.after_response(&ajax(), &session, &mut response)
			.unwrap();
		assert!(response.headers().contains_key("x-notices"));
	}

	#[rstest]
	fn test_invalid_header_name(session: MemorySession) {
		let lifecycle = FlashLifecycle::new(FlashConfig::new().with_header("bad header"));
		let mut response = Response::default();
		let result = lifecycle.after_response(&ajax(), &session, &mut response);

		assert!(matches!(result, Err(FlashError::InvalidHeader(_))));
		assert_eq!(FlashQueue::new(&session).peek().len(), 2);
	}

	#[rstest]
	fn test_non_ascii_message_in_header() {
		let lifecycle = FlashLifecycle::default();
		let session = MemorySession::new();
		FlashRecorder::new(&session).info("Café").unwrap();

		let mut response = Response::default();
		lifecycle
			.after_response(&ajax(), &session, &mut response)
			.unwrap();
		assert_eq!(header_messages(&response), vec![Message::info("Café")]);
	}

	#[rstest]
	fn test_delete_character_delivered_in_header() {
		let lifecycle = FlashLifecycle::default();
		let session = MemorySession::new();
		FlashRecorder::new(&session)
			.info("bad\u{7f}char")
			.unwrap()
			.success("other")
			.unwrap();

		let mut response = Response::default();
		let result = lifecycle.after_response(&ajax(), &session, &mut response);

		assert!(result.is_ok());
		assert_eq!(
			response.headers()["X-Flash"].to_str().unwrap(),
			r#"[{"type":"info","message":"bad\u007fchar","params":{}},{"type":"success","message":"other","params":{}}]"#
		);
		assert_eq!(
			header_messages(&response),
			vec![Message::info("bad\u{7f}char"), Message::success("other")]
		);
		assert!(FlashQueue::new(&session).is_empty());
	}

	#[rstest]
	#[case("plain", "plain")]
	#[case("a\u{7f}b\u{7f}", "a\\u007fb\\u007f")]
	fn test_header_payload(#[case] json: &str, #[case] expected: &str) {
		assert_eq!(header_payload(json), expected);
		assert!(HeaderValue::from_str(&header_payload(json)).is_ok());
	}
}
