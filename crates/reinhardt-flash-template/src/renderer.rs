//! Rendering queued flash messages into HTML fragments

use crate::templates::{FlashTemplates, TEMPLATE_PREFIX, TeraTemplates};
use reinhardt_flash_core::message::escape_enabled;
use reinhardt_flash_core::{
	DEFAULT_FALLBACK_KEY, DEFAULT_SESSION_KEY, FlashContext, FlashQueue, Message, Params, Result,
	SessionBackend,
};
use std::collections::HashMap;
use tera::Context;

/// Renders each pending message through its `flash/<type>` template
///
/// Messages come from the request's [`FlashContext`] snapshot when it holds
/// any; the snapshot is then cleared and the queue it was taken from is
/// discarded as delivered. Without a snapshot the fallback session key is
/// consumed instead.
///
/// # Examples
///
/// ```
/// use reinhardt_flash_core::{FlashContext, FlashQueue, MemorySession, Message};
/// use reinhardt_flash_template::{FlashRenderer, TeraTemplates};
///
/// let session = MemorySession::new();
/// let queue = FlashQueue::new(&session);
/// queue.write(vec![Message::success("Saved")]).unwrap();
///
/// let mut context = FlashContext::new();
/// context.stash(queue.peek());
///
/// let renderer = FlashRenderer::new(TeraTemplates::new().unwrap());
/// let html = renderer.render(&mut context, &session).unwrap();
///
/// assert!(html.contains("Saved"));
/// assert!(queue.is_empty());
/// assert_eq!(renderer.render(&mut context, &session).unwrap(), "");
/// ```
pub struct FlashRenderer<T: FlashTemplates = TeraTemplates> {
	templates: T,
	session_key: String,
	fallback_key: String,
	defaults: HashMap<String, Params>,
}

impl<T: FlashTemplates> FlashRenderer<T> {
	/// Renderer reading the default session keys
	pub fn new(templates: T) -> Self {
		Self {
			templates,
			session_key: DEFAULT_SESSION_KEY.to_string(),
			fallback_key: DEFAULT_FALLBACK_KEY.to_string(),
			defaults: HashMap::new(),
		}
	}

	/// Set the key the snapshot was taken from
	pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
		self.session_key = key.into();
		self
	}

	/// Set the key consumed when there is no snapshot
	pub fn with_fallback_key(mut self, key: impl Into<String>) -> Self {
		self.fallback_key = key.into();
		self
	}

	/// Default params for messages of one type
	///
	/// A message's own params take precedence.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::{Message, Params};
	/// use reinhardt_flash_template::{FlashRenderer, TeraTemplates};
	/// use serde_json::json;
	///
	/// let mut defaults = Params::new();
	/// defaults.insert("class".into(), json!("dismissible"));
	///
	/// let renderer = FlashRenderer::new(TeraTemplates::new().unwrap())
	///     .with_defaults("error", defaults);
	///
	/// let html = renderer.render_message(&Message::error("Nope")).unwrap();
	/// assert!(html.contains("message error dismissible"));
	/// ```
	pub fn with_defaults(mut self, kind: impl Into<String>, params: Params) -> Self {
		self.defaults.insert(kind.into(), params);
		self
	}

	/// Template collaborator
	pub fn templates(&self) -> &T {
		&self.templates
	}

	/// Render all pending messages, concatenated in order
	///
	/// # Errors
	///
	/// Returns [`FlashError::Template`](reinhardt_flash_core::FlashError::Template)
	/// if a message's template is missing or fails. The messages are already
	/// consumed at that point.
	pub fn render(
		&self,
		context: &mut FlashContext,
		session: &dyn SessionBackend,
	) -> Result<String> {
		Ok(self.render_fragments(context, session)?.concat())
	}

	/// Render all pending messages, one fragment per message
	pub fn render_fragments(
		&self,
		context: &mut FlashContext,
		session: &dyn SessionBackend,
	) -> Result<Vec<String>> {
		let messages = self.pending(context, session);
		tracing::debug!(count = messages.len(), "rendering flash messages");
		messages
			.iter()
			.map(|message| self.render_message(message))
			.collect()
	}

	/// Render a single message through `flash/<type>`
	pub fn render_message(&self, message: &Message) -> Result<String> {
		let mut params = self.defaults.get(&message.kind).cloned().unwrap_or_default();
		params.extend(message.params.clone());

		let mut context = Context::new();
		context.insert("type", &message.kind);
		context.insert("message", &message.text);
		context.insert("escape", &escape_enabled(&params));
		context.insert("params", &params);

		self.templates
			.render(&format!("{}{}", TEMPLATE_PREFIX, message.kind), &context)
	}

	fn pending(&self, context: &mut FlashContext, session: &dyn SessionBackend) -> Vec<Message> {
		if context.has_messages() {
			let messages = context.take();
			FlashQueue::with_key(session, self.session_key.as_str()).consume();
			messages
		} else {
			context.clear();
			FlashQueue::with_key(session, self.fallback_key.as_str()).consume()
		}
	}
}
