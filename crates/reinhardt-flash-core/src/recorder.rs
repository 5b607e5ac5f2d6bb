//! Recording flash messages during request handling

use crate::error::Result;
use crate::escaping::escape_html;
use crate::flatten::flatten_errors;
use crate::message::{ESCAPE_PARAM, Message, Params, escape_enabled};
use crate::queue::FlashQueue;
use crate::session::SessionBackend;
use crate::source::{FlashSource, ValidationErrorSource};
use serde_json::Value;

/// Accepts typed messages and writes them to the session queue
///
/// Every call rewrites the whole queue: the stored list is read, the new
/// messages are appended, duplicates are removed and the result is written
/// back under the queue key.
///
/// # Examples
///
/// ```rust
/// use reinhardt_flash_core::{FlashRecorder, MemorySession, Params};
/// use serde_json::json;
///
/// let session = MemorySession::new();
/// let mut recorder = FlashRecorder::new(&session);
///
/// recorder
///     .success("Saved")?
///     .errors(&json!({"name": "Required"}), Params::new())?;
///
/// let messages = recorder.messages();
/// assert_eq!(messages[0].text, "Saved");
/// assert_eq!(messages[1].text, "[Name] Required");
/// # Ok::<(), reinhardt_flash_core::FlashError>(())
/// ```
pub struct FlashRecorder<'s> {
	queue: FlashQueue<'s>,
}

impl<'s> FlashRecorder<'s> {
	/// Recorder writing under the default session key
	pub fn new(session: &'s dyn SessionBackend) -> Self {
		Self {
			queue: FlashQueue::new(session),
		}
	}

	/// Recorder writing under a custom session key
	pub fn with_key(session: &'s dyn SessionBackend, key: impl Into<String>) -> Self {
		Self {
			queue: FlashQueue::with_key(session, key),
		}
	}

	/// Record a message of any type
	///
	/// Empty sources are dropped without touching the session. Literal text is
	/// HTML-escaped unless `params.escape` is falsy. Validation errors are
	/// flattened with `escape` forced to `false`, since their text is built
	/// from already-trusted labels.
	pub fn record(
		&mut self,
		kind: &str,
		source: impl Into<FlashSource>,
		params: Params,
	) -> Result<&mut Self> {
		let source = source.into();
		if source.is_empty() {
			tracing::debug!(kind, "ignoring empty flash message");
			return Ok(self);
		}

		let mut params = params;
		let incoming = match source {
			FlashSource::ValidationErrors(fields) => {
				params.insert(ESCAPE_PARAM.to_string(), Value::Bool(false));
				flatten_errors(&fields, kind, &params)
			}
			FlashSource::Literal(text) => {
				let text = if escape_enabled(&params) {
					escape_html(&text)
				} else {
					text
				};
				vec![Message {
					kind: kind.to_string(),
					text,
					params,
				}]
			}
		};

		let queued = self.queue.extend(incoming)?;
		tracing::debug!(kind, queued = queued.len(), "recorded flash message");
		Ok(self)
	}

	/// Record a success message
	pub fn success(&mut self, source: impl Into<FlashSource>) -> Result<&mut Self> {
		self.record("success", source, Params::new())
	}

	/// Record a success message with render options
	pub fn success_with(
		&mut self,
		source: impl Into<FlashSource>,
		params: Params,
	) -> Result<&mut Self> {
		self.record("success", source, params)
	}

	/// Record an error message
	pub fn error(&mut self, source: impl Into<FlashSource>) -> Result<&mut Self> {
		self.record("error", source, Params::new())
	}

	/// Record an error message with render options
	pub fn error_with(
		&mut self,
		source: impl Into<FlashSource>,
		params: Params,
	) -> Result<&mut Self> {
		self.record("error", source, params)
	}

	/// Record a warning message
	pub fn warning(&mut self, source: impl Into<FlashSource>) -> Result<&mut Self> {
		self.record("warning", source, Params::new())
	}

	/// Record a warning message with render options
	pub fn warning_with(
		&mut self,
		source: impl Into<FlashSource>,
		params: Params,
	) -> Result<&mut Self> {
		self.record("warning", source, params)
	}

	/// Record an info message
	pub fn info(&mut self, source: impl Into<FlashSource>) -> Result<&mut Self> {
		self.record("info", source, Params::new())
	}

	/// Record an info message with render options
	pub fn info_with(
		&mut self,
		source: impl Into<FlashSource>,
		params: Params,
	) -> Result<&mut Self> {
		self.record("info", source, params)
	}

	/// Record every error of a form or model as an `"error"` message
	pub fn errors<S: ValidationErrorSource + ?Sized>(
		&mut self,
		source: &S,
		params: Params,
	) -> Result<&mut Self> {
		self.record("errors", FlashSource::from_errors(source), params)
	}

	/// Queued messages, left in place
	pub fn messages(&self) -> Vec<Message> {
		self.queue.peek()
	}

	/// Queued messages, removed from the session
	pub fn take_messages(&self) -> Vec<Message> {
		self.queue.consume()
	}

	/// Consume the queue as a JSON array
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::{FlashRecorder, MemorySession};
	///
	/// let session = MemorySession::new();
	/// let mut recorder = FlashRecorder::new(&session);
	/// recorder.info("Hi").unwrap();
	///
	/// assert_eq!(
	///     recorder.to_json().unwrap(),
	///     r#"[{"type":"info","message":"Hi","params":{}}]"#
	/// );
	/// assert_eq!(recorder.to_json().unwrap(), "[]");
	/// ```
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string(&self.take_messages())?)
	}

	/// Consume the queue as a `(header name, JSON value)` pair
	pub fn to_header(&self, name: &str) -> Result<(String, String)> {
		Ok((name.to_string(), self.to_json()?))
	}

	/// Underlying queue
	pub fn queue(&self) -> &FlashQueue<'s> {
		&self.queue
	}
}
