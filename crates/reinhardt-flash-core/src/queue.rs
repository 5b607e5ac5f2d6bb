//! Session-scoped flash message queue

use crate::dedup::remove_duplicates;
use crate::message::Message;
use crate::session::SessionBackend;
use serde_json::Value;

/// Session key the recorder writes to
pub const DEFAULT_SESSION_KEY: &str = "XFlash";

/// Session key the renderer falls back to when no render snapshot exists
pub const DEFAULT_FALLBACK_KEY: &str = "X-Flash";

/// Ordered list of messages stored under one session key
///
/// Absent or malformed data always reads as an empty queue.
pub struct FlashQueue<'s> {
	session: &'s dyn SessionBackend,
	key: String,
}

impl<'s> FlashQueue<'s> {
	/// Queue under [`DEFAULT_SESSION_KEY`]
	pub fn new(session: &'s dyn SessionBackend) -> Self {
		Self::with_key(session, DEFAULT_SESSION_KEY)
	}

	/// Queue under a custom key
	pub fn with_key(session: &'s dyn SessionBackend, key: impl Into<String>) -> Self {
		Self {
			session,
			key: key.into(),
		}
	}

	/// Session key of this queue
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Current messages, left in place
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::{FlashQueue, MemorySession, Message};
	///
	/// let session = MemorySession::new();
	/// let queue = FlashQueue::new(&session);
	/// queue.write(vec![Message::info("Hi")]).unwrap();
	///
	/// assert_eq!(queue.peek().len(), 1);
	/// assert_eq!(queue.peek().len(), 1);
	/// ```
	pub fn peek(&self) -> Vec<Message> {
		self.decode(self.session.read(&self.key))
	}

	/// Current messages, removed from the session
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::{FlashQueue, MemorySession, Message};
	///
	/// let session = MemorySession::new();
	/// let queue = FlashQueue::new(&session);
	/// queue.write(vec![Message::info("Hi")]).unwrap();
	///
	/// assert_eq!(queue.consume().len(), 1);
	/// assert!(queue.peek().is_empty());
	/// ```
	pub fn consume(&self) -> Vec<Message> {
		self.decode(self.session.consume(&self.key))
	}

	/// Replace the stored list with a deduplicated copy of `messages`
	pub fn write(&self, messages: Vec<Message>) -> crate::Result<Vec<Message>> {
		let messages = remove_duplicates(messages);
		self.session
			.write(&self.key, serde_json::to_value(&messages)?);
		Ok(messages)
	}

	/// Append `messages` to the stored list and write the deduplicated result
	pub fn extend(&self, messages: Vec<Message>) -> crate::Result<Vec<Message>> {
		let mut queued = self.peek();
		queued.extend(messages);
		self.write(queued)
	}

	/// Check if nothing is queued
	pub fn is_empty(&self) -> bool {
		self.peek().is_empty()
	}

	fn decode(&self, value: Option<Value>) -> Vec<Message> {
		match value {
			None | Some(Value::Null) => Vec::new(),
			Some(value) => serde_json::from_value(value).unwrap_or_else(|error| {
				tracing::warn!(
					key = %self.key,
					%error,
					"discarding malformed flash queue"
				);
				Vec::new()
			}),
		}
	}
}
