//! Request-scoped handoff between the before-render hook and the renderer

use crate::message::Message;

/// Snapshot of queued messages taken before a page is rendered
///
/// One context belongs to one request. It is filled by the before-render hook
/// and drained by the renderer, so nothing carries over between requests.
#[derive(Debug, Clone, Default)]
pub struct FlashContext {
	snapshot: Option<Vec<Message>>,
}

impl FlashContext {
	/// Create an empty context
	pub fn new() -> Self {
		Self::default()
	}

	/// Store a snapshot, replacing any earlier one
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::{FlashContext, Message};
	///
	/// let mut context = FlashContext::new();
	/// context.stash(vec![Message::info("a")]);
	/// context.stash(vec![Message::info("b")]);
	///
	/// assert_eq!(context.take(), vec![Message::info("b")]);
	/// assert!(context.take().is_empty());
	/// ```
	pub fn stash(&mut self, messages: Vec<Message>) {
		self.snapshot = Some(messages);
	}

	/// Remove and return the snapshot; empty when none was stashed
	pub fn take(&mut self) -> Vec<Message> {
		self.snapshot.take().unwrap_or_default()
	}

	/// Snapshot without removing it
	pub fn snapshot(&self) -> Option<&[Message]> {
		self.snapshot.as_deref()
	}

	/// Whether a non-empty snapshot is waiting to be rendered
	pub fn has_messages(&self) -> bool {
		self.snapshot.as_ref().is_some_and(|m| !m.is_empty())
	}

	/// Drop any snapshot
	pub fn clear(&mut self) {
		self.snapshot = None;
	}
}
