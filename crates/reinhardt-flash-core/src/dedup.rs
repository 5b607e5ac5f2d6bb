//! Structural deduplication of queued messages

use crate::message::Message;
use std::collections::HashSet;

/// Remove structurally identical messages, keeping the first occurrence
///
/// Two messages are identical when their canonical JSON forms (type, text and
/// sorted params) match. Relative order of the survivors is preserved, so the
/// function is idempotent.
///
/// # Examples
///
/// ```
/// use reinhardt_flash_core::{Message, remove_duplicates};
///
/// let messages = vec![
///     Message::error("Oops"),
///     Message::info("Hi"),
///     Message::error("Oops"),
/// ];
/// let unique = remove_duplicates(messages);
/// assert_eq!(unique, vec![Message::error("Oops"), Message::info("Hi")]);
/// ```
pub fn remove_duplicates(messages: Vec<Message>) -> Vec<Message> {
	let before = messages.len();
	let mut seen = HashSet::with_capacity(before);

	let unique: Vec<Message> = messages
		.into_iter()
		.filter(|message| match serde_json::to_string(message) {
			Ok(key) => seen.insert(key),
			// Unserializable params cannot collide with anything
			Err(_) => true,
		})
		.collect();

	if unique.len() != before {
		tracing::debug!(
			dropped = before - unique.len(),
			"removed duplicate flash messages"
		);
	}

	unique
}
