//! Session abstraction backing the flash queue

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Session-like key/value store
///
/// Implementations own the storage; the recorder and renderer only borrow it
/// for the duration of a request. `consume` must read and clear in one step.
pub trait SessionBackend: Send + Sync {
	/// Read a value without removing it
	fn read(&self, key: &str) -> Option<Value>;

	/// Write a value, replacing any previous one
	fn write(&self, key: &str, value: Value);

	/// Read a value and remove it
	fn consume(&self, key: &str) -> Option<Value>;
}

impl<T: SessionBackend + ?Sized> SessionBackend for Arc<T> {
	fn read(&self, key: &str) -> Option<Value> {
		(**self).read(key)
	}

	fn write(&self, key: &str, value: Value) {
		(**self).write(key, value)
	}

	fn consume(&self, key: &str) -> Option<Value> {
		(**self).consume(key)
	}
}

/// In-memory session data
///
/// Cloning yields another handle to the same data, so a clone placed in
/// request extensions sees writes made through any other handle.
#[derive(Debug, Clone)]
pub struct MemorySession {
	id: String,
	data: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemorySession {
	/// Create an empty session with a fresh random ID
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::MemorySession;
	///
	/// let session = MemorySession::new();
	/// assert!(session.is_empty());
	/// assert!(!session.id().is_empty());
	/// ```
	pub fn new() -> Self {
		Self::with_id(Uuid::new_v4().to_string())
	}

	/// Create an empty session with a known ID
	pub fn with_id(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			data: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Session ID
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Get a typed value
	pub fn get<T>(&self, key: &str) -> Option<T>
	where
		T: for<'de> Deserialize<'de>,
	{
		self.read(key)
			.and_then(|value| serde_json::from_value(value).ok())
	}

	/// Set a typed value
	pub fn set<T>(&self, key: &str, value: T) -> crate::Result<()>
	where
		T: Serialize,
	{
		self.write(key, serde_json::to_value(value)?);
		Ok(())
	}

	/// Delete a value
	pub fn delete(&self, key: &str) {
		let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
		data.remove(key);
	}

	/// Check if a key exists
	pub fn contains_key(&self, key: &str) -> bool {
		let data = self.data.read().unwrap_or_else(|e| e.into_inner());
		data.contains_key(key)
	}

	/// Remove every value
	pub fn clear(&self) {
		let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
		data.clear();
	}

	/// Number of stored keys
	pub fn len(&self) -> usize {
		let data = self.data.read().unwrap_or_else(|e| e.into_inner());
		data.len()
	}

	/// Check if the session holds no values
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for MemorySession {
	fn default() -> Self {
		Self::new()
	}
}

impl SessionBackend for MemorySession {
	fn read(&self, key: &str) -> Option<Value> {
		let data = self.data.read().unwrap_or_else(|e| e.into_inner());
		data.get(key).cloned()
	}

	fn write(&self, key: &str, value: Value) {
		let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
		data.insert(key.to_string(), value);
	}

	fn consume(&self, key: &str) -> Option<Value> {
		let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
		data.remove(key)
	}
}
