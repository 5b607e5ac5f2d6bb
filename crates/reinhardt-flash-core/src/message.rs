//! Flash message type

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form render options attached to a message
///
/// A sorted map keeps the serialized form canonical, which deduplication
/// relies on.
pub type Params = BTreeMap<String, Value>;

/// Parameter controlling HTML escaping of the message text
pub const ESCAPE_PARAM: &str = "escape";

/// A single flash message
///
/// Serialized as `{"type": .., "message": .., "params": {..}}`, which is also
/// the shape delivered to clients in the flash response header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
	/// Category of the message; selects the `flash/<type>` template
	#[serde(rename = "type")]
	pub kind: String,
	/// Message body, already escaped unless `escape` is falsy
	#[serde(rename = "message")]
	pub text: String,
	/// Render options
	#[serde(default)]
	pub params: Params,
}

impl Message {
	/// Create a new message without parameters
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::Message;
	///
	/// let msg = Message::new("success", "Saved");
	/// assert_eq!(msg.kind, "success");
	/// assert_eq!(msg.text, "Saved");
	/// assert!(msg.params.is_empty());
	/// ```
	pub fn new(kind: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			text: text.into(),
			params: Params::new(),
		}
	}

	/// Create a success message
	pub fn success(text: impl Into<String>) -> Self {
		Self::new("success", text)
	}

	/// Create an error message
	pub fn error(text: impl Into<String>) -> Self {
		Self::new("error", text)
	}

	/// Create a warning message
	pub fn warning(text: impl Into<String>) -> Self {
		Self::new("warning", text)
	}

	/// Create an info message
	pub fn info(text: impl Into<String>) -> Self {
		Self::new("info", text)
	}

	/// Replace the parameters
	pub fn with_params(mut self, params: Params) -> Self {
		self.params = params;
		self
	}

	/// Set a single parameter
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::Message;
	///
	/// let msg = Message::info("Hi").with_param("escape", false);
	/// assert!(!msg.escape());
	/// ```
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Whether the text is HTML-escaped on record
	///
	/// Defaults to `true` when the parameter is absent or `null`.
	pub fn escape(&self) -> bool {
		escape_enabled(&self.params)
	}
}

/// Resolve the `escape` parameter, defaulting to `true`
pub fn escape_enabled(params: &Params) -> bool {
	match params.get(ESCAPE_PARAM) {
		None | Some(Value::Null) => true,
		Some(value) => is_truthy(value),
	}
}

/// Loose truthiness used for parameter flags
///
/// `false`, `0`, `""`, `"0"`, `null` and empty collections are falsy.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !(s.is_empty() || s == "0"),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}
