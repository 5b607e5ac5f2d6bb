//! Flash delivery configuration

use indexmap::IndexMap;
use reinhardt_flash_core::{DEFAULT_FALLBACK_KEY, DEFAULT_SESSION_KEY, FlashError, Result};
use serde::{Deserialize, Serialize};

/// Default response header carrying flash messages
pub const DEFAULT_HEADER: &str = "X-Flash";

/// Request kind that always uses header delivery
pub const JSON_KIND: &str = "json";

/// Flash delivery configuration
///
/// Every field has a default, so a partial TOML table only overrides what it
/// names. `render_header` is replaced as a whole when given.
///
/// # Examples
///
/// ```
/// use reinhardt_flash_middleware::FlashConfig;
///
/// let config = FlashConfig::default();
/// assert_eq!(config.header, "X-Flash");
/// assert_eq!(config.header_delivery_kinds(), vec!["json", "ajax"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
	/// Response header name used for header delivery
	pub header: String,
	/// Request kinds (besides `json`) whose messages travel in the header
	#[serde(alias = "renderHeader")]
	pub render_header: IndexMap<String, bool>,
	/// Session key the recorder writes to
	pub session_key: String,
	/// Session key the renderer reads when no render snapshot exists
	pub fallback_session_key: String,
}

impl FlashConfig {
	/// Create the default configuration
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a TOML table, filling missing fields with defaults
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_middleware::FlashConfig;
	///
	/// let config = FlashConfig::from_toml_str(r#"
	///     header = "X-Notices"
	///
	///     [render_header]
	///     ajax = false
	///     xml = true
	/// "#).unwrap();
	///
	/// assert_eq!(config.header, "X-Notices");
	/// assert_eq!(config.header_delivery_kinds(), vec!["json", "xml"]);
	/// assert_eq!(config.session_key, "XFlash");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self> {
		toml::from_str(source).map_err(|e| FlashError::Configuration(e.to_string()))
	}

	/// Set the response header name
	pub fn with_header(mut self, header: impl Into<String>) -> Self {
		self.header = header.into();
		self
	}

	/// Enable or disable header delivery for a request kind
	pub fn with_render_header(mut self, kind: impl Into<String>, enabled: bool) -> Self {
		self.render_header.insert(kind.into(), enabled);
		self
	}

	/// Set the session key written by the recorder
	pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
		self.session_key = key.into();
		self
	}

	/// Set the session key read by the renderer as a fallback
	pub fn with_fallback_session_key(mut self, key: impl Into<String>) -> Self {
		self.fallback_session_key = key.into();
		self
	}

	/// `json` followed by every enabled `render_header` kind
	pub fn header_delivery_kinds(&self) -> Vec<&str> {
		let mut kinds = vec![JSON_KIND];
		kinds.extend(
			self.render_header
				.iter()
				.filter(|(kind, enabled)| **enabled && kind.as_str() != JSON_KIND)
				.map(|(kind, _)| kind.as_str()),
		);
		kinds
	}
}

impl Default for FlashConfig {
	fn default() -> Self {
		let mut render_header = IndexMap::new();
		render_header.insert("ajax".to_string(), true);
		Self {
			header: DEFAULT_HEADER.to_string(),
			render_header,
			session_key: DEFAULT_SESSION_KEY.to_string(),
			fallback_session_key: DEFAULT_FALLBACK_KEY.to_string(),
		}
	}
}
