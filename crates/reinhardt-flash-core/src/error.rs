//! Error types for flash messaging

/// Errors raised by flash collaborators
///
/// Recording and delivering messages is absorptive: empty input and missing
/// session data never produce an error. Only the collaborators (serialization,
/// templating, header construction, configuration) can fail.
#[derive(Debug, thiserror::Error)]
pub enum FlashError {
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Template error: {0}")]
	Template(String),

	#[error("Invalid header: {0}")]
	InvalidHeader(String),

	#[error("Configuration error: {0}")]
	Configuration(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

/// Result type for flash operations
pub type Result<T> = std::result::Result<T, FlashError>;
