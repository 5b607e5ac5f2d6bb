//! Flash message core for Reinhardt
//!
//! This crate provides one-shot notifications that survive exactly one
//! request/redirect cycle: they are recorded while a request is handled,
//! stored in the session, and consumed when they are delivered.
//!
//! ## Features
//!
//! - **Message Queue**: Session-backed, insertion-ordered, deduplicated on every write
//! - **Recorder**: Typed `success`/`error`/`warning`/`info` operations plus validation-error sets
//! - **Flattening**: Nested per-field validation errors become flat, labelled messages
//! - **Render Context**: Request-scoped handoff between the before-render hook and the renderer
//!
//! ## Note
//!
//! HTTP integration (header delivery, request-kind detection, middleware) lives in
//! `reinhardt-flash-middleware`; template rendering lives in `reinhardt-flash-template`.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_flash_core::{FlashRecorder, MemorySession};
//!
//! let session = MemorySession::new();
//! let mut recorder = FlashRecorder::new(&session);
//!
//! recorder.success("Profile saved").unwrap();
//! recorder.success("Profile saved").unwrap();
//! recorder.warning("Check your <email>").unwrap();
//!
//! let messages = recorder.messages();
//! assert_eq!(messages.len(), 2);
//! assert_eq!(messages[1].text, "Check your &lt;email&gt;");
//! ```

pub mod context;
pub mod dedup;
pub mod error;
pub mod escaping;
pub mod flatten;
pub mod inflector;
pub mod message;
pub mod queue;
pub mod recorder;
pub mod session;
pub mod source;

pub use context::FlashContext;
pub use dedup::remove_duplicates;
pub use error::{FlashError, Result};
pub use escaping::escape_html;
pub use flatten::flatten_errors;
pub use message::{ESCAPE_PARAM, Message, Params};
pub use queue::{DEFAULT_FALLBACK_KEY, DEFAULT_SESSION_KEY, FlashQueue};
pub use recorder::FlashRecorder;
pub use session::{MemorySession, SessionBackend};
pub use source::{ErrorNode, FieldErrors, FlashSource, ValidationErrorSource};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::context::*;
	pub use crate::error::*;
	pub use crate::message::*;
	pub use crate::queue::*;
	pub use crate::recorder::*;
	pub use crate::session::*;
	pub use crate::source::*;
}
