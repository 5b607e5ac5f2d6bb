//! # Reinhardt Flash
//!
//! One-shot notifications for Reinhardt applications.
//!
//! A flash message is recorded while one request is handled and shown to the
//! user exactly once, usually on the page the request redirects to. Messages
//! are kept in the session, deduplicated on every write, and delivered either
//! in a response header (for JSON and AJAX clients) or through templates.
//!
//! ## Feature Flags
//!
//! - `minimal` - Messages, queue, recorder and validation-error flattening only
//! - `middleware` - Request lifecycle hooks, request-kind detection, session and flash middleware
//! - `templates` - Tera rendering of pending messages
//! - `full` (default) - All of the above
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_flash::prelude::*;
//! use serde_json::json;
//!
//! let session = MemorySession::new();
//! let mut flash = FlashRecorder::new(&session);
//!
//! flash.success("Article published").unwrap();
//! flash
//!     .errors(&json!({"title": "Too long", "tags": ["Unknown tag"]}), Params::new())
//!     .unwrap();
//!
//! let queued = flash.messages();
//! assert_eq!(queued.len(), 3);
//! assert_eq!(queued[1].text, "[Tags] Unknown tag");
//! assert_eq!(queued[2].text, "[Title] Too long");
//! ```
//!
//! ## Delivery
//!
//! With the `middleware` feature, install [`SessionMiddleware`] and then
//! [`FlashMiddleware`] in a [`MiddlewareChain`]. Handlers reach the recorder
//! through [`FlashRequest`]. Page handlers call [`FlashRequest::prepare_render`]
//! and hand the returned context to a [`FlashRenderer`] (feature `templates`).

pub mod core;
#[cfg(feature = "middleware")]
pub mod middleware;
#[cfg(feature = "templates")]
pub mod template;

pub use reinhardt_flash_core::{
	ErrorNode, FieldErrors, FlashContext, FlashError, FlashQueue, FlashRecorder, FlashSource,
	MemorySession, Message, Params, Result, SessionBackend, ValidationErrorSource,
};

#[cfg(feature = "middleware")]
pub use reinhardt_flash_middleware::{
	DeliveryMode, FlashConfig, FlashLifecycle, FlashMiddleware, FlashRequest, Handler, Middleware,
	MiddlewareChain, RequestDetectors, SessionConfig, SessionHandle, SessionMiddleware,
};

#[cfg(feature = "templates")]
pub use reinhardt_flash_template::{FlashRenderer, FlashTemplates, TeraTemplates};

/// Re-export commonly used types
pub mod prelude {
	pub use crate::{
		FlashContext, FlashError, FlashQueue, FlashRecorder, FlashSource, MemorySession, Message,
		Params, SessionBackend, ValidationErrorSource,
	};

	#[cfg(feature = "middleware")]
	pub use crate::{
		FlashConfig, FlashMiddleware, FlashRequest, Handler, Middleware, MiddlewareChain,
		SessionMiddleware,
	};

	#[cfg(feature = "templates")]
	pub use crate::{FlashRenderer, TeraTemplates};
}
