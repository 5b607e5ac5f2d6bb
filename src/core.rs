//! Messages, the session queue and the recorder.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_flash::core::{FlashRecorder, MemorySession};
//!
//! let session = MemorySession::new();
//! FlashRecorder::new(&session).info("Welcome back").unwrap();
//! assert!(!session.is_empty());
//! ```

pub use reinhardt_flash_core::*;
