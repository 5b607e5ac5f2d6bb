//! Tera rendering of pending messages into page fragments.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_flash::template::TeraTemplates;
//!
//! let templates = TeraTemplates::new().unwrap();
//! assert!(templates.has_template("flash/success"));
//! ```

pub use reinhardt_flash_template::*;
