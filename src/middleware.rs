//! Request lifecycle hooks, request-kind detection and middleware.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_flash::middleware::{FlashConfig, FlashMiddleware};
//!
//! let middleware = FlashMiddleware::new(FlashConfig::new().with_render_header("pjax", true));
//! assert_eq!(middleware.lifecycle().config().header_delivery_kinds(), vec!["json", "ajax", "pjax"]);
//! ```

pub use reinhardt_flash_middleware::*;
