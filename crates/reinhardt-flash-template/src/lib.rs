//! Template rendering for Reinhardt flash messages
//!
//! Each pending message is rendered through the template `flash/<type>` with
//! this context:
//!
//! | Variable  | Content                                              |
//! |-----------|------------------------------------------------------|
//! | `type`    | Message type, e.g. `success`                         |
//! | `message` | Message text, already escaped unless `escape` is off |
//! | `params`  | Per-type defaults overlaid with the message's params |
//! | `escape`  | Whether the text was escaped when recorded           |
//!
//! Built-in fragments exist for `success`, `error`, `warning` and `info`.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_flash_core::{FlashContext, FlashRecorder, FlashQueue, MemorySession};
//! use reinhardt_flash_template::{FlashRenderer, TeraTemplates};
//!
//! let session = MemorySession::new();
//! FlashRecorder::new(&session).warning("Disk <almost> full").unwrap();
//!
//! let mut context = FlashContext::new();
//! context.stash(FlashQueue::new(&session).peek());
//!
//! let renderer = FlashRenderer::new(TeraTemplates::new().unwrap());
//! let html = renderer.render(&mut context, &session).unwrap();
//!
//! assert_eq!(
//!     html,
//!     r#"<div class="message warning" role="alert">Disk &lt;almost&gt; full</div>"#
//! );
//! ```

pub mod renderer;
pub mod templates;

pub use renderer::FlashRenderer;
pub use templates::{FlashTemplates, TEMPLATE_PREFIX, TeraTemplates};
