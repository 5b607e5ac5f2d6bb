//! Template collaborators for flash fragments

use once_cell::sync::Lazy;
use reinhardt_flash_core::{FlashError, Result};
use std::error::Error as _;
use std::sync::Arc;
use tera::{Context, Tera};

/// Name prefix of every flash fragment template
pub const TEMPLATE_PREFIX: &str = "flash/";

static BUILTIN: Lazy<std::result::Result<Tera, String>> = Lazy::new(|| {
	let mut tera = Tera::default();
	tera.add_raw_templates(vec![
		(
			"flash/success.html",
			include_str!("../templates/flash/success.html"),
		),
		(
			"flash/error.html",
			include_str!("../templates/flash/error.html"),
		),
		(
			"flash/warning.html",
			include_str!("../templates/flash/warning.html"),
		),
		(
			"flash/info.html",
			include_str!("../templates/flash/info.html"),
		),
	])
	.map_err(|e| describe(&e))?;
	Ok(tera)
});

/// Renders a named template with a context
///
/// The renderer looks fragments up as `flash/<type>`.
pub trait FlashTemplates: Send + Sync {
	/// Render `name` with `context`
	///
	/// # Errors
	///
	/// Returns [`FlashError::Template`] if the template is missing or fails.
	fn render(&self, name: &str, context: &Context) -> Result<String>;
}

impl<T: FlashTemplates + ?Sized> FlashTemplates for Arc<T> {
	fn render(&self, name: &str, context: &Context) -> Result<String> {
		(**self).render(name, context)
	}
}

impl FlashTemplates for Tera {
	fn render(&self, name: &str, context: &Context) -> Result<String> {
		Tera::render(self, name, context).map_err(template_error)
	}
}

/// Tera templates with built-in `success`, `error`, `warning` and `info` fragments
///
/// A name resolves to the template registered under exactly that name, or
/// else to the same name with `.html` appended. Built-ins are registered as
/// `flash/<type>.html`, so a template loaded from a directory or added under
/// either name replaces them.
///
/// Built-in fragments print `message` unescaped; text is escaped when it is
/// recorded unless `escape` was turned off.
///
/// # Examples
///
/// ```
/// use reinhardt_flash_template::{FlashTemplates, TeraTemplates};
/// use tera::Context;
///
/// let mut templates = TeraTemplates::new().unwrap();
/// templates
///     .add_raw_template("flash/notice", "<p>{{ message }}</p>")
///     .unwrap();
///
/// let mut context = Context::new();
/// context.insert("message", "Hi");
/// context.insert("params", &serde_json::json!({}));
///
/// assert_eq!(templates.render("flash/notice", &context).unwrap(), "<p>Hi</p>");
/// assert!(templates.render("flash/info", &context).unwrap().contains("Hi"));
/// ```
#[derive(Debug, Clone)]
pub struct TeraTemplates {
	tera: Tera,
}

impl TeraTemplates {
	/// Templates holding only the built-in fragments
	pub fn new() -> Result<Self> {
		match &*BUILTIN {
			Ok(tera) => Ok(Self { tera: tera.clone() }),
			Err(message) => Err(FlashError::Template(message.clone())),
		}
	}

	/// Load templates matching `glob`, keeping built-ins for any not found
	///
	/// Names are relative to the glob's base directory, so
	/// `templates/**/*.html` finds `templates/flash/info.html` as
	/// `flash/info.html`.
	pub fn from_glob(glob: &str) -> Result<Self> {
		let mut tera = Tera::new(glob).map_err(template_error)?;
		tera.extend(&Self::new()?.tera).map_err(template_error)?;
		tracing::debug!(
			glob,
			templates = tera.get_template_names().count(),
			"loaded flash templates"
		);
		Ok(Self { tera })
	}

	/// Use an existing Tera instance as is, without built-ins
	pub fn from_tera(tera: Tera) -> Self {
		Self { tera }
	}

	/// Add or replace a template
	pub fn add_raw_template(&mut self, name: &str, source: &str) -> Result<()> {
		self.tera
			.add_raw_template(name, source)
			.map_err(template_error)
	}

	/// Whether `name` resolves to a template
	pub fn has_template(&self, name: &str) -> bool {
		self.resolve(name).is_some()
	}

	/// Underlying Tera instance
	pub fn tera(&self) -> &Tera {
		&self.tera
	}

	/// Mutable Tera instance, e.g. to register filters
	pub fn tera_mut(&mut self) -> &mut Tera {
		&mut self.tera
	}

	fn resolve(&self, name: &str) -> Option<String> {
		let with_extension = format!("{}.html", name);
		let mut found = None;
		for candidate in self.tera.get_template_names() {
			if candidate == name {
				return Some(name.to_string());
			}
			if candidate == with_extension {
				found = Some(with_extension.clone());
			}
		}
		found
	}
}

impl FlashTemplates for TeraTemplates {
	fn render(&self, name: &str, context: &Context) -> Result<String> {
		let resolved = self.resolve(name).unwrap_or_else(|| name.to_string());
		self.tera
			.render(&resolved, context)
			.map_err(template_error)
	}
}

fn template_error(error: tera::Error) -> FlashError {
	FlashError::Template(describe(&error))
}

fn describe(error: &tera::Error) -> String {
	let mut message = error.to_string();
	let mut source = error.source();
	while let Some(cause) = source {
		message.push_str(": ");
		message.push_str(&cause.to_string());
		source = cause.source();
	}
	message
}
