//! Named request-kind predicates

use crate::handler::Request;
use hyper::header::ACCEPT;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a request is of some kind
pub type Detector = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

/// Registry of request-kind detectors
///
/// Comes with `ajax`, `json` and `xml`. Asking about a kind nobody registered
/// is not an error; it simply never matches.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use reinhardt_flash_middleware::RequestDetectors;
///
/// let detectors = RequestDetectors::new()
///     .register("pjax", |req| req.headers().contains_key("x-pjax"));
///
/// let request = hyper::Request::builder()
///     .uri("/items")
///     .header("X-PJAX", "true")
///     .body(Bytes::new())
///     .unwrap();
///
/// assert!(detectors.is(&request, "pjax"));
/// assert!(!detectors.is(&request, "ajax"));
/// assert!(!detectors.is(&request, "mobile"));
/// ```
#[derive(Clone)]
pub struct RequestDetectors {
	detectors: HashMap<String, Detector>,
}

impl RequestDetectors {
	/// Registry with the built-in detectors
	pub fn new() -> Self {
		Self::empty()
			.register("ajax", is_ajax)
			.register("json", |req: &Request| {
				accepts(req, &["application/json"]) || has_extension(req, "json")
			})
			.register("xml", |req: &Request| {
				accepts(req, &["application/xml", "text/xml"]) || has_extension(req, "xml")
			})
	}

	/// Registry without any detectors
	pub fn empty() -> Self {
		Self {
			detectors: HashMap::new(),
		}
	}

	/// Add or replace a detector
	pub fn register<F>(mut self, kind: impl Into<String>, detector: F) -> Self
	where
		F: Fn(&Request) -> bool + Send + Sync + 'static,
	{
		self.detectors.insert(kind.into(), Arc::new(detector));
		self
	}

	/// Whether `request` is of the given kind
	pub fn is(&self, request: &Request, kind: &str) -> bool {
		match self.detectors.get(kind) {
			Some(detector) => detector(request),
			None => {
				tracing::debug!(kind, "no detector registered for request kind");
				false
			}
		}
	}

	/// Whether `request` matches any of the given kinds
	pub fn is_any<'a>(&self, request: &Request, kinds: impl IntoIterator<Item = &'a str>) -> bool {
		kinds.into_iter().any(|kind| self.is(request, kind))
	}

	/// Registered kind names, sorted
	pub fn kinds(&self) -> Vec<&str> {
		let mut kinds: Vec<&str> = self.detectors.keys().map(String::as_str).collect();
		kinds.sort_unstable();
		kinds
	}
}

impl Default for RequestDetectors {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for RequestDetectors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RequestDetectors")
			.field("kinds", &self.kinds())
			.finish()
	}
}

fn is_ajax(request: &Request) -> bool {
	request
		.headers()
		.get("x-requested-with")
		.and_then(|h| h.to_str().ok())
		.is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
}

fn accepts(request: &Request, media_types: &[&str]) -> bool {
	request
		.headers()
		.get_all(ACCEPT)
		.iter()
		.filter_map(|h| h.to_str().ok())
		.flat_map(|h| h.split(','))
		.filter_map(|item| item.split(';').next())
		.map(str::trim)
		.any(|item| {
			media_types
				.iter()
				.any(|media_type| item.eq_ignore_ascii_case(media_type))
		})
}

fn has_extension(request: &Request, extension: &str) -> bool {
	request
		.uri()
		.path()
		.rsplit_once('.')
		.is_some_and(|(stem, ext)| !stem.ends_with('/') && ext.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
	use super::*;
	use bytes::Bytes;
	use rstest::rstest;

	fn request(uri: &str, headers: &[(&str, &str)]) -> Request {
		let mut builder = hyper::Request::builder().uri(uri);
		for (name, value) in headers {
			builder = builder.header(*name, *value);
		}
		builder.body(Bytes::new()).unwrap()
	}

	#[rstest]
	#[case(&[("X-Requested-With", "XMLHttpRequest")], true)]
	#[case(&[("X-Requested-With", "xmlhttprequest")], true)]
	#[case(&[("X-Requested-With", "fetch")], false)]
	#[case(&[], false)]
	fn test_ajax(#[case] headers: &[(&str, &str)], #[case] expected: bool) {
		let detectors = RequestDetectors::new();
		assert_eq!(detectors.is(&request("/", headers), "ajax"), expected);
	}

	#[rstest]
	#[case("/items", &[("Accept", "application/json")], true)]
	#[case("/items", &[("Accept", "text/html, application/json;q=0.9")], true)]
	#[case("/items.json", &[], true)]
	#[case("/items", &[("Accept", "text/html")], false)]
	#[case("/items.jsonp", &[], false)]
	#[case("/.json", &[], false)]
	fn test_json(#[case] uri: &str, #[case] headers: &[(&str, &str)], #[case] expected: bool) {
		let detectors = RequestDetectors::new();
		assert_eq!(detectors.is(&request(uri, headers), "json"), expected);
	}

	#[rstest]
	#[case("/feed", &[("Accept", "text/xml")], true)]
	#[case("/feed.xml", &[], true)]
	#[case("/feed", &[("Accept", "application/json")], false)]
	fn test_xml(#[case] uri: &str, #[case] headers: &[(&str, &str)], #[case] expected: bool) {
		let detectors = RequestDetectors::new();
		assert_eq!(detectors.is(&request(uri, headers), "xml"), expected);
	}

	#[rstest]
	fn test_unknown_kind_never_matches() {
		let detectors = RequestDetectors::empty();
		assert!(!detectors.is(&request("/items.json", &[]), "json"));
		assert!(detectors.kinds().is_empty());
	}

	#[rstest]
	fn test_is_any() {
		let detectors = RequestDetectors::new();
		let req = request("/", &[("X-Requested-With", "XMLHttpRequest")]);
		assert!(detectors.is_any(&req, ["json", "ajax"]));
		assert!(!detectors.is_any(&req, ["json", "xml"]));
	}

	#[rstest]
	fn test_register_replaces() {
		let detectors = RequestDetectors::new().register("ajax", |_: &Request| false);
		let req = request("/", &[("X-Requested-With", "XMLHttpRequest")]);
		assert!(!detectors.is(&req, "ajax"));
		assert_eq!(detectors.kinds(), vec!["ajax", "json", "xml"]);
	}
}
