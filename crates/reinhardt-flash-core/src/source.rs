//! Inputs accepted by the recorder
//!
//! A message is either literal text or a snapshot of per-field validation
//! errors taken from a form or model. [`FlashSource`] makes the choice explicit.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One node of a per-field error structure
///
/// A field maps to a single message, a list, or a rule-keyed map such as
/// `{"_empty": "This field cannot be left empty"}`, nested arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorNode {
	Text(String),
	List(Vec<ErrorNode>),
	Map(IndexMap<String, ErrorNode>),
}

impl ErrorNode {
	/// Returns the text when this node is a leaf
	pub fn as_text(&self) -> Option<&str> {
		match self {
			ErrorNode::Text(text) => Some(text.as_str()),
			_ => None,
		}
	}

	/// Direct children of a collection node; empty for leaves
	pub fn children(&self) -> Vec<&ErrorNode> {
		match self {
			ErrorNode::Text(_) => Vec::new(),
			ErrorNode::List(items) => items.iter().collect(),
			ErrorNode::Map(map) => map.values().collect(),
		}
	}

	/// Every text leaf below this node, depth-first
	pub fn leaves(&self) -> Vec<&str> {
		let mut leaves = Vec::new();
		self.collect_leaves(&mut leaves);
		leaves
	}

	fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
		match self {
			ErrorNode::Text(text) => out.push(text.as_str()),
			_ => {
				for child in self.children() {
					child.collect_leaves(out);
				}
			}
		}
	}
}

impl From<&str> for ErrorNode {
	fn from(text: &str) -> Self {
		ErrorNode::Text(text.to_string())
	}
}

impl From<String> for ErrorNode {
	fn from(text: String) -> Self {
		ErrorNode::Text(text)
	}
}

impl From<Vec<String>> for ErrorNode {
	fn from(items: Vec<String>) -> Self {
		ErrorNode::List(items.into_iter().map(ErrorNode::Text).collect())
	}
}

impl From<Vec<&str>> for ErrorNode {
	fn from(items: Vec<&str>) -> Self {
		ErrorNode::List(items.into_iter().map(ErrorNode::from).collect())
	}
}

/// Only strings are error texts; numbers, booleans and `null` are dropped
impl From<&Value> for ErrorNode {
	fn from(value: &Value) -> Self {
		json_node(value).unwrap_or_else(|| ErrorNode::List(Vec::new()))
	}
}

fn json_node(value: &Value) -> Option<ErrorNode> {
	match value {
		Value::String(text) => Some(ErrorNode::Text(text.clone())),
		Value::Array(items) => Some(ErrorNode::List(
			items.iter().filter_map(json_node).collect(),
		)),
		Value::Object(map) => Some(ErrorNode::Map(
			map.iter()
				.filter_map(|(key, value)| Some((key.clone(), json_node(value)?)))
				.collect(),
		)),
		_ => None,
	}
}

/// Field name → errors, in declaration order
pub type FieldErrors = IndexMap<String, ErrorNode>;

/// Anything exposing per-field validation failures
///
/// The recorder takes a read-only snapshot at record time and does not keep
/// the source around afterwards.
pub trait ValidationErrorSource {
	/// Snapshot of the current errors
	fn field_errors(&self) -> FieldErrors;
}

impl ValidationErrorSource for FieldErrors {
	fn field_errors(&self) -> FieldErrors {
		self.clone()
	}
}

/// Form-style error maps; fields are ordered by name since the map is unordered
impl ValidationErrorSource for HashMap<String, Vec<String>> {
	fn field_errors(&self) -> FieldErrors {
		let mut fields: Vec<_> = self.iter().collect();
		fields.sort_by(|a, b| a.0.cmp(b.0));
		fields
			.into_iter()
			.map(|(field, errors)| (field.clone(), ErrorNode::from(errors.clone())))
			.collect()
	}
}

/// JSON error objects, e.g. from an API validation layer
///
/// Non-objects carry no fields, and a field without any string leaf is left out.
impl ValidationErrorSource for Value {
	fn field_errors(&self) -> FieldErrors {
		match self {
			Value::Object(map) => map
				.iter()
				.map(|(field, errors)| (field.clone(), ErrorNode::from(errors)))
				.filter(|(_, node)| !node.leaves().is_empty())
				.collect(),
			_ => FieldErrors::new(),
		}
	}
}

/// What a recorder call carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlashSource {
	/// Literal text, escaped on record unless `escape` is falsy
	Literal(String),
	/// Validation-error snapshot, flattened into one message per error
	ValidationErrors(FieldErrors),
}

impl FlashSource {
	/// Snapshot the errors of a validation-error source
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_flash_core::{FlashSource, ValidationErrorSource};
	/// use serde_json::json;
	///
	/// let errors = json!({"name": "Required"});
	/// let source = FlashSource::from_errors(&errors);
	/// assert!(!source.is_empty());
	/// ```
	pub fn from_errors<S: ValidationErrorSource + ?Sized>(source: &S) -> Self {
		FlashSource::ValidationErrors(source.field_errors())
	}

	/// Empty sources are silently dropped by the recorder
	///
	/// Literal text is empty when it is `""` or `"0"`.
	pub fn is_empty(&self) -> bool {
		match self {
			FlashSource::Literal(text) => text.is_empty() || text == "0",
			FlashSource::ValidationErrors(fields) => fields.is_empty(),
		}
	}
}

impl From<&str> for FlashSource {
	fn from(text: &str) -> Self {
		FlashSource::Literal(text.to_string())
	}
}

impl From<String> for FlashSource {
	fn from(text: String) -> Self {
		FlashSource::Literal(text)
	}
}

impl From<&String> for FlashSource {
	fn from(text: &String) -> Self {
		FlashSource::Literal(text.clone())
	}
}

impl From<FieldErrors> for FlashSource {
	fn from(fields: FieldErrors) -> Self {
		FlashSource::ValidationErrors(fields)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_json_source_fields() {
		let value = json!({"title": "Required", "body": ["Too short"]});
		let fields = value.field_errors();
		let names: Vec<_> = fields.keys().map(String::as_str).collect();
		// serde_json sorts object keys unless `preserve_order` is enabled
		assert_eq!(names.len(), 2);
		assert!(names.contains(&"title"));
		assert!(names.contains(&"body"));
		assert_eq!(fields["title"], ErrorNode::Text("Required".into()));
		assert_eq!(fields["body"], ErrorNode::from(vec!["Too short"]));
	}

	#[rstest]
	fn test_json_scalar_has_no_fields() {
		assert!(json!("oops").field_errors().is_empty());
		assert!(json!(null).field_errors().is_empty());
	}

	#[rstest]
	fn test_form_errors_sorted_by_field() {
		let mut errors = HashMap::new();
		errors.insert("zeta".to_string(), vec!["bad".to_string()]);
		errors.insert("alpha".to_string(), vec!["worse".to_string()]);
		let fields = errors.field_errors();
		let names: Vec<_> = fields.keys().cloned().collect();
		assert_eq!(names, vec!["alpha", "zeta"]);
	}

	#[rstest]
	fn test_json_non_string_leaves_dropped() {
		let value = json!({"age": 18, "active": true, "name": "Required", "tags": ["x", 3, null]});
		let fields = value.field_errors();

		assert_eq!(fields.len(), 2);
		assert_eq!(fields["name"], ErrorNode::Text("Required".into()));
		assert_eq!(fields["tags"], ErrorNode::from(vec!["x"]));
	}

	#[rstest]
	fn test_json_numbers_only_has_no_fields() {
		let source = FlashSource::from_errors(&json!({"age": 18, "limits": {"max": 3}}));
		assert!(source.is_empty());
	}

	#[rstest]
	fn test_leaves_depth_first() {
		let node = ErrorNode::from(&json!([["a", {"rule": "b"}], "c"]));
		assert_eq!(node.leaves(), vec!["a", "b", "c"]);
	}

	#[rstest]
	#[case(FlashSource::from(""), true)]
	#[case(FlashSource::from("0"), true)]
	#[case(FlashSource::from("00"), false)]
	#[case(FlashSource::from(" "), false)]
	#[case(FlashSource::from("x"), false)]
	#[case(FlashSource::ValidationErrors(FieldErrors::new()), true)]
	fn test_is_empty(#[case] source: FlashSource, #[case] expected: bool) {
		assert_eq!(source.is_empty(), expected);
	}

	#[rstest]
	fn test_error_node_deserializes_untagged() {
		let node: ErrorNode = serde_json::from_str(r#"{"_empty": "Required"}"#).unwrap();
		assert_eq!(node.children(), vec![&ErrorNode::Text("Required".into())]);
	}
}
