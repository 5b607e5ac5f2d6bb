//! Flattening of per-field validation errors into flash messages

use crate::inflector::{capitalize, humanize, singularize};
use crate::message::{Message, Params};
use crate::source::{ErrorNode, FieldErrors};
use indexmap::IndexMap;

/// Expand validation errors into a flat list of labelled messages
///
/// For each field:
/// - a single text becomes one `"error"` message labelled `[Field]`;
/// - a flat list or rule map of texts becomes one message per entry, typed
///   with the singular of `kind` and labelled `[Field]`;
/// - anything nested deeper is walked to every text leaf; leaves are typed
///   with the singular of `kind`, labelled with the humanized field name, and
///   exact duplicates within the field collapse.
///
/// Every message carries a copy of `params`.
///
/// # Examples
///
/// ```
/// use reinhardt_flash_core::{flatten_errors, ErrorNode, FieldErrors, Params};
///
/// let mut errors = FieldErrors::new();
/// errors.insert("name".into(), ErrorNode::from("Required"));
/// errors.insert("tags".into(), ErrorNode::from(vec!["Too short"]));
///
/// let messages = flatten_errors(&errors, "errors", &Params::new());
/// assert_eq!(messages[0].text, "[Name] Required");
/// assert_eq!(messages[1].kind, "error");
/// assert_eq!(messages[1].text, "[Tags] Too short");
/// ```
pub fn flatten_errors(errors: &FieldErrors, kind: &str, params: &Params) -> Vec<Message> {
	let singular = singularize(kind);
	let mut messages = Vec::new();

	for (field, node) in errors {
		match node {
			ErrorNode::Text(text) => {
				messages.push(labelled("error", &capitalize(field), text, params));
			}
			_ if is_flat(node) => {
				let label = capitalize(field);
				for child in node.children() {
					if let Some(text) = child.as_text() {
						messages.push(labelled(&singular, &label, text, params));
					}
				}
			}
			_ => {
				let label = humanize(field);
				let mut by_text: IndexMap<String, Message> = IndexMap::new();
				for leaf in node.leaves() {
					let message = labelled(&singular, &label, leaf, params);
					by_text.insert(message.text.clone(), message);
				}
				messages.extend(by_text.into_values());
			}
		}
	}

	messages
}

/// A collection whose direct children are all text
fn is_flat(node: &ErrorNode) -> bool {
	node.children().iter().all(|child| child.as_text().is_some())
}

fn labelled(kind: &str, label: &str, text: &str, params: &Params) -> Message {
	Message {
		kind: kind.to_string(),
		text: format!("[{}] {}", label, text),
		params: params.clone(),
	}
}
