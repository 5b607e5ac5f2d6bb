//! Recording, snapshotting and consuming flash messages through one session

use reinhardt_flash_core::prelude::*;
use reinhardt_flash_core::{DEFAULT_FALLBACK_KEY, DEFAULT_SESSION_KEY, remove_duplicates};
use rstest::rstest;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

#[rstest]
fn test_messages_survive_until_consumed() {
	let session = MemorySession::new();
	FlashRecorder::new(&session)
		.success("Created")
		.unwrap()
		.info("Check your inbox")
		.unwrap();

	// A later request sees the same session data.
	let next_request = session.clone();
	let queue = FlashQueue::new(&next_request);
	assert_eq!(queue.peek().len(), 2);
	assert_eq!(
		queue.consume(),
		vec![Message::success("Created"), Message::info("Check your inbox")]
	);
	assert!(queue.consume().is_empty());
}

#[rstest]
fn test_snapshot_then_discard() {
	let session = MemorySession::new();
	let mut recorder = FlashRecorder::new(&session);
	recorder.warning("Low balance").unwrap();

	let mut context = FlashContext::new();
	context.stash(recorder.messages());
	assert!(context.has_messages());

	let shown = context.take();
	recorder.take_messages();

	assert_eq!(shown, vec![Message::warning("Low balance")]);
	assert!(!context.has_messages());
	assert!(recorder.messages().is_empty());
}

#[rstest]
fn test_form_errors_from_hashmap() {
	let mut errors: HashMap<String, Vec<String>> = HashMap::new();
	errors.insert("password".into(), vec!["Too short".into()]);
	errors.insert("email".into(), vec!["Invalid".into(), "Taken".into()]);

	let session = MemorySession::new();
	FlashRecorder::new(&session)
		.errors(&errors, Params::new())
		.unwrap();

	let texts: Vec<String> = FlashQueue::new(&session)
		.peek()
		.into_iter()
		.map(|m| format!("{}:{}", m.kind, m.text))
		.collect();
	assert_eq!(
		texts,
		vec![
			"error:[Email] Invalid",
			"error:[Email] Taken",
			"error:[Password] Too short",
		]
	);
}

#[rstest]
fn test_nested_errors_humanize_labels() {
	let session = MemorySession::new();
	FlashRecorder::new(&session)
		.errors(
			&json!({"billing_address": {"postal_code": ["Required"], "city": "Required"}}),
			Params::new(),
		)
		.unwrap();

	let messages = FlashQueue::new(&session).peek();
	assert_eq!(messages.len(), 1);
	assert_eq!(messages[0].text, "[Billing Address] Required");
	assert!(!messages[0].escape());
}

#[rstest]
fn test_recorder_and_renderer_keys_are_separate() {
	let session = MemorySession::new();
	FlashRecorder::new(&session).info("queued").unwrap();

	assert!(session.contains_key(DEFAULT_SESSION_KEY));
	assert!(!session.contains_key(DEFAULT_FALLBACK_KEY));
	assert!(
		FlashQueue::with_key(&session, DEFAULT_FALLBACK_KEY)
			.consume()
			.is_empty()
	);
}

#[rstest]
fn test_shared_session_backend() {
	let session: Arc<dyn SessionBackend> = Arc::new(MemorySession::new());
	FlashRecorder::new(&session).error("boom").unwrap();
	FlashRecorder::new(&session).error("boom").unwrap();

	assert_eq!(FlashQueue::new(&session).peek(), vec![Message::error("boom")]);
}

#[rstest]
fn test_header_payload_shape() {
	let session = MemorySession::new();
	let mut recorder = FlashRecorder::new(&session);
	recorder
		.success_with("Done", Params::from([("class".to_string(), json!("toast"))]))
		.unwrap();

	let (name, value) = recorder.to_header("X-Flash").unwrap();
	assert_eq!(name, "X-Flash");
	assert_eq!(
		serde_json::from_str::<serde_json::Value>(&value).unwrap(),
		json!([{"type": "success", "message": "Done", "params": {"class": "toast"}}])
	);
}

#[rstest]
fn test_dedup_distinguishes_params() {
	let plain = Message::info("x");
	let styled = Message::info("x").with_param("class", "big");
	assert_eq!(
		remove_duplicates(vec![plain.clone(), styled.clone(), plain.clone()]),
		vec![plain, styled]
	);
}
