//! Cookie-backed sessions for the flash request cycle

use crate::handler::{Handler, Middleware, Request, Response};
use async_trait::async_trait;
use hyper::header::{COOKIE, HeaderValue, SET_COOKIE};
use reinhardt_flash_core::{FlashError, MemorySession, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Default session cookie name
pub const DEFAULT_COOKIE_NAME: &str = "sessionid";

#[derive(Debug, Clone)]
struct StoredSession {
	session: MemorySession,
	expires_at: Instant,
}

impl StoredSession {
	fn is_valid(&self) -> bool {
		Instant::now() < self.expires_at
	}
}

/// Session store with lazy eviction of expired sessions
///
/// Sessions share their data with the handles given out, so writes made while
/// handling a request are visible to the next request without saving again.
#[derive(Debug)]
pub struct SessionStore {
	sessions: RwLock<HashMap<String, StoredSession>>,
	cleanup_threshold: AtomicUsize,
}

impl SessionStore {
	const DEFAULT_CLEANUP_THRESHOLD: usize = 10_000;

	/// Create a new store
	pub fn new() -> Self {
		Self {
			sessions: RwLock::new(HashMap::new()),
			cleanup_threshold: AtomicUsize::new(Self::DEFAULT_CLEANUP_THRESHOLD),
		}
	}

	/// Evict expired sessions once more than `threshold` are stored
	pub fn with_cleanup_threshold(self, threshold: usize) -> Self {
		self.cleanup_threshold.store(threshold, Ordering::Relaxed);
		self
	}

	/// Get a live session
	pub fn get(&self, id: &str) -> Option<MemorySession> {
		let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
		sessions
			.get(id)
			.filter(|stored| stored.is_valid())
			.map(|stored| stored.session.clone())
	}

	/// Save a session, extending its lifetime by `ttl`
	pub fn save(&self, session: MemorySession, ttl: Duration) {
		let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
		sessions.insert(
			session.id().to_string(),
			StoredSession {
				session,
				expires_at: Instant::now() + ttl,
			},
		);

		if sessions.len() > self.cleanup_threshold.load(Ordering::Relaxed) {
			let before = sessions.len();
			sessions.retain(|_, stored| stored.is_valid());
			tracing::debug!(evicted = before - sessions.len(), "evicted expired sessions");
		}
	}

	/// Delete a session
	pub fn delete(&self, id: &str) {
		let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
		sessions.remove(id);
	}

	/// Clean up expired sessions
	pub fn cleanup(&self) {
		let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
		sessions.retain(|_, stored| stored.is_valid());
	}

	/// Clear the store
	pub fn clear(&self) {
		let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
		sessions.clear();
	}

	/// Number of stored sessions, expired ones included
	pub fn len(&self) -> usize {
		let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
		sessions.len()
	}

	/// Check if the store is empty
	pub fn is_empty(&self) -> bool {
		let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
		sessions.is_empty()
	}
}

impl Default for SessionStore {
	fn default() -> Self {
		Self::new()
	}
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
	/// Cookie name
	pub cookie_name: String,
	/// Session TTL
	pub ttl: Duration,
	/// HTTPS-only cookie
	pub secure: bool,
	/// HttpOnly flag
	pub http_only: bool,
	/// SameSite attribute
	pub same_site: Option<String>,
	/// Path
	pub path: String,
}

impl SessionConfig {
	/// Create a new configuration
	///
	/// # Examples
	///
	/// ```
	/// use std::time::Duration;
	/// use reinhardt_flash_middleware::SessionConfig;
	///
	/// let config = SessionConfig::new("sessionid", Duration::from_secs(3600))
	///     .with_secure(false)
	///     .with_same_site(None);
	/// assert_eq!(config.cookie_name, "sessionid");
	/// assert!(!config.secure);
	/// ```
	pub fn new(cookie_name: impl Into<String>, ttl: Duration) -> Self {
		Self {
			cookie_name: cookie_name.into(),
			ttl,
			secure: true,
			http_only: true,
			same_site: Some("Lax".to_string()),
			path: "/".to_string(),
		}
	}

	/// Set the Secure flag
	pub fn with_secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	/// Set the HttpOnly flag
	pub fn with_http_only(mut self, http_only: bool) -> Self {
		self.http_only = http_only;
		self
	}

	/// Set or remove the SameSite attribute
	pub fn with_same_site(mut self, same_site: Option<String>) -> Self {
		self.same_site = same_site;
		self
	}

	/// Set the cookie path
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();
		self
	}

	/// Build the `Set-Cookie` value for a session
	fn cookie_header(&self, session_id: &str) -> String {
		let mut parts = vec![
			format!("{}={}", self.cookie_name, session_id),
			format!("Path={}", self.path),
		];
		if self.http_only {
			parts.push("HttpOnly".to_string());
		}
		if self.secure {
			parts.push("Secure".to_string());
		}
		if let Some(same_site) = &self.same_site {
			parts.push(format!("SameSite={}", same_site));
		}
		parts.push(format!("Max-Age={}", self.ttl.as_secs()));
		parts.join("; ")
	}
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self::new(DEFAULT_COOKIE_NAME, Duration::from_secs(1_209_600))
	}
}

/// Session attached to a request by [`SessionMiddleware`]
#[derive(Debug, Clone)]
pub struct SessionHandle {
	session: MemorySession,
}

impl SessionHandle {
	/// Wrap a session
	pub fn new(session: MemorySession) -> Self {
		Self { session }
	}

	/// Handle stored in the request extensions, if any
	pub fn from_request(request: &Request) -> Option<Self> {
		request.extensions().get::<Self>().cloned()
	}

	/// Session data
	pub fn session(&self) -> &MemorySession {
		&self.session
	}

	/// Unwrap the session
	pub fn into_session(self) -> MemorySession {
		self.session
	}
}

/// Resolves the request's session from its cookie
///
/// A missing, unknown or expired cookie yields a fresh session. The session is
/// inserted into the request extensions as a [`SessionHandle`] and the cookie
/// is refreshed on every response.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use reinhardt_flash_middleware::{Handler, Middleware, Request, Response, SessionHandle, SessionMiddleware};
/// use std::sync::Arc;
///
/// struct Counter;
///
/// #[async_trait::async_trait]
/// impl Handler for Counter {
///     async fn handle(&self, request: Request) -> reinhardt_flash_core::Result<Response> {
///         let handle = SessionHandle::from_request(&request).expect("session");
///         let visits = handle.session().get::<u32>("visits").unwrap_or(0) + 1;
///         handle.session().set("visits", visits)?;
///         Ok(Response::new(visits.to_string().into()))
///     }
/// }
///
/// # tokio_test();
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn tokio_test() {
/// let middleware = SessionMiddleware::default();
/// let request = hyper::Request::builder().uri("/").body(Bytes::new()).unwrap();
/// let response = middleware.process(request, Arc::new(Counter)).await.unwrap();
///
/// assert_eq!(response.body().as_ref(), b"1");
/// assert!(response.headers().contains_key("set-cookie"));
/// # }
/// ```
pub struct SessionMiddleware {
	config: SessionConfig,
	store: Arc<SessionStore>,
}

impl SessionMiddleware {
	/// Create a middleware with its own store
	pub fn new(config: SessionConfig) -> Self {
		Self::from_arc(config, Arc::new(SessionStore::new()))
	}

	/// Create a middleware sharing an existing store
	pub fn from_arc(config: SessionConfig, store: Arc<SessionStore>) -> Self {
		Self { config, store }
	}

	/// Session store
	pub fn store(&self) -> &SessionStore {
		&self.store
	}

	/// Cookie configuration
	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	fn session_id(&self, request: &Request) -> Option<String> {
		let cookies = request.headers().get(COOKIE)?.to_str().ok()?;
		cookies.split(';').find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == self.config.cookie_name).then(|| value.to_string())
		})
	}
}

impl Default for SessionMiddleware {
	fn default() -> Self {
		Self::new(SessionConfig::default())
	}
}

#[async_trait]
impl Middleware for SessionMiddleware {
	async fn process(&self, mut request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let session = self
			.session_id(&request)
			.and_then(|id| self.store.get(&id))
			.unwrap_or_default();
		self.store.save(session.clone(), self.config.ttl);

		request
			.extensions_mut()
			.insert(SessionHandle::new(session.clone()));

		let mut response = next.handle(request).await?;

		let cookie = self.config.cookie_header(session.id());
		response.headers_mut().insert(
			SET_COOKIE,
			HeaderValue::from_str(&cookie).map_err(|e| {
				FlashError::InvalidHeader(format!("Failed to create cookie header: {}", e))
			})?,
		);

		Ok(response)
	}
}
