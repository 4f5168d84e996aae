//! Immutable access token model with its staleness rules.

// self
use crate::_prelude::*;

/// Minimum remaining validity before a token is considered stale.
///
/// A token must not expire while its request is still in flight, so anything inside this
/// window triggers a proactive refresh even though the token is technically valid.
pub const REFRESH_BUFFER: Duration = Duration::seconds(300);

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Immutable bearer token issued by a credential source.
///
/// Tokens are replaced wholesale on refresh, never mutated in place; a policy caching one
/// hands out clones so in-flight requests keep the exact token they were authorized with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
	/// Opaque bearer secret presented via the `Authorization` header.
	pub secret: TokenSecret,
	/// Absolute instant after which the token is no longer accepted.
	pub expires_on: OffsetDateTime,
	/// Source-recommended early-refresh instant; may precede `expires_on` (e.g., for
	/// tokens valid across multiple credential types).
	pub refresh_on: Option<OffsetDateTime>,
}
impl AccessToken {
	/// Creates a token valid until `expires_on`.
	pub fn new(secret: impl Into<String>, expires_on: OffsetDateTime) -> Self {
		Self { secret: TokenSecret::new(secret), expires_on, refresh_on: None }
	}

	/// Attaches a source-recommended early-refresh instant.
	pub fn with_refresh_on(mut self, instant: OffsetDateTime) -> Self {
		self.refresh_on = Some(instant);

		self
	}

	/// Decides whether the token should be refreshed at the provided instant.
	///
	/// True when a `refresh_on` hint has passed, or when fewer than [`REFRESH_BUFFER`]
	/// seconds of validity remain.
	pub fn needs_refresh_at(&self, now: OffsetDateTime) -> bool {
		if self.refresh_on.is_some_and(|instant| instant <= now) {
			return true;
		}

		self.expires_on - now < REFRESH_BUFFER
	}

	/// Convenience helper evaluating [`Self::needs_refresh_at`] against the current clock.
	pub fn needs_refresh(&self) -> bool {
		self.needs_refresh_at(OffsetDateTime::now_utc())
	}
}
