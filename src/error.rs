//! Policy-level error types shared across authorization, transport, and hooks.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical policy error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Request targets a non-HTTPS endpoint; raised before any token is attached.
	#[error("Refusing to attach credentials to an insecure (non-HTTPS) target: {uri}.")]
	InsecureTransport {
		/// Full target URI of the offending request.
		uri: String,
	},
	/// Credential source failed to issue a token.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// Token value cannot be encoded as an `Authorization` header.
	#[error("Access token is not a valid Authorization header value.")]
	BearerValue(#[from] http::header::InvalidHeaderValue),
	/// Transport failure (DNS, TCP, TLS) raised by a terminal pipeline stage.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Failures reported by [`TokenCredential`](crate::credential::TokenCredential) sources.
///
/// The policy never wraps or retries these; they propagate to the caller unmodified and
/// leave the cached token untouched.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// Credential source cannot currently issue tokens (misconfiguration, missing
	/// secrets, revoked consent).
	#[error("Credential source is unavailable: {reason}.")]
	Unavailable {
		/// Source-supplied reason string.
		reason: String,
	},
	/// Token issuance was attempted but the provider rejected or aborted it.
	#[error("Credential source failed to issue a token: {message}.")]
	RequestFailed {
		/// Source- or provider-supplied message summarizing the failure.
		message: String,
		/// HTTP status code from the provider, when available.
		status: Option<u16>,
		/// Underlying provider or transport failure, when available.
		#[source]
		source: Option<BoxError>,
	},
}
impl CredentialError {
	/// Builds a [`CredentialError::RequestFailed`] wrapping a provider failure.
	pub fn request_failed(
		message: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::RequestFailed { message: message.into(), status: None, source: Some(Box::new(src)) }
	}
}

/// Transport-level failures (network, IO) raised by terminal pipeline stages.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while sending the request.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;

	#[test]
	fn credential_error_converts_with_source() {
		let inner = std::io::Error::other("connection reset");
		let credential_error = CredentialError::request_failed("provider aborted", inner);
		let policy_error: Error = credential_error.into();

		assert!(matches!(policy_error, Error::Credential(_)));
		assert!(policy_error.to_string().contains("provider aborted"));

		let source = StdError::source(&policy_error)
			.expect("Policy error should expose the credential failure as its source.");

		assert!(source.source().is_some());
	}

	#[test]
	fn insecure_transport_names_the_target() {
		let error = Error::InsecureTransport { uri: "http://api.example.com/items".into() };

		assert!(error.to_string().contains("http://api.example.com/items"));
	}
}
