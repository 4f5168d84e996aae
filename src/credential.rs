//! Credential source contract consumed by authorization policies.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthFlow, ScopeList},
};

pub use crate::error::CredentialError;

/// Boxed future returned by [`TokenCredential::fetch_token`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<AccessToken, CredentialError>> + 'a + Send>>;

/// Contract for sources capable of issuing bearer tokens.
///
/// The trait is the policy's only dependency on an identity stack. Implementations talk
/// to whatever provider they like (client-credentials exchanges, managed identity
/// endpoints, developer tooling); the policy only requires that a successful fetch yields
/// an [`AccessToken`] and that failures surface as [`CredentialError`]. Callers share
/// implementations behind `Arc<dyn TokenCredential>`.
pub trait TokenCredential: Send + Sync {
	/// Fetches a token for the ordered `scopes`, honoring the request `options`.
	///
	/// Invoked by the policy only while holding its refresh guard, so implementations
	/// never see concurrent fetches from the same policy instance.
	fn fetch_token<'a>(
		&'a self,
		scopes: &'a ScopeList,
		options: TokenRequestOptions,
	) -> CredentialFuture<'a>;
}

/// Options payload handed to the credential source alongside the scopes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequestOptions {
	/// Acceptable authentication mechanisms for this fetch; omitted when the caller
	/// expressed no preference.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auth_flows: Option<Vec<AuthFlow>>,
}
impl TokenRequestOptions {
	/// Builds an options payload carrying the provided flow descriptors.
	pub fn with_auth_flows(flows: impl IntoIterator<Item = AuthFlow>) -> Self {
		Self { auth_flows: Some(flows.into_iter().collect()) }
	}
}
