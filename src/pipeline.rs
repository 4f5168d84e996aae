//! Pipeline boundary types: requests with per-call options, stage contract, aliases.

// crates.io
use http::header::AUTHORIZATION;
// self
use crate::{_prelude::*, auth::AuthFlow};

/// HTTP request type flowing through the pipeline.
pub type HttpRequest = http::Request<Vec<u8>>;
/// HTTP response type flowing back through the pipeline.
pub type HttpResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`PipelineStage::send`].
pub type StageFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse>> + 'a + Send>>;

/// Contract implemented by every pipeline stage, policies and terminal transports alike.
///
/// Stages receive the request by mutable reference so upstream policies can resend the
/// same request (headers included) after re-authorizing; implementations must therefore
/// tolerate being invoked more than once per logical call.
pub trait PipelineStage: Send + Sync {
	/// Processes the request, eventually producing a response or failing.
	fn send<'a>(&'a self, request: &'a mut PipelineRequest) -> StageFuture<'a>;
}

/// Per-call options bag consumed by policies along the chain.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// Per-call override of the policy-configured auth flow hints.
	///
	/// `Some(vec![])` is an explicit opt-out: the request is sent without any
	/// `Authorization` header and no token fetch occurs.
	pub auth_flows: Option<Vec<AuthFlow>>,
	/// Set to `Some(false)` to allow credentials over plain HTTP for this call only
	/// (local emulators, test rigs). Defaults to enforcing HTTPS.
	pub enforce_https: Option<bool>,
}

/// An HTTP request traveling through the pipeline together with its per-call options.
#[derive(Debug)]
pub struct PipelineRequest {
	/// Underlying HTTP request; policies mutate its headers in place.
	pub http: HttpRequest,
	/// Options consumed by policies along the chain.
	pub options: RequestOptions,
}
impl PipelineRequest {
	/// Wraps an HTTP request with default options.
	pub fn new(http: HttpRequest) -> Self {
		Self { http, options: RequestOptions::default() }
	}

	/// Builds an empty-bodied GET request for the provided target.
	pub fn get(uri: &str) -> Result<Self, http::Error> {
		Ok(Self::new(http::Request::builder().uri(uri).body(Vec::new())?))
	}

	/// Overrides the auth flow hints for this call only.
	pub fn with_auth_flows(mut self, flows: impl IntoIterator<Item = AuthFlow>) -> Self {
		self.options.auth_flows = Some(flows.into_iter().collect());

		self
	}

	/// Opts this call out of authorization entirely; it is sent unauthenticated.
	pub fn unauthenticated(mut self) -> Self {
		self.options.auth_flows = Some(Vec::new());

		self
	}

	/// Controls the HTTPS requirement for this call only.
	pub fn with_enforce_https(mut self, enforce: bool) -> Self {
		self.options.enforce_https = Some(enforce);

		self
	}

	/// Returns the current `Authorization` header value, when readable as a string.
	pub fn authorization(&self) -> Option<&str> {
		self.http.headers().get(AUTHORIZATION).and_then(|value| value.to_str().ok())
	}
}
impl From<HttpRequest> for PipelineRequest {
	fn from(http: HttpRequest) -> Self {
		Self::new(http)
	}
}
