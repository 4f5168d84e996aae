//! Bearer-token authorization policy with cached single-flight refresh and
//! challenge-aware retry.
//!
//! [`BearerTokenPolicy`] sits in front of a pipeline's next stage and guarantees three
//! things: at most one in-flight credential fetch per policy instance, a proactive
//! refresh before a cached token can expire mid-request, and exactly one resend after an
//! accepted `401` + `WWW-Authenticate` challenge. A policy instance is the caching
//! point; share one per configured credential + scope pair for the lifetime of the
//! client.

// crates.io
use http::{
	StatusCode,
	header::{AUTHORIZATION, HeaderValue, WWW_AUTHENTICATE},
	uri::Scheme,
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthFlow, ScopeList},
	credential::{TokenCredential, TokenRequestOptions},
	obs::{self, AuthOutcome, AuthSpan, AuthStage},
	pipeline::{HttpRequest, HttpResponse, PipelineRequest, PipelineStage, StageFuture},
	policy::{AuthMetrics, DefaultHooks, PolicyHooks},
};

/// Pipeline stage that attaches `Authorization: Bearer <token>` headers.
///
/// The cached token is shared state: reads outside the refresh guard are hints only, and
/// the authoritative staleness re-check happens after the guard is acquired (the
/// double-check discipline). The guard itself is created eagerly at construction, so no
/// lazy-initialization race exists even on multi-threaded runtimes.
pub struct BearerTokenPolicy {
	credential: Arc<dyn TokenCredential>,
	next: Arc<dyn PipelineStage>,
	scopes: ScopeList,
	auth_flows: Option<Vec<AuthFlow>>,
	hooks: Arc<dyn PolicyHooks>,
	token: RwLock<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
	metrics: Arc<AuthMetrics>,
}
impl BearerTokenPolicy {
	/// Creates a policy authorizing for `scopes` in front of `next`.
	pub fn new(
		credential: Arc<dyn TokenCredential>,
		scopes: ScopeList,
		next: Arc<dyn PipelineStage>,
	) -> Self {
		Self {
			credential,
			next,
			scopes,
			auth_flows: None,
			hooks: Arc::new(DefaultHooks),
			token: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
			metrics: Default::default(),
		}
	}

	/// Sets the default auth flow hints used when a call supplies no override.
	pub fn with_auth_flows(mut self, flows: impl IntoIterator<Item = AuthFlow>) -> Self {
		self.auth_flows = Some(flows.into_iter().collect());

		self
	}

	/// Replaces the extension hooks (challenge handling, response/exception taps).
	pub fn with_hooks(mut self, hooks: Arc<dyn PolicyHooks>) -> Self {
		self.hooks = hooks;

		self
	}

	/// Scopes this policy authenticates for.
	pub fn scopes(&self) -> &ScopeList {
		&self.scopes
	}

	/// Shared counters describing this policy's authorization activity.
	pub fn metrics(&self) -> &AuthMetrics {
		&self.metrics
	}

	/// Clone of the currently cached token, if any.
	pub fn cached_token(&self) -> Option<AccessToken> {
		self.token.read().clone()
	}

	/// Decides whether the cached token is missing or stale right now.
	///
	/// True when no token is cached, when its `refresh_on` hint has passed, or when
	/// fewer than [`REFRESH_BUFFER`](crate::auth::REFRESH_BUFFER) seconds of validity
	/// remain.
	pub fn needs_refresh(&self) -> bool {
		self.cached_token_if_fresh(OffsetDateTime::now_utc()).is_none()
	}

	/// Authorizes `request`, fetching a token first if the cache is missing or stale.
	///
	/// An explicitly empty `flows` list is the caller's opt-out and turns the whole
	/// operation into a no-op. The HTTPS check runs before any token is read or fetched
	/// so a credential can never touch an insecure wire.
	pub async fn on_request(
		&self,
		request: &mut PipelineRequest,
		flows: Option<&[AuthFlow]>,
	) -> Result<()> {
		if matches!(flows, Some([])) {
			return Ok(());
		}

		enforce_secure_transport(request)?;

		let token = match self.cached_token_if_fresh(OffsetDateTime::now_utc()) {
			Some(token) => token,
			None => self.refresh_token(flows).await?,
		};

		apply_bearer(&mut request.http, &token)
	}

	/// Unconditionally fetches a fresh token for `scopes` and attaches it to `request`.
	///
	/// Bypasses the staleness check but still serializes with ordinary refreshes through
	/// the same guard. The fetched token replaces the cache, so subsequent requests reuse
	/// it. Intended for challenge handlers and other callers forcing re-authorization.
	pub async fn authorize_request(
		&self,
		request: &mut PipelineRequest,
		scopes: &ScopeList,
		options: TokenRequestOptions,
	) -> Result<()> {
		let span = AuthSpan::new(AuthStage::Authorize, "authorize_request");
		let token = span
			.instrument(async move {
				let _guard = self.refresh_guard.lock().await;

				self.fetch_and_cache(scopes, options).await
			})
			.await?;

		apply_bearer(&mut request.http, &token)
	}

	/// Fetches under the refresh guard, re-checking staleness once the guard is held.
	async fn refresh_token(&self, flows: Option<&[AuthFlow]>) -> Result<AccessToken> {
		let span = AuthSpan::new(AuthStage::Authorize, "refresh_token");

		span.instrument(async move {
			let _guard = self.refresh_guard.lock().await;

			// Another caller may have refreshed while we waited on the guard.
			if let Some(token) = self.cached_token_if_fresh(OffsetDateTime::now_utc()) {
				return Ok(token);
			}

			let options =
				TokenRequestOptions { auth_flows: flows.map(<[AuthFlow]>::to_vec) };

			self.fetch_and_cache(&self.scopes, options).await
		})
		.await
	}

	/// Performs the credential fetch and replaces the cache. Callers must hold the guard.
	async fn fetch_and_cache(
		&self,
		scopes: &ScopeList,
		options: TokenRequestOptions,
	) -> Result<AccessToken> {
		obs::record_auth_outcome(AuthStage::Authorize, AuthOutcome::Attempt);

		let token = match self.credential.fetch_token(scopes, options).await {
			Ok(token) => token,
			Err(err) => {
				obs::record_auth_outcome(AuthStage::Authorize, AuthOutcome::Failure);

				return Err(err.into());
			},
		};

		obs::record_auth_outcome(AuthStage::Authorize, AuthOutcome::Success);
		self.metrics.record_fetch();

		*self.token.write() = Some(token.clone());

		Ok(token)
	}

	fn cached_token_if_fresh(&self, now: OffsetDateTime) -> Option<AccessToken> {
		self.token.read().as_ref().filter(|token| !token.needs_refresh_at(now)).cloned()
	}

	fn invalidate_token(&self) {
		*self.token.write() = None;
	}

	async fn send_inner(&self, request: &mut PipelineRequest) -> Result<HttpResponse> {
		// The per-call override is consumed here so downstream policies never resolve it
		// a second time; absent an override the policy default applies.
		let flows = request.options.auth_flows.take().or_else(|| self.auth_flows.clone());

		self.on_request(request, flows.as_deref()).await?;

		let response = self.forward(request).await?;

		if response.status() != StatusCode::UNAUTHORIZED {
			return Ok(response);
		}

		// The server rejected the token outright; whatever is cached is known-bad even
		// if it has not expired yet.
		self.invalidate_token();

		if !response.headers().contains_key(WWW_AUTHENTICATE) {
			return Ok(response);
		}

		self.metrics.record_challenge();
		obs::record_auth_outcome(AuthStage::Challenge, AuthOutcome::Attempt);

		if self.hooks.on_challenge(self, request, &response).await? {
			obs::record_auth_outcome(AuthStage::Challenge, AuthOutcome::Success);
			self.metrics.record_retry();

			// Exactly one resend; a second 401 is returned as-is.
			return self.forward(request).await;
		}

		obs::record_auth_outcome(AuthStage::Challenge, AuthOutcome::Failure);

		Ok(response)
	}

	/// Forwards to the next stage, firing the response/exception hooks.
	async fn forward(&self, request: &mut PipelineRequest) -> Result<HttpResponse> {
		match self.next.send(request).await {
			Ok(response) => {
				self.hooks.on_response(request, &response).await;

				Ok(response)
			},
			Err(err) => {
				self.hooks.on_exception(request).await;

				Err(err)
			},
		}
	}
}
impl PipelineStage for BearerTokenPolicy {
	fn send<'a>(&'a self, request: &'a mut PipelineRequest) -> StageFuture<'a> {
		let span = AuthSpan::new(AuthStage::Request, "send");

		Box::pin(async move {
			obs::record_auth_outcome(AuthStage::Request, AuthOutcome::Attempt);

			let result = span.instrument(self.send_inner(request)).await;

			match &result {
				Ok(_) => obs::record_auth_outcome(AuthStage::Request, AuthOutcome::Success),
				Err(_) => obs::record_auth_outcome(AuthStage::Request, AuthOutcome::Failure),
			}

			result
		})
	}
}
impl Debug for BearerTokenPolicy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerTokenPolicy")
			.field("scopes", &self.scopes)
			.field("auth_flows", &self.auth_flows)
			.field("token_cached", &self.token.read().is_some())
			.finish()
	}
}

fn enforce_secure_transport(request: &PipelineRequest) -> Result<()> {
	if request.options.enforce_https == Some(false) {
		return Ok(());
	}
	if request.http.uri().scheme() == Some(&Scheme::HTTPS) {
		return Ok(());
	}

	Err(Error::InsecureTransport { uri: request.http.uri().to_string() })
}

fn apply_bearer(request: &mut HttpRequest, token: &AccessToken) -> Result<()> {
	let mut value = HeaderValue::from_str(&format!("Bearer {}", token.secret.expose()))?;

	value.set_sensitive(true);
	request.headers_mut().insert(AUTHORIZATION, value);

	Ok(())
}
