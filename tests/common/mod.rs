//! Shared doubles for policy integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::atomic::{AtomicUsize, Ordering},
};
// crates.io
use http::{StatusCode, header::AUTHORIZATION};
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
// self
use bearer_policy::{
	auth::{AccessToken, ScopeList},
	credential::{CredentialError, CredentialFuture, TokenCredential, TokenRequestOptions},
	error::{Result, TransportError},
	pipeline::{HttpResponse, PipelineRequest, PipelineStage, StageFuture},
	policy::{BearerTokenPolicy, HookFuture, PolicyHooks},
};

/// Access token fixture expiring `expires_in` from now.
pub fn token_expiring_in(value: &str, expires_in: Duration) -> AccessToken {
	AccessToken::new(value, OffsetDateTime::now_utc() + expires_in)
}

/// `401` fixture, optionally carrying a `WWW-Authenticate` challenge.
pub fn unauthorized_response(challenge: Option<&str>) -> HttpResponse {
	let mut response = HttpResponse::new(Vec::new());

	*response.status_mut() = StatusCode::UNAUTHORIZED;

	if let Some(challenge) = challenge {
		response.headers_mut().insert(
			http::header::WWW_AUTHENTICATE,
			challenge.parse().expect("Challenge fixture should be a valid header value."),
		);
	}

	response
}

/// Credential double serving queued tokens, optionally pausing inside each fetch so
/// concurrent callers pile up on the policy's refresh guard.
#[derive(Default)]
pub struct MockCredential {
	queue: Mutex<VecDeque<AccessToken>>,
	options_seen: Mutex<Vec<TokenRequestOptions>>,
	fetch_delay: Option<std::time::Duration>,
}
impl MockCredential {
	pub fn issuing(token: AccessToken) -> Self {
		let credential = Self::default();

		credential.push_token(token);

		credential
	}

	pub fn with_fetch_delay(mut self, delay: std::time::Duration) -> Self {
		self.fetch_delay = Some(delay);

		self
	}

	pub fn push_token(&self, token: AccessToken) {
		self.queue.lock().push_back(token);
	}

	pub fn fetch_count(&self) -> usize {
		self.options_seen.lock().len()
	}

	pub fn options_seen(&self) -> Vec<TokenRequestOptions> {
		self.options_seen.lock().clone()
	}
}
impl TokenCredential for MockCredential {
	fn fetch_token<'a>(
		&'a self,
		_scopes: &'a ScopeList,
		options: TokenRequestOptions,
	) -> CredentialFuture<'a> {
		Box::pin(async move {
			if let Some(delay) = self.fetch_delay {
				tokio::time::sleep(delay).await;
			}

			self.options_seen.lock().push(options);

			self.queue.lock().pop_front().ok_or_else(|| CredentialError::Unavailable {
				reason: "MockCredential has no queued tokens left".into(),
			})
		})
	}
}

/// One scripted reaction of [`MockStage`].
pub enum ScriptedReply {
	Respond(HttpResponse),
	Fail,
}

/// Pipeline stage double replaying a script and recording each send's `Authorization`
/// header. An exhausted script answers `200 OK`.
#[derive(Default)]
pub struct MockStage {
	script: Mutex<VecDeque<ScriptedReply>>,
	authorizations: Mutex<Vec<Option<String>>>,
}
impl MockStage {
	pub fn respond_with(&self, response: HttpResponse) {
		self.script.lock().push_back(ScriptedReply::Respond(response));
	}

	pub fn fail_next(&self) {
		self.script.lock().push_back(ScriptedReply::Fail);
	}

	pub fn send_count(&self) -> usize {
		self.authorizations.lock().len()
	}

	pub fn authorization_history(&self) -> Vec<Option<String>> {
		self.authorizations.lock().clone()
	}
}
impl PipelineStage for MockStage {
	fn send<'a>(&'a self, request: &'a mut PipelineRequest) -> StageFuture<'a> {
		Box::pin(async move {
			let authorization = request
				.http
				.headers()
				.get(AUTHORIZATION)
				.and_then(|value| value.to_str().ok())
				.map(str::to_owned);

			self.authorizations.lock().push(authorization);

			match self.script.lock().pop_front() {
				Some(ScriptedReply::Respond(response)) => Ok(response),
				Some(ScriptedReply::Fail) => Err(TransportError::network(std::io::Error::other(
					"scripted transport failure",
				))
				.into()),
				None => Ok(HttpResponse::new(Vec::new())),
			}
		})
	}
}

/// Hooks double counting invocations; optionally answers challenges by re-authorizing
/// through the policy with its configured scopes.
#[derive(Default)]
pub struct TestHooks {
	pub reauthorize: bool,
	responses: AtomicUsize,
	exceptions: AtomicUsize,
	challenges: AtomicUsize,
}
impl TestHooks {
	pub fn reauthorizing() -> Self {
		Self { reauthorize: true, ..Self::default() }
	}

	pub fn response_count(&self) -> usize {
		self.responses.load(Ordering::SeqCst)
	}

	pub fn exception_count(&self) -> usize {
		self.exceptions.load(Ordering::SeqCst)
	}

	pub fn challenge_count(&self) -> usize {
		self.challenges.load(Ordering::SeqCst)
	}
}
impl PolicyHooks for TestHooks {
	fn on_challenge<'a>(
		&'a self,
		policy: &'a BearerTokenPolicy,
		request: &'a mut PipelineRequest,
		_response: &'a HttpResponse,
	) -> HookFuture<'a, Result<bool>> {
		Box::pin(async move {
			self.challenges.fetch_add(1, Ordering::SeqCst);

			if !self.reauthorize {
				return Ok(false);
			}

			policy
				.authorize_request(request, policy.scopes(), TokenRequestOptions::default())
				.await?;

			Ok(true)
		})
	}

	fn on_response<'a>(
		&'a self,
		_request: &'a PipelineRequest,
		_response: &'a HttpResponse,
	) -> HookFuture<'a> {
		self.responses.fetch_add(1, Ordering::SeqCst);

		Box::pin(async {})
	}

	fn on_exception<'a>(&'a self, _request: &'a PipelineRequest) -> HookFuture<'a> {
		self.exceptions.fetch_add(1, Ordering::SeqCst);

		Box::pin(async {})
	}
}
