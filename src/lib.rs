//! Drop-in bearer-token authorization for async HTTP pipelines: cached access tokens,
//! single-flight refresh, and challenge-aware retry in one policy.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod credential;
pub mod error;
pub mod http;
pub mod obs;
pub mod pipeline;
pub mod policy;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience doubles and fixtures for policy tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use http::{StatusCode, header::AUTHORIZATION};
	use parking_lot::Mutex;
	// self
	use crate::{
		auth::{AccessToken, ScopeList},
		credential::{CredentialError, CredentialFuture, TokenCredential, TokenRequestOptions},
		pipeline::{HttpResponse, PipelineRequest, PipelineStage, StageFuture},
	};

	/// Builds an access token fixture whose expiry sits `expires_in` away from now.
	pub fn token_expiring_in(value: &str, expires_in: Duration) -> AccessToken {
		AccessToken::new(value, OffsetDateTime::now_utc() + expires_in)
	}

	/// Builds a `401 Unauthorized` response fixture, optionally carrying a
	/// `WWW-Authenticate` challenge.
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

	/// Arguments captured from a single [`TokenCredential::fetch_token`] call.
	#[derive(Clone, Debug)]
	pub struct RecordedFetch {
		/// Scopes the policy requested.
		pub scopes: ScopeList,
		/// Options payload the policy supplied.
		pub options: TokenRequestOptions,
	}

	/// Credential double that serves queued tokens and records every fetch.
	///
	/// Fetching from an empty queue fails with [`CredentialError::Unavailable`] so tests
	/// surface unexpected extra fetches instead of silently reusing fixtures.
	#[derive(Debug, Default)]
	pub struct RecordingCredential {
		queue: Mutex<VecDeque<AccessToken>>,
		fetches: Mutex<Vec<RecordedFetch>>,
	}
	impl RecordingCredential {
		/// Creates a credential double seeded with a single token.
		pub fn issuing(token: AccessToken) -> Self {
			let credential = Self::default();

			credential.push_token(token);

			credential
		}

		/// Queues another token to serve on the next fetch.
		pub fn push_token(&self, token: AccessToken) {
			self.queue.lock().push_back(token);
		}

		/// Number of fetches performed so far.
		pub fn fetch_count(&self) -> usize {
			self.fetches.lock().len()
		}

		/// Snapshot of every recorded fetch in call order.
		pub fn recorded_fetches(&self) -> Vec<RecordedFetch> {
			self.fetches.lock().clone()
		}
	}
	impl TokenCredential for RecordingCredential {
		fn fetch_token<'a>(
			&'a self,
			scopes: &'a ScopeList,
			options: TokenRequestOptions,
		) -> CredentialFuture<'a> {
			Box::pin(async move {
				self.fetches.lock().push(RecordedFetch { scopes: scopes.clone(), options });

				self.queue.lock().pop_front().ok_or_else(|| CredentialError::Unavailable {
					reason: "RecordingCredential has no queued tokens left".into(),
				})
			})
		}
	}

	/// Pipeline stage double that replays scripted responses and records each send.
	///
	/// When the script runs out it answers `200 OK` with an empty body.
	#[derive(Debug, Default)]
	pub struct ScriptedStage {
		responses: Mutex<VecDeque<HttpResponse>>,
		authorizations: Mutex<Vec<Option<String>>>,
	}
	impl ScriptedStage {
		/// Queues a response to replay on the next send.
		pub fn respond_with(&self, response: HttpResponse) {
			self.responses.lock().push_back(response);
		}

		/// Number of sends observed so far.
		pub fn send_count(&self) -> usize {
			self.authorizations.lock().len()
		}

		/// `Authorization` header values observed per send (`None` when absent).
		pub fn authorization_history(&self) -> Vec<Option<String>> {
			self.authorizations.lock().clone()
		}
	}
	impl PipelineStage for ScriptedStage {
		fn send<'a>(&'a self, request: &'a mut PipelineRequest) -> StageFuture<'a> {
			Box::pin(async move {
				let authorization = request
					.http
					.headers()
					.get(AUTHORIZATION)
					.and_then(|value| value.to_str().ok())
					.map(str::to_owned);

				self.authorizations.lock().push(authorization);

				Ok(self
					.responses
					.lock()
					.pop_front()
					.unwrap_or_else(|| HttpResponse::new(Vec::new())))
			})
		}
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use {httpmock as _, tokio as _};
