//! Terminal transport stages for executing pipeline requests.
//!
//! The policy only consumes the [`PipelineStage`](crate::pipeline::PipelineStage)
//! contract, so any HTTP stack can terminate a pipeline. This module ships the default
//! reqwest-backed stage behind the `reqwest` feature.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{Body, Client as ReqwestClient, Request as ReqwestRequest, Url};
// self
#[cfg(feature = "reqwest")]
use crate::{
	error::TransportError,
	pipeline::{HttpResponse, PipelineRequest, PipelineStage, StageFuture},
};

/// Thin wrapper around [`ReqwestClient`] acting as a terminal pipeline stage.
///
/// Requests are rebuilt from the pipeline's parts on every send, so an upstream policy
/// can resend the same [`PipelineRequest`] after re-authorizing; the body is cloned per
/// attempt. Configure redirect handling on the client itself before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl PipelineStage for ReqwestTransport {
	fn send<'a>(&'a self, request: &'a mut PipelineRequest) -> StageFuture<'a> {
		Box::pin(async move {
			let url = Url::parse(&request.http.uri().to_string())
				.map_err(TransportError::network)?;
			let mut outbound = ReqwestRequest::new(request.http.method().clone(), url);

			*outbound.headers_mut() = request.http.headers().clone();
			*outbound.body_mut() = Some(Body::from(request.http.body().clone()));

			let response = self.0.execute(outbound).await.map_err(TransportError::from)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut inbound = HttpResponse::new(
				response.bytes().await.map_err(TransportError::from)?.to_vec(),
			);

			*inbound.status_mut() = status;
			*inbound.headers_mut() = headers;

			Ok(inbound)
		})
	}
}
