//! Extension points invoked by [`BearerTokenPolicy`] around forwarding and challenges.

// self
use crate::{
	_prelude::*,
	pipeline::{HttpResponse, PipelineRequest},
	policy::BearerTokenPolicy,
};

/// Boxed future returned by hook methods so overrides may themselves suspend.
pub type HookFuture<'a, T = ()> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Capability interface for policy extension points.
///
/// Every method has a default implementation with no effect, so implementors override
/// only the seams they care about. Hooks are awaited, never fired-and-forgotten; an
/// override that performs I/O (audit logging, scheme-specific re-authorization) delays
/// the pipeline exactly as long as it runs.
pub trait PolicyHooks: Send + Sync {
	/// Decides whether a `401` + `WWW-Authenticate` response should be answered with a
	/// re-authorized resend.
	///
	/// The default declines every challenge. Scheme-specific implementations parse the
	/// header (see [`Challenge`](crate::auth::Challenge)), re-authorize through
	/// [`BearerTokenPolicy::authorize_request`], and return `Ok(true)` once the request
	/// carries a usable token again. Errors propagate to the caller in place of the 401.
	fn on_challenge<'a>(
		&'a self,
		policy: &'a BearerTokenPolicy,
		request: &'a mut PipelineRequest,
		response: &'a HttpResponse,
	) -> HookFuture<'a, Result<bool>> {
		let _ = (policy, request, response);

		Box::pin(async { Ok(false) })
	}

	/// Invoked for every response received from the next stage, including resends.
	fn on_response<'a>(
		&'a self,
		request: &'a PipelineRequest,
		response: &'a HttpResponse,
	) -> HookFuture<'a> {
		let _ = (request, response);

		Box::pin(async {})
	}

	/// Invoked when forwarding to the next stage fails, before the error is re-raised.
	fn on_exception<'a>(&'a self, request: &'a PipelineRequest) -> HookFuture<'a> {
		let _ = request;

		Box::pin(async {})
	}
}

/// Hooks implementation that keeps every extension point at its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHooks;
impl PolicyHooks for DefaultHooks {}
