//! Optional observability helpers for authorization stages.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `bearer_policy.auth` with the `stage`
//!   (pipeline phase) and `op` (call site) fields.
//! - Enable `metrics` to increment the `bearer_policy_auth_total` counter for every
//!   attempt/success/failure, labeled by `stage` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Authorization stages observed by the policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthStage {
	/// Full request dispatch through the policy.
	Request,
	/// Token acquisition from the credential source.
	Authorize,
	/// 401 challenge handling and the optional resend.
	Challenge,
}
impl AuthStage {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthStage::Request => "request",
			AuthStage::Authorize => "authorize",
			AuthStage::Challenge => "challenge",
		}
	}
}
impl Display for AuthStage {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthOutcome {
	/// Entry to a policy stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller (for challenges: declined).
	Failure,
}
impl AuthOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthOutcome::Attempt => "attempt",
			AuthOutcome::Success => "success",
			AuthOutcome::Failure => "failure",
		}
	}
}
impl Display for AuthOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
