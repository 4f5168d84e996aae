// self
use crate::obs::{AuthOutcome, AuthStage};

/// Records a stage outcome via the global metrics recorder (when enabled).
pub fn record_auth_outcome(stage: AuthStage, outcome: AuthOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"bearer_policy_auth_total",
			"stage" => stage.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (stage, outcome);
	}
}
