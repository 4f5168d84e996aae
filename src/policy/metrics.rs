// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for policy authorization activity.
#[derive(Debug, Default)]
pub struct AuthMetrics {
	fetches: AtomicU64,
	challenges: AtomicU64,
	retries: AtomicU64,
}
impl AuthMetrics {
	/// Returns the number of credential fetches that completed successfully; failed
	/// attempts are not counted.
	pub fn fetches(&self) -> u64 {
		self.fetches.load(Ordering::Relaxed)
	}

	/// Returns the number of 401 responses that carried a `WWW-Authenticate` challenge.
	pub fn challenges(&self) -> u64 {
		self.challenges.load(Ordering::Relaxed)
	}

	/// Returns the number of requests resent after an accepted challenge.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	pub(crate) fn record_fetch(&self) {
		self.fetches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_challenge(&self) {
		self.challenges.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}
}
