//! Pipeline policies built around the bearer-token credential contract.

pub mod bearer;
pub mod hooks;

mod metrics;

pub use bearer::*;
pub use hooks::*;
pub use metrics::AuthMetrics;
