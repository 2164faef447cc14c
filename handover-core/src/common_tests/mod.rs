//! Reusable test bodies for [`LockCoupledList`](crate::LockCoupledList).
//!
//! Every test is generic over the per-node lock strategy so the integration
//! tests in `tests/` can run the same scenario under each one.

pub mod stress_config;
pub mod tracked_lock;

pub use stress_config::{ConfigError, StressConfig};
pub use tracked_lock::TrackedRawMutex;
