//! Raw lock strategies for the per-node locks.
//!
//! Any [`lock_api::RawMutex`] can back a [`LockCoupledList`](crate::LockCoupledList):
//!
//! - [`DefaultRawMutex`] - `parking_lot`'s word-sized mutex, parks waiters
//! - [`RawSpinLock`] - test-and-test-and-set with exponential backoff

mod spin_lock;

pub use spin_lock::RawSpinLock;

/// Lock used by a list when no strategy is named.
pub type DefaultRawMutex = parking_lot::RawMutex;
