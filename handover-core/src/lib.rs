pub mod common_tests;
pub mod data_structures;
pub mod preemptive_synchronization;
pub mod sync;

// Re-export the list and lock strategies for convenience
pub use data_structures::{LockCoupledList, SpinLockedList};
pub use sync::{DefaultRawMutex, RawSpinLock};
