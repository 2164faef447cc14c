//! Data structures for concurrent collections.
//!
//! # Organization
//!
//! - [`coupled_list`] - Singly-linked list with hand-over-hand (lock coupling) traversal
//! - `internal` - Node, link and cursor types (pub(crate))

pub(crate) mod internal;

pub mod coupled_list;

pub use coupled_list::{LockCoupledList, SpinLockedList};
