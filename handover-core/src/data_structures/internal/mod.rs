//! Internal implementation details for the lock-coupled list.
//!
//! Nothing here is reachable from outside the crate. The public surface lives in
//! [`crate::data_structures::coupled_list`].

mod cursor;
mod node;

pub(crate) use cursor::Cursor;
pub(crate) use node::{Link, Node};
