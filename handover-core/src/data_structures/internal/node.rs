use std::sync::Arc;

use lock_api::{Mutex, RawMutex};

/// Shared handle to a lockable node.
///
/// The chain itself holds exactly one of these per node (in the predecessor's `next`).
/// A walker holds a second one for as long as it owns, or waits on, that node's lock,
/// so a node unlinked by a remover is only freed once the last walker lets go of it.
pub(crate) type NodeRef<T, R> = Arc<Mutex<R, Node<T, R>>>;

/// Outgoing edge of the sentinel or of a node. `None` terminates the chain.
pub(crate) type Link<T, R> = Option<NodeRef<T, R>>;

/// One stored element.
///
/// Everything inside is guarded by the node's own mutex: `next` may only be read or
/// written under that lock, and `value` is only dereferenced through it during a walk.
/// The payload sits in its own `Arc` so a handle returned by a search outlives both the
/// lock and the node.
pub(crate) struct Node<T, R: RawMutex> {
    pub(crate) value: Arc<T>,
    pub(crate) next: Link<T, R>,
}

impl<T, R: RawMutex> Node<T, R> {
    /// Allocate a detached node. It is linked in by the caller under the sentinel lock.
    pub(crate) fn detached(value: T) -> NodeRef<T, R> {
        Arc::new(Mutex::new(Node {
            value: Arc::new(value),
            next: None,
        }))
    }
}
