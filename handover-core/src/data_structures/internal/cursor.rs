use lock_api::{ArcMutexGuard, MutexGuard, RawMutex};

use super::{Link, Node};

/// The lock a walker currently holds: either the sentinel's or a real node's.
///
/// Both variants expose the outgoing [`Link`] they guard. Replacing a cursor with a new
/// one constructs the successor's guard first and drops the old guard afterwards, which
/// is exactly the hand-over-hand order: acquire ahead, then release behind.
pub(crate) enum Cursor<'a, T, R: RawMutex> {
    Sentinel(MutexGuard<'a, R, Link<T, R>>),
    Node(ArcMutexGuard<R, Node<T, R>>),
}

impl<'a, T, R: RawMutex> Cursor<'a, T, R> {
    #[inline]
    fn link(&self) -> &Link<T, R> {
        match self {
            Cursor::Sentinel(head) => &**head,
            Cursor::Node(node) => &node.next,
        }
    }

    #[inline]
    pub(crate) fn link_mut(&mut self) -> &mut Link<T, R> {
        match self {
            Cursor::Sentinel(head) => &mut **head,
            Cursor::Node(node) => &mut node.next,
        }
    }

    /// Lock the successor while this cursor's lock is still held.
    ///
    /// Blocks until the successor's lock is available. Returns `None` at the end of the
    /// chain. The returned guard owns a reference to the node, so it stays valid after
    /// this cursor is dropped.
    #[inline]
    pub(crate) fn lock_next(&self) -> Option<ArcMutexGuard<R, Node<T, R>>> {
        self.link().as_ref().map(|next| next.lock_arc())
    }
}
