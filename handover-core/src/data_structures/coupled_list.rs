//! Concurrent singly-linked list with per-node locks.
//!
// =============================================================================
// LOCK COUPLING (HAND-OVER-HAND) PROTOCOL
// =============================================================================
//
// ┌──────┐    ┌──────┐    ┌──────┐    ┌──────┐
// │ HEAD │───►│  1   │───►│  2   │───►│  3   │───► None
// │(sent)│    │ lock │    │ lock │    │ lock │
// └──────┘    └──────┘    └──────┘    └──────┘
//
// Every walk starts by locking HEAD and then repeats:
//
//   1. lock   next            (two locks held: pred + next)
//   2. act on / unlink next
//   3. unlock pred            (one lock held: next)
//   4. pred = next
//
// INVARIANTS:
// 1. HEAD is never removed and never carries a value
// 2. A node's `next` is only read or written under that node's lock
// 3. Locks are always taken in list order, so waits cannot form a cycle
// 4. Insertion only happens between HEAD and its current successor
//
// =============================================================================
// REMOVE
// =============================================================================
//
// Before:  pred(locked) ──► curr(locked) ──► next
//
// Unlink:  pred.next = curr.next.take()
//          pred(locked) ─────────────────► next
//                        curr(locked) ──► None
//
// Then curr's lock is released and pred is kept: the node that just became
// pred's successor is examined next, so runs of matches go in one pass.
//
// A walker can only reach curr through pred's lock, so once the unlink is
// written nobody can start waiting on curr. The node's `Arc` is dropped after
// its guard, which unlocks before the allocation goes away.
//

use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use lock_api::{Mutex, RawMutex};
use tracing::{debug, trace};

use crate::data_structures::internal::{Cursor, Link, Node};
use crate::sync::{DefaultRawMutex, RawSpinLock};

/// A [`LockCoupledList`] whose node locks spin instead of parking.
pub type SpinLockedList<T> = LockCoupledList<T, RawSpinLock>;

/// Thread-safe singly-linked list using hand-over-hand locking.
///
/// Each node owns its own lock and a walker never holds more than two adjacent
/// locks at once, so operations working on different parts of the list run in
/// parallel. Elements are only ever inserted at the front.
///
/// `R` selects the per-node lock. The default parks blocked threads
/// ([`parking_lot::RawMutex`]); [`RawSpinLock`] spins.
///
/// # Example
///
/// ```rust
/// use handover_core::LockCoupledList;
///
/// let list: LockCoupledList<i32> = LockCoupledList::new();
/// list.insert_front(3);
/// list.insert_front(2);
/// list.insert_front(1);
/// assert_eq!(list.to_vec(), vec![1, 2, 3]);
///
/// list.remove_if(|x| *x == 2);
/// assert_eq!(list.to_vec(), vec![1, 3]);
///
/// assert_eq!(list.find_first(|x| *x == 3).as_deref(), Some(&3));
/// assert!(list.find_first(|x| *x == 99).is_none());
/// ```
pub struct LockCoupledList<T, R: RawMutex = DefaultRawMutex> {
    head: Mutex<R, Link<T, R>>,
}

impl<T, R: RawMutex> LockCoupledList<T, R> {
    /// Create an empty list.
    pub fn new() -> Self {
        LockCoupledList {
            head: Mutex::new(None),
        }
    }

    /// Insert `value` so it becomes the first element.
    ///
    /// Only the sentinel is locked; this never waits on a real node. Walks that
    /// already moved past the sentinel do not see the new element.
    pub fn insert_front(&self, value: T) {
        // Allocate outside the sentinel's critical section.
        let node = Node::detached(value);
        let mut head = self.head.lock();
        node.lock().next = head.take();
        *head = Some(node);
    }

    /// Call `visitor` on every element in list order.
    ///
    /// The visitor runs while the element's node is locked and its predecessor
    /// already released. Elements inserted at the front after the walk started
    /// are not visited.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&T),
    {
        self.walk(|value| -> ControlFlow<()> {
            visitor(&**value);
            ControlFlow::Continue(())
        });
    }

    /// Like [`for_each`](Self::for_each), but stops at the first error.
    ///
    /// All node locks are released before the error reaches the caller.
    pub fn try_for_each<E, F>(&self, mut visitor: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<(), E>,
    {
        match self.walk(|value| match visitor(&**value) {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => ControlFlow::Break(err),
        }) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Return a handle to the first element matching `predicate`.
    ///
    /// The handle is a snapshot: it stays readable after the node is removed,
    /// but it does not keep the element in the list.
    pub fn find_first<F>(&self, mut predicate: F) -> Option<Arc<T>>
    where
        F: FnMut(&T) -> bool,
    {
        self.walk(|value| {
            if predicate(&**value) {
                ControlFlow::Break(Arc::clone(value))
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Unlink every element matching `predicate` and return how many were removed.
    ///
    /// The predicate runs with both the predecessor and the candidate locked.
    /// After a removal the predecessor stays locked and its new successor is
    /// checked next, so consecutive matches are all removed in one pass.
    pub fn remove_if<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        let mut held = Cursor::Sentinel(self.head.lock());

        while let Some(mut node) = held.lock_next() {
            if predicate(&*node.value) {
                let unlinked = std::mem::replace(held.link_mut(), node.next.take());
                // Unlock before the last strong reference can free the node.
                drop(node);
                drop(unlinked);
                removed += 1;
            } else {
                held = Cursor::Node(node);
            }
        }

        if removed > 0 {
            trace!(removed, "remove_if unlinked nodes");
        }
        removed
    }

    /// Number of elements seen by one full walk.
    ///
    /// Under concurrent modification this is a snapshot, not a bound.
    pub fn len(&self) -> usize {
        let mut count = 0;
        self.for_each(|_| count += 1);
        count
    }

    /// Whether the sentinel currently has no successor.
    pub fn is_empty(&self) -> bool {
        self.head.lock().is_none()
    }

    /// Shared handles to every element, in list order.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        let mut handles = Vec::new();
        self.walk(|value| -> ControlFlow<()> {
            handles.push(Arc::clone(value));
            ControlFlow::Continue(())
        });
        handles
    }

    /// Clone every element into a `Vec`, in list order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::new();
        self.for_each(|value| values.push(value.clone()));
        values
    }

    /// The shared hand-over-hand walk behind every read-only operation.
    ///
    /// `step` sees each payload with only that node locked. Returns the value
    /// of the first `Break`, or `None` once the end of the chain is reached.
    fn walk<B, F>(&self, mut step: F) -> Option<B>
    where
        F: FnMut(&Arc<T>) -> ControlFlow<B>,
    {
        let mut held = Cursor::Sentinel(self.head.lock());

        while let Some(node) = held.lock_next() {
            // Successor is locked, the predecessor can go.
            drop(held);
            if let ControlFlow::Break(found) = step(&node.value) {
                return Some(found);
            }
            held = Cursor::Node(node);
        }

        None
    }
}

impl<T, R: RawMutex> Default for LockCoupledList<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: RawMutex> Drop for LockCoupledList<T, R> {
    fn drop(&mut self) {
        // Unlinking one node at a time keeps a long chain from dropping recursively.
        let released = self.remove_if(|_| true);
        if released > 0 {
            debug!(released, "lock-coupled list torn down");
        }
    }
}

impl<T, R: RawMutex> Extend<T> for LockCoupledList<T, R> {
    /// Inserts each item at the front, so a later walk yields them in reverse.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert_front(value);
        }
    }
}

impl<T, R: RawMutex> FromIterator<T> for LockCoupledList<T, R> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T: fmt::Debug, R: RawMutex> fmt::Debug for LockCoupledList<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format from handles so no node stays locked while the formatter runs.
        let values = self.snapshot();
        f.debug_list()
            .entries(values.iter().map(|value| &**value))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_empty_list() {
        let list: LockCoupledList<i32> = LockCoupledList::new();
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.find_first(|_| true).is_none());
        assert_eq!(list.remove_if(|_| true), 0);
        assert!(list.to_vec().is_empty());
    }

    #[test]
    fn test_insert_front_reverses_order() {
        let list: LockCoupledList<i32> = LockCoupledList::new();
        for i in 1..=5 {
            list.insert_front(i);
        }
        assert_eq!(list.to_vec(), vec![5, 4, 3, 2, 1]);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_remove_consecutive_matches_in_one_pass() {
        let list: LockCoupledList<i32> = [1, 2, 2, 2, 3, 2].into_iter().collect();
        // Walk order is the reverse of the iteration order.
        assert_eq!(list.to_vec(), vec![2, 3, 2, 2, 2, 1]);

        assert_eq!(list.remove_if(|x| *x == 2), 4);
        assert_eq!(list.to_vec(), vec![3, 1]);
    }

    #[test]
    fn test_remove_head_and_tail() {
        let list: LockCoupledList<i32> = LockCoupledList::new();
        list.insert_front(3);
        list.insert_front(2);
        list.insert_front(1);

        assert_eq!(list.remove_if(|x| *x == 1 || *x == 3), 2);
        assert_eq!(list.to_vec(), vec![2]);

        list.insert_front(0);
        assert_eq!(list.to_vec(), vec![0, 2]);
    }

    #[test]
    fn test_try_for_each_stops_at_error() {
        let list: LockCoupledList<i32> = LockCoupledList::new();
        for i in (1..=5).rev() {
            list.insert_front(i);
        }

        let mut seen = Vec::new();
        let result = list.try_for_each(|x| {
            if *x == 3 {
                return Err(format!("stopped at {}", x));
            }
            seen.push(*x);
            Ok(())
        });

        assert_eq!(result, Err("stopped at 3".to_string()));
        assert_eq!(seen, vec![1, 2]);

        // Locks were released on the early exit.
        list.insert_front(0);
        assert_eq!(list.len(), 6);
    }

    #[test]
    fn test_find_first_returns_nearest_front() {
        let list: LockCoupledList<(u32, &str)> = LockCoupledList::new();
        list.insert_front((1, "back"));
        list.insert_front((1, "front"));

        let found = list.find_first(|(k, _)| *k == 1).unwrap();
        assert_eq!(found.1, "front");
    }

    #[test]
    fn test_debug_lists_values_in_order() {
        let list: LockCoupledList<i32> = LockCoupledList::new();
        list.insert_front(2);
        list.insert_front(1);
        assert_eq!(format!("{:?}", list), "[1, 2]");
    }

    #[test]
    fn test_long_chain_drop_does_not_recurse() {
        let list: LockCoupledList<u32> = LockCoupledList::new();
        for i in 0..200_000 {
            list.insert_front(i);
        }
        drop(list);
    }

    #[test]
    fn test_drop_releases_payloads() {
        struct Counted(Arc<AtomicUsize>);
        impl Drop for Counted {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let dropped = Arc::new(AtomicUsize::new(0));
        let list: LockCoupledList<Counted> = LockCoupledList::new();
        for _ in 0..10 {
            list.insert_front(Counted(Arc::clone(&dropped)));
        }
        assert_eq!(list.remove_if(|_| false), 0);
        assert_eq!(dropped.load(Ordering::SeqCst), 0);

        drop(list);
        assert_eq!(dropped.load(Ordering::SeqCst), 10);
    }
}
