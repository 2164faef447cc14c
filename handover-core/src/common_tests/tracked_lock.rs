//! Lock instrumentation for checking the hand-over-hand discipline.
//!
//! [`TrackedRawMutex`] behaves like [`parking_lot::RawMutex`] but keeps a
//! per-thread count of how many tracked locks the thread holds right now and
//! the most it has held at once. A list built on it can then assert, from
//! inside a visitor or predicate, exactly how many node locks are taken.

use std::cell::Cell;

use lock_api::{GuardNoSend, RawMutex};

thread_local! {
    static HELD: Cell<usize> = const { Cell::new(0) };
    static PEAK: Cell<usize> = const { Cell::new(0) };
}

/// `parking_lot::RawMutex` with per-thread hold accounting.
///
/// Guards are `!Send`: the count lives in the locking thread.
pub struct TrackedRawMutex {
    inner: parking_lot::RawMutex,
}

unsafe impl RawMutex for TrackedRawMutex {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = TrackedRawMutex {
        inner: <parking_lot::RawMutex as RawMutex>::INIT,
    };

    type GuardMarker = GuardNoSend;

    fn lock(&self) {
        self.inner.lock();
        on_acquire();
    }

    fn try_lock(&self) -> bool {
        let acquired = self.inner.try_lock();
        if acquired {
            on_acquire();
        }
        acquired
    }

    unsafe fn unlock(&self) {
        HELD.with(|held| held.set(held.get().saturating_sub(1)));
        unsafe { self.inner.unlock() };
    }

    fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}

fn on_acquire() {
    HELD.with(|held| {
        let now = held.get() + 1;
        held.set(now);
        PEAK.with(|peak| peak.set(peak.get().max(now)));
    });
}

/// Tracked locks the current thread holds right now.
pub fn held_locks() -> usize {
    HELD.with(Cell::get)
}

/// Most tracked locks the current thread has held at once since the last reset.
pub fn peak_locks() -> usize {
    PEAK.with(Cell::get)
}

/// Start a new high-water mark for the current thread.
pub fn reset_peak() {
    PEAK.with(|peak| peak.set(HELD.with(Cell::get)));
}
