use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

/// One-shot latch that opens once it has been signalled `count` times.
pub struct CountdownEvent {
    count: Mutex<usize>,
    condvar: Condvar,
    notified: AtomicBool,
}

impl CountdownEvent {
    // Create a new CountdownEvent with initial count.
    //
    pub fn new(count: usize) -> Self {
        CountdownEvent {
            count: Mutex::new(count),
            condvar: Condvar::new(),
            notified: AtomicBool::new(count == 0),
        }
    }

    // Decrement the count by one. Returns true only for the call that reaches zero.
    //
    pub fn signal(&self) -> bool {
        let mut count = self.count.lock();
        if *count == 0 {
            return false;
        }
        *count -= 1;
        if *count == 0 {
            self.notified.store(true, Ordering::Release);
            self.condvar.notify_all();
            true
        } else {
            false
        }
    }

    // Block until the count reaches zero.
    //
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.condvar.wait(&mut count);
        }
    }

    // Non-blocking check, for loops that run until the event opens.
    //
    pub fn is_set(&self) -> bool {
        self.notified.load(Ordering::Acquire)
    }
}
