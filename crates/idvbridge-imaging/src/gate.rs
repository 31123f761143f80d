// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-shot gate: a write-once slot that blocks readers until it is filled.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::task::{Wake, Waker};

use crate::interrupt::InterruptHandle;

/// The wait ended because the waiting thread was interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

/// Write-once slot paired with a condition variable.
///
/// The mutex that guards the slot also orders the publish before the
/// waiter's read, so a woken waiter always sees a fully written value.
pub struct OneShot<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
}

enum Slot<T> {
    Pending,
    Ready(T),
    Taken,
}

impl<T> OneShot<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Pending),
            ready: Condvar::new(),
        }
    }

    /// Fill the slot and open the gate. Only the first publish takes effect;
    /// returns `false` for every later one.
    pub fn publish(&self, value: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if !matches!(*slot, Slot::Pending) {
            return false;
        }
        *slot = Slot::Ready(value);
        self.ready.notify_all();
        true
    }

    #[cfg(test)]
    pub(crate) fn is_open(&self) -> bool {
        !matches!(
            *self.slot.lock().unwrap_or_else(PoisonError::into_inner),
            Slot::Pending
        )
    }
}

impl<T: Send + 'static> OneShot<T> {
    /// Block until the slot is filled or `interrupt` fires.
    ///
    /// The value can be taken exactly once; a second successful `wait`
    /// would block forever, so callers own the gate for a single read.
    /// An interrupt already pending on entry returns immediately. Returning
    /// `Interrupted` consumes the flag; callers decide whether to re-assert it.
    pub fn wait(self: &Arc<Self>, interrupt: &InterruptHandle) -> Result<T, Interrupted> {
        let _parked = interrupt.park_with(Waker::from(Arc::clone(self)));
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            match std::mem::replace(&mut *slot, Slot::Taken) {
                Slot::Ready(value) => return Ok(value),
                other => *slot = other,
            }
            if interrupt.clear() {
                return Err(Interrupted);
            }
            slot = self
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Wake for OneShot<T> {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        // Taking the lock pairs with the waiter's check-then-wait, so a wake
        // cannot slip in between the two.
        let _slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        self.ready.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn publish_is_write_once() {
        let gate = Arc::new(OneShot::new());
        assert!(gate.publish(1));
        assert!(!gate.publish(2));
        assert_eq!(gate.wait(&InterruptHandle::new()), Ok(1));
    }

    #[test]
    fn wait_blocks_until_publish_from_other_thread() {
        let gate = Arc::new(OneShot::new());
        let writer = Arc::clone(&gate);
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            writer.publish("ready")
        });
        assert_eq!(gate.wait(&InterruptHandle::new()), Ok("ready"));
        assert!(handle.join().unwrap());
    }

    #[test]
    fn interrupt_wakes_waiter() {
        let gate: Arc<OneShot<u8>> = Arc::new(OneShot::new());
        let interrupt = InterruptHandle::new();
        let remote = interrupt.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.interrupt();
        });
        assert_eq!(gate.wait(&interrupt), Err(Interrupted));
        assert!(!interrupt.is_interrupted());
        assert!(!gate.is_open());
    }

    #[test]
    fn pending_interrupt_returns_immediately() {
        let gate: Arc<OneShot<u8>> = Arc::new(OneShot::new());
        let interrupt = InterruptHandle::new();
        interrupt.interrupt();
        assert_eq!(gate.wait(&interrupt), Err(Interrupted));
    }

    #[test]
    fn ready_value_wins_over_pending_interrupt() {
        let gate = Arc::new(OneShot::new());
        gate.publish(7u8);
        let interrupt = InterruptHandle::new();
        interrupt.interrupt();
        assert_eq!(gate.wait(&interrupt), Ok(7));
    }
}
