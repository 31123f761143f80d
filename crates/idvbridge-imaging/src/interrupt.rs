// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-thread interrupt flags.
//
// Every thread owns one `InterruptHandle`. Clones of it can be sent to other
// threads, which may call `interrupt()` to set the flag and wake whatever
// blocking wait the owning thread is parked in.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::Waker;

thread_local! {
    static CURRENT: InterruptHandle = InterruptHandle::new();
}

/// Shareable handle to a thread's interrupt flag.
#[derive(Clone, Default)]
pub struct InterruptHandle {
    inner: Arc<InterruptState>,
}

#[derive(Default)]
struct InterruptState {
    interrupted: AtomicBool,
    /// Wakes the wait the owning thread is currently blocked in, if any.
    waker: Mutex<Option<Waker>>,
}

impl InterruptHandle {
    /// A fresh, unattached handle. Mostly useful for tests; threads normally
    /// use [`InterruptHandle::current`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The calling thread's handle.
    pub fn current() -> Self {
        CURRENT.with(Clone::clone)
    }

    /// Set the flag and wake the owning thread if it is blocked.
    pub fn interrupt(&self) {
        self.inner.interrupted.store(true, Ordering::SeqCst);
        let waker = self
            .inner
            .waker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.inner.interrupted.load(Ordering::SeqCst)
    }

    /// Test and reset: returns whether the flag was set, clearing it.
    pub fn clear(&self) -> bool {
        self.inner.interrupted.swap(false, Ordering::SeqCst)
    }

    /// Install the waker for the wait about to begin. Returns a guard that
    /// removes it again.
    pub(crate) fn park_with(&self, waker: Waker) -> ParkGuard<'_> {
        *self
            .inner
            .waker
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(waker);
        ParkGuard { handle: self }
    }

    /// Whether two handles refer to the same flag.
    #[cfg(test)]
    pub(crate) fn same_as(&self, other: &InterruptHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for InterruptHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterruptHandle")
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}

pub(crate) struct ParkGuard<'a> {
    handle: &'a InterruptHandle,
}

impl Drop for ParkGuard<'_> {
    fn drop(&mut self) {
        self.handle
            .inner
            .waker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}
