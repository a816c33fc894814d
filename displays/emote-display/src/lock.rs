//! Shared display lock
//!
//! Every piece of code that draws on the panel goes through one
//! [`DisplayLock`]. Access is closure-scoped, so the lock is released on
//! every exit path of the closure.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Exclusive access to a display toolkit
///
/// `M` picks the mutex flavour: `CriticalSectionRawMutex` when several
/// execution contexts draw, `NoopRawMutex` inside a single executor.
/// Calls must not nest; locking again from inside [`lock`](Self::lock)
/// panics.
pub struct DisplayLock<M: RawMutex, T> {
    inner: Mutex<M, RefCell<T>>,
}

impl<M: RawMutex, T> DisplayLock<M, T> {
    pub const fn new(toolkit: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(toolkit)),
        }
    }

    /// Run `f` with exclusive access to the toolkit
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Consume the lock and return the toolkit
    pub fn into_inner(self) -> T {
        self.inner.into_inner().into_inner()
    }
}
