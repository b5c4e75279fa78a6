//! Access hook registration
//!
//! Each array carries a handle to an `AccessHooks` context holding one read
//! hook and one write hook, plus a resize hook fired when `push` or `pop`
//! changes the length. Registration overwrites the slot; hooks do not
//! stack. Several arrays may share one context, or each may own its own,
//! so independent instrumented arrays never interfere.
//!
//! Hooks are expected to be installed before the worker thread starts and
//! left alone while accesses are in flight. Swapping a hook mid-run is safe
//! memory-wise but which accesses observe the old hook is unspecified.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::InstrumentedArray;

/// Callback invoked after a successful access with the array and the index touched
pub type AccessHook = Arc<dyn Fn(&InstrumentedArray, usize) + Send + Sync>;

/// Callback invoked after the array's length changed
pub type ResizeHook = Arc<dyn Fn(&InstrumentedArray) + Send + Sync>;

fn noop_hook() -> AccessHook {
    Arc::new(|_: &InstrumentedArray, _: usize| {})
}

fn noop_resize_hook() -> ResizeHook {
    Arc::new(|_: &InstrumentedArray| {})
}

/// Single-slot read and write hooks shared by one or more arrays
pub struct AccessHooks {
    read: RwLock<AccessHook>,
    write: RwLock<AccessHook>,
    resize: RwLock<ResizeHook>,
}

impl AccessHooks {
    /// Create a hook context with no-op hooks in both slots
    pub fn new() -> Self {
        Self {
            read: RwLock::new(noop_hook()),
            write: RwLock::new(noop_hook()),
            resize: RwLock::new(noop_resize_hook()),
        }
    }

    /// Replace the hook invoked after every successful read
    pub fn set_read_hook<F>(&self, hook: F)
    where
        F: Fn(&InstrumentedArray, usize) + Send + Sync + 'static,
    {
        *self.read.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(hook);
    }

    /// Replace the hook invoked after every successful write
    pub fn set_write_hook<F>(&self, hook: F)
    where
        F: Fn(&InstrumentedArray, usize) + Send + Sync + 'static,
    {
        *self.write.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(hook);
    }

    /// Replace the hook invoked after `push` or `pop` changed the length
    ///
    /// Runs after the length change, so `array.len()` is already the new one.
    pub fn set_resize_hook<F>(&self, hook: F)
    where
        F: Fn(&InstrumentedArray) + Send + Sync + 'static,
    {
        *self.resize.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(hook);
    }

    /// Reset every slot to a no-op
    pub fn clear(&self) {
        *self.read.write().unwrap_or_else(PoisonError::into_inner) = noop_hook();
        *self.write.write().unwrap_or_else(PoisonError::into_inner) = noop_hook();
        *self.resize.write().unwrap_or_else(PoisonError::into_inner) = noop_resize_hook();
    }

    #[inline]
    pub(super) fn on_read(&self, array: &InstrumentedArray, index: usize) {
        // Clone out of the slot so the hook runs without the lock held
        let hook = Arc::clone(&self.read.read().unwrap_or_else(PoisonError::into_inner));
        hook(array, index);
    }

    #[inline]
    pub(super) fn on_write(&self, array: &InstrumentedArray, index: usize) {
        let hook = Arc::clone(&self.write.read().unwrap_or_else(PoisonError::into_inner));
        hook(array, index);
    }

    #[inline]
    pub(super) fn on_resize(&self, array: &InstrumentedArray) {
        let hook = Arc::clone(&self.resize.read().unwrap_or_else(PoisonError::into_inner));
        hook(array);
    }
}

impl Default for AccessHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AccessHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessHooks").finish_non_exhaustive()
    }
}
