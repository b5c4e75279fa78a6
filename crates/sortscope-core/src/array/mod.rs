//! Instrumented array - the container sorting algorithms run against
//!
//! Every successful `get`/`set` invokes the read/write hook attached to the
//! array before returning, which is how access sounds, highlight tracking
//! and pacing get driven without the algorithms knowing about any of it.
//!
//! # Threading
//!
//! The array does no internal locking. It is owned by the thread running the
//! algorithm; anything that wants to look at the contents from another thread
//! goes through a side channel fed by the hooks (see `show::AccessTracker`).
//!
//! ```ignore
//! use std::sync::Arc;
//! use sortscope_core::array::{AccessHooks, ArrayAccess, Fill, InstrumentedArray};
//!
//! let hooks = Arc::new(AccessHooks::new());
//! hooks.set_write_hook(|array, index| println!("wrote {}", array.as_slice()[index]));
//!
//! let mut array = InstrumentedArray::with_hooks(5, Fill::Identity, hooks);
//! array.swap(0, 4)?;
//! ```

mod access;
mod error;
mod hooks;

use std::fmt;
use std::sync::Arc;

pub use access::ArrayAccess;
pub use error::{ArrayError, ArrayResult};
pub use hooks::{AccessHook, AccessHooks, ResizeHook};

/// Initial contents of a newly created array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fill {
    /// Every element is zero
    #[default]
    Zero,
    /// Element `i` holds `i`
    Identity,
}

/// Growable array of unsigned magnitudes with hooked element access
pub struct InstrumentedArray {
    data: Vec<u32>,
    hooks: Arc<AccessHooks>,
}

impl InstrumentedArray {
    /// Create an array with its own (no-op) hook context
    pub fn new(len: usize, fill: Fill) -> Self {
        Self::with_hooks(len, fill, Arc::new(AccessHooks::new()))
    }

    /// Create an array attached to an existing hook context
    ///
    /// Initial contents are written directly; no hooks fire during creation.
    pub fn with_hooks(len: usize, fill: Fill, hooks: Arc<AccessHooks>) -> Self {
        let data = match fill {
            Fill::Zero => vec![0; len],
            Fill::Identity => (0..len).map(|i| i as u32).collect(),
        };
        Self { data, hooks }
    }

    /// The hook context this array reports to
    pub fn hooks(&self) -> &Arc<AccessHooks> {
        &self.hooks
    }

    /// Number of elements
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw view of the contents, bypassing the hooks
    ///
    /// Meant for hooks re-deriving context from `(array, index)` and for
    /// tests; algorithms must use `get` so their reads are observed.
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Read the element at `index`, then invoke the read hook
    pub fn get(&self, index: usize) -> ArrayResult<u32> {
        let value = *self.data.get(index).ok_or(ArrayError::IndexOutOfRange {
            index,
            len: self.data.len(),
        })?;
        self.hooks.on_read(self, index);
        Ok(value)
    }

    /// Write `value` at `index`, then invoke the write hook
    pub fn set(&mut self, index: usize, value: u32) -> ArrayResult<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(ArrayError::IndexOutOfRange { index, len })?;
        *slot = value;
        self.hooks.on_write(self, index);
        Ok(())
    }

    /// Append `value` through an instrumented write
    ///
    /// The length grows (and the resize hook fires) before the write happens,
    /// so the array is one element longer even if the write were to fail. It
    /// cannot fail in practice since the new last index is always in range.
    pub fn push(&mut self, value: u32) -> ArrayResult<()> {
        self.data.push(0);
        self.hooks.on_resize(self);
        let last = self.data.len() - 1;
        self.set(last, value)
    }

    /// Remove and return the last element, read through the hooks
    ///
    /// On an empty array nothing changes and `IndexOutOfRange` is returned.
    pub fn pop(&mut self) -> ArrayResult<u32> {
        let last = self
            .data
            .len()
            .checked_sub(1)
            .ok_or(ArrayError::IndexOutOfRange { index: 0, len: 0 })?;
        let value = self.get(last)?;
        self.data.pop();
        self.hooks.on_resize(self);
        Ok(value)
    }

    /// Deep copy through instrumented reads of `self`
    ///
    /// The copy gets its own no-op hook context. If any access fails the
    /// partial copy is dropped and the error returned.
    pub fn copy(&self) -> ArrayResult<Self> {
        let mut copy = Self::new(self.len(), Fill::Zero);
        for index in 0..self.len() {
            let value = self.get(index)?;
            copy.set(index, value)?;
        }
        Ok(copy)
    }

    /// Release the array
    pub fn destroy(self) {
        drop(self);
    }
}

impl ArrayAccess for InstrumentedArray {
    #[inline]
    fn len(&self) -> usize {
        InstrumentedArray::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> ArrayResult<u32> {
        InstrumentedArray::get(self, index)
    }

    #[inline]
    fn set(&mut self, index: usize, value: u32) -> ArrayResult<()> {
        InstrumentedArray::set(self, index, value)
    }
}

impl fmt::Debug for InstrumentedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedArray")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
