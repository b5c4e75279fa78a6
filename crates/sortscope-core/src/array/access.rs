//! The capability set algorithms are written against
//!
//! Implementors provide indexed `get`/`set`; the composite operations are
//! built from those so every step stays observable through the hooks.

use super::error::ArrayResult;

/// Indexed read/write access plus the composite operations built on it
///
/// All composite operations stop at the first failing access. The state of
/// the indices involved is unspecified after a failure and callers are
/// expected to abandon the algorithm.
pub trait ArrayAccess {
    /// Number of elements
    fn len(&self) -> usize;

    /// Read the element at `index`
    fn get(&self, index: usize) -> ArrayResult<u32>;

    /// Write the element at `index`
    fn set(&mut self, index: usize, value: u32) -> ArrayResult<()>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exchange two elements in get-get-set-set order
    fn swap(&mut self, index1: usize, index2: usize) -> ArrayResult<()> {
        let value1 = self.get(index1)?;
        let value2 = self.get(index2)?;
        self.set(index1, value2)?;
        self.set(index2, value1)
    }

    /// Swap two elements if the one at the lower position holds the larger value
    ///
    /// Equal values are never swapped, which also makes `index1 == index2` a
    /// no-op. Returns whether a swap happened.
    fn reorder(&mut self, index1: usize, index2: usize) -> ArrayResult<bool> {
        let value1 = self.get(index1)?;
        let value2 = self.get(index2)?;
        let out_of_order =
            (index1 < index2 && value1 > value2) || (index1 > index2 && value1 < value2);
        if !out_of_order {
            return Ok(false);
        }
        self.set(index1, value2)?;
        self.set(index2, value1)?;
        Ok(true)
    }

    /// Reverse in place by swapping pairs from both ends inward
    ///
    /// A failure leaves the array partially reversed.
    fn reverse(&mut self) -> ArrayResult<()> {
        let len = self.len();
        for i in 0..len / 2 {
            self.swap(i, len - 1 - i)?;
        }
        Ok(())
    }
}
