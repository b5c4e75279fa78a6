//! Shuffling strategies

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::array::{ArrayAccess, ArrayResult};

/// Swap each position with a uniformly chosen position at or after it
pub fn standard_shuffle(array: &mut dyn ArrayAccess, rng: &mut ChaCha8Rng) -> ArrayResult<()> {
    let len = array.len();
    for i in 0..len.saturating_sub(1) {
        let j = rng.random_range(i..len);
        array.swap(i, j)?;
    }
    Ok(())
}

/// Worst case input for most sorts: reverse the array
pub fn reverse_shuffle(array: &mut dyn ArrayAccess, _rng: &mut ChaCha8Rng) -> ArrayResult<()> {
    array.reverse()
}
