//! Quadratic comparison sorts

use rand_chacha::ChaCha8Rng;

use crate::array::{ArrayAccess, ArrayResult};

/// Find the minimum of the unsorted tail and swap it into place
pub fn selection_sort(array: &mut dyn ArrayAccess, _rng: &mut ChaCha8Rng) -> ArrayResult<()> {
    let len = array.len();
    for i in 0..len.saturating_sub(1) {
        let mut min_index = i;
        let mut min_value = array.get(i)?;
        for j in i + 1..len {
            let value = array.get(j)?;
            if value < min_value {
                min_index = j;
                min_value = value;
            }
        }
        array.swap(min_index, i)?;
    }
    Ok(())
}

/// Bubble the largest remaining element to the end, stopping early once a pass is clean
pub fn bubble_sort(array: &mut dyn ArrayAccess, _rng: &mut ChaCha8Rng) -> ArrayResult<()> {
    let len = array.len();
    for end in (1..len).rev() {
        let mut swapped = false;
        for i in 0..end {
            swapped |= array.reorder(i, i + 1)?;
        }
        if !swapped {
            break;
        }
    }
    Ok(())
}

/// Sink each element leftwards until its neighbour is not larger
pub fn insertion_sort(array: &mut dyn ArrayAccess, _rng: &mut ChaCha8Rng) -> ArrayResult<()> {
    for i in 1..array.len() {
        let mut j = i;
        while j > 0 && array.reorder(j - 1, j)? {
            j -= 1;
        }
    }
    Ok(())
}
