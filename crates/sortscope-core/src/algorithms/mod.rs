//! Sorting and shuffling strategies
//!
//! Strategies are plain functions over `dyn ArrayAccess`. They know nothing
//! about sounds, pacing or threads; everything observable happens in the
//! hooks of the array they are handed. Any failed access aborts the
//! strategy immediately.

mod shuffle;
mod sort;

use std::fmt;

use rand_chacha::ChaCha8Rng;

use crate::array::{ArrayAccess, ArrayResult};

pub use shuffle::{reverse_shuffle, standard_shuffle};
pub use sort::{bubble_sort, insertion_sort, selection_sort};

/// Strategy entry point; the RNG is seeded by the caller
pub type AlgorithmFn = fn(&mut dyn ArrayAccess, &mut ChaCha8Rng) -> ArrayResult<()>;

/// A named strategy
#[derive(Clone, Copy)]
pub struct Algorithm {
    pub name: &'static str,
    pub run: AlgorithmFn,
}

impl Algorithm {
    pub const fn new(name: &'static str, run: AlgorithmFn) -> Self {
        Self { name, run }
    }

    /// Run the strategy against `array`
    pub fn apply(&self, array: &mut dyn ArrayAccess, rng: &mut ChaCha8Rng) -> ArrayResult<()> {
        (self.run)(array, rng)
    }
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm").field("name", &self.name).finish()
    }
}

pub const STANDARD_SHUFFLE: Algorithm = Algorithm::new("Standard Shuffle", standard_shuffle);
pub const REVERSE_SHUFFLE: Algorithm = Algorithm::new("Reverse", reverse_shuffle);

pub const SELECTION_SORT: Algorithm = Algorithm::new("Selection Sort", selection_sort);
pub const BUBBLE_SORT: Algorithm = Algorithm::new("Bubble Sort", bubble_sort);
pub const INSERTION_SORT: Algorithm = Algorithm::new("Insertion Sort", insertion_sort);

/// All shuffles, default first
pub const SHUFFLES: [Algorithm; 2] = [STANDARD_SHUFFLE, REVERSE_SHUFFLE];

/// All sorts, default first
pub const SORTS: [Algorithm; 3] = [SELECTION_SORT, BUBBLE_SORT, INSERTION_SORT];

/// Look up a shuffle by name (case-insensitive)
pub fn find_shuffle(name: &str) -> Option<Algorithm> {
    find(&SHUFFLES, name)
}

/// Look up a sort by name (case-insensitive)
pub fn find_sort(name: &str) -> Option<Algorithm> {
    find(&SORTS, name)
}

fn find(catalogue: &[Algorithm], name: &str) -> Option<Algorithm> {
    let name = name.trim();
    catalogue
        .iter()
        .find(|algorithm| algorithm.name.eq_ignore_ascii_case(name))
        .copied()
}
