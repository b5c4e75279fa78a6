//! Access tracking side channel
//!
//! Written by the access hooks on the worker thread, read by whoever draws
//! or reports on the array. Readers only ever see this mirror, never the
//! array itself.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::array::InstrumentedArray;

/// Timestamp of a slot that has never been accessed
const NEVER: f32 = f32::NEG_INFINITY;

#[derive(Debug, Default)]
struct TrackerState {
    values: Vec<u32>,
    last_read: Vec<f32>,
    last_write: Vec<f32>,
}

impl TrackerState {
    /// Follow length changes of the tracked array
    fn sync_len(&mut self, array: &InstrumentedArray) {
        let len = array.len();
        if self.values.len() != len {
            self.values.clear();
            self.values.extend_from_slice(array.as_slice());
            self.last_read.resize(len, NEVER);
            self.last_write.resize(len, NEVER);
        }
    }
}

/// Point-in-time copy of the tracked array and its access highlights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySnapshot {
    pub values: Vec<u32>,
    /// Highlight left over from the last read of each slot, 1.0 → 0.0
    pub read_heat: Vec<f32>,
    /// Highlight left over from the last write of each slot, 1.0 → 0.0
    pub write_heat: Vec<f32>,
    pub reads: u64,
    pub writes: u64,
    pub runs: usize,
}

/// Mirror of the array contents plus per-slot access times and counters
#[derive(Debug)]
pub struct AccessTracker {
    epoch: Instant,
    /// Fraction of highlight left one second after an access
    color_sustain: f32,
    state: Mutex<TrackerState>,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl AccessTracker {
    pub fn new(color_sustain: f32) -> Self {
        Self {
            epoch: Instant::now(),
            color_sustain,
            state: Mutex::new(TrackerState::default()),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Start tracking fresh contents, forgetting previous highlights
    pub fn reset(&self, values: &[u32]) {
        let mut state = self.lock();
        state.values.clear();
        state.values.extend_from_slice(values);
        state.last_read.clear();
        state.last_read.resize(values.len(), NEVER);
        state.last_write.clear();
        state.last_write.resize(values.len(), NEVER);
    }

    pub fn record_read(&self, array: &InstrumentedArray, index: usize) {
        let now = self.seconds_since_epoch(Instant::now());
        {
            let mut state = self.lock();
            state.sync_len(array);
            if let Some(slot) = state.last_read.get_mut(index) {
                *slot = now;
            }
        }
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self, array: &InstrumentedArray, index: usize) {
        let now = self.seconds_since_epoch(Instant::now());
        {
            let mut state = self.lock();
            state.sync_len(array);
            if let (Some(slot), Some(&value)) =
                (state.values.get_mut(index), array.as_slice().get(index))
            {
                *slot = value;
            }
            if let Some(slot) = state.last_write.get_mut(index) {
                *slot = now;
            }
        }
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Follow a push or pop that changed the array's length
    pub fn record_resize(&self, array: &InstrumentedArray) {
        self.lock().sync_len(array);
    }

    /// Zero the read and write counters (at phase boundaries)
    pub fn reset_counters(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }

    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Copy of the mirrored values
    pub fn values(&self) -> Vec<u32> {
        self.lock().values.clone()
    }

    /// Mirrored length and run count, without copying the values out
    pub fn len_and_runs(&self) -> (usize, usize) {
        let state = self.lock();
        (state.values.len(), count_runs(&state.values))
    }

    /// Values plus highlight intensities as of `now`
    pub fn snapshot(&self, now: Instant) -> ArraySnapshot {
        let now = self.seconds_since_epoch(now);
        let state = self.lock();
        let heat = |&last: &f32| {
            if last == NEVER {
                0.0
            } else {
                self.color_sustain.powf(now - last).clamp(0.0, 1.0)
            }
        };
        ArraySnapshot {
            values: state.values.clone(),
            read_heat: state.last_read.iter().map(heat).collect(),
            write_heat: state.last_write.iter().map(heat).collect(),
            reads: self.read_count(),
            writes: self.write_count(),
            runs: count_runs(&state.values),
        }
    }

    fn seconds_since_epoch(&self, at: Instant) -> f32 {
        at.saturating_duration_since(self.epoch).as_secs_f32()
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Number of maximal non-decreasing runs; 1 for an empty or sorted slice
pub fn count_runs(values: &[u32]) -> usize {
    1 + values.windows(2).filter(|pair| pair[1] < pair[0]).count()
}
