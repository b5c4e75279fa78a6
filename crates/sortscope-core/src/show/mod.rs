//! Sorting demonstration - wires the array, sounds and pacing together
//!
//! `SortShow` installs hooks on the demonstration array so that every access
//! is recorded in the `AccessTracker`, becomes a sound in the
//! `SoundRegistry` and then waits on the `PacingGate`. `run` walks through
//! the three phases of a demonstration on the calling (worker) thread:
//!
//! 1. **Initialize** - build the array with instrumented writes, no delay
//! 2. **Shuffle** - run the shuffle within a fixed time budget
//! 3. **Sort** - run the sort at the configured per-access delay
//!
//! Progress is reported over a channel; the current status line can be
//! polled from any thread.

mod error;
mod tracker;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::algorithms::Algorithm;
use crate::array::{AccessHooks, ArrayResult, Fill, InstrumentedArray};
use crate::pacing::PacingGate;
use crate::sound::{SoundRegistry, Waveform};

pub use error::{ShowError, ShowResult};
pub use tracker::{count_runs, AccessTracker, ArraySnapshot};

/// Waveform of the sound played for a read
pub const READ_WAVEFORM: Waveform = Waveform::Sine;
/// Waveform of the sound played for a write
pub const WRITE_WAVEFORM: Waveform = Waveform::Triangle;

/// Accesses a shuffle makes per element, used to spread its time budget
const SHUFFLE_ACCESSES_PER_ELEMENT: f64 = 4.0;

/// Demonstration timing and sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Number of elements to sort
    pub array_size: usize,
    /// Delay after each access while sorting (milliseconds)
    pub sort_delay_ms: f64,
    /// Total time the shuffle should take (milliseconds)
    pub shuffle_budget_ms: f64,
    /// Pause before each phase (milliseconds)
    pub phase_pause_ms: f64,
    /// How long the sound of one access lasts (seconds)
    pub sound_sustain_s: f32,
    /// Fraction of an access highlight left one second later
    pub color_sustain: f32,
    /// Seed for the shuffle and sort RNG
    pub seed: u64,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            array_size: 128,
            sort_delay_ms: 2.003,
            shuffle_budget_ms: 500.0,
            phase_pause_ms: 750.0,
            sound_sustain_s: 0.05,
            color_sustain: 0.1,
            seed: 0,
        }
    }
}

impl ShowConfig {
    /// Per-access delay that makes a shuffle of `array_size` fit its budget
    pub fn shuffle_delay_ms(&self) -> f64 {
        self.shuffle_budget_ms / SHUFFLE_ACCESSES_PER_ELEMENT / self.array_size.max(1) as f64
    }

    /// Volume of an access sound at `delay_ms`
    ///
    /// Slower demonstrations play louder sounds; at zero delay they are silent.
    pub fn access_volume(&self, delay_ms: f64) -> f32 {
        if self.sound_sustain_s <= 0.0 {
            return 0.0;
        }
        (delay_ms / 500.0) as f32 / self.sound_sustain_s
    }
}

/// Stage of a demonstration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShowPhase {
    Initialize,
    Shuffle,
    Sort,
}

impl fmt::Display for ShowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShowPhase::Initialize => "Initialize",
            ShowPhase::Shuffle => "Shuffle",
            ShowPhase::Sort => "Sort",
        };
        write!(f, "{}", name)
    }
}

/// Progress notifications sent while a demonstration runs
#[derive(Debug, Clone, PartialEq)]
pub enum ShowEvent {
    PhaseStarted {
        phase: ShowPhase,
        algorithm: &'static str,
    },
    PhaseFinished {
        phase: ShowPhase,
        reads: u64,
        writes: u64,
        elapsed: Duration,
    },
    Finished,
    Failed(ShowError),
}

/// Status line contents, readable from any thread
#[derive(Debug, Clone, PartialEq)]
pub struct ShowStatus {
    pub text: String,
    pub reads: u64,
    pub writes: u64,
    pub len: usize,
    pub runs: usize,
    pub delay_ms: f64,
}

impl fmt::Display for ShowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.text.is_empty() {
            write!(f, "{} | ", self.text)?;
        }
        write!(
            f,
            "Array Accesses: {} ({} reads, {} writes) | {} elements in array ({} run{}) | Delay: {:.3}ms",
            self.reads + self.writes,
            self.reads,
            self.writes,
            self.len,
            self.runs,
            if self.runs == 1 { "" } else { "s" },
            self.delay_ms
        )
    }
}

/// Per-access delay shared between the worker and status readers
#[derive(Debug)]
struct SharedDelay(AtomicU64);

impl SharedDelay {
    fn new(delay_ms: f64) -> Self {
        Self(AtomicU64::new(delay_ms.to_bits()))
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn set(&self, delay_ms: f64) {
        self.0.store(delay_ms.to_bits(), Ordering::Relaxed);
    }
}

/// One demonstration: hooks, sound, pacing and tracking for a single array
pub struct SortShow {
    config: ShowConfig,
    hooks: Arc<AccessHooks>,
    registry: Arc<SoundRegistry>,
    pacing: Arc<PacingGate>,
    tracker: Arc<AccessTracker>,
    delay: Arc<SharedDelay>,
    status: Mutex<String>,
    event_tx: Sender<ShowEvent>,
}

impl SortShow {
    /// Create a demonstration that plays its sounds into `registry`
    ///
    /// Returns the show and the receiving end of its progress channel.
    pub fn new(config: ShowConfig, registry: Arc<SoundRegistry>) -> (Self, Receiver<ShowEvent>) {
        let (event_tx, event_rx) = channel::unbounded();
        let show = Self {
            hooks: Arc::new(AccessHooks::new()),
            pacing: Arc::new(PacingGate::new()),
            tracker: Arc::new(AccessTracker::new(config.color_sustain)),
            delay: Arc::new(SharedDelay::new(config.sort_delay_ms)),
            status: Mutex::new(String::new()),
            registry,
            config,
            event_tx,
        };
        show.install_hooks();
        (show, event_rx)
    }

    fn install_hooks(&self) {
        self.hooks.set_read_hook(self.access_hook(READ_WAVEFORM, AccessTracker::record_read));
        self.hooks.set_write_hook(self.access_hook(WRITE_WAVEFORM, AccessTracker::record_write));

        let tracker = Arc::clone(&self.tracker);
        self.hooks
            .set_resize_hook(move |array: &InstrumentedArray| tracker.record_resize(array));
    }

    /// Build a hook that records the access, plays it and waits
    fn access_hook(
        &self,
        waveform: Waveform,
        record: fn(&AccessTracker, &InstrumentedArray, usize),
    ) -> impl Fn(&InstrumentedArray, usize) + Send + Sync + 'static {
        let tracker = Arc::clone(&self.tracker);
        let registry = Arc::clone(&self.registry);
        let pacing = Arc::clone(&self.pacing);
        let delay = Arc::clone(&self.delay);
        let config = self.config.clone();

        move |array: &InstrumentedArray, index: usize| {
            record(&tracker, array, index);

            let delay_ms = delay.get();
            let volume = config.access_volume(delay_ms);
            if volume > 0.0 {
                let value = array.as_slice()[index] as f32 / array.len() as f32;
                registry.push(waveform, volume, value, config.sound_sustain_s);
            }

            pacing.wait(delay_ms);
        }
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn tracker(&self) -> &Arc<AccessTracker> {
        &self.tracker
    }

    pub fn registry(&self) -> &Arc<SoundRegistry> {
        &self.registry
    }

    /// Current per-access delay (milliseconds)
    pub fn delay_ms(&self) -> f64 {
        self.delay.get()
    }

    /// Status line as of now
    pub fn status(&self) -> ShowStatus {
        let (len, runs) = self.tracker.len_and_runs();
        ShowStatus {
            text: self.status.lock().unwrap_or_else(PoisonError::into_inner).clone(),
            reads: self.tracker.read_count(),
            writes: self.tracker.write_count(),
            len,
            runs,
            delay_ms: self.delay.get(),
        }
    }

    /// Array contents and highlights as of now
    pub fn snapshot(&self) -> ArraySnapshot {
        self.tracker.snapshot(Instant::now())
    }

    /// Run initialize, shuffle and sort on the calling thread
    ///
    /// Returns the final array. The first failing phase ends the run; its
    /// error is also sent as `ShowEvent::Failed`.
    pub fn run(&self, shuffle: &Algorithm, sort: &Algorithm) -> ShowResult<InstrumentedArray> {
        self.pacing.reset();
        let result = self.run_phases(shuffle, sort);
        match &result {
            Ok(_) => {
                log::info!("Demonstration finished: {} after {}", sort.name, shuffle.name);
                let _ = self.event_tx.send(ShowEvent::Finished);
            }
            Err(e) => {
                log::error!("Sorting demonstration: {}", e);
                let _ = self.event_tx.send(ShowEvent::Failed(e.clone()));
            }
        }
        result
    }

    fn run_phases(&self, shuffle: &Algorithm, sort: &Algorithm) -> ShowResult<InstrumentedArray> {
        let size = self.config.array_size;

        let mut array = self.phase(
            ShowPhase::Initialize,
            "Identity",
            format!("Initializing {}-element array", size),
            0.0,
            || {
                let mut array =
                    InstrumentedArray::with_hooks(size, Fill::Zero, Arc::clone(&self.hooks));
                self.tracker.reset(array.as_slice());
                for i in 0..size {
                    array.set(i, i as u32)?;
                }
                Ok(array)
            },
        )?;

        self.phase(
            ShowPhase::Shuffle,
            shuffle.name,
            format!("Shuffling: {} ({} elements)", shuffle.name, size),
            self.config.shuffle_delay_ms(),
            || shuffle.apply(&mut array, &mut self.seeded_rng()),
        )?;

        self.phase(
            ShowPhase::Sort,
            sort.name,
            format!("Sorting: {} ({} elements)", sort.name, size),
            self.config.sort_delay_ms,
            || sort.apply(&mut array, &mut self.seeded_rng()),
        )?;

        Ok(array)
    }

    /// Pause, announce, run `body` at `delay_ms`, then restore the previous delay
    fn phase<T>(
        &self,
        phase: ShowPhase,
        algorithm: &'static str,
        status: String,
        delay_ms: f64,
        body: impl FnOnce() -> ArrayResult<T>,
    ) -> ShowResult<T> {
        self.pacing.wait(self.config.phase_pause_ms);
        self.tracker.reset_counters();

        log::info!("{}", status);
        self.set_status(status);
        let _ = self.event_tx.send(ShowEvent::PhaseStarted { phase, algorithm });

        let previous_delay = self.delay.get();
        self.delay.set(delay_ms);
        let started = Instant::now();

        let value = body().map_err(|source| ShowError::AlgorithmFailed {
            phase,
            algorithm,
            source,
        })?;

        self.delay.set(previous_delay);
        self.set_status(String::new());

        let elapsed = started.elapsed();
        log::debug!(
            "{} phase done in {:.2?} ({} reads, {} writes)",
            phase,
            elapsed,
            self.tracker.read_count(),
            self.tracker.write_count()
        );
        let _ = self.event_tx.send(ShowEvent::PhaseFinished {
            phase,
            reads: self.tracker.read_count(),
            writes: self.tracker.write_count(),
            elapsed,
        });

        Ok(value)
    }

    fn seeded_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.config.seed)
    }

    fn set_status(&self, text: String) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = text;
    }
}

impl fmt::Debug for SortShow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortShow")
            .field("config", &self.config)
            .field("delay_ms", &self.delay.get())
            .finish_non_exhaustive()
    }
}
