//! Procedural access sounds
//!
//! Every array access becomes a short decaying tone. The worker thread pushes
//! tones into a `SoundRegistry`; the audio thread pulls one mixed sample at a
//! time out of it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   push()    ┌─────────────────────┐
//! │  Worker Thread   │────────────►│   SoundRegistry     │
//! │ (access hooks)   │             │  Mutex<Vec<Event>>  │
//! └──────────────────┘             └──────────┬──────────┘
//!                                             │ render_one_sample()
//!                                             ▼
//!                                  ┌─────────────────────┐
//!                                  │  CPAL Audio Thread  │
//!                                  │  (one call/frame)   │
//!                                  └─────────────────────┘
//! ```
//!
//! The lock is held for one pass over the active events per sample: no
//! allocation, expired events compacted in place.

mod registry;
mod waveform;

pub use registry::{pitch_hz, SoundEvent, SoundRegistry, PITCH_SCALE_HZ};
pub use waveform::Waveform;
