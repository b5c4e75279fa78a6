//! Audio output for the sound registry
//!
//! A thin CPAL layer that turns the registry's 16-bit mono mix into a device
//! stream:
//!
//! ```text
//! ┌──────────────┐  push()   ┌───────────────┐ render_one_sample() ┌──────────────┐
//! │ sort worker  │ ────────▶ │ SoundRegistry │ ◀────────────────── │ CPAL callback│
//! └──────────────┘           └───────────────┘   once per frame    └──────────────┘
//! ```
//!
//! Device selection is by [`DeviceId`] (name plus optional host), falling
//! back to the default output device when none is configured.

mod config;
mod device;
mod error;
mod output;

pub use config::{
    AudioConfig, BufferSize, DeviceId, LOW_LATENCY_BUFFER_SIZE, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE,
};
pub use device::{find_device_by_id, get_cpal_default_device, get_output_devices, AudioDevice};
pub use error::{AudioError, AudioResult};
pub use output::{start_audio_output, AudioHandle};
