//! Audio output configuration
//!
//! Device selection, sample rate and buffer size preferences for the
//! procedural audio stream.

use serde::{Deserialize, Serialize};

use crate::types::SAMPLE_RATE;

/// Largest buffer size accepted for a fixed request (frames)
pub const MAX_BUFFER_SIZE: u32 = 8192;

/// Smallest buffer size accepted for a fixed request (frames)
pub const MIN_BUFFER_SIZE: u32 = 64;

/// Buffer size used for `BufferSize::LowLatency` (frames)
/// 256 frames @ 44.1kHz = ~5.8ms
pub const LOW_LATENCY_BUFFER_SIZE: u32 = 256;

/// Preferred buffer size for the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BufferSize {
    /// Let the device choose
    #[default]
    Default,
    /// Request a specific buffer size in frames (clamped to a sane range)
    Fixed(u32),
    /// Small fixed buffer so sounds track accesses closely
    LowLatency,
}

impl BufferSize {
    /// Requested frames, or None to leave the choice to the device
    pub fn as_frames(&self) -> Option<u32> {
        match self {
            BufferSize::Default => None,
            BufferSize::Fixed(frames) => Some((*frames).clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE)),
            BufferSize::LowLatency => Some(LOW_LATENCY_BUFFER_SIZE),
        }
    }

    /// Calculate latency in milliseconds for a given sample rate
    pub fn latency_ms(&self, sample_rate: u32) -> Option<f32> {
        self.as_frames()
            .map(|frames| (frames as f32 / sample_rate as f32) * 1000.0)
    }
}

/// Audio device identifier
///
/// Includes both the device name and the host backend (ALSA, JACK, WASAPI...)
/// so devices of the same name under different hosts stay distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceId {
    /// Device name as reported by the system
    pub name: String,
    /// Audio host identifier; None searches every host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl DeviceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: None,
        }
    }

    pub fn with_host(name: &str, host: &str) -> Self {
        Self {
            name: name.to_string(),
            host: Some(host.to_string()),
        }
    }

    /// Get a display label that includes the host if available
    pub fn display_label(&self) -> String {
        match &self.host {
            Some(host) => format!("[{}] {}", host, self.name),
            None => self.name.clone(),
        }
    }
}

/// Configuration for the audio output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Output device (None = system default)
    pub device: Option<DeviceId>,
    /// Preferred sample rate; the device's nearest supported rate is used otherwise
    pub sample_rate: u32,
    /// Preferred buffer size
    pub buffer_size: BufferSize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: SAMPLE_RATE,
            buffer_size: BufferSize::default(),
        }
    }
}

impl AudioConfig {
    /// Set the output device
    pub fn with_device(mut self, device: DeviceId) -> Self {
        self.device = Some(device);
        self
    }

    /// Set the preferred sample rate
    pub fn with_sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Set a fixed buffer size in frames
    pub fn with_buffer_frames(mut self, frames: u32) -> Self {
        self.buffer_size = BufferSize::Fixed(frames);
        self
    }

    /// Enable low-latency mode
    pub fn with_low_latency(mut self) -> Self {
        self.buffer_size = BufferSize::LowLatency;
        self
    }
}
