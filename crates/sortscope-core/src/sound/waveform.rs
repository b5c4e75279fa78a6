//! Oscillator shapes
//!
//! Pure functions of phase, measured in cycles (1.0 = one full period),
//! returning amplitude in [-1, 1].

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

/// Shape of a sound event's oscillator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    /// Starts at 0 and rises, like the sine
    Triangle,
    Square,
    Sawtooth,
    Silence,
}

impl Waveform {
    /// Every waveform, in declaration order
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Silence,
    ];

    /// Amplitude at `phase` cycles
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => {
                let t = (phase + 0.25).rem_euclid(1.0);
                if t < 0.5 {
                    4.0 * t - 1.0
                } else {
                    -4.0 * t + 3.0
                }
            }
            Waveform::Square => {
                if phase.rem_euclid(1.0) < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => (2.0 * phase + 1.0).rem_euclid(2.0) - 1.0,
            Waveform::Silence => 0.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Triangle => "Triangle",
            Waveform::Square => "Square",
            Waveform::Sawtooth => "Sawtooth",
            Waveform::Silence => "Silence",
        }
    }
}
