//! Concurrent mix list of active sound events

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::waveform::Waveform;
use crate::types::{quantize, OutputSample, SAMPLE_RATE};

/// Frequency of a sound whose normalized value is 1.0
pub const PITCH_SCALE_HZ: f32 = 1320.0;

/// Events to reserve room for up front so pushes rarely reallocate under the lock
const INITIAL_CAPACITY: usize = 256;

/// Map a normalized value in [0, 1] to a frequency in Hz
#[inline]
pub fn pitch_hz(value: f32) -> f32 {
    PITCH_SCALE_HZ * value
}

/// One decaying tone in the mix
///
/// Amplitude drops by `1 / (duration * sample_rate)` on every render call.
/// Expiry is counted separately in whole samples so that it lands on an
/// exact render call regardless of float rounding in `duration * sample_rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEvent {
    waveform: Waveform,
    volume: f32,
    value: f32,
    duration: f32,
    elapsed: f32,
    /// `duration * sample_rate`, the decay denominator
    exact_samples: f64,
    total_samples: u32,
    remaining_samples: u32,
}

impl SoundEvent {
    fn new(waveform: Waveform, volume: f32, value: f32, duration: f32, sample_rate: u32) -> Self {
        let exact_samples = duration as f64 * sample_rate as f64;
        let total_samples = length_in_samples(exact_samples);
        Self {
            waveform,
            volume,
            value,
            duration,
            elapsed: 0.0,
            exact_samples,
            total_samples,
            remaining_samples: total_samples,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Normalized value the pitch is derived from
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Intended duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Seconds of playback rendered so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction of the initial amplitude left, 1.0 → 0.0
    pub fn remaining_amplitude(&self) -> f32 {
        if self.exact_samples.is_nan() || self.exact_samples <= 0.0 {
            return 0.0;
        }
        let steps = (self.total_samples - self.remaining_samples) as f64;
        (1.0 - steps / self.exact_samples).clamp(0.0, 1.0) as f32
    }

    #[inline]
    fn contribution(&self) -> f32 {
        self.waveform.sample(pitch_hz(self.value) * self.elapsed)
            * self.volume
            * self.remaining_amplitude()
    }

    /// Step one sample period; returns false once the event has expired
    #[inline]
    fn advance(&mut self, sample_period: f32) -> bool {
        self.remaining_samples = self.remaining_samples.saturating_sub(1);
        if self.remaining_samples == 0 {
            return false;
        }
        self.elapsed += sample_period;
        true
    }
}

/// Number of render calls an event spanning `exact_samples` lives for (at least one)
fn length_in_samples(exact_samples: f64) -> u32 {
    // Tolerate f32 representation error (0.05 s is 2205.00003 samples at 44.1kHz)
    let samples = (exact_samples - 1e-3).ceil().max(1.0);
    samples as u32
}

/// Active sound events shared between the worker and the audio thread
///
/// One mutex guards the whole list. `push` is called from the access hooks,
/// `render_one_sample` once per output sample from the audio callback.
/// There is no cap on the number of events: a producer that pushes faster
/// than events decay grows the list without bound.
#[derive(Debug)]
pub struct SoundRegistry {
    events: Mutex<Vec<SoundEvent>>,
    sample_rate: AtomicU32,
}

impl SoundRegistry {
    /// Create an empty registry rendering at the default sample rate
    pub fn new() -> Self {
        Self::with_sample_rate(SAMPLE_RATE)
    }

    /// Create an empty registry rendering at `sample_rate`
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            events: Mutex::new(Vec::with_capacity(INITIAL_CAPACITY)),
            sample_rate: AtomicU32::new(sample_rate.max(1)),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::Relaxed)
    }

    /// Retune to the rate the output device actually runs at
    ///
    /// Events already in the list keep their length in samples.
    pub fn set_sample_rate(&self, sample_rate: u32) {
        self.sample_rate.store(sample_rate.max(1), Ordering::Relaxed);
    }

    /// Add a new event with elapsed time 0 and full amplitude
    pub fn push(&self, waveform: Waveform, volume: f32, value: f32, duration: f32) {
        let event = SoundEvent::new(waveform, volume, value, duration, self.sample_rate());
        self.lock().push(event);
    }

    /// Mix every active event into one output sample and step them forward
    ///
    /// Each event contributes at its current amplitude, then decays by one
    /// sample period. An event contributes on the call that expires it and is
    /// removed in the same pass.
    pub fn render_one_sample(&self) -> OutputSample {
        let sample_period = 1.0 / self.sample_rate() as f32;
        let mut mixed = 0.0f32;
        {
            let mut events = self.lock();
            events.retain_mut(|event| {
                mixed += event.contribution();
                event.advance(sample_period)
            });
        }
        quantize(mixed)
    }

    /// Number of active events
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every active event
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of the active events, for inspection
    pub fn events(&self) -> Vec<SoundEvent> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SoundEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SoundRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(registry: &SoundRegistry, count: usize) -> Vec<OutputSample> {
        (0..count).map(|_| registry.render_one_sample()).collect()
    }

    #[test]
    fn test_empty_registry_is_silent() {
        let registry = SoundRegistry::new();
        assert_eq!(render(&registry, 16), vec![0; 16]);
    }

    #[test]
    fn test_length_in_samples() {
        let exact = |duration: f32, rate: u32| duration as f64 * rate as f64;
        assert_eq!(length_in_samples(exact(0.05, 44100)), 2205);
        assert_eq!(length_in_samples(exact(0.1, 48000)), 4800);
        assert_eq!(length_in_samples(exact(1.0 / 44100.0, 44100)), 1);
        assert_eq!(length_in_samples(exact(0.0, 44100)), 1);
        assert_eq!(length_in_samples(exact(-1.0, 44100)), 1);
        assert_eq!(length_in_samples(exact(0.0000301, 44100)), 2);
        assert_eq!(length_in_samples(f64::NAN), 1);
    }

    #[test]
    fn test_event_expires_after_exact_sample_count() {
        let registry = SoundRegistry::with_sample_rate(44100);
        registry.push(Waveform::Sine, 1.0, 0.5, 0.05);

        render(&registry, 2204);
        assert_eq!(registry.len(), 1);

        registry.render_one_sample();
        assert!(registry.is_empty());

        assert_eq!(registry.render_one_sample(), 0);
    }

    #[test]
    fn test_amplitude_decays_linearly() {
        let registry = SoundRegistry::with_sample_rate(1000);
        registry.push(Waveform::Square, 1.0, 0.0, 0.004);

        let events = registry.events();
        assert_eq!(events[0].remaining_amplitude(), 1.0);

        // Square at phase 0 is +1, so the output is the amplitude itself
        let samples = render(&registry, 4);
        assert_eq!(samples, vec![i16::MAX, 24576, 16384, 8192]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_decay_step_with_fractional_length() {
        // 1.5 samples: two render calls, amplitude steps by 1/1.5
        let registry = SoundRegistry::with_sample_rate(1000);
        registry.push(Waveform::Square, 1.0, 0.0, 0.0015);

        let samples = render(&registry, 3);
        assert_eq!(samples, vec![i16::MAX, 10922, 0]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_decay_step_at_48k() {
        // 1444.8 samples, expiring after 1445 calls
        let registry = SoundRegistry::with_sample_rate(48000);
        registry.push(Waveform::Square, 1.0, 0.0, 0.0301);

        render(&registry, 1000);
        let event = registry.events()[0];
        let expected = 1.0 - 1000.0 / (0.0301f32 as f64 * 48000.0);
        assert!((event.remaining_amplitude() as f64 - expected).abs() < 1e-6);
    }

    #[test]
    fn test_elapsed_advances_by_sample_period() {
        let registry = SoundRegistry::with_sample_rate(100);
        registry.push(Waveform::Sine, 0.5, 0.25, 1.0);
        render(&registry, 10);

        let event = registry.events()[0];
        assert!((event.elapsed() - 0.1).abs() < 1e-5);
        assert!((event.remaining_amplitude() - 0.9).abs() < 1e-6);
        assert_eq!(event.waveform(), Waveform::Sine);
        assert_eq!(event.volume(), 0.5);
        assert_eq!(event.value(), 0.25);
        assert_eq!(event.duration(), 1.0);
    }

    #[test]
    fn test_mixing_is_order_independent() {
        let a = SoundRegistry::with_sample_rate(44100);
        a.push(Waveform::Sine, 0.3, 0.5, 0.01);
        a.push(Waveform::Triangle, 0.4, 0.2, 0.02);

        let b = SoundRegistry::with_sample_rate(44100);
        b.push(Waveform::Triangle, 0.4, 0.2, 0.02);
        b.push(Waveform::Sine, 0.3, 0.5, 0.01);

        assert_eq!(render(&a, 1000), render(&b, 1000));
        assert!(a.is_empty());
        assert!(b.is_empty());
    }

    #[test]
    fn test_slowest_event_bounds_lifetime() {
        let registry = SoundRegistry::with_sample_rate(44100);
        registry.push(Waveform::Sine, 0.1, 0.1, 0.01);
        registry.push(Waveform::Sine, 0.1, 0.9, 0.03);
        registry.push(Waveform::Triangle, 0.1, 0.5, 0.02);

        render(&registry, 441);
        assert_eq!(registry.len(), 2);
        render(&registry, 882);
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.render_one_sample(), 0);
    }

    #[test]
    fn test_loud_mix_clamps() {
        let registry = SoundRegistry::with_sample_rate(1000);
        for _ in 0..4 {
            registry.push(Waveform::Square, 1.0, 0.0, 1.0);
        }
        assert_eq!(registry.render_one_sample(), i16::MAX);
    }

    #[test]
    fn test_clear() {
        let registry = SoundRegistry::new();
        registry.push(Waveform::Sine, 1.0, 0.5, 1.0);
        registry.clear();
        assert!(registry.is_empty());
    }
}
