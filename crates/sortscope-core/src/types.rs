//! Common types for Sortscope
//!
//! Sample format and rate constants shared by the sound registry and the
//! audio output backend.

/// Default sample rate of the procedural audio (44.1kHz)
/// The registry is retuned to the device rate if the device negotiates another one.
pub const SAMPLE_RATE: u32 = 44100;

/// Output sample type (signed 16-bit, one channel)
pub type OutputSample = i16;

/// Convert a mixed amplitude to a fixed-point output sample
///
/// Clamping is symmetric around the integer range: anything at or above
/// 1.0 maps to `i16::MAX`, anything below -1.0 maps to `i16::MIN`, and the
/// rest scales linearly by 32768.
#[inline]
pub fn quantize(amplitude: f32) -> OutputSample {
    if amplitude >= 1.0 {
        OutputSample::MAX
    } else if amplitude < -1.0 {
        OutputSample::MIN
    } else {
        // `as` saturates, covering the sliver just below 1.0
        (amplitude * 32768.0) as OutputSample
    }
}
