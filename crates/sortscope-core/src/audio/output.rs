//! CPAL output stream driven by the sound registry
//!
//! The device callback pulls exactly one mixed sample from the
//! [`SoundRegistry`] per frame and writes it to every channel, converting the
//! 16-bit mix to whatever sample format the device negotiated.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{
    BufferSize as CpalBufferSize, FromSample, Sample, SampleFormat, SampleRate, SizedSample,
    Stream, StreamConfig, SupportedStreamConfig,
};

use super::config::AudioConfig;
use super::device::{find_device_by_id, get_cpal_default_device};
use super::error::{AudioError, AudioResult};
use crate::sound::SoundRegistry;
use crate::types::OutputSample;

/// Handle to a running output stream
///
/// Audio keeps playing for as long as this handle is alive.
pub struct AudioHandle {
    _stream: Stream,
    device_name: String,
    sample_rate: u32,
    channels: u16,
    buffer_size: Option<u32>,
}

impl AudioHandle {
    /// Name of the device the stream was opened on
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Negotiated sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output channel count (each carries the same mono mix)
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Fixed buffer size in frames, `None` when the device default is used
    pub fn buffer_size(&self) -> Option<u32> {
        self.buffer_size
    }

    /// Buffer latency in milliseconds when the buffer size is known
    pub fn latency_ms(&self) -> Option<f32> {
        self.buffer_size
            .map(|frames| frames as f32 / self.sample_rate as f32 * 1000.0)
    }
}

/// Open the configured device and start pulling samples from `registry`
///
/// The registry's sample rate is updated to the rate the device actually
/// runs at so sound durations stay correct.
pub fn start_audio_output(
    config: &AudioConfig,
    registry: Arc<SoundRegistry>,
) -> AudioResult<AudioHandle> {
    let device = match &config.device {
        Some(id) => find_device_by_id(id)?,
        None => get_cpal_default_device()?,
    };
    let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

    let supported = select_output_config(&device, config.sample_rate)?;
    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels();
    let buffer_size = config.buffer_size.as_frames();

    if sample_rate != config.sample_rate {
        log::warn!(
            "Device {} does not support {} Hz, using {} Hz",
            device_name,
            config.sample_rate,
            sample_rate
        );
    }
    registry.set_sample_rate(sample_rate);

    let stream_config = StreamConfig {
        channels,
        sample_rate: SampleRate(sample_rate),
        buffer_size: match buffer_size {
            Some(frames) => CpalBufferSize::Fixed(frames),
            None => CpalBufferSize::Default,
        },
    };

    let stream = match supported.sample_format() {
        SampleFormat::F32 => build_output_stream::<f32>(&device, &stream_config, registry)?,
        SampleFormat::I16 => build_output_stream::<i16>(&device, &stream_config, registry)?,
        SampleFormat::U16 => build_output_stream::<u16>(&device, &stream_config, registry)?,
        _ => return Err(AudioError::NoUsableFormat),
    };

    stream.play()?;

    log::info!(
        "Audio output started: {} @ {} Hz, {} channel(s), {:?}",
        device_name,
        sample_rate,
        channels,
        supported.sample_format()
    );

    Ok(AudioHandle {
        _stream: stream,
        device_name,
        sample_rate,
        channels,
        buffer_size,
    })
}

/// Preference order for device sample formats
fn format_rank(format: SampleFormat) -> Option<u8> {
    match format {
        SampleFormat::F32 => Some(0),
        SampleFormat::I16 => Some(1),
        SampleFormat::U16 => Some(2),
        _ => None,
    }
}

/// Pick the output config closest to what we want
///
/// A range covering `target_rate` wins over one that doesn't; ties go to the
/// preferred sample format and then the fewest channels.
fn select_output_config(
    device: &cpal::Device,
    target_rate: u32,
) -> AudioResult<SupportedStreamConfig> {
    let ranges: Vec<_> = device
        .supported_output_configs()?
        .filter(|range| format_rank(range.sample_format()).is_some())
        .collect();

    let best = ranges
        .into_iter()
        .min_by_key(|range| {
            let covers = (range.min_sample_rate().0..=range.max_sample_rate().0)
                .contains(&target_rate);
            (!covers, format_rank(range.sample_format()), range.channels())
        })
        .ok_or(AudioError::NoUsableFormat)?;

    let rate = target_rate.clamp(best.min_sample_rate().0, best.max_sample_rate().0);
    Ok(best.with_sample_rate(SampleRate(rate)))
}

fn build_output_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    registry: Arc<SoundRegistry>,
) -> AudioResult<Stream>
where
    T: SizedSample + FromSample<OutputSample>,
{
    let channels = config.channels as usize;

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _info: &cpal::OutputCallbackInfo| {
                write_frames(data, channels, &registry);
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )
        .map_err(AudioError::from)
}

/// Fill an interleaved buffer, one registry sample per frame
fn write_frames<T>(data: &mut [T], channels: usize, registry: &SoundRegistry)
where
    T: Sample + FromSample<OutputSample>,
{
    for frame in data.chunks_mut(channels.max(1)) {
        let value = <T as Sample>::from_sample(registry.render_one_sample());
        for slot in frame.iter_mut() {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::Waveform;

    fn square_registry() -> SoundRegistry {
        // 4 samples at 1 kHz, phase 0 so the square stays high
        let registry = SoundRegistry::with_sample_rate(1000);
        registry.push(Waveform::Square, 1.0, 0.0, 0.004);
        registry
    }

    #[test]
    fn test_write_frames_duplicates_across_channels() {
        let registry = square_registry();
        let mut buffer = [0i16; 10];
        write_frames(&mut buffer, 2, &registry);

        assert_eq!(
            buffer,
            [32767, 32767, 24576, 24576, 16384, 16384, 8192, 8192, 0, 0]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_write_frames_converts_to_float() {
        let registry = square_registry();
        let mut buffer = [1.0f32; 3];
        write_frames(&mut buffer, 1, &registry);

        assert!((buffer[0] - 32767.0 / 32768.0).abs() < 1e-6);
        assert!((buffer[1] - 0.75).abs() < 1e-6);
        assert!((buffer[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_silent_registry_writes_midpoint_for_unsigned() {
        let registry = SoundRegistry::new();
        let mut buffer = [0u16; 4];
        write_frames(&mut buffer, 2, &registry);
        assert!(buffer.iter().all(|&s| s == 32768));
    }

    #[test]
    fn test_format_preference() {
        assert!(format_rank(SampleFormat::F32) < format_rank(SampleFormat::I16));
        assert!(format_rank(SampleFormat::I16) < format_rank(SampleFormat::U16));
        assert_eq!(format_rank(SampleFormat::F64), None);
    }
}
