//! Failures opening the output stream

use thiserror::Error;

/// Why audio output could not be started
///
/// Every variant is recoverable from the player's point of view: it logs
/// the error and runs the demonstration silently.
#[derive(Error, Debug)]
pub enum AudioError {
    /// No host reported a usable output device
    #[error("no audio output devices found")]
    NoDevices,

    #[error("host {host} has no default output device")]
    NoDefaultDevice { host: String },

    /// Configured device (shown as its display label) is not connected
    #[error("output device {0} not found")]
    DeviceNotFound(String),

    #[error("cannot list output devices: {0}")]
    ListDevices(#[from] cpal::DevicesError),

    #[error("cannot query output formats: {0}")]
    QueryFormats(#[from] cpal::SupportedStreamConfigsError),

    /// The device only offers sample formats the mixer cannot convert to
    #[error("device offers no f32, i16 or u16 output")]
    NoUsableFormat,

    #[error("cannot open output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("cannot start output stream: {0}")]
    StartStream(#[from] cpal::PlayStreamError),
}

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_device() {
        let missing = AudioError::DeviceNotFound("[ALSA] Speakers".to_string());
        assert_eq!(missing.to_string(), "output device [ALSA] Speakers not found");

        let no_default = AudioError::NoDefaultDevice {
            host: "JACK".to_string(),
        };
        assert_eq!(no_default.to_string(), "host JACK has no default output device");
    }

    #[test]
    fn test_stream_errors_convert() {
        let err: AudioError = cpal::PlayStreamError::DeviceNotAvailable.into();
        assert!(matches!(err, AudioError::StartStream(_)));
        assert!(err.to_string().starts_with("cannot start output stream"));
    }
}
