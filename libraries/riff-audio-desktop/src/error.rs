/// Desktop output errors
use thiserror::Error;

/// Result type for device operations
pub type Result<T> = std::result::Result<T, DeviceError>;

/// Device errors
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No output device available
    #[error("Audio device not found")]
    DeviceNotFound,

    /// Failed to query the device configuration
    #[error("Device configuration error: {0}")]
    ConfigError(String),

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuildError(String),

    /// Failed to play stream
    #[error("Failed to play stream: {0}")]
    PlayError(String),

    /// Failed to pause stream
    #[error("Failed to pause stream: {0}")]
    PauseError(String),

    /// Device sample format not handled
    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    /// PCM data cannot be played
    #[error("Invalid PCM data: {0}")]
    InvalidPcm(String),

    /// Stream thread exited unexpectedly
    #[error("Audio thread error: {0}")]
    ThreadError(String),
}

impl From<cpal::BuildStreamError> for DeviceError {
    fn from(err: cpal::BuildStreamError) -> Self {
        DeviceError::StreamBuildError(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for DeviceError {
    fn from(err: cpal::PlayStreamError) -> Self {
        DeviceError::PlayError(err.to_string())
    }
}

impl From<cpal::PauseStreamError> for DeviceError {
    fn from(err: cpal::PauseStreamError) -> Self {
        DeviceError::PauseError(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for DeviceError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        DeviceError::ConfigError(err.to_string())
    }
}

impl From<DeviceError> for riff_core::RiffError {
    fn from(err: DeviceError) -> Self {
        riff_core::RiffError::device(err.to_string())
    }
}
