/// Audio-specific errors
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Stream contained no audio frames
    #[error("No audio frames decoded")]
    Empty,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Symphonia error
    #[error("Symphonia error: {0}")]
    Symphonia(String),
}

impl From<symphonia::core::errors::Error> for AudioError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        use symphonia::core::errors::Error;
        match err {
            Error::Unsupported(what) => AudioError::UnsupportedFormat(what.to_string()),
            Error::DecodeError(what) => AudioError::DecodeError(what.to_string()),
            Error::IoError(e) => AudioError::Io(e),
            other => AudioError::Symphonia(other.to_string()),
        }
    }
}

impl From<AudioError> for riff_core::RiffError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::FileNotFound(path) => riff_core::RiffError::FileNotFound(path),
            AudioError::UnsupportedFormat(what) => riff_core::RiffError::UnsupportedFormat(what),
            AudioError::Io(e) => riff_core::RiffError::Io(e),
            other => riff_core::RiffError::decode(other.to_string()),
        }
    }
}
