/// Core error types for Riff Player
use thiserror::Error;

/// Result type alias using `RiffError`
pub type Result<T> = std::result::Result<T, RiffError>;

/// Core error type for Riff Player
#[derive(Error, Debug)]
pub enum RiffError {
    /// Source file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Container or codec not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding errors
    #[error("Decode error: {0}")]
    Decode(String),

    /// Output device errors (open, stream, exhaustion)
    #[error("Device error: {0}")]
    Device(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RiffError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a device error
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    /// Create an unsupported format error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_build_matching_variants() {
        assert!(matches!(RiffError::decode("bad packet"), RiffError::Decode(_)));
        assert!(matches!(RiffError::device("busy"), RiffError::Device(_)));
        assert_eq!(
            RiffError::unsupported("xyz").to_string(),
            "Unsupported format: xyz"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RiffError = io.into();
        assert!(matches!(err, RiffError::Io(_)));
    }
}
