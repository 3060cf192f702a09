//! Error types for playback management

use riff_core::{RiffError, TrackRef};
use thiserror::Error;

/// A track could not be turned into a playable clip
///
/// After this error the transport holds no clip.
#[derive(Debug, Error)]
#[error("Failed to load {track}: {source}")]
pub struct LoadError {
    /// Track that failed to load
    pub track: TrackRef,

    /// Underlying decode or device error
    #[source]
    pub source: RiffError,
}

impl LoadError {
    /// Create a new load error
    pub fn new(track: TrackRef, source: RiffError) -> Self {
        Self { track, source }
    }
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Loading a track failed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// No clip is currently loaded
    #[error("No clip loaded")]
    NoClip,

    /// Invalid seek position
    #[error("Invalid seek position: frame {position} of {length}")]
    InvalidSeekPosition {
        /// Requested frame
        position: u64,
        /// Clip length in frames
        length: u64,
    },

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
