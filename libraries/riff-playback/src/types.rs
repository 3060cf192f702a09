//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Default trailing window (in frames) treated as "at end"
pub const DEFAULT_END_TOLERANCE_FRAMES: u64 = 100;

/// Transport state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportState {
    /// No clip loaded
    NoClip,

    /// Clip loaded, not producing audio
    Stopped,

    /// Clip actively playing
    Running,

    /// Position inside the end-of-track window
    Ended,
}

/// Three-way playback status for presentation code
///
/// Unlike `is_running()`, a finished track is reported distinctly from a
/// playing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// Nothing playing (no clip, or paused)
    Stopped,

    /// Currently playing
    Playing,

    /// Reached the end of the current track
    Finished,
}

/// Configuration for the transport controller
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Frames before the end of a clip at which it counts as finished
    /// (default: 100, 0 = exact end)
    pub end_tolerance_frames: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            end_tolerance_frames: DEFAULT_END_TOLERANCE_FRAMES,
        }
    }
}

/// Configuration for the player
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Transport settings
    pub transport: TransportConfig,

    /// Load and start the next playlist track when a track finishes
    /// (default: true)
    pub auto_advance: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            auto_advance: true,
        }
    }
}
