/// Core traits for Riff Player
use crate::error::Result;
use crate::types::{GainRange, PcmBuffer, PcmFormat};
use std::path::Path;

/// Audio decoder trait
///
/// Implementers decode audio files into signed 16-bit PCM at the source's
/// native sample rate and channel count.
pub trait AudioDecoder: Send {
    /// Decode an audio file from the given path (loads entire file)
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded
    fn decode(&mut self, path: &Path) -> Result<PcmBuffer>;

    /// Check if the decoder supports the given file format
    fn supports_format(&self, path: &Path) -> bool;
}

/// Audio output device
///
/// Binds decoded PCM to a playback device, producing a clip that can be
/// started, stopped and repositioned.
pub trait OutputDevice: Send {
    /// Open a clip for the given PCM data
    ///
    /// The returned clip is positioned at frame 0, stopped, with its gain
    /// at the device default.
    ///
    /// # Errors
    /// Returns an error if the device cannot be opened or has no free resources
    fn open_clip(&mut self, pcm: PcmBuffer) -> Result<Box<dyn DeviceClip>>;
}

/// A device-bound, playable clip
///
/// Positions and lengths are expressed in frames. All methods are expected
/// to return immediately.
pub trait DeviceClip: Send {
    /// Begin (or continue) producing audio from the current position
    fn start(&mut self);

    /// Halt audio output, keeping the current position
    fn stop(&mut self);

    /// Whether the clip is actively producing audio
    fn is_running(&self) -> bool;

    /// Total length in frames
    fn frame_length(&self) -> u64;

    /// Current frame position
    fn frame_position(&self) -> u64;

    /// Move the frame cursor
    fn set_frame_position(&mut self, frame: u64);

    /// PCM format the clip was opened with
    fn format(&self) -> PcmFormat;

    /// Fixed gain range of this clip's master gain control
    fn gain_range(&self) -> GainRange;

    /// Current gain in dB
    fn gain(&self) -> f32;

    /// Set gain in dB (clamped into `gain_range`)
    fn set_gain(&mut self, db: f32);

    /// Stop output and return device resources
    ///
    /// The clip must not produce audio after this call.
    fn close(&mut self);
}
