//! Decoded clip wrapper
//!
//! Pairs a device clip with the track it came from and caches the fixed
//! properties (length, format, gain range). Dropping a `DecodedClip` stops
//! and closes the underlying device clip.

use riff_core::{DeviceClip, GainRange, PcmFormat, TrackRef};
use std::fmt;

/// A track bound to an output device and ready to play
pub struct DecodedClip {
    track: TrackRef,
    inner: Box<dyn DeviceClip>,
    gain_range: GainRange,
    format: PcmFormat,
    length: u64,
}

impl DecodedClip {
    pub(crate) fn new(track: TrackRef, inner: Box<dyn DeviceClip>) -> Self {
        let gain_range = inner.gain_range();
        let format = inner.format();
        let length = inner.frame_length();
        Self {
            track,
            inner,
            gain_range,
            format,
            length,
        }
    }

    /// Track this clip was decoded from
    pub fn track(&self) -> &TrackRef {
        &self.track
    }

    /// PCM format
    pub fn format(&self) -> PcmFormat {
        self.format
    }

    /// Length in frames
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Current frame position, never past the length
    pub fn position(&self) -> u64 {
        self.inner.frame_position().min(self.length)
    }

    /// Move the cursor, clamped to `[0, length)`
    pub fn set_position(&mut self, frame: u64) {
        let frame = frame.min(self.length.saturating_sub(1));
        self.inner.set_frame_position(frame);
    }

    /// Start output
    pub fn start(&mut self) {
        self.inner.start();
    }

    /// Stop output
    pub fn stop(&mut self) {
        self.inner.stop();
    }

    /// Whether the device clip is producing audio
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Gain range of the master gain control
    pub fn gain_range(&self) -> GainRange {
        self.gain_range
    }

    /// Current gain in dB
    pub fn gain(&self) -> f32 {
        self.inner.gain()
    }

    /// Set gain in dB, clamped into the gain range
    pub fn set_gain(&mut self, db: f32) {
        self.inner.set_gain(self.gain_range.clamp(db));
    }
}

impl Drop for DecodedClip {
    fn drop(&mut self) {
        self.inner.stop();
        self.inner.close();
    }
}

impl fmt::Debug for DecodedClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedClip")
            .field("track", &self.track)
            .field("format", &self.format)
            .field("length", &self.length)
            .field("position", &self.position())
            .field("running", &self.is_running())
            .finish()
    }
}
