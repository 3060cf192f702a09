//! Transport controller
//!
//! Owns the single active clip and exposes play/pause/stop/seek/rewind.
//! Every operation is a no-op when no clip is loaded, so callers never need
//! to check first. The `try_*` variants report those cases as errors instead.

use crate::clip::DecodedClip;
use crate::error::{LoadError, PlaybackError, Result};
use crate::loader::ClipLoader;
use crate::types::{PlaybackStatus, TransportConfig, TransportState};
use crate::volume::VolumeMapper;
use riff_core::{GainRange, PcmFormat, TrackRef};

/// Transport controller over at most one clip
#[derive(Debug, Default)]
pub struct Transport {
    clip: Option<DecodedClip>,
    config: TransportConfig,
    loads: u64,
}

impl Transport {
    /// Create an empty transport
    pub fn new(config: TransportConfig) -> Self {
        Self {
            clip: None,
            config,
            loads: 0,
        }
    }

    /// Transport configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Replace the current clip with a freshly loaded track
    ///
    /// The old clip is stopped and closed before the new one is opened, so
    /// the device never holds two clips. On failure no clip remains.
    pub fn load_track(
        &mut self,
        loader: &mut ClipLoader,
        track: &TrackRef,
    ) -> std::result::Result<(), LoadError> {
        self.unload();

        match loader.load(track) {
            Ok(clip) => {
                self.clip = Some(clip);
                self.loads += 1;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(track = %track, error = %e.source, "Track failed to load");
                Err(e)
            }
        }
    }

    /// Number of successful loads so far
    ///
    /// Changes whenever a new clip replaces the old one, even when the same
    /// track is loaded again.
    pub fn load_count(&self) -> u64 {
        self.loads
    }

    /// Stop and release the current clip, if any
    pub fn unload(&mut self) {
        if let Some(clip) = self.clip.take() {
            tracing::debug!(track = %clip.track(), "Releasing clip");
        }
    }

    /// Whether a clip is loaded
    pub fn has_clip(&self) -> bool {
        self.clip.is_some()
    }

    /// Current state
    pub fn state(&self) -> TransportState {
        match &self.clip {
            None => TransportState::NoClip,
            Some(_) if self.at_end() => TransportState::Ended,
            Some(clip) if clip.is_running() => TransportState::Running,
            Some(_) => TransportState::Stopped,
        }
    }

    /// Start playback from the current position
    pub fn start(&mut self) {
        if let Some(clip) = &mut self.clip {
            if !clip.is_running() {
                clip.start();
                tracing::debug!(position = clip.position(), "Started");
            }
        }
    }

    /// Pause playback, keeping the position
    pub fn stop(&mut self) {
        if let Some(clip) = &mut self.clip {
            if clip.is_running() {
                clip.stop();
                tracing::debug!(position = clip.position(), "Stopped");
            }
        }
    }

    /// Seek to frame 0, preserving whether the clip was running
    pub fn rewind_to_start(&mut self) {
        self.seek(0);
    }

    /// Seek to `frame` (clamped to the clip), preserving whether the clip was
    /// running
    pub fn set_position(&mut self, frame: u64) {
        self.seek(frame);
    }

    fn seek(&mut self, frame: u64) {
        if let Some(clip) = &mut self.clip {
            let was_running = clip.is_running();
            clip.stop();
            clip.set_position(frame);
            if was_running {
                clip.start();
            }
            tracing::debug!(position = clip.position(), was_running, "Seek");
        }
    }

    /// Whether the position is within the end-of-track window
    pub fn at_end(&self) -> bool {
        self.clip.as_ref().is_some_and(|clip| {
            clip.position() >= clip.length().saturating_sub(self.config.end_tolerance_frames)
        })
    }

    /// Playing, or finished
    ///
    /// A clip in the end window counts as running even though it produces no
    /// audio. Use [`Transport::status`] to tell the two apart.
    pub fn is_running(&self) -> bool {
        self.clip
            .as_ref()
            .is_some_and(|clip| clip.is_running() || self.at_end())
    }

    /// Three-way playback status
    pub fn status(&self) -> PlaybackStatus {
        match self.state() {
            TransportState::NoClip | TransportState::Stopped => PlaybackStatus::Stopped,
            TransportState::Running => PlaybackStatus::Playing,
            TransportState::Ended => PlaybackStatus::Finished,
        }
    }

    /// Apply a logical volume to the clip's gain
    pub fn volume_change(&mut self, logical: f32) {
        if let Some(clip) = &mut self.clip {
            let db = VolumeMapper::new(clip.gain_range()).map(logical);
            clip.set_gain(db);
            tracing::debug!(logical, db, "Volume changed");
        }
    }

    /// Clip length in frames (0 without a clip)
    pub fn clip_length(&self) -> u64 {
        self.clip.as_ref().map_or(0, DecodedClip::length)
    }

    /// Clip position in frames (0 without a clip)
    pub fn clip_position(&self) -> u64 {
        self.clip.as_ref().map_or(0, DecodedClip::position)
    }

    /// Lowest gain of the clip's control
    pub fn min_volume(&self) -> Option<f32> {
        self.gain_range().map(|range| range.min_db)
    }

    /// Highest gain of the clip's control
    pub fn max_volume(&self) -> Option<f32> {
        self.gain_range().map(|range| range.max_db)
    }

    /// Current gain in dB
    pub fn gain(&self) -> Option<f32> {
        self.clip.as_ref().map(DecodedClip::gain)
    }

    /// Gain range of the clip's control
    pub fn gain_range(&self) -> Option<GainRange> {
        self.clip.as_ref().map(DecodedClip::gain_range)
    }

    /// Track of the loaded clip
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.clip.as_ref().map(DecodedClip::track)
    }

    /// PCM format of the loaded clip
    pub fn format(&self) -> Option<PcmFormat> {
        self.clip.as_ref().map(DecodedClip::format)
    }

    /// Like [`Transport::start`], but reports a missing clip or a clip that
    /// is already running
    pub fn try_start(&mut self) -> Result<()> {
        let clip = self.clip.as_mut().ok_or(PlaybackError::NoClip)?;
        if clip.is_running() {
            return Err(PlaybackError::InvalidOperation(
                "clip is already running".to_string(),
            ));
        }
        self.start();
        Ok(())
    }

    /// Like [`Transport::stop`], but reports a missing clip or a clip that is
    /// not running
    pub fn try_stop(&mut self) -> Result<()> {
        let clip = self.clip.as_mut().ok_or(PlaybackError::NoClip)?;
        if !clip.is_running() {
            return Err(PlaybackError::InvalidOperation(
                "clip is not running".to_string(),
            ));
        }
        self.stop();
        Ok(())
    }

    /// Like [`Transport::set_position`], but rejects out-of-range frames
    /// instead of clamping
    pub fn try_set_position(&mut self, frame: u64) -> Result<()> {
        let length = self.clip.as_ref().ok_or(PlaybackError::NoClip)?.length();
        if frame >= length {
            return Err(PlaybackError::InvalidSeekPosition {
                position: frame,
                length,
            });
        }
        self.seek(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubDecoder, VirtualDevice};

    fn loaded(frames: usize) -> (Transport, ClipLoader, VirtualDevice) {
        let device = VirtualDevice::new();
        let mut loader = ClipLoader::new(
            StubDecoder::new().with_default_frames(frames),
            device.clone(),
        );
        let mut transport = Transport::default();
        transport
            .load_track(&mut loader, &TrackRef::new("a.wav"))
            .unwrap();
        (transport, loader, device)
    }

    #[test]
    fn empty_transport_is_inert() {
        let mut transport = Transport::default();
        transport.start();
        transport.stop();
        transport.rewind_to_start();
        transport.set_position(10);
        transport.volume_change(-10.0);

        assert_eq!(transport.state(), TransportState::NoClip);
        assert_eq!(transport.status(), PlaybackStatus::Stopped);
        assert!(!transport.is_running());
        assert!(!transport.at_end());
        assert_eq!(transport.clip_length(), 0);
        assert_eq!(transport.clip_position(), 0);
        assert_eq!(transport.min_volume(), None);
        assert_eq!(transport.max_volume(), None);
    }

    #[test]
    fn start_and_stop() {
        let (mut transport, _loader, device) = loaded(1000);
        assert_eq!(transport.state(), TransportState::Stopped);

        transport.start();
        assert_eq!(transport.state(), TransportState::Running);
        device.advance(300);

        transport.stop();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert_eq!(transport.clip_position(), 300);
    }

    #[test]
    fn seek_preserves_running() {
        let (mut transport, _loader, _device) = loaded(1000);
        transport.start();
        transport.set_position(500);
        assert_eq!(transport.clip_position(), 500);
        assert_eq!(transport.state(), TransportState::Running);

        transport.stop();
        transport.rewind_to_start();
        assert_eq!(transport.clip_position(), 0);
        assert_eq!(transport.state(), TransportState::Stopped);
    }

    #[test]
    fn end_window() {
        let (mut transport, _loader, _device) = loaded(1000);
        transport.set_position(899);
        assert!(!transport.at_end());
        transport.set_position(900);
        assert!(transport.at_end());
        assert!(transport.is_running());
        assert_eq!(transport.status(), PlaybackStatus::Finished);
    }

    #[test]
    fn zero_tolerance_requires_exact_end() {
        let device = VirtualDevice::new();
        let mut loader = ClipLoader::new(StubDecoder::new().with_default_frames(100), device.clone());
        let mut transport = Transport::new(TransportConfig {
            end_tolerance_frames: 0,
        });
        transport
            .load_track(&mut loader, &TrackRef::new("a.wav"))
            .unwrap();

        transport.set_position(99);
        assert!(!transport.at_end());
        transport.start();
        device.advance(1);
        assert!(transport.at_end());
    }

    #[test]
    fn mute_sets_minimum_gain() {
        let (mut transport, _loader, _device) = loaded(1000);
        transport.volume_change(-37.0);
        assert_eq!(transport.gain(), Some(-80.0));
        transport.volume_change(-12.0);
        assert_eq!(transport.gain(), Some(-12.0));
    }

    #[test]
    fn failed_load_leaves_no_clip() {
        let (mut transport, mut loader, device) = loaded(1000);
        device.fail_next_open();
        let result = transport.load_track(&mut loader, &TrackRef::new("b.wav"));
        assert!(result.is_err());
        assert!(!transport.has_clip());
        assert_eq!(device.open_clips(), 0);
    }

    #[test]
    fn load_count_tracks_successful_loads() {
        let (mut transport, mut loader, device) = loaded(1000);
        assert_eq!(transport.load_count(), 1);

        transport
            .load_track(&mut loader, &TrackRef::new("a.wav"))
            .unwrap();
        assert_eq!(transport.load_count(), 2);

        device.fail_next_open();
        assert!(transport
            .load_track(&mut loader, &TrackRef::new("b.wav"))
            .is_err());
        assert_eq!(transport.load_count(), 2);
    }

    #[test]
    fn strict_variants_report_errors() {
        let mut transport = Transport::default();
        assert!(matches!(transport.try_start(), Err(PlaybackError::NoClip)));

        let (mut transport, _loader, _device) = loaded(1000);
        assert!(matches!(
            transport.try_stop(),
            Err(PlaybackError::InvalidOperation(_))
        ));
        assert!(transport.try_start().is_ok());
        assert!(matches!(
            transport.try_set_position(1000),
            Err(PlaybackError::InvalidSeekPosition {
                position: 1000,
                length: 1000
            })
        ));
        assert!(transport.try_set_position(999).is_ok());
        assert_eq!(transport.clip_position(), 999);
    }
}
