//! Track loading
//!
//! Decodes a track fully into PCM and binds it to the output device.

use crate::clip::DecodedClip;
use crate::error::LoadError;
use riff_core::{AudioDecoder, OutputDevice, RiffError, TrackRef};
use std::fmt;

/// Turns tracks into playable clips
pub struct ClipLoader {
    decoder: Box<dyn AudioDecoder>,
    device: Box<dyn OutputDevice>,
}

impl ClipLoader {
    /// Create a loader from a decoder and an output device
    pub fn new(
        decoder: impl AudioDecoder + 'static,
        device: impl OutputDevice + 'static,
    ) -> Self {
        Self {
            decoder: Box::new(decoder),
            device: Box::new(device),
        }
    }

    /// Whether the decoder claims support for this track's format
    pub fn supports(&self, track: &TrackRef) -> bool {
        self.decoder.supports_format(track.path())
    }

    /// Decode a track and open it on the device
    ///
    /// The returned clip is stopped at frame 0.
    pub fn load(&mut self, track: &TrackRef) -> Result<DecodedClip, LoadError> {
        let pcm = self
            .decoder
            .decode(track.path())
            .map_err(|e| LoadError::new(track.clone(), e))?;

        if pcm.frames() == 0 {
            return Err(LoadError::new(
                track.clone(),
                RiffError::decode("no audio frames decoded"),
            ));
        }

        let frames = pcm.frames();
        let format = pcm.format;

        let inner = self
            .device
            .open_clip(pcm)
            .map_err(|e| LoadError::new(track.clone(), e))?;

        let mut clip = DecodedClip::new(track.clone(), inner);
        clip.set_position(0);

        tracing::info!(
            track = %track,
            frames,
            sample_rate = format.sample_rate.as_hz(),
            channels = format.channels,
            "Loaded track"
        );

        Ok(clip)
    }
}

impl fmt::Debug for ClipLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClipLoader").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubDecoder, VirtualDevice};

    #[test]
    fn load_produces_stopped_clip_at_start() {
        let decoder = StubDecoder::new().with_frames("a.wav", 4410);
        let device = VirtualDevice::new();
        let mut loader = ClipLoader::new(decoder, device.clone());

        let clip = loader.load(&TrackRef::new("a.wav")).unwrap();
        assert_eq!(clip.length(), 4410);
        assert_eq!(clip.position(), 0);
        assert!(!clip.is_running());
        assert_eq!(device.open_clips(), 1);
    }

    #[test]
    fn decode_failure_names_track() {
        let decoder = StubDecoder::new();
        decoder.fail_on("broken.mp3");
        let device = VirtualDevice::new();
        let mut loader = ClipLoader::new(decoder, device.clone());

        let err = loader.load(&TrackRef::new("broken.mp3")).unwrap_err();
        assert_eq!(err.track, TrackRef::new("broken.mp3"));
        assert_eq!(device.open_clips(), 0);
    }

    #[test]
    fn empty_decode_is_an_error() {
        let decoder = StubDecoder::new().with_frames("silent.wav", 0);
        let device = VirtualDevice::new();
        let mut loader = ClipLoader::new(decoder, device.clone());

        assert!(loader.load(&TrackRef::new("silent.wav")).is_err());
        assert_eq!(device.total_opened(), 0);
    }

    #[test]
    fn device_failure_is_reported() {
        let device = VirtualDevice::new();
        device.fail_next_open();
        let mut loader = ClipLoader::new(StubDecoder::new(), device.clone());

        let err = loader.load(&TrackRef::new("a.wav")).unwrap_err();
        assert!(matches!(err.source, RiffError::Device(_)));
    }
}
