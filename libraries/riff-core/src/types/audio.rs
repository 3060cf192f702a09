/// Audio-related types
use serde::{Deserialize, Serialize};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

/// Playback format of decoded PCM
///
/// Always signed 16-bit samples; only sample rate and channel count follow
/// the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PcmFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,

    /// Bits per sample (always 16)
    pub bits_per_sample: u16,

    /// Byte order of the frame layout (always little-endian)
    pub big_endian: bool,
}

impl PcmFormat {
    /// Signed 16-bit little-endian PCM at the given rate and channel count
    pub fn s16_le(sample_rate: SampleRate, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample: 16,
            big_endian: false,
        }
    }

    /// Create CD quality stereo format (44.1kHz, 16-bit, stereo)
    pub fn cd_quality() -> Self {
        Self::s16_le(SampleRate::CD_QUALITY, 2)
    }

    /// Bytes per frame (channels × 2)
    pub fn frame_size(&self) -> usize {
        self.channels as usize * 2
    }

    /// Calculate the byte rate (bytes per second)
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.as_hz() * u32::from(self.channels) * u32::from(self.bits_per_sample) / 8
    }
}

/// Decoded PCM samples
///
/// Interleaved format: [L, R, L, R, ...] for stereo
#[derive(Debug, Clone)]
pub struct PcmBuffer {
    /// Audio samples (i16, interleaved)
    pub samples: Vec<i16>,

    /// Audio format information
    pub format: PcmFormat,
}

impl PcmBuffer {
    /// Create a new PCM buffer
    pub fn new(samples: Vec<i16>, format: PcmFormat) -> Self {
        Self { samples, format }
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.format.channels == 0 {
            return 0;
        }
        self.samples.len() / self.format.channels as usize
    }

    /// Get the duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.format.sample_rate.as_hz() as f64
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the length in samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }
}
