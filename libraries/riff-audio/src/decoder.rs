/// Audio decoder implementation using Symphonia
use crate::error::{AudioError, Result};
use riff_core::{AudioDecoder as AudioDecoderTrait, PcmBuffer, PcmFormat, SampleRate};
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

/// Fallback sample rate when the codec does not report one
const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Audio decoder using Symphonia
///
/// Supports: MP3, FLAC, OGG/Vorbis, WAV, AAC
///
/// Decodes the whole default track into memory as interleaved signed 16-bit
/// PCM. Sample rate and channel layout are kept as-is; no downmixing or
/// resampling takes place.
pub struct SymphoniaDecoder {
    _private: (),
}

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Decode a file into 16-bit PCM
    fn decode_file(path: &Path) -> Result<PcmBuffer> {
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;

        let mut format = probed.format;

        // Default track, or the first one with a known codec
        let track = format
            .default_track()
            .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .or_else(|| {
                format
                    .tracks()
                    .iter()
                    .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            })
            .ok_or_else(|| AudioError::UnsupportedFormat("no decodable audio track".into()))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;
        let mut channels = track.codec_params.channels.map(|c| c.count() as u16);
        let expected_frames = track.codec_params.n_frames;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())?;

        let mut samples: Vec<i16> = match (expected_frames, channels) {
            (Some(frames), Some(ch)) => Vec::with_capacity(frames as usize * ch as usize),
            _ => Vec::new(),
        };

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            // Skip packets that are not for the selected track
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    tracing::warn!(path = %path.display(), "Skipping corrupt packet: {}", e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let spec = *decoded.spec();
            sample_rate.get_or_insert(spec.rate);
            channels.get_or_insert(spec.channels.count() as u16);

            Self::append_interleaved(decoded, &mut samples);
        }

        let channels = channels.unwrap_or(2);
        if samples.is_empty() || channels == 0 {
            return Err(AudioError::Empty);
        }

        let format = PcmFormat::s16_le(
            SampleRate::new(sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)),
            channels,
        );

        tracing::debug!(
            path = %path.display(),
            frames = samples.len() / channels as usize,
            sample_rate = format.sample_rate.as_hz(),
            channels,
            "Decoded track"
        );

        Ok(PcmBuffer::new(samples, format))
    }

    /// Append a decoded Symphonia buffer to `out` as interleaved i16
    fn append_interleaved(decoded: AudioBufferRef, out: &mut Vec<i16>) {
        match decoded {
            AudioBufferRef::F32(buf) => Self::interleave(&buf, out, |s| float_to_i16(s as f64)),
            AudioBufferRef::F64(buf) => Self::interleave(&buf, out, float_to_i16),
            AudioBufferRef::S32(buf) => Self::interleave(&buf, out, |s| (s >> 16) as i16),
            AudioBufferRef::S24(buf) => Self::interleave(&buf, out, |s| (s.inner() >> 8) as i16),
            AudioBufferRef::S16(buf) => Self::interleave(&buf, out, |s| s),
            AudioBufferRef::S8(buf) => Self::interleave(&buf, out, |s| i16::from(s) << 8),
            AudioBufferRef::U32(buf) => {
                Self::interleave(&buf, out, |s| ((i64::from(s) - (1 << 31)) >> 16) as i16)
            }
            AudioBufferRef::U24(buf) => Self::interleave(&buf, out, |s| {
                ((s.inner() as i32 - (1 << 23)) >> 8) as i16
            }),
            AudioBufferRef::U16(buf) => {
                Self::interleave(&buf, out, |s| (i32::from(s) - (1 << 15)) as i16)
            }
            AudioBufferRef::U8(buf) => {
                Self::interleave(&buf, out, |s| (i16::from(s) - (1 << 7)) << 8)
            }
        }
    }

    /// Interleave all planes of `buf` into `out`, converting each sample
    fn interleave<T, F>(buf: &AudioBuffer<T>, out: &mut Vec<i16>, convert: F)
    where
        T: Sample + Copy,
        F: Fn(T) -> i16,
    {
        let channels = buf.spec().channels.count();
        let frames = buf.frames();
        out.reserve(frames * channels);

        for frame in 0..frames {
            for ch in 0..channels {
                out.push(convert(buf.chan(ch)[frame]));
            }
        }
    }
}

/// Scale a float sample in [-1.0, 1.0] to i16, clamping overs
fn float_to_i16(sample: f64) -> i16 {
    (sample.clamp(-1.0, 1.0) * f64::from(i16::MAX)).round() as i16
}

impl Default for SymphoniaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioDecoderTrait for SymphoniaDecoder {
    fn decode(&mut self, path: &Path) -> riff_core::Result<PcmBuffer> {
        Self::decode_file(path).map_err(Into::into)
    }

    fn supports_format(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            matches!(
                ext.to_lowercase().as_str(),
                "mp3" | "flac" | "ogg" | "oga" | "wav" | "wave" | "m4a" | "aac"
            )
        } else {
            false
        }
    }
}
