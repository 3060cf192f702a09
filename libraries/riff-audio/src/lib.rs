//! Riff Player Audio
//!
//! Audio decoding for Riff Player.
//!
//! This crate provides:
//! - Audio decoding via Symphonia (MP3, FLAC, OGG, WAV, AAC)
//! - Normalisation of every source sample format to signed 16-bit PCM at the
//!   source's native sample rate and channel count
//!
//! # Example: Decoding Audio
//!
//! ```rust,no_run
//! use riff_audio::SymphoniaDecoder;
//! use riff_core::AudioDecoder;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut decoder = SymphoniaDecoder::new();
//! let pcm = decoder.decode(Path::new("/music/song.flac"))?;
//!
//! println!(
//!     "Decoded {} frames at {} Hz, {} channels",
//!     pcm.frames(),
//!     pcm.format.sample_rate.as_hz(),
//!     pcm.format.channels
//! );
//! # Ok(())
//! # }
//! ```

mod decoder;
mod error;

pub use decoder::SymphoniaDecoder;
pub use error::{AudioError, Result};
