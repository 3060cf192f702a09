//! Riff Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Riff Player.
//!
//! This crate provides the foundational building blocks shared by the decoder,
//! the desktop output device and the playback engine.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackRef`, `PcmFormat`, `PcmBuffer`, `GainRange`
//! - **Core Traits**: `AudioDecoder`, `OutputDevice`, `DeviceClip`
//! - **Error Handling**: Unified `RiffError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use riff_core::{PcmBuffer, PcmFormat, SampleRate, TrackRef};
//!
//! let track = TrackRef::new("/music/song.wav");
//! assert_eq!(track.name(), "song.wav");
//!
//! // One second of stereo silence at CD rate
//! let format = PcmFormat::s16_le(SampleRate::CD_QUALITY, 2);
//! let buffer = PcmBuffer::new(vec![0; 44_100 * 2], format);
//! assert_eq!(buffer.frames(), 44_100);
//! assert_eq!(format.frame_size(), 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RiffError};
pub use traits::{AudioDecoder, DeviceClip, OutputDevice};
pub use types::{GainRange, PcmBuffer, PcmFormat, SampleRate, TrackRef};
