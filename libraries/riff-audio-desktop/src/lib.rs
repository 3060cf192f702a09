//! Desktop audio output for Riff Player using cpal
//!
//! This crate provides `CpalOutput`, the desktop implementation of the
//! `OutputDevice` trait. Each opened clip owns a cpal output stream on a
//! dedicated thread.
//!
//! # Features
//!
//! - Cross-platform output through cpal
//! - Source rate and channel count used directly when the device supports it
//! - Nearest-sample rate adaptation and channel mapping otherwise
//! - Gain control in dB
//!
//! # Example
//!
//! ```no_run
//! use riff_audio_desktop::CpalOutput;
//! use riff_core::{OutputDevice, PcmBuffer, PcmFormat};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut output = CpalOutput::new()?;
//!
//! // One second of stereo silence
//! let pcm = PcmBuffer::new(vec![0; 44_100 * 2], PcmFormat::cd_quality());
//! let mut clip = output.open_clip(pcm)?;
//!
//! clip.set_gain(-6.0);
//! clip.start();
//! clip.stop();
//! clip.close();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod output;

pub use error::{DeviceError, Result};
pub use output::{CpalClip, CpalOutput};
