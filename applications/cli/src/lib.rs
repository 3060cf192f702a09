//! Riff Player - terminal front end
//!
//! Configuration, command parsing and status rendering for the
//! `riff-player` binary. The playback engine itself lives in
//! `riff-playback`.

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod session;

pub use command::{Command, Flow};
pub use config::PlayerSettings;
pub use display::{format_frames, StatusSnapshot};
pub use error::{CliError, Result};
pub use session::{playable_tracks, Session};
