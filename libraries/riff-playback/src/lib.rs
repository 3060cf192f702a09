//! Riff Player - Playback Engine
//!
//! Platform-agnostic playback engine for Riff Player.
//!
//! This crate provides:
//! - Track loading (decode fully, bind to an output device)
//! - Transport control (start, stop, seek, rewind) over a single clip
//! - Volume mapping onto a clip's gain range, with a mute point
//! - Playlist navigation with wraparound
//! - Change notification for presentation code
//!
//! # Architecture
//!
//! `riff-playback` has no audio backend of its own:
//! - No dependency on cpal (desktop audio)
//! - No dependency on symphonia (decoding)
//! - Owns no timer or thread
//!
//! Decoding and output are provided through the `AudioDecoder` and
//! `OutputDevice` traits from `riff-core`. The caller drives periodic
//! updates by calling [`Player::tick`].
//!
//! # Example: Playlist and Volume
//!
//! ```rust
//! use riff_playback::{PlaylistNavigator, VolumeMapper};
//! use riff_core::{GainRange, TrackRef};
//!
//! let mut playlist = PlaylistNavigator::new();
//! playlist.set_playlist(vec![TrackRef::new("a.mp3"), TrackRef::new("b.mp3")]);
//!
//! assert_eq!(playlist.next_track(), Some(TrackRef::new("a.mp3")));
//! assert_eq!(playlist.prev_track(), Some(TrackRef::new("a.mp3")));
//!
//! let volume = VolumeMapper::new(GainRange::MASTER);
//! assert_eq!(volume.map(volume.mute_point()), -80.0);
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,ignore
//! use riff_playback::{ClipLoader, Player, PlayerConfig};
//!
//! let loader = ClipLoader::new(my_decoder, my_output_device);
//! let mut player = Player::new(loader, PlayerConfig::default());
//!
//! player.subscribe(|p| println!("{} / {}", p.clip_position(), p.clip_length()));
//! player.set_playlist(tracks);
//! player.load_next()?;
//! player.start();
//!
//! // From the application's timer
//! player.tick();
//! ```

mod clip;
mod error;
mod loader;
mod notifier;
mod player;
mod playlist;
mod transport;
pub mod types;
mod volume;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Public exports
pub use clip::DecodedClip;
pub use error::{LoadError, PlaybackError, Result};
pub use loader::ClipLoader;
pub use notifier::{ChangeNotifier, SubscriptionId};
pub use player::{LoadResult, Player};
pub use playlist::PlaylistNavigator;
pub use transport::Transport;
pub use types::{
    PlaybackStatus, PlayerConfig, TransportConfig, TransportState, DEFAULT_END_TOLERANCE_FRAMES,
};
pub use volume::VolumeMapper;
