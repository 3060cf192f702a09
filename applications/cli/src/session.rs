/// Front-end rules layered over the player
use crate::command::{Command, Flow};
use crate::error::Result;
use riff_core::TrackRef;
use riff_playback::{PlaybackStatus, Player};

/// Terminal session state
///
/// Every freshly loaded clip starts at the volume slider's default value,
/// whichever operation loaded it. Once input has ended the session plays to
/// the end of the playlist instead of wrapping around forever.
#[derive(Debug)]
pub struct Session {
    loads_seen: u64,
    interactive: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            loads_seen: 0,
            interactive: true,
        }
    }

    /// No more commands will arrive
    pub fn end_input(&mut self) {
        self.interactive = false;
    }

    /// Load the first playlist track, starting it when `autoplay` is set
    pub fn start(&mut self, player: &mut Player, autoplay: bool) -> Result<Option<TrackRef>> {
        let result = player.load_next();
        self.reset_volume(player);
        let track = result?;
        if autoplay && track.is_some() {
            player.start();
        }
        Ok(track)
    }

    /// Apply a user command
    pub fn apply(&mut self, command: Command, player: &mut Player) -> Result<Flow> {
        let result = command.apply(player);
        self.reset_volume(player);
        result
    }

    /// Periodic update
    ///
    /// Always continues while interactive. Without input, exits once
    /// playback has stopped or auto-advance has wrapped to the first track.
    pub fn tick(&mut self, player: &mut Player) -> Flow {
        let status = player.tick();
        let loaded = self.reset_volume(player);

        if self.interactive {
            return Flow::Continue;
        }
        if status != PlaybackStatus::Playing {
            return Flow::Exit;
        }
        if loaded && wrapped_to_start(player) {
            tracing::info!("End of playlist");
            player.stop();
            return Flow::Exit;
        }
        Flow::Continue
    }

    /// Set the slider's default volume if a clip was loaded since the last
    /// call; returns whether one was
    pub fn reset_volume(&mut self, player: &mut Player) -> bool {
        let loads = player.transport().load_count();
        if loads == self.loads_seen {
            return false;
        }
        self.loads_seen = loads;
        let value = player.volume_mapper().default_slider_value();
        player.volume_change(value as f32);
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks whose format the decoder supports; the rest are skipped with a
/// warning
pub fn playable_tracks<I>(player: &Player, tracks: I) -> Vec<TrackRef>
where
    I: IntoIterator<Item = TrackRef>,
{
    tracks
        .into_iter()
        .filter(|track| {
            let supported = player.supports(track);
            if !supported {
                tracing::warn!(track = %track, "Skipping unsupported format");
            }
            supported
        })
        .collect()
}

/// Whether the last forward load took the first playlist track
///
/// The cursor sits one past the loaded track.
fn wrapped_to_start(player: &Player) -> bool {
    let playlist = player.playlist();
    !playlist.is_empty() && playlist.index() == 1 % playlist.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use riff_playback::test_utils::{StubDecoder, VirtualDevice};
    use riff_playback::{ClipLoader, PlayerConfig};

    fn player(tracks: usize) -> (Player, VirtualDevice) {
        let device = VirtualDevice::new();
        let loader = ClipLoader::new(StubDecoder::new().with_default_frames(1000), device.clone());
        let mut player = Player::new(loader, PlayerConfig::default());
        player.set_playlist((0..tracks).map(|i| TrackRef::new(format!("{}.wav", i))));
        (player, device)
    }

    #[test]
    fn volume_resets_once_per_load() {
        let (mut player, _device) = player(2);
        let mut session = Session::new();
        session.start(&mut player, false).unwrap();
        assert_eq!(player.transport().gain(), Some(-15.0));

        player.volume_change(-3.0);
        assert!(!session.reset_volume(&mut player));
        assert_eq!(player.transport().gain(), Some(-3.0));
    }

    #[test]
    fn wrap_detection_follows_the_cursor() {
        let (mut player, _device) = player(3);
        player.load_next().unwrap();
        assert!(wrapped_to_start(&player));
        player.load_next().unwrap();
        assert!(!wrapped_to_start(&player));
        player.load_next().unwrap();
        assert!(!wrapped_to_start(&player));
        player.load_next().unwrap();
        assert!(wrapped_to_start(&player));
    }

    #[test]
    fn unsupported_files_are_skipped() {
        let decoder = StubDecoder::new();
        decoder.reject_format("cover.jpg");
        let player = Player::new(
            ClipLoader::new(decoder, VirtualDevice::new()),
            PlayerConfig::default(),
        );

        let files = ["a.flac", "cover.jpg", "b.mp3"].map(TrackRef::new);
        assert_eq!(
            playable_tracks(&player, files),
            vec![TrackRef::new("a.flac"), TrackRef::new("b.mp3")]
        );
    }

    #[test]
    fn failed_start_leaves_session_usable() {
        let device = VirtualDevice::new();
        let decoder = StubDecoder::new();
        decoder.fail_on("0.wav");
        let mut player = Player::new(ClipLoader::new(decoder, device), PlayerConfig::default());
        player.set_playlist([TrackRef::new("0.wav")]);

        let mut session = Session::new();
        assert!(session.start(&mut player, true).is_err());
        assert!(!player.has_clip());
        session.end_input();
        assert_eq!(session.tick(&mut player), Flow::Exit);
    }
}
