//! Player facade
//!
//! Combines the loader, transport, playlist navigator and change notifier
//! behind one owner. Every public mutating operation announces exactly once
//! when it finishes, including loads that fail.

use crate::error::LoadError;
use crate::loader::ClipLoader;
use crate::notifier::{ChangeNotifier, SubscriptionId};
use crate::playlist::PlaylistNavigator;
use crate::transport::Transport;
use crate::types::{PlaybackStatus, PlayerConfig, TransportState};
use crate::volume::VolumeMapper;
use riff_core::{GainRange, TrackRef};
use std::fmt;

/// Result of a playlist load: the track that was loaded, or `None` without
/// a playlist
pub type LoadResult = Result<Option<TrackRef>, LoadError>;

/// Playback engine facade
///
/// Single-owner and driven from one control thread. Observers registered
/// with [`Player::subscribe`] get a read-only view after each change.
pub struct Player {
    loader: ClipLoader,
    transport: Transport,
    playlist: PlaylistNavigator,
    notifier: ChangeNotifier<Player>,
    config: PlayerConfig,
}

impl Player {
    /// Create a player with nothing loaded
    pub fn new(loader: ClipLoader, config: PlayerConfig) -> Self {
        Self {
            loader,
            transport: Transport::new(config.transport),
            playlist: PlaylistNavigator::new(),
            notifier: ChangeNotifier::new(),
            config,
        }
    }

    /// Player configuration
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Register a change observer
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Player) + Send + 'static,
    {
        self.notifier.subscribe(observer)
    }

    /// Remove a change observer
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Notify every observer
    ///
    /// The notifier is detached while observers run, so they only ever see
    /// a consistent `&Player`.
    pub fn announce_changes(&mut self) {
        let mut notifier = std::mem::take(&mut self.notifier);
        notifier.announce(self);
        self.notifier = notifier;
    }

    // ===== Loading =====

    /// Load a single track, replacing the current clip
    pub fn load_track(&mut self, track: TrackRef) -> Result<(), LoadError> {
        let result = self.transport.load_track(&mut self.loader, &track);
        self.announce_changes();
        result
    }

    /// Load the playlist track at the cursor, then advance the cursor
    ///
    /// The cursor moves even if the load fails.
    pub fn load_next(&mut self) -> LoadResult {
        let result = self.load_next_quiet();
        self.announce_changes();
        result
    }

    /// Step the cursor back, then load the track there
    pub fn load_prev(&mut self) -> LoadResult {
        let result = self.load_prev_quiet();
        self.announce_changes();
        result
    }

    fn load_next_quiet(&mut self) -> LoadResult {
        match self.playlist.next_track() {
            Some(track) => self.load_quiet(track).map(Some),
            None => Ok(None),
        }
    }

    fn load_prev_quiet(&mut self) -> LoadResult {
        match self.playlist.prev_track() {
            Some(track) => self.load_quiet(track).map(Some),
            None => Ok(None),
        }
    }

    fn load_quiet(&mut self, track: TrackRef) -> Result<TrackRef, LoadError> {
        self.transport.load_track(&mut self.loader, &track)?;
        Ok(track)
    }

    /// Whether the decoder claims support for this track's format
    pub fn supports(&self, track: &TrackRef) -> bool {
        self.loader.supports(track)
    }

    /// Replace the playlist; an empty collection clears it
    pub fn set_playlist<I>(&mut self, tracks: I)
    where
        I: IntoIterator<Item = TrackRef>,
    {
        self.playlist.set_playlist(tracks);
        tracing::info!(tracks = self.playlist.len(), "Playlist set");
        self.announce_changes();
    }

    /// Remove the playlist
    pub fn clear_playlist(&mut self) {
        self.playlist.clear();
        self.announce_changes();
    }

    /// Whether a playlist is set
    pub fn has_playlist(&self) -> bool {
        self.playlist.has_playlist()
    }

    /// Playlist navigator (read-only)
    pub fn playlist(&self) -> &PlaylistNavigator {
        &self.playlist
    }

    // ===== Transport =====

    /// Start playback
    pub fn start(&mut self) {
        self.transport.start();
        self.announce_changes();
    }

    /// Pause playback
    pub fn stop(&mut self) {
        self.transport.stop();
        self.announce_changes();
    }

    /// Seek to frame 0
    pub fn rewind_to_start(&mut self) {
        self.transport.rewind_to_start();
        self.announce_changes();
    }

    /// Seek to a frame
    pub fn set_position(&mut self, frame: u64) {
        self.transport.set_position(frame);
        self.announce_changes();
    }

    /// Apply a logical volume
    pub fn volume_change(&mut self, logical: f32) {
        self.transport.volume_change(logical);
        self.announce_changes();
    }

    /// Whether a clip is loaded
    pub fn has_clip(&self) -> bool {
        self.transport.has_clip()
    }

    /// Playing or finished (see [`Transport::is_running`])
    pub fn is_running(&self) -> bool {
        self.transport.is_running()
    }

    /// Whether the clip is in its end window
    pub fn at_end(&self) -> bool {
        self.transport.at_end()
    }

    /// Three-way playback status
    pub fn status(&self) -> PlaybackStatus {
        self.transport.status()
    }

    /// Transport state
    pub fn state(&self) -> TransportState {
        self.transport.state()
    }

    /// Clip length in frames
    pub fn clip_length(&self) -> u64 {
        self.transport.clip_length()
    }

    /// Clip position in frames
    pub fn clip_position(&self) -> u64 {
        self.transport.clip_position()
    }

    /// Lowest gain, or the default range's minimum without a clip
    pub fn min_volume(&self) -> f32 {
        self.transport
            .min_volume()
            .unwrap_or(GainRange::MASTER.min_db)
    }

    /// Highest gain, or the default range's maximum without a clip
    pub fn max_volume(&self) -> f32 {
        self.transport
            .max_volume()
            .unwrap_or(GainRange::MASTER.max_db)
    }

    /// Volume mapping for the loaded clip (default range without one)
    pub fn volume_mapper(&self) -> VolumeMapper {
        VolumeMapper::new(self.transport.gain_range().unwrap_or_default())
    }

    /// Track of the loaded clip
    pub fn current_track(&self) -> Option<&TrackRef> {
        self.transport.current_track()
    }

    /// Transport controller (read-only)
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // ===== Presentation helpers =====

    /// Play/pause button
    ///
    /// At the end of a track, restart it from the beginning.
    pub fn toggle_play(&mut self) {
        match self.transport.status() {
            PlaybackStatus::Finished => {
                self.transport.rewind_to_start();
                self.transport.start();
            }
            PlaybackStatus::Stopped => self.transport.start(),
            PlaybackStatus::Playing => self.transport.stop(),
        }
        self.announce_changes();
    }

    /// Next button: load the next playlist track, resuming if we were running
    pub fn skip_next(&mut self) -> LoadResult {
        let was_running = self.transport.is_running();
        let result = self.load_next_quiet();
        self.resume_if(was_running, &result);
        self.announce_changes();
        result
    }

    /// Previous button: load the previous playlist track, resuming if we were
    /// running
    pub fn skip_previous(&mut self) -> LoadResult {
        let was_running = self.transport.is_running();
        let result = self.load_prev_quiet();
        self.resume_if(was_running, &result);
        self.announce_changes();
        result
    }

    /// Rewind button
    ///
    /// At frame 0 with a playlist, step the cursor back and load the track
    /// there; otherwise seek back to the start of the current one. After a
    /// forward load the cursor sits one past the loaded track, so the first
    /// step back reloads that same track and only a second one reaches the
    /// previous track.
    pub fn rewind_or_previous(&mut self) -> LoadResult {
        let result = if self.playlist.has_playlist() && self.transport.clip_position() == 0 {
            self.load_prev_quiet()
        } else {
            self.transport.rewind_to_start();
            Ok(None)
        };
        self.announce_changes();
        result
    }

    fn resume_if(&mut self, was_running: bool, result: &LoadResult) {
        if was_running && matches!(result, Ok(Some(_))) {
            self.transport.start();
        }
    }

    /// Periodic update
    ///
    /// Call from an external timer. Auto-advances to the next playlist track
    /// when the current one has finished, then announces.
    pub fn tick(&mut self) -> PlaybackStatus {
        if self.config.auto_advance && self.transport.at_end() && self.playlist.has_playlist() {
            match self.load_next_quiet() {
                Ok(Some(track)) => {
                    tracing::info!(track = %track, "Advancing to next track");
                    self.transport.start();
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Auto-advance failed"),
            }
        }
        self.announce_changes();
        self.transport.status()
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("transport", &self.transport)
            .field("playlist", &self.playlist)
            .field("notifier", &self.notifier)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubDecoder, VirtualDevice};
    use std::sync::{Arc, Mutex};

    fn player() -> (Player, VirtualDevice, StubDecoder) {
        let device = VirtualDevice::new();
        let decoder = StubDecoder::new().with_default_frames(1000);
        let loader = ClipLoader::new(decoder.clone(), device.clone());
        (Player::new(loader, PlayerConfig::default()), device, decoder)
    }

    fn tracks(n: usize) -> Vec<TrackRef> {
        (0..n)
            .map(|i| TrackRef::new(format!("/music/{}.wav", i)))
            .collect()
    }

    #[test]
    fn every_operation_announces_once() {
        let (mut player, _device, _decoder) = player();
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        player.subscribe(move |_| *counter.lock().unwrap() += 1);

        player.load_track(TrackRef::new("a.wav")).unwrap();
        player.start();
        player.stop();
        player.set_position(10);
        player.rewind_to_start();
        player.volume_change(-5.0);
        player.tick();

        assert_eq!(*count.lock().unwrap(), 7);
    }

    #[test]
    fn failed_load_still_announces() {
        let (mut player, _device, decoder) = player();
        decoder.fail_on("bad.wav");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        player.subscribe(move |p: &Player| log.lock().unwrap().push(p.has_clip()));

        assert!(player.load_track(TrackRef::new("bad.wav")).is_err());
        assert_eq!(*seen.lock().unwrap(), vec![false]);
    }

    #[test]
    fn observers_see_current_state() {
        let (mut player, _device, _decoder) = player();
        let seen = Arc::new(Mutex::new(None));
        let log = Arc::clone(&seen);
        player.subscribe(move |p: &Player| {
            *log.lock().unwrap() = p.current_track().cloned();
        });

        player.load_track(TrackRef::new("x.wav")).unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(TrackRef::new("x.wav")));
    }

    #[test]
    fn unsubscribed_observer_is_silent() {
        let (mut player, _device, _decoder) = player();
        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        let id = player.subscribe(move |_| *counter.lock().unwrap() += 1);
        player.start();
        assert!(player.unsubscribe(id));
        player.start();
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn toggle_play_cycles() {
        let (mut player, device, _decoder) = player();
        player.load_track(TrackRef::new("a.wav")).unwrap();

        player.toggle_play();
        assert_eq!(player.status(), PlaybackStatus::Playing);
        player.toggle_play();
        assert_eq!(player.status(), PlaybackStatus::Stopped);

        player.toggle_play();
        device.advance(1000);
        assert_eq!(player.status(), PlaybackStatus::Finished);

        player.toggle_play();
        assert_eq!(player.status(), PlaybackStatus::Playing);
        assert_eq!(player.clip_position(), 0);
    }

    #[test]
    fn skip_resumes_only_when_running() {
        let (mut player, _device, _decoder) = player();
        player.set_playlist(tracks(3));

        assert_eq!(player.skip_next().unwrap(), Some(tracks(3)[0].clone()));
        assert_eq!(player.status(), PlaybackStatus::Stopped);

        player.start();
        assert_eq!(player.skip_next().unwrap(), Some(tracks(3)[1].clone()));
        assert_eq!(player.status(), PlaybackStatus::Playing);

        assert_eq!(player.skip_previous().unwrap(), Some(tracks(3)[1].clone()));
        assert_eq!(player.status(), PlaybackStatus::Playing);
    }

    #[test]
    fn rewind_or_previous() {
        let (mut player, _device, _decoder) = player();
        player.set_playlist(tracks(3));
        player.load_next().unwrap();
        player.load_next().unwrap();
        assert_eq!(player.current_track(), Some(&tracks(3)[1]));

        player.set_position(500);
        assert_eq!(player.rewind_or_previous().unwrap(), None);
        assert_eq!(player.clip_position(), 0);
        assert_eq!(player.current_track(), Some(&tracks(3)[1]));

        assert_eq!(
            player.rewind_or_previous().unwrap(),
            Some(tracks(3)[1].clone())
        );
    }

    #[test]
    fn rewind_without_playlist_stays_on_track() {
        let (mut player, _device, _decoder) = player();
        player.load_track(TrackRef::new("solo.wav")).unwrap();
        assert_eq!(player.rewind_or_previous().unwrap(), None);
        assert_eq!(player.current_track(), Some(&TrackRef::new("solo.wav")));
    }

    #[test]
    fn tick_without_auto_advance_stays_finished() {
        let device = VirtualDevice::new();
        let loader = ClipLoader::new(StubDecoder::new().with_default_frames(500), device.clone());
        let mut player = Player::new(
            loader,
            PlayerConfig {
                auto_advance: false,
                ..PlayerConfig::default()
            },
        );
        player.set_playlist(tracks(2));
        player.load_next().unwrap();
        player.start();
        device.advance(500);

        assert_eq!(player.tick(), PlaybackStatus::Finished);
        assert_eq!(player.current_track(), Some(&tracks(2)[0]));
    }

    #[test]
    fn supports_asks_the_decoder() {
        let (player, _device, decoder) = player();
        decoder.reject_format("notes.txt");
        assert!(player.supports(&TrackRef::new("a.wav")));
        assert!(!player.supports(&TrackRef::new("notes.txt")));
    }

    #[test]
    fn volume_readers_fall_back_to_default_range() {
        let (player, _device, _decoder) = player();
        assert_eq!(player.min_volume(), -80.0);
        assert_eq!(player.max_volume(), 6.0206);
        assert_eq!(player.volume_mapper().mute_point(), -37.0);
    }
}
