//! Playlist navigation
//!
//! Ordered track list with a wrapping cursor. `next_track` hands out the
//! current entry and then advances; `prev_track` steps back first and then
//! hands out the entry, so the two undo each other across the wrap boundary.

use riff_core::TrackRef;

/// Ordered playlist with a current index
#[derive(Debug, Clone, Default)]
pub struct PlaylistNavigator {
    /// Tracks in play order (empty = no playlist)
    tracks: Vec<TrackRef>,

    /// Index of the next track to hand out; always < len when non-empty
    index: usize,
}

impl PlaylistNavigator {
    /// Create an empty navigator
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the playlist and reset the index to 0
    ///
    /// An empty collection clears the playlist.
    pub fn set_playlist<I>(&mut self, tracks: I)
    where
        I: IntoIterator<Item = TrackRef>,
    {
        self.tracks = tracks.into_iter().collect();
        self.index = 0;
    }

    /// Remove all tracks
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.index = 0;
    }

    /// Whether a playlist is set
    pub fn has_playlist(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the playlist is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Current index
    pub fn index(&self) -> usize {
        self.index
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[TrackRef] {
        &self.tracks
    }

    /// Track that `next_track` would return, without advancing
    pub fn peek_next(&self) -> Option<&TrackRef> {
        self.tracks.get(self.index)
    }

    /// Return the track at the current index, then advance (wrapping to 0)
    pub fn next_track(&mut self) -> Option<TrackRef> {
        let track = self.tracks.get(self.index)?.clone();
        self.index += 1;
        if self.index >= self.tracks.len() {
            self.index = 0;
        }
        Some(track)
    }

    /// Step back (wrapping to the last track), then return the track there
    pub fn prev_track(&mut self) -> Option<TrackRef> {
        if self.tracks.is_empty() {
            return None;
        }
        self.index = match self.index {
            0 => self.tracks.len() - 1,
            i => i - 1,
        };
        Some(self.tracks[self.index].clone())
    }
}
