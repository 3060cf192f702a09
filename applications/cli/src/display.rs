/// Status rendering for the terminal
use riff_playback::{PlaybackStatus, Player};
use serde::Serialize;

/// Format a frame count as `m:ss`
///
/// A zero sample rate formats as `0:00`.
pub fn format_frames(frames: u64, sample_rate: u32) -> String {
    if sample_rate == 0 {
        return "0:00".to_string();
    }
    let seconds = frames / u64::from(sample_rate);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Snapshot of what a status line shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub track: Option<String>,
    pub status: PlaybackStatus,
    pub position_frames: u64,
    pub length_frames: u64,
    pub position: String,
    pub length: String,
    pub gain_db: Option<f32>,
    pub playlist_index: Option<usize>,
    pub playlist_len: usize,
}

impl StatusSnapshot {
    pub fn from_player(player: &Player) -> Self {
        let transport = player.transport();
        let rate = transport
            .format()
            .map_or(0, |format| format.sample_rate.as_hz());
        let position_frames = player.clip_position();
        let length_frames = player.clip_length();

        Self {
            track: player.current_track().map(|t| t.name()),
            status: player.status(),
            position_frames,
            length_frames,
            position: format_frames(position_frames, rate),
            length: format_frames(length_frames, rate),
            gain_db: transport.gain(),
            playlist_index: player
                .has_playlist()
                .then(|| player.playlist().index()),
            playlist_len: player.playlist().len(),
        }
    }

    /// One-line human-readable form
    pub fn to_line(&self) -> String {
        let state = match self.status {
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Stopped => "paused",
            PlaybackStatus::Finished => "finished",
        };
        match &self.track {
            Some(track) => {
                let gain = self
                    .gain_db
                    .map(|db| format!(" [{:+.1} dB]", db))
                    .unwrap_or_default();
                format!(
                    "[{}] {} {}/{}{}",
                    state, track, self.position, self.length, gain
                )
            }
            None => "[no track]".to_string(),
        }
    }

    /// JSON form
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.to_line())
    }
}
