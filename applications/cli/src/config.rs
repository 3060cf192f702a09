/// Player configuration
use crate::error::{CliError, Result};
use riff_playback::{PlayerConfig, TransportConfig, DEFAULT_END_TOLERANCE_FRAMES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "riff.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    /// Status refresh cadence
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Frames before the end of a track at which it counts as finished
    #[serde(default = "default_end_tolerance_frames")]
    pub end_tolerance_frames: u64,

    /// Move on to the next playlist track when one finishes
    #[serde(default = "default_true")]
    pub auto_advance: bool,

    /// Start playing the first track right after loading
    #[serde(default = "default_true")]
    pub autoplay: bool,

    /// Tracing filter directive (overrides `RUST_LOG`)
    #[serde(default)]
    pub log_filter: Option<String>,
}

impl PlayerSettings {
    /// Load configuration from file and environment
    ///
    /// Reads `path` if given (it must exist), otherwise `riff.toml` in the
    /// working directory if present, then `RIFF_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (RIFF_TICK_INTERVAL_MS, ...)
        settings = settings.add_source(config::Environment::with_prefix("RIFF").try_parsing(true));

        let config = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let settings: Self = config
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(CliError::Config(
                "tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Core player configuration derived from these settings
    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            transport: TransportConfig {
                end_tolerance_frames: self.end_tolerance_frames,
            },
            auto_advance: self.auto_advance,
        }
    }
}

// Default values
fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_end_tolerance_frames() -> u64 {
    DEFAULT_END_TOLERANCE_FRAMES
}

fn default_true() -> bool {
    true
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            end_tolerance_frames: default_end_tolerance_frames(),
            auto_advance: true,
            autoplay: true,
            log_filter: None,
        }
    }
}
