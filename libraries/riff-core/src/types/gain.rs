/// Master gain range of an opened clip
use serde::{Deserialize, Serialize};

/// Fixed `[min, max]` decibel range of a clip's master gain control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainRange {
    /// Lowest gain in dB (treated as silence)
    pub min_db: f32,

    /// Highest gain in dB
    pub max_db: f32,
}

impl GainRange {
    /// Typical master gain range: -80 dB up to +6.0206 dB (2x amplitude)
    pub const MASTER: Self = Self {
        min_db: -80.0,
        max_db: 6.0206,
    };

    /// Create a new range; bounds are swapped if given in the wrong order
    pub fn new(min_db: f32, max_db: f32) -> Self {
        if min_db <= max_db {
            Self { min_db, max_db }
        } else {
            Self {
                min_db: max_db,
                max_db: min_db,
            }
        }
    }

    /// Clamp a gain value into the range
    pub fn clamp(&self, db: f32) -> f32 {
        if db.is_nan() {
            return self.min_db;
        }
        db.clamp(self.min_db, self.max_db)
    }

    /// Default gain of a freshly opened clip (unity, clamped into range)
    pub fn default_gain(&self) -> f32 {
        self.clamp(0.0)
    }

    /// Convert a gain in dB to a linear amplitude multiplier
    ///
    /// The range minimum maps to silence.
    pub fn db_to_linear(&self, db: f32) -> f32 {
        let db = self.clamp(db);
        if db <= self.min_db {
            0.0
        } else {
            10.0_f32.powf(db / 20.0)
        }
    }
}

impl Default for GainRange {
    fn default() -> Self {
        Self::MASTER
    }
}
