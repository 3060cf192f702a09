//! Volume mapping onto a clip's master gain control
//!
//! The logical volume handed in by presentation code is already expressed in
//! the device's decibel range. The only special case is the truncated
//! midpoint of that range, which means "mute" and maps to the range minimum.

use riff_core::GainRange;

/// Maps logical volume values onto a clip's gain range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMapper {
    range: GainRange,
}

impl VolumeMapper {
    /// Create a mapper for the given gain range
    pub fn new(range: GainRange) -> Self {
        Self { range }
    }

    /// The gain range being mapped onto
    pub fn range(&self) -> GainRange {
        self.range
    }

    /// Logical value that means "mute"
    ///
    /// Integer midpoint of the truncated bounds: `(trunc(max) + trunc(min)) / 2`.
    /// For the default -80..+6.02 dB range this is -37.
    pub fn mute_point(&self) -> f32 {
        let (min, max) = self.truncated_bounds();
        ((max + min) / 2) as f32
    }

    /// Whether a logical value is the mute point
    pub fn is_mute(&self, logical: f32) -> bool {
        logical == self.mute_point()
    }

    /// Gain (dB) to apply for a logical value
    ///
    /// Returns the range minimum at the mute point, otherwise the value itself
    /// clamped into the range.
    pub fn map(&self, logical: f32) -> f32 {
        if self.is_mute(logical) {
            self.range.min_db
        } else {
            self.range.clamp(logical)
        }
    }

    /// Bounds of a volume slider: from the mute point up to the truncated max
    pub fn slider_bounds(&self) -> (i32, i32) {
        let (_, max) = self.truncated_bounds();
        (self.mute_point() as i32, max)
    }

    /// Initial slider value after loading a clip
    ///
    /// Halfway between the mute point and the maximum.
    pub fn default_slider_value(&self) -> i32 {
        let (half, max) = self.slider_bounds();
        (max + half) / 2
    }

    fn truncated_bounds(&self) -> (i32, i32) {
        (self.range.min_db.trunc() as i32, self.range.max_db.trunc() as i32)
    }
}

impl Default for VolumeMapper {
    fn default() -> Self {
        Self::new(GainRange::MASTER)
    }
}
