//! Client-side progress approximation.

use std::time::Duration;

/// Highest cap a controller accepts for its ramp
pub const MAX_RAMP_CAP: u8 = 99;

/// Time-based progress approximation for an in-flight submission
///
/// Every `interval` the progress grows by `step` until it reaches `cap`.
/// Controllers clamp the cap to [`MAX_RAMP_CAP`] so only a settled call
/// completes the bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRamp {
    /// Time between increments; the first increment comes one interval after start
    pub interval: Duration,
    /// Percentage points added per increment
    pub step: u8,
    /// Highest value the ramp reaches on its own
    pub cap: u8,
}

impl Default for ProgressRamp {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            step: 10,
            cap: 80,
        }
    }
}

impl ProgressRamp {
    /// Progress after one more increment
    ///
    /// Never decreases and never exceeds the cap, unless `progress` was
    /// already above it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfx_controller::ProgressRamp;
    ///
    /// let ramp = ProgressRamp::default();
    /// assert_eq!(ramp.advance(0), 10);
    /// assert_eq!(ramp.advance(75), 80);
    /// assert_eq!(ramp.advance(80), 80);
    /// ```
    pub fn advance(&self, progress: u8) -> u8 {
        if progress >= self.cap {
            return progress;
        }
        progress.saturating_add(self.step).min(self.cap)
    }

    /// Whether `progress` has reached the cap
    pub fn is_capped(&self, progress: u8) -> bool {
        progress >= self.cap
    }
}
