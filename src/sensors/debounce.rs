//! Per-input debounce state machine.
//!
//! Converts raw, noisy samples into a stable level plus a "changed" flag.
//! A new raw level must be seen continuously for `threshold_ms` before it
//! replaces the stable level; any sample that differs from the candidate
//! restarts the settling window.
//!
//! The very first sample has nothing to compare against and is accepted
//! immediately as the baseline.
//!
//! All timestamps are `u32` milliseconds and compared with `wrapping_sub`,
//! so the uptime counter may wrap without producing a spurious change.

use super::Level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorChannel {
    has_baseline: bool,
    stable: Level,
    pending: Level,
    settled_at_ms: u32,
    threshold_ms: u32,
}

impl SensorChannel {
    pub const fn new(threshold_ms: u32) -> Self {
        Self {
            has_baseline: false,
            stable: Level::Low,
            pending: Level::Low,
            settled_at_ms: 0,
            threshold_ms,
        }
    }

    /// Feed one raw sample taken at `now_ms`.
    ///
    /// Returns `true` when the stable level was (re)established by this
    /// sample: the first sample ever, or a candidate that has persisted for
    /// at least the threshold.
    pub fn observe(&mut self, raw: Level, now_ms: u32) -> bool {
        if !self.has_baseline {
            self.has_baseline = true;
            self.stable = raw;
            self.pending = raw;
            self.settled_at_ms = now_ms;
            return true;
        }

        if raw == self.stable {
            self.pending = raw;
            self.settled_at_ms = now_ms;
            return false;
        }

        if raw != self.pending {
            self.pending = raw;
            self.settled_at_ms = now_ms;
            // A zero threshold accepts on the same sample.
            if self.threshold_ms > 0 {
                return false;
            }
        }

        if now_ms.wrapping_sub(self.settled_at_ms) < self.threshold_ms {
            return false;
        }

        self.stable = raw;
        self.settled_at_ms = now_ms;
        true
    }

    /// Last accepted level.  `Level::Low` before the first sample.
    pub fn level(&self) -> Level {
        self.stable
    }

    pub fn has_baseline(&self) -> bool {
        self.has_baseline
    }
}
