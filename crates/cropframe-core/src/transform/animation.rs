//! Eased zoom animation with a deadline-based commit.
//!
//! Zoom buttons and double-tap animate the scale instead of jumping. The
//! animation itself is cosmetic: the editor only clamps and commits once a
//! `tick` observes that the deadline has passed. Timestamps are supplied by the
//! caller (e.g. `performance.now()` or a frame clock) as a `Duration` since an
//! arbitrary monotonic epoch.

use std::time::Duration;

use super::GestureKind;

/// Smootherstep easing: zero velocity and acceleration at both ends.
///
/// Formula: `6t^5 - 15t^4 + 10t^3`, with `t` clamped to `0.0..=1.0`.
#[inline]
pub fn smootherstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// An in-flight animated scale change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimation {
    pub from: f64,
    pub to: f64,
    pub started_at: Duration,
    pub duration: Duration,
    /// Gesture that started the animation.
    pub source: GestureKind,
}

impl ZoomAnimation {
    pub fn new(
        from: f64,
        to: f64,
        started_at: Duration,
        duration: Duration,
        source: GestureKind,
    ) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
            source,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.started_at.saturating_add(self.duration)
    }

    /// Linear progress in `0.0..=1.0`. Timestamps before the start count as 0.
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Displayed scale at `now`.
    pub fn scale_at(&self, now: Duration) -> f64 {
        self.from + (self.to - self.from) * smootherstep(self.progress(now))
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.deadline()
    }
}
