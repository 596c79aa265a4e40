//! FrameClock: fixed-timestep pacing for the update/render loop.
//!
//! Each frame runs one logical update and one render. When the pair finishes
//! early the loop sleeps off the rest of the period; when it runs late the
//! overrun is banked, and once a whole period has accumulated the loop runs
//! extra logical updates without rendering (at most `max_skips` per frame).
//! Renders may be dropped this way, logical updates never are.

use std::time::Duration;

use crate::types::MAX_FRAME_SKIPS;

/// What the loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FramePlan {
    /// Time to sleep before the next frame
    pub sleep: Duration,
    /// Logical updates to run, without rendering, to catch up
    pub extra_updates: u32,
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    period: Duration,
    max_skips: u32,
    /// Overrun not yet paid back with extra updates
    excess: Duration,
    /// How much the last sleep overshot its request
    over_sleep: Duration,
}

impl FrameClock {
    /// Clock ticking `fps` times per second
    pub fn new(fps: u32) -> Self {
        Self::with_period(Duration::from_secs(1) / fps.max(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            max_skips: MAX_FRAME_SKIPS,
            excess: Duration::ZERO,
            over_sleep: Duration::ZERO,
        }
    }

    pub fn with_max_skips(mut self, max_skips: u32) -> Self {
        self.max_skips = max_skips;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Banked overrun
    pub fn excess(&self) -> Duration {
        self.excess
    }

    /// Plan the gap after a frame whose update and render took `work`.
    pub fn end_frame(&mut self, work: Duration) -> FramePlan {
        let budget = self.period.saturating_sub(self.over_sleep);
        let sleep = budget.saturating_sub(work);

        if sleep.is_zero() {
            self.excess += (work + self.over_sleep).saturating_sub(self.period);
            self.over_sleep = Duration::ZERO;
        }

        let mut extra_updates = 0;
        while self.excess > self.period && extra_updates < self.max_skips {
            self.excess -= self.period;
            extra_updates += 1;
        }

        FramePlan {
            sleep,
            extra_updates,
        }
    }

    /// Report how long a planned sleep really took
    pub fn after_sleep(&mut self, requested: Duration, actual: Duration) {
        self.over_sleep = actual.saturating_sub(requested);
    }
}
