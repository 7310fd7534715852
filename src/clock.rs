//! Interval countdown driven by elapsed-time measurement.
//!
//! The clock never schedules anything itself. The event loop calls
//! [`SessionClock::tick`] with the current instant and the clock works out how
//! much time passed since the previous call. A stall longer than an interval
//! produces a single elapsed event, never a backlog.

use std::time::{Duration, Instant};

/// Result of one clock measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockStep {
    /// True when the interval ran out during this measurement
    pub interval_elapsed: bool,
    pub remaining: Duration,
    /// Fill of the progress ring, 0.0 at the start of an interval
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ClockPhase {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone)]
pub struct SessionClock {
    phase: ClockPhase,
    /// Length of the interval currently counting down
    interval: Duration,
    /// Length applied at the next reset
    next_interval: Duration,
    remaining: Duration,
    baseline: Option<Instant>,
}

impl SessionClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            phase: ClockPhase::Stopped,
            interval,
            next_interval: interval,
            remaining: interval,
            baseline: None,
        }
    }

    pub fn start(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.next_interval = interval;
        self.remaining = interval;
        self.baseline = Some(now);
        self.phase = ClockPhase::Running;
        tracing::debug!(interval_ms = interval.as_millis() as u64, "clock started");
    }

    /// Cancel all further events. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.phase != ClockPhase::Stopped {
            tracing::debug!("clock stopped");
        }
        self.phase = ClockPhase::Stopped;
        self.baseline = None;
        self.remaining = self.interval;
    }

    pub fn pause(&mut self) {
        if self.phase == ClockPhase::Running {
            self.phase = ClockPhase::Paused;
            self.baseline = None;
        }
    }

    /// Continue from the frozen remaining time
    pub fn resume(&mut self, now: Instant) {
        if self.phase == ClockPhase::Paused {
            self.phase = ClockPhase::Running;
            self.baseline = Some(now);
        }
    }

    /// Takes effect when the current interval next resets
    pub fn set_next_interval(&mut self, interval: Duration) {
        self.next_interval = interval;
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn progress(&self) -> f64 {
        if self.interval.is_zero() {
            return 0.0;
        }
        let fraction = 1.0 - self.remaining.as_secs_f64() / self.interval.as_secs_f64();
        fraction.clamp(0.0, 1.0)
    }

    /// Measure time since the previous call. None while stopped or paused.
    pub fn tick(&mut self, now: Instant) -> Option<ClockStep> {
        if self.phase != ClockPhase::Running {
            return None;
        }
        let baseline = self.baseline.replace(now)?;
        let delta = now.saturating_duration_since(baseline);

        let interval_elapsed = delta >= self.remaining;
        if interval_elapsed {
            let overshoot = delta - self.remaining;
            self.interval = self.next_interval;
            self.remaining = if overshoot < self.interval {
                self.interval - overshoot
            } else {
                // stalled past a whole interval: resync instead of catching up
                self.interval
            };
        } else {
            self.remaining -= delta;
        }

        Some(ClockStep {
            interval_elapsed,
            remaining: self.remaining,
            progress: self.progress(),
        })
    }
}

/// Whole seconds left, rounded up, as shown on the countdown
pub fn countdown_secs(remaining: Duration) -> u64 {
    let millis = remaining.as_millis() as u64;
    millis.div_ceil(1000)
}
