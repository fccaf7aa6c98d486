//! Accelerated repeat tracking for cursor movement.
//!
//! Consecutive invocations of the same movement, each within the repeat
//! interval of the previous one, build a streak. Past the threshold each
//! call moves several steps.

use std::time::{Duration, Instant};

use linedit_config::RepeatSettings;

/// Movement kinds tracked for streaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
}

/// Streak tracking for accelerated movement.
#[derive(Debug, Clone)]
pub struct RepeatTracker {
    /// Last movement and when it happened
    last: Option<(Movement, Instant)>,
    /// Length of the current streak
    streak: usize,
    /// Maximum gap that keeps a streak going
    interval: Duration,
    /// Streak length after which movement accelerates
    threshold: usize,
    /// Steps per call once accelerated
    step: usize,
}

impl RepeatTracker {
    pub fn new(settings: &RepeatSettings) -> Self {
        Self {
            last: None,
            streak: 0,
            interval: Duration::from_millis(settings.interval_ms),
            threshold: settings.threshold,
            step: settings.step.max(1),
        }
    }

    /// Record a movement at `now` and return how many steps it performs
    pub fn record(&mut self, movement: Movement, now: Instant) -> usize {
        let continues = match self.last {
            Some((last, at)) => last == movement && now.saturating_duration_since(at) <= self.interval,
            None => false,
        };

        self.streak = if continues { self.streak + 1 } else { 1 };
        self.last = Some((movement, now));

        if self.streak > self.threshold {
            self.step
        } else {
            1
        }
    }

    /// Length of the current streak
    pub fn streak(&self) -> usize {
        self.streak
    }

    /// Break the current streak
    pub fn reset(&mut self) {
        self.last = None;
        self.streak = 0;
    }
}

impl Default for RepeatTracker {
    fn default() -> Self {
        Self::new(&RepeatSettings::default())
    }
}
