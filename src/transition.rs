// 🎞️ Transitions - enter/exit timing for toggled categories
// Time is passed in explicitly so the host loop (and tests) own the clock

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Expand/collapse duration used by the list (matches a 300 ms tween)
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Expanding,
    Collapsing,
}

#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub direction: Direction,
    pub started: Instant,
    pub duration: Duration,
}

impl Transition {
    /// Linear progress 0.0..=1.0
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Share of the category's child rows that should be on screen
    pub fn visible_fraction(&self, now: Instant) -> f64 {
        match self.direction {
            Direction::Expanding => self.progress(now),
            Direction::Collapsing => 1.0 - self.progress(now),
        }
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Active transitions keyed by category
#[derive(Debug)]
pub struct Transitions {
    duration: Duration,
    active: HashMap<String, Transition>,
}

impl Transitions {
    pub fn new(duration: Duration) -> Self {
        Transitions {
            duration,
            active: HashMap::new(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Start a transition after `category` was toggled to `expanded`.
    ///
    /// Toggling again mid-transition reverses from the current visible
    /// fraction instead of jumping.
    pub fn start(&mut self, category: &str, expanded: bool, now: Instant) {
        if self.duration.is_zero() {
            self.active.remove(category);
            return;
        }

        let direction = if expanded {
            Direction::Expanding
        } else {
            Direction::Collapsing
        };

        let visible = self
            .active
            .get(category)
            .map(|current| current.visible_fraction(now))
            .unwrap_or(if expanded { 0.0 } else { 1.0 });

        let progress = match direction {
            Direction::Expanding => visible,
            Direction::Collapsing => 1.0 - visible,
        };
        let elapsed = self.duration.mul_f64(progress);
        let started = now.checked_sub(elapsed).unwrap_or(now);

        self.active.insert(
            category.to_string(),
            Transition {
                direction,
                started,
                duration: self.duration,
            },
        );
    }

    /// Visible fraction for a category that is mid-transition
    pub fn visible_fraction(&self, category: &str, now: Instant) -> Option<f64> {
        self.active
            .get(category)
            .filter(|transition| !transition.is_finished(now))
            .map(|transition| transition.visible_fraction(now))
    }

    /// Drop finished transitions, returning how many were removed
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.active.len();
        self.active.retain(|_, transition| !transition.is_finished(now));
        before - self.active.len()
    }

    pub fn is_animating(&self) -> bool {
        !self.active.is_empty()
    }
}

impl Default for Transitions {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSITION)
    }
}

// ============================================================================
// TESTS
// ============================================================================
