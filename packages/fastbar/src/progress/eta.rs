use std::time::{Duration, Instant};

/// Target time between two redraws
pub const UPDATE_EVERY: Duration = Duration::from_millis(200);

// keeps the throttle formula finite when iterations are instant
const EPSILON: f64 = 1e-8;

/// Estimate the time for a progress bar, and decide when it should be redrawn
///
/// The estimator keeps a step threshold (`wait_for`) that tunes itself
/// so that a bar is redrawn roughly once every [`UPDATE_EVERY`], no matter
/// how fast each step is: fast loops skip many positions between redraws,
/// slow loops redraw on every step.
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    timing: Option<Timing>,
}

/// Timing of the current run
#[derive(Debug, Clone, Copy)]
struct Timing {
    /// Time when the run started (position 0)
    start: Instant,
    /// Time of the last redraw
    last: Instant,
    /// Position of the last redraw
    last_v: u64,
    /// Number of steps to wait before the next redraw
    wait_for: u64,
    /// Predicted duration of the whole run, in seconds
    predicted: f64,
}

impl Timing {
    fn new(now: Instant) -> Self {
        Self {
            start: now,
            last: now,
            last_v: 0,
            wait_for: 1,
            predicted: 0.0,
        }
    }
}

impl Estimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run at position 0
    pub fn reset(&mut self, now: Instant) {
        self.timing = Some(Timing::new(now));
    }

    /// If [`reset`](Self::reset) was called for the current run
    pub fn is_started(&self) -> bool {
        self.timing.is_some()
    }

    /// Record that the run has reached `position`.
    ///
    /// Returns `true` if a redraw is due, which happens when the position
    /// reaches the total, or moves at least `wait_for` steps past the
    /// position of the last redraw.
    pub fn observe(&mut self, position: u64, total: u64, now: Instant) -> bool {
        let Some(timing) = self.timing.as_mut() else {
            // never reset: start the run here, there is nothing to average yet
            self.reset(now);
            return true;
        };
        if position == 0 {
            *timing = Timing::new(now);
            return true;
        }
        if position != total && position < timing.last_v.saturating_add(timing.wait_for) {
            return false;
        }
        let now = now.max(timing.start);
        let avg = (now - timing.start).as_secs_f64() / position as f64;
        // float to int casts saturate
        let wait_for = (UPDATE_EVERY.as_secs_f64() / (avg + EPSILON)).floor() as u64;
        timing.wait_for = wait_for.max(1);
        timing.predicted = avg * total as f64;
        timing.last_v = timing.last_v.max(position);
        timing.last = now;
        true
    }

    /// Current step threshold between two redraws. Always at least 1
    pub fn wait_for(&self) -> u64 {
        self.timing.map(|t| t.wait_for).unwrap_or(1)
    }

    /// Position at the last redraw
    pub fn last_position(&self) -> u64 {
        self.timing.map(|t| t.last_v).unwrap_or_default()
    }

    /// Seconds between the start of the run and the last redraw
    pub fn elapsed(&self) -> f64 {
        self.timing
            .map(|t| (t.last - t.start).as_secs_f64())
            .unwrap_or_default()
    }

    /// Predicted seconds left after the last redraw
    pub fn remaining(&self) -> f64 {
        self.timing
            .map(|t| (t.predicted - (t.last - t.start).as_secs_f64()).max(0.0))
            .unwrap_or_default()
    }

    /// Start time of the current run
    pub fn started_at(&self) -> Option<Instant> {
        self.timing.map(|t| t.start)
    }
}

/// Format seconds as `H:MM:SS`, or `MM:SS` if less than an hour.
///
/// Fractions are dropped and negative values show as `00:00`
pub fn format_time(secs: f64) -> String {
    let t = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    let (h, m, s) = (t / 3600, (t / 60) % 60, t % 60);
    if h != 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
