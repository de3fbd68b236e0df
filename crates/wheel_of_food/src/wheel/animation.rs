use std::time::Duration;

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Eased interpolation of the wheel rotation between two angles over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinAnimation {
    from: f64,
    to: f64,
    duration: Duration,
}

impl SpinAnimation {
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Fraction of the duration elapsed, in `[0, 1]`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    pub fn sample(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            // exact, no float drift from the easing curve
            return self.to;
        }
        self.from + (self.to - self.from) * ease_out_cubic(self.progress(elapsed))
    }
}
