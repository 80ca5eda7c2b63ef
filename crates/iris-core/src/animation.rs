// File: crates/iris-core/src/animation.rs
// Summary: Easing curves and fixed-duration animation tasks driven by a monotonic clock.

use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    /// Bounce-out, as used for the tooltip morph.
    Bounce,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::Bounce => bounce_out(t),
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    const B1: f64 = 4.0 / 11.0;
    const B2: f64 = 6.0 / 11.0;
    const B3: f64 = 8.0 / 11.0;
    const B4: f64 = 3.0 / 4.0;
    const B5: f64 = 9.0 / 11.0;
    const B6: f64 = 10.0 / 11.0;
    const B7: f64 = 15.0 / 16.0;
    const B8: f64 = 21.0 / 22.0;
    const B9: f64 = 63.0 / 64.0;
    let b0 = 1.0 / B1 / B1;
    if t < B1 {
        b0 * t * t
    } else if t < B3 {
        let u = t - B2;
        b0 * u * u + B4
    } else if t < B6 {
        let u = t - B5;
        b0 * u * u + B7
    } else {
        let u = t - B8;
        b0 * u * u + B9
    }
}

/// A fixed-duration animation. The first `sample` anchors the start time; the task is
/// finished once the elapsed time reaches its duration, at which point progress is exactly 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationTask {
    duration: Duration,
    easing: Easing,
    started_at: Option<Duration>,
    progress: f64,
    finished: bool,
}

impl AnimationTask {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing, started_at: None, progress: 0.0, finished: false }
    }

    /// Advance to monotonic time `now` and return the eased progress.
    pub fn sample(&mut self, now: Duration) -> f64 {
        if self.finished {
            return 1.0;
        }
        let start = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_sub(start);
        let raw = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };
        if raw >= 1.0 {
            self.finished = true;
            self.progress = 1.0;
        } else {
            self.progress = self.easing.apply(raw).min(1.0);
        }
        self.progress
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_reaches_exactly_one_and_stops() {
        let mut task = AnimationTask::new(Duration::from_millis(200), Easing::Linear);
        assert_eq!(task.sample(Duration::from_millis(1000)), 0.0);
        let mid = task.sample(Duration::from_millis(1100));
        assert!((mid - 0.5).abs() < 1e-9);
        assert!(!task.is_finished());
        assert_eq!(task.sample(Duration::from_millis(1250)), 1.0);
        assert!(task.is_finished());
        assert_eq!(task.sample(Duration::from_millis(1260)), 1.0);
    }

    #[test]
    fn bounce_hits_endpoints() {
        assert_eq!(Easing::Bounce.apply(0.0), 0.0);
        assert!((Easing::Bounce.apply(1.0) - 1.0).abs() < 1e-12);
        // first impact touches the target well before the end
        assert!((Easing::Bounce.apply(4.0 / 11.0) - 1.0).abs() < 1e-9);
        assert!(Easing::Bounce.apply(0.5) < 1.0);
    }
}
