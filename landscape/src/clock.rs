use ridgeline_core::Speed;

/// Outcome of a single [`AnimationClock::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum ClockTick {
    /// Progress advanced within the current cycle.
    Advanced,
    /// Progress reached the end of the cycle and restarted at zero.
    Wrapped,
}

/// Per-frame progress accumulator driving the cyclic parallax animation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationClock {
    speed: Speed,
    progress: f64,
}

impl AnimationClock {
    /// Creates a clock at the start of a cycle.
    #[must_use]
    pub const fn new(speed: Speed) -> Self {
        Self {
            speed,
            progress: 0.0,
        }
    }

    /// Creates a clock positioned part-way through a cycle.
    ///
    /// Progress outside `[0, 1)` is folded back into the cycle.
    #[must_use]
    pub fn starting_at(speed: Speed, progress: f64) -> Self {
        let progress = if progress.is_finite() {
            progress.rem_euclid(1.0)
        } else {
            0.0
        };
        Self { speed, progress }
    }

    /// Adds one frame of progress, wrapping to zero at the end of the cycle.
    pub fn tick(&mut self) -> ClockTick {
        self.progress += self.speed.get();
        if self.progress >= 1.0 {
            self.progress = 0.0;
            ClockTick::Wrapped
        } else {
            ClockTick::Advanced
        }
    }

    /// Returns to the start of the cycle without reporting a wrap.
    pub fn reset(&mut self) {
        self.progress = 0.0;
    }

    /// Replaces the per-tick increment.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Normalised progress in `[0, 1)`.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Per-tick increment.
    #[must_use]
    pub const fn speed(&self) -> Speed {
        self.speed
    }
}
