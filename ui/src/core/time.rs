use std::time::{Duration, Instant};

pub const SIXTY_FPS: u64 = 16_666_666;
pub const ONE_FPS: u64 = 1_000_000_000;

/// The host clock feeding [`UiManager::update`](crate::UiManager::update).
///
/// Each `Time` captures one frame: the delta since the previous frame, the total elapsed time
/// and the frame number. New frames are produced from the previous one with [`next`](Self::next)
/// (wall clock) or [`advance`](Self::advance) (a fixed delta, for replays and tests). The fixed
/// step accumulator lets a host run panel updates at a steady rate regardless of render rate.
#[derive(Debug, Copy, Clone)]
pub struct Time {
    instant: Instant,
    pub fixed_time_step: u64,
    /// Time since the previous frame
    pub delta: Duration,
    /// Total time since the first frame
    pub time: Duration,
    /// Frames produced since the first one
    pub frame: u64,
    accumulator: u64,
}

impl Time {
    /// A clock at frame `0` with a fixed step of `fixed_time_step` nanoseconds.
    pub fn new(fixed_time_step: u64) -> Self {
        Self {
            instant: Instant::now(),
            fixed_time_step,
            delta: Duration::ZERO,
            time: Duration::ZERO,
            frame: 0,
            accumulator: 0,
        }
    }

    /// The next frame, measuring the delta against the wall clock.
    pub fn next(self) -> Self {
        let delta = self.instant.elapsed();
        self.step(Instant::now(), delta)
    }

    /// The next frame, `delta` later than this one.
    pub fn advance(self, delta: Duration) -> Self {
        self.step(self.instant + delta, delta)
    }

    fn step(self, instant: Instant, delta: Duration) -> Self {
        Self {
            instant,
            fixed_time_step: self.fixed_time_step,
            delta,
            time: self.time + delta,
            frame: self.frame + 1,
            accumulator: self.accumulator + delta.as_nanos() as u64,
        }
    }

    /// Whether enough time has accumulated for a fixed step.
    pub fn has_fixed(&self) -> bool {
        self.accumulator >= self.fixed_time_step
    }

    /// Consume one fixed step, returning its duration, or `None` if not enough time accumulated.
    pub fn take_fixed(&mut self) -> Option<Duration> {
        if !self.has_fixed() {
            return None;
        }
        self.accumulator -= self.fixed_time_step;
        Some(Duration::from_nanos(self.fixed_time_step))
    }

    /// Restart the clock from now with an empty accumulator, e.g. after the host was paused.
    pub fn reset_now(&mut self) {
        self.instant = Instant::now();
        self.accumulator = 0;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new(SIXTY_FPS)
    }
}
