//! Frame timing for the dispatch pass of a simulated host loop.

use std::time::{Duration, Instant};

use rusty_ui::{AssetProvider, Time, UiManager};

/// Statistics collected from frame timing measurements.
#[derive(Debug, Clone)]
pub struct FrameStats {
    pub frame_count: usize,
    pub total_duration: Duration,
    pub min_frame_time: Duration,
    pub max_frame_time: Duration,
    /// Panel updates that ran across all frames.
    pub updates: usize,
    /// Panel updates that returned an error across all frames.
    pub failures: usize,
    sorted_times: Vec<Duration>,
}

impl FrameStats {
    pub fn from_times(times: Vec<Duration>) -> Self {
        let mut sorted_times = times;
        sorted_times.sort();
        Self {
            frame_count: sorted_times.len(),
            total_duration: sorted_times.iter().sum(),
            min_frame_time: sorted_times.first().copied().unwrap_or(Duration::ZERO),
            max_frame_time: sorted_times.last().copied().unwrap_or(Duration::ZERO),
            updates: 0,
            failures: 0,
            sorted_times,
        }
    }

    pub fn average(&self) -> Duration {
        if self.frame_count == 0 {
            Duration::ZERO
        } else {
            self.total_duration / self.frame_count as u32
        }
    }

    /// Frame time at percentile `p` (0-100).
    pub fn percentile(&self, p: usize) -> Duration {
        if self.sorted_times.is_empty() {
            return Duration::ZERO;
        }
        let index = (self.sorted_times.len() * p.min(100) / 100).min(self.sorted_times.len() - 1);
        self.sorted_times[index]
    }

    pub fn median(&self) -> Duration {
        self.percentile(50)
    }

    pub fn p99(&self) -> Duration {
        self.percentile(99)
    }

    /// Average panel updates per frame.
    pub fn updates_per_frame(&self) -> f64 {
        if self.frame_count == 0 {
            0.0
        } else {
            self.updates as f64 / self.frame_count as f64
        }
    }
}

impl std::fmt::Display for FrameStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, avg: {:.3}ms, p99: {:.3}ms, max: {:.3}ms, {:.1} updates/frame, {} failures",
            self.frame_count,
            self.average().as_secs_f64() * 1000.0,
            self.p99().as_secs_f64() * 1000.0,
            self.max_frame_time.as_secs_f64() * 1000.0,
            self.updates_per_frame(),
            self.failures,
        )
    }
}

/// Drive `ui` for `frame_count` frames of the fixed step of `time`, timing each
/// [`UiManager::update`]. `between` runs before every frame and is not timed.
pub fn measure_ui_loop<A, F>(
    ui: &mut UiManager<A>,
    mut time: Time,
    frame_count: usize,
    mut between: F,
) -> FrameStats
where
    A: AssetProvider,
    F: FnMut(&mut UiManager<A>, &Time),
{
    let step = Duration::from_nanos(time.fixed_time_step);
    let mut times = Vec::with_capacity(frame_count);
    let (mut updates, mut failures) = (0, 0);

    for _ in 0..frame_count {
        time = time.advance(step);
        between(ui, &time);

        let start = Instant::now();
        let report = ui.update(time.delta);
        times.push(start.elapsed());

        updates += report.updated;
        failures += report.failed.len();
    }

    FrameStats {
        updates,
        failures,
        ..FrameStats::from_times(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{manager, slot_types};
    use rusty_ui::OpenParams;

    #[test]
    fn frame_stats_calculations() {
        let times = vec![
            Duration::from_millis(10),
            Duration::from_millis(12),
            Duration::from_millis(11),
            Duration::from_millis(15),
            Duration::from_millis(10),
        ];
        let stats = FrameStats::from_times(times);

        assert_eq!(stats.frame_count, 5);
        assert_eq!(stats.min_frame_time, Duration::from_millis(10));
        assert_eq!(stats.max_frame_time, Duration::from_millis(15));
        assert_eq!(stats.median(), Duration::from_millis(11));
        // Total: 58ms, average: 11.6ms
        assert!(stats.average().as_millis() >= 11 && stats.average().as_millis() <= 12);
    }

    #[test]
    fn empty_stats_are_zero() {
        let stats = FrameStats::from_times(Vec::new());

        assert_eq!(stats.average(), Duration::ZERO);
        assert_eq!(stats.p99(), Duration::ZERO);
        assert_eq!(stats.updates_per_frame(), 0.0);
    }

    #[test]
    fn ui_loop_counts_showing_updates() {
        // Given
        let mut ui = manager();
        for slot in slot_types() {
            ui.open_type(slot.type_id, slot.type_name, OpenParams::new())
                .unwrap();
        }

        // When
        let stats = measure_ui_loop(&mut ui, Time::default(), 10, |_, _| {});

        // Then
        assert_eq!(stats.frame_count, 10);
        // One showing slot per layer.
        assert_eq!(stats.updates, 40);
        assert_eq!(stats.failures, 0);
    }
}
