use std::time::{Duration, Instant};

/// Timing snapshot for one display refresh tick.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds (clamped).
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic tick counter.
    pub frame_index: u64,

    /// Whole refresh intervals that elapsed without a tick before this one.
    ///
    /// Non-zero after a stall or while the window was hidden; the render
    /// buffer's queue grows during such gaps.
    pub missed: u32,
}

/// Refresh tick clock.
///
/// One clock per display loop. `refresh` is the nominal display interval used
/// to count missed ticks; the delta reported in `FrameTime::dt` is clamped so
/// a long suspension does not produce a pathological value.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    refresh: Duration,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock for a 60 Hz display with default clamps.
    pub fn new() -> Self {
        Self::with_refresh(Duration::from_micros(16_667))
    }

    /// Creates a clock for a display with the given refresh interval.
    pub fn with_refresh(refresh: Duration) -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            refresh,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Resets the baseline, e.g. when returning to the foreground.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock using an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let elapsed = now.saturating_duration_since(self.last);
        let dt = elapsed.clamp(self.dt_min, self.dt_max);

        let missed = if self.refresh.is_zero() {
            0
        } else {
            let intervals = elapsed.as_nanos() / self.refresh.as_nanos();
            u32::try_from(intervals.saturating_sub(1)).unwrap_or(u32::MAX)
        };

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
            missed,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
