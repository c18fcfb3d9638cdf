//! Time management utilities
//!
//! Objects integrate motion with a frame-time delta. When a caller has no
//! timing source of its own, [`DEFAULT_FRAME_DELTA`] corresponds to a fixed
//! 60 updates per second.

/// Update rate assumed when no frame delta is supplied
pub const DEFAULT_FRAME_RATE: f32 = 60.0;

/// Frame delta for [`DEFAULT_FRAME_RATE`], in seconds
pub const DEFAULT_FRAME_DELTA: f32 = 1.0 / DEFAULT_FRAME_RATE;

/// Longest wall-clock gap a single [`FrameTimer::advance`] will account for.
/// Anything beyond this is dropped so a paused tab or debugger break does not
/// trigger a burst of catch-up updates.
const MAX_ACCUMULATED: f32 = 1.0;

/// Fixed delta for a given update rate
pub fn frame_delta(frame_rate: f32) -> f32 {
    1.0 / frame_rate
}

/// Fixed-step frame timer
///
/// Accumulates elapsed wall-clock time and reports how many fixed updates
/// should run. The timer does not own a clock; the caller's loop feeds it.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    step: f32,
    accumulator: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_RATE)
    }
}

impl FrameTimer {
    /// Create a timer stepping at `frame_rate` updates per second
    pub fn new(frame_rate: f32) -> Self {
        Self {
            step: frame_delta(frame_rate),
            accumulator: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Fixed delta handed to each update
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed `elapsed` seconds and return the number of fixed updates due
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, MAX_ACCUMULATED);
        self.total_time += elapsed.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        self.frame_count += u64::from(steps);
        steps
    }

    /// Total elapsed time fed to the timer
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of fixed updates issued so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
