use super::clock::Millis;

/// Aggregated timing over one reporting window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StatsSummary {
    /// Frames per second over the window.
    pub fps: f64,

    /// Simulation steps per second over the window.
    pub ups: f64,

    /// Mean time the pacer spent waiting per frame.
    pub mean_wait_ms: Millis,

    /// Relative deviation of `fps` from the target (`0.1` = 10 %).
    pub drift: f64,
}

/// Rolling frame statistics.
///
/// Collects frames, steps and pacing waits, and yields a summary each time
/// the reporting window fills up. Purely observational.
#[derive(Debug, Clone)]
pub struct FrameStats {
    target_fps: f64,
    window_ms: Millis,

    elapsed_ms: Millis,
    frames: u32,
    steps: u64,
    waited_ms: Millis,
}

impl FrameStats {
    /// Drift above this is worth mentioning in the logs.
    pub const DRIFT_TOLERANCE: f64 = 0.10;

    pub fn new(target_fps: f64) -> Self {
        Self::with_window(target_fps, 1000.0)
    }

    pub fn with_window(target_fps: f64, window_ms: Millis) -> Self {
        Self {
            target_fps,
            window_ms,
            elapsed_ms: 0.0,
            frames: 0,
            steps: 0,
            waited_ms: 0.0,
        }
    }

    /// Records one finished frame. Returns a summary when the window is full.
    pub fn record(&mut self, elapsed_ms: Millis, steps: u64, waited_ms: Millis) -> Option<StatsSummary> {
        self.elapsed_ms += elapsed_ms;
        self.frames += 1;
        self.steps += steps;
        self.waited_ms += waited_ms;

        if self.elapsed_ms < self.window_ms || self.elapsed_ms <= 0.0 {
            return None;
        }

        let secs = self.elapsed_ms / 1000.0;
        let fps = self.frames as f64 / secs;
        let summary = StatsSummary {
            fps,
            ups: self.steps as f64 / secs,
            mean_wait_ms: self.waited_ms / self.frames as f64,
            drift: (fps - self.target_fps).abs() / self.target_fps,
        };

        self.elapsed_ms = 0.0;
        self.frames = 0;
        self.steps = 0;
        self.waited_ms = 0.0;

        Some(summary)
    }
}

impl StatsSummary {
    pub fn is_drifting(&self) -> bool {
        self.drift > FrameStats::DRIFT_TOLERANCE
    }
}

/// Instantaneous frame rate for one iteration.
///
/// A zero-length iteration yields `f64::INFINITY`; that only ever shows up in
/// diagnostics.
pub fn frame_rate(elapsed_ms: Millis) -> f64 {
    1000.0 / elapsed_ms
}
