use std::time::Duration;

use super::clock::{Clock, Millis};

/// Suspends the calling thread for short intervals while the pacer waits.
pub trait Sleeper {
    fn sleep(&mut self, quantum: Duration);
}

/// Sleeps the current OS thread.
///
/// `std::thread::sleep` cannot be interrupted; an early wake-up is absorbed
/// by the pacer's deadline re-check.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, quantum: Duration) {
        std::thread::sleep(quantum);
    }
}

/// Outcome of one pacing call.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Pacing {
    /// Wall-clock time spent waiting, in milliseconds.
    pub waited_ms: Millis,

    /// Number of sleep quanta taken.
    pub sleeps: u32,
}

/// Frame-rate cap.
///
/// Holds the iteration until `loop_start + frame_budget` by sleeping in
/// fixed quanta and re-reading the clock. Late iterations are not compensated:
/// the pacer returns immediately and the next frame simply starts late.
#[derive(Debug, Clone)]
pub struct FramePacer<S = ThreadSleeper> {
    frame_ms: Millis,
    quantum: Duration,
    sleeper: S,
}

impl FramePacer<ThreadSleeper> {
    pub fn new(frame_ms: Millis) -> Self {
        Self::with_sleeper(frame_ms, ThreadSleeper)
    }

    pub fn from_rate(fps: f64) -> Self {
        Self::new(1000.0 / fps)
    }
}

impl<S: Sleeper> FramePacer<S> {
    /// Default sleep quantum between deadline checks.
    pub const DEFAULT_QUANTUM: Duration = Duration::from_millis(1);

    pub fn with_sleeper(frame_ms: Millis, sleeper: S) -> Self {
        debug_assert!(frame_ms > 0.0 && frame_ms.is_finite(), "invalid frame budget {frame_ms}");
        Self {
            frame_ms,
            quantum: Self::DEFAULT_QUANTUM,
            sleeper,
        }
    }

    /// Overrides the sleep quantum.
    pub fn with_quantum(mut self, quantum: Duration) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn frame_budget_ms(&self) -> Millis {
        self.frame_ms
    }

    /// Deadline for a frame that started at `loop_start`.
    pub fn deadline(&self, loop_start: Millis) -> Millis {
        loop_start + self.frame_ms
    }

    /// Blocks until `clock.now()` reaches the frame deadline.
    pub fn pace<C: Clock + ?Sized>(&mut self, clock: &C, loop_start: Millis) -> Pacing {
        let deadline = self.deadline(loop_start);
        let entered = clock.now();

        let mut now = entered;
        let mut sleeps = 0;
        while now < deadline {
            self.sleeper.sleep(self.quantum);
            sleeps += 1;
            now = clock.now();
        }

        Pacing {
            waited_ms: now - entered,
            sleeps,
        }
    }
}
