//! Time subsystem.
//!
//! Clock sources, the fixed-step scheduler and the frame pacer. None of these
//! touch the platform layer, so they can be driven by a `ManualClock` in tests.

mod clock;
mod fixed_step;
mod pacer;
mod stats;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use fixed_step::FixedStepScheduler;
pub use pacer::{FramePacer, Pacing, Sleeper, ThreadSleeper};
pub use stats::{frame_rate, FrameStats, StatsSummary};
