use crate::config::WindowConfig;
use crate::error::FatalInitError;
use crate::input::{InputFrame, InputState};
use crate::time::Millis;

/// Platform windowing + presentation layer.
///
/// The loop only ever talks to the platform through this trait. Handles are
/// owned by the lifecycle and lent to collaborators by reference.
pub trait WindowSystem {
    type Handle;

    /// Creates and shows a window with a ready graphics context.
    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Handle, FatalInitError>;

    /// Requests presentation-synchronized (vsync) frames, or turns them off.
    fn set_vsync(&mut self, window: &Self::Handle, enabled: bool);

    /// Whether the window has been asked to close (close button, stop key,
    /// `request_close`, or a fatal surface error).
    fn should_close(&self, window: &Self::Handle) -> bool;

    fn request_close(&mut self, window: &Self::Handle);

    /// Drains queued platform events. Input and close signals only become
    /// visible to the loop through this call.
    fn poll_events(&mut self);

    /// Shows the most recently rendered frame.
    fn present_frame(&mut self, window: &Self::Handle);

    fn destroy_window(&mut self, window: Self::Handle);
}

/// Window system that tracks keyboard state per window.
pub trait InputSource: WindowSystem {
    /// Copies the live state into `state` and moves transitions recorded since
    /// the previous call into `frame`.
    fn sample_input(&mut self, window: &Self::Handle, state: &mut InputState, frame: &mut InputFrame);
}

/// Samples input devices into a snapshot it owns.
pub trait InputHandler<W: WindowSystem> {
    fn update(&mut self, windows: &mut W, window: &W::Handle);
}

/// Per-frame information handed to the renderer.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameInfo {
    /// Zero-based iteration index.
    pub index: u64,

    /// Wall-clock time since the previous iteration started.
    pub elapsed_ms: Millis,

    /// `1000 / elapsed_ms`; infinite for a zero-length iteration.
    pub frame_rate: f64,

    /// Simulation steps taken this iteration.
    pub steps: u64,

    /// Simulation steps taken since the loop started.
    pub total_steps: u64,

    /// Fraction of a step left in the accumulator, for interpolation.
    pub alpha: f64,

    /// Fixed step size.
    pub step_ms: Millis,
}

impl FrameInfo {
    /// Simulated time including the interpolated partial step.
    pub fn sim_time_ms(&self) -> Millis {
        (self.total_steps as f64 + self.alpha) * self.step_ms
    }
}

/// Draws frames. Errors while drawing stay inside the renderer.
pub trait Renderer<W: WindowSystem> {
    /// Called once after the window and graphics context exist.
    fn init(&mut self, windows: &mut W, window: &W::Handle) -> anyhow::Result<()>;

    fn render(&mut self, windows: &mut W, window: &W::Handle, frame: &FrameInfo);
}

/// Fixed-step simulation hook. Called once per step with the step size.
pub trait Simulation {
    fn step(&mut self, dt_ms: Millis);
}

impl<F> Simulation for F
where
    F: FnMut(Millis),
{
    fn step(&mut self, dt_ms: Millis) {
        self(dt_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_time_includes_partial_step() {
        let info = FrameInfo {
            total_steps: 3,
            alpha: 0.5,
            step_ms: 20.0,
            ..Default::default()
        };
        assert_eq!(info.sim_time_ms(), 70.0);
    }

    #[test]
    fn closures_are_simulations() {
        let mut total = 0.0;
        {
            let mut sim = |dt: Millis| total += dt;
            sim.step(10.0);
            sim.step(5.0);
        }
        assert_eq!(total, 15.0);
    }
}
