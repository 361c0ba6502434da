use crate::config::{ConfigError, RateConfig};
use crate::time::{
    frame_rate, Clock, FixedStepScheduler, FramePacer, FrameStats, Millis, Sleeper, SystemClock,
    ThreadSleeper,
};

use super::collab::{FrameInfo, InputHandler, Renderer, Simulation, WindowSystem};

/// Run status of an [`EngineLoop`].
///
/// `Stopped` is terminal: a stopped loop never runs again.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopStatus {
    Running,
    StopRequested,
    Stopped,
}

/// Timing carried from one iteration to the next.
///
/// Exists only for the duration of a single `run`; created from the first
/// clock sample with an empty accumulator.
#[derive(Debug, Clone)]
pub struct TimingState {
    previous_sample: Millis,
    scheduler: FixedStepScheduler,
    frame_index: u64,
    total_steps: u64,
}

impl TimingState {
    pub fn start(first_sample: Millis, step_ms: Millis) -> Self {
        Self {
            previous_sample: first_sample,
            scheduler: FixedStepScheduler::new(step_ms),
            frame_index: 0,
            total_steps: 0,
        }
    }

    /// Records `now` as the latest sample and returns the time since the previous one.
    pub fn sample(&mut self, now: Millis) -> Millis {
        let elapsed = now - self.previous_sample;
        self.previous_sample = now;
        elapsed
    }

    pub fn previous_sample(&self) -> Millis {
        self.previous_sample
    }

    pub fn accumulator(&self) -> Millis {
        self.scheduler.accumulator()
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

/// Result of one loop iteration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Iteration {
    /// The frame was simulated, rendered and paced.
    Continue(FrameInfo),
    /// A stop condition was seen at the poll boundary; nothing else ran.
    Stop,
}

/// Totals for a finished run.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoopReport {
    /// Iterations that rendered a frame.
    pub frames: u64,

    /// Simulation steps executed.
    pub steps: u64,

    /// Residual accumulator at exit.
    pub accumulator_ms: Millis,

    pub status: LoopStatus,
}

/// Fixed-timestep loop with a frame-rate cap.
///
/// Each iteration: sample the clock, update input, check for a stop request,
/// present the previous frame, poll events, run the fixed steps that are due,
/// render, then hold until the frame budget is used up.
pub struct EngineLoop<C = SystemClock, S = ThreadSleeper> {
    rates: RateConfig,
    clock: C,
    pacer: FramePacer<S>,
    stats: FrameStats,
    status: LoopStatus,
}

impl EngineLoop<SystemClock, ThreadSleeper> {
    pub fn new(rates: RateConfig) -> Result<Self, ConfigError> {
        Self::with_clock(rates, SystemClock::new(), ThreadSleeper)
    }
}

impl<C: Clock, S: Sleeper> EngineLoop<C, S> {
    /// Rejects rates that would never let a step or a frame finish.
    pub fn with_clock(rates: RateConfig, clock: C, sleeper: S) -> Result<Self, ConfigError> {
        rates.validate()?;

        Ok(Self {
            pacer: FramePacer::with_sleeper(rates.frame_budget_ms(), sleeper),
            stats: FrameStats::new(rates.target_fps),
            rates,
            clock,
            status: LoopStatus::Running,
        })
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn rates(&self) -> &RateConfig {
        &self.rates
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Runs iterations until the window reports a stop condition.
    ///
    /// The window handle is only borrowed; releasing it is up to the caller.
    pub fn run<W, I, R, U>(
        &mut self,
        windows: &mut W,
        window: &W::Handle,
        input: &mut I,
        renderer: &mut R,
        sim: &mut U,
    ) -> LoopReport
    where
        W: WindowSystem,
        I: InputHandler<W>,
        R: Renderer<W>,
        U: Simulation,
    {
        let mut timing = TimingState::start(self.clock.now(), self.rates.step_budget_ms());

        if self.status == LoopStatus::Stopped {
            log::warn!("engine loop already stopped; not restarting");
            return self.report(&timing);
        }

        self.status = LoopStatus::Running;
        log::debug!(
            "loop running: frame budget {:.2} ms, step budget {:.2} ms",
            self.rates.frame_budget_ms(),
            self.rates.step_budget_ms()
        );

        while let Iteration::Continue(_) =
            self.iterate(&mut timing, windows, window, input, renderer, sim)
        {}

        self.status = LoopStatus::Stopped;
        let report = self.report(&timing);
        log::debug!(
            "loop stopped after {} frames, {} steps",
            report.frames,
            report.steps
        );
        report
    }

    /// Runs exactly one iteration against `timing`.
    ///
    /// A stopped loop does nothing and reports `Stop`.
    pub fn iterate<W, I, R, U>(
        &mut self,
        timing: &mut TimingState,
        windows: &mut W,
        window: &W::Handle,
        input: &mut I,
        renderer: &mut R,
        sim: &mut U,
    ) -> Iteration
    where
        W: WindowSystem,
        I: InputHandler<W>,
        R: Renderer<W>,
        U: Simulation,
    {
        if self.status == LoopStatus::Stopped {
            return Iteration::Stop;
        }

        let start = self.clock.now();
        let elapsed = timing.sample(start);
        let fps = frame_rate(elapsed);

        input.update(windows, window);

        if windows.should_close(window) {
            self.status = LoopStatus::StopRequested;
            return Iteration::Stop;
        }

        windows.present_frame(window);
        windows.poll_events();

        let steps = timing.scheduler.advance_with(elapsed, |dt| sim.step(dt));
        timing.total_steps += steps;

        let info = FrameInfo {
            index: timing.frame_index,
            elapsed_ms: elapsed,
            frame_rate: fps,
            steps,
            total_steps: timing.total_steps,
            alpha: timing.scheduler.alpha(),
            step_ms: timing.scheduler.step_budget_ms(),
        };
        renderer.render(windows, window, &info);

        let pacing = self.pacer.pace(&self.clock, start);
        timing.frame_index += 1;

        log::debug!("fps: {fps:.0}");
        if let Some(summary) = self.stats.record(elapsed, steps, pacing.waited_ms) {
            log::info!(
                "{:.1} fps, {:.1} ups, {:.2} ms paced per frame",
                summary.fps,
                summary.ups,
                summary.mean_wait_ms
            );
            if summary.is_drifting() {
                log::debug!(
                    "frame rate {:.1} is {:.0}% off target {:.1}",
                    summary.fps,
                    summary.drift * 100.0,
                    self.rates.target_fps
                );
            }
        }

        Iteration::Continue(info)
    }

    fn report(&self, timing: &TimingState) -> LoopReport {
        LoopReport {
            frames: timing.frame_index,
            steps: timing.total_steps,
            accumulator_ms: timing.accumulator(),
            status: self.status,
        }
    }
}
