use crate::config::EngineConfig;
use crate::error::{FatalInitError, InitStage};
use crate::time::{Clock, Sleeper, SystemClock, ThreadSleeper};

use super::collab::{InputHandler, Renderer, Simulation, WindowSystem};
use super::engine_loop::{EngineLoop, LoopReport};

/// Where the engine is in its lifecycle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EngineState {
    Initializing,
    Running,
    ShuttingDown,
    Stopped,
}

/// Brings a window up, runs the loop on it, and tears it down again.
///
/// The window handle stays owned here for the whole run; the input handler
/// and renderer only ever borrow it.
pub struct Engine<C = SystemClock, S = ThreadSleeper> {
    config: EngineConfig,
    state: EngineState,
    engine_loop: EngineLoop<C, S>,
}

impl Engine<SystemClock, ThreadSleeper> {
    pub fn new(config: EngineConfig) -> Result<Self, FatalInitError> {
        Self::with_clock(config, SystemClock::new(), ThreadSleeper)
    }
}

impl<C: Clock, S: Sleeper> Engine<C, S> {
    /// Validates the configuration and prepares the loop.
    pub fn with_clock(config: EngineConfig, clock: C, sleeper: S) -> Result<Self, FatalInitError> {
        let engine_loop = EngineLoop::with_clock(config.rates, clock, sleeper)
            .map_err(|e| FatalInitError::new(InitStage::Config, e))?;

        Ok(Self {
            engine_loop,
            config,
            state: EngineState::Initializing,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the full lifecycle: init, loop until a stop signal, shutdown.
    ///
    /// Input handler and renderer are built by the given factories once the
    /// window exists. Any failure before the loop starts is fatal and the
    /// window (if one was created) is released before returning.
    pub fn run<W, I, R, U, MI, MR>(
        &mut self,
        windows: &mut W,
        make_input: MI,
        make_renderer: MR,
        sim: &mut U,
    ) -> Result<LoopReport, FatalInitError>
    where
        W: WindowSystem,
        I: InputHandler<W>,
        R: Renderer<W>,
        U: Simulation,
        MI: FnOnce(&mut W, &W::Handle) -> I,
        MR: FnOnce(&mut W, &W::Handle) -> R,
    {
        if self.state != EngineState::Initializing {
            log::warn!("engine already ran (state {:?}); ignoring run", self.state);
            return Err(FatalInitError::new(
                InitStage::Config,
                anyhow::anyhow!("engine can only be run once"),
            ));
        }

        log::info!(
            "{} v{} starting: {}x{} \"{}\", {} fps / {} ups, vsync {}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            self.config.window.width,
            self.config.window.height,
            self.config.window.title,
            self.config.rates.target_fps,
            self.config.rates.target_ups,
            if self.config.rates.vsync { "on" } else { "off" },
        );

        let window = match windows.create_window(&self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{e}");
                self.transition(EngineState::Stopped);
                return Err(e);
            }
        };

        if self.config.rates.vsync {
            windows.set_vsync(&window, true);
        }

        let mut input = make_input(windows, &window);
        let mut renderer = make_renderer(windows, &window);

        if let Err(e) = renderer.init(windows, &window) {
            let err = FatalInitError::new(InitStage::Renderer, e);
            log::error!("{err}");
            windows.destroy_window(window);
            self.transition(EngineState::Stopped);
            return Err(err);
        }

        self.transition(EngineState::Running);
        let report = self
            .engine_loop
            .run(windows, &window, &mut input, &mut renderer, sim);

        self.transition(EngineState::ShuttingDown);
        windows.destroy_window(window);
        self.transition(EngineState::Stopped);

        Ok(report)
    }

    fn transition(&mut self, next: EngineState) {
        log::info!("engine {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
