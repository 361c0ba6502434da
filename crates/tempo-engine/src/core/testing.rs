//! In-crate fakes for driving the loop without a platform window.

use std::cell::RefCell;
use std::time::Duration;

use crate::config::WindowConfig;
use crate::error::{FatalInitError, InitStage};
use crate::input::{InputEvent, InputFrame, InputState, Key, KeyState, Modifiers};
use crate::time::{Clock, ManualClock, Millis, Sleeper};

use super::collab::{FrameInfo, InputHandler, InputSource, Renderer, WindowSystem};
use super::engine_loop::{EngineLoop, LoopReport};

/// Sleeper that moves a manual clock forward instead of blocking.
pub(crate) struct AdvanceSleeper(pub ManualClock);

impl Sleeper for AdvanceSleeper {
    fn sleep(&mut self, quantum: Duration) {
        self.0.advance_by(quantum);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Create(String),
    Vsync(bool),
    Input,
    ShouldClose,
    Present,
    Poll,
    Render,
    Destroy,
}

/// Window system that closes after a fixed number of polls.
pub(crate) struct FakeWindows {
    calls: RefCell<Vec<Call>>,
    close_after_polls: usize,
    polls: usize,
    renders: usize,
    close_on_render: Option<usize>,
    closed: bool,
    render_cost: Option<(ManualClock, Millis)>,
    fail_create: bool,

    /// Events delivered on each poll, front first.
    queued: Vec<Vec<InputEvent>>,
    input: InputState,
    frame: InputFrame,
}

impl FakeWindows {
    pub fn closing_after(polls: usize) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            close_after_polls: polls,
            polls: 0,
            renders: 0,
            close_on_render: None,
            closed: false,
            render_cost: None,
            fail_create: false,
            queued: Vec::new(),
            input: InputState::default(),
            frame: InputFrame::default(),
        }
    }

    pub fn close_on_render(mut self, nth: usize) -> Self {
        self.close_on_render = Some(nth);
        self
    }

    pub fn with_render_cost(mut self, clock: &ManualClock, ms: Millis) -> Self {
        self.render_cost = Some((clock.clone(), ms));
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Queues key events for the next poll.
    pub fn queue_keys(mut self, keys: &[(Key, KeyState)]) -> Self {
        let events = keys
            .iter()
            .map(|&(key, state)| InputEvent::Key {
                key,
                state,
                modifiers: Modifiers::default(),
                repeat: false,
            })
            .collect();
        self.queued.push(events);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    /// Runs the loop with no-op input and rendering collaborators.
    pub fn run<C: Clock, S: Sleeper>(
        &mut self,
        engine: &mut EngineLoop<C, S>,
        mut sim: impl FnMut(Millis),
    ) -> LoopReport {
        engine.run(self, &0, &mut (), &mut (), &mut sim)
    }
}

impl WindowSystem for FakeWindows {
    type Handle = u32;

    fn create_window(&mut self, config: &WindowConfig) -> Result<u32, FatalInitError> {
        self.record(Call::Create(config.title.clone()));
        if self.fail_create {
            return Err(FatalInitError::new(
                InitStage::Window,
                anyhow::anyhow!("no display available"),
            ));
        }
        Ok(0)
    }

    fn set_vsync(&mut self, _window: &u32, enabled: bool) {
        self.record(Call::Vsync(enabled));
    }

    fn should_close(&self, _window: &u32) -> bool {
        self.record(Call::ShouldClose);
        self.closed || self.polls >= self.close_after_polls
    }

    fn request_close(&mut self, _window: &u32) {
        self.closed = true;
    }

    fn poll_events(&mut self) {
        self.record(Call::Poll);
        self.polls += 1;

        if !self.queued.is_empty() {
            for ev in self.queued.remove(0) {
                self.input.apply_event(&mut self.frame, ev);
            }
        }
    }

    fn present_frame(&mut self, _window: &u32) {
        self.record(Call::Present);
    }

    fn destroy_window(&mut self, _window: u32) {
        self.record(Call::Destroy);
    }
}

impl InputSource for FakeWindows {
    fn sample_input(&mut self, _window: &u32, state: &mut InputState, frame: &mut InputFrame) {
        state.clone_from(&self.input);
        std::mem::swap(frame, &mut self.frame);
        self.frame.clear();
    }
}

impl InputHandler<FakeWindows> for () {
    fn update(&mut self, windows: &mut FakeWindows, _window: &u32) {
        windows.record(Call::Input);
    }
}

impl Renderer<FakeWindows> for () {
    fn init(&mut self, _windows: &mut FakeWindows, _window: &u32) -> anyhow::Result<()> {
        Ok(())
    }

    fn render(&mut self, windows: &mut FakeWindows, window: &u32, _frame: &FrameInfo) {
        windows.record(Call::Render);
        windows.renders += 1;

        if let Some((clock, ms)) = &windows.render_cost {
            clock.advance(*ms);
        }
        if windows.close_on_render == Some(windows.renders) {
            windows.request_close(window);
        }
    }
}
