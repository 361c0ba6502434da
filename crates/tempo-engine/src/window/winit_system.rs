use anyhow::Context;
use ouroboros::self_referencing;
use std::collections::HashMap;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::config::WindowConfig;
use crate::core::{InputSource, WindowSystem};
use crate::device::{present_mode_for, Gpu, GpuInit, SurfaceErrorAction};
use crate::error::{FatalInitError, InitStage};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputEvent, InputFrame, InputState, Key, KeyState};
use crate::render::{RenderCtx, RenderTarget};

use super::placement::centered_position;

/// How long `create_window` waits for the platform to hand out a live event loop.
const CREATE_POLL: Duration = Duration::from_millis(10);
const CREATE_ATTEMPTS: usize = 100;

/// `WindowSystem` backed by winit and wgpu.
///
/// Events are pumped with `pump_app_events`, so control flow stays with the
/// engine loop: nothing reaches a window's input state or close flag outside
/// of [`poll_events`](WindowSystem::poll_events).
pub struct WinitWindowSystem {
    event_loop: EventLoop<()>,
    registry: Registry,
}

impl WinitWindowSystem {
    /// Opens the platform event loop. Windows are created later.
    ///
    /// `stop_key` closes a window when released.
    pub fn new(gpu_init: GpuInit, stop_key: Option<Key>) -> Result<Self, FatalInitError> {
        let event_loop = EventLoop::new()
            .context("failed to create winit EventLoop")
            .map_err(|e| FatalInitError::new(InitStage::Window, e))?;

        Ok(Self {
            event_loop,
            registry: Registry {
                windows: HashMap::new(),
                gpu_init,
                stop_key,
                pending: None,
                created: None,
                exited: false,
            },
        })
    }

    /// Records one frame for `window` and submits it for presentation.
    ///
    /// Returns `false` when no frame was recorded (minimized window, transient
    /// surface error, unknown window). A fatal surface error marks the window
    /// for closing.
    pub fn draw<F>(&mut self, window: &WindowId, f: F) -> bool
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let Some(entry) = self.registry.windows.get_mut(window) else {
            return false;
        };

        entry.with_mut(|fields| {
            let gpu = fields.gpu;
            if !gpu.is_drawable() {
                return false;
            }

            let mut frame = match gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    log::warn!("surface error: {err}");
                    if gpu.handle_surface_error(err) == SurfaceErrorAction::Fatal {
                        log::error!("surface lost for good; closing window");
                        *fields.close_requested = true;
                    }
                    return false;
                }
            };

            {
                let ctx = RenderCtx {
                    device: gpu.device(),
                    queue: gpu.queue(),
                    surface_format: gpu.surface_format(),
                    size: gpu.size(),
                    scale_factor: fields.window.scale_factor(),
                };
                let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
                f(&ctx, &mut target);
            }

            gpu.submit(frame);
            true
        })
    }

    fn pump(&mut self, timeout: Duration) {
        let status = self
            .event_loop
            .pump_app_events(Some(timeout), &mut self.registry);

        if let PumpStatus::Exit(code) = status {
            log::info!("platform event loop exited ({code})");
            self.registry.exited = true;
        }
    }
}

impl WindowSystem for WinitWindowSystem {
    type Handle = WindowId;

    fn create_window(&mut self, config: &WindowConfig) -> Result<WindowId, FatalInitError> {
        self.registry.pending = Some(config.clone());

        for _ in 0..CREATE_ATTEMPTS {
            self.pump(CREATE_POLL);

            if let Some(created) = self.registry.created.take() {
                return created;
            }
            if self.registry.exited {
                break;
            }
        }

        self.registry.pending = None;
        Err(FatalInitError::new(
            InitStage::Window,
            anyhow::anyhow!("platform event loop never became ready"),
        ))
    }

    fn set_vsync(&mut self, window: &WindowId, enabled: bool) {
        if let Some(entry) = self.registry.windows.get_mut(window) {
            entry.with_gpu_mut(|gpu| gpu.set_present_mode(present_mode_for(enabled)));
        }
    }

    fn should_close(&self, window: &WindowId) -> bool {
        self.registry.exited
            || self
                .registry
                .windows
                .get(window)
                .is_none_or(|entry| *entry.borrow_close_requested())
    }

    fn request_close(&mut self, window: &WindowId) {
        if let Some(entry) = self.registry.windows.get_mut(window) {
            entry.with_close_requested_mut(|close| *close = true);
        }
    }

    fn poll_events(&mut self) {
        self.pump(Duration::ZERO);
    }

    fn present_frame(&mut self, window: &WindowId) {
        let Some(entry) = self.registry.windows.get_mut(window) else {
            return;
        };

        entry.with_mut(|fields| {
            if fields.gpu.has_pending_frame() {
                fields.window.pre_present_notify();
                fields.gpu.present();
            }
        });
    }

    fn destroy_window(&mut self, window: WindowId) {
        if self.registry.windows.remove(&window).is_some() {
            log::info!("window {window:?} destroyed");
        }
    }
}

impl InputSource for WinitWindowSystem {
    fn sample_input(&mut self, window: &WindowId, state: &mut InputState, frame: &mut InputFrame) {
        let Some(entry) = self.registry.windows.get_mut(window) else {
            return;
        };

        entry.with_mut(|fields| {
            state.clone_from(fields.input_state);
            std::mem::swap(frame, fields.input_frame);
            fields.input_frame.clear();
        });
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    close_requested: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

/// Everything the platform callbacks touch while events are pumped.
struct Registry {
    windows: HashMap<WindowId, WindowEntry>,
    gpu_init: GpuInit,
    stop_key: Option<Key>,

    /// Window to create once the platform hands out an active loop.
    pending: Option<WindowConfig>,
    created: Option<Result<WindowId, FatalInitError>>,
    exited: bool,
}

impl Registry {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.pending.take() else {
            return;
        };

        let created = create_entry(event_loop, &config, &self.gpu_init).map(|entry| {
            let id = entry.borrow_window().id();
            self.windows.insert(id, entry);
            id
        });
        self.created = Some(created);
    }
}

fn create_entry(
    event_loop: &ActiveEventLoop,
    config: &WindowConfig,
    gpu_init: &GpuInit,
) -> Result<WindowEntry, FatalInitError> {
    let attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
        .with_resizable(config.resizable)
        .with_visible(false);

    let window = event_loop
        .create_window(attrs)
        .context("failed to create window")
        .map_err(|e| FatalInitError::new(InitStage::Window, e))?;

    if config.centered {
        center(&window);
    }

    let gpu_init = gpu_init.clone();
    let built = WindowEntryTryBuilder {
        input_state: InputState::default(),
        input_frame: InputFrame::default(),
        close_requested: false,
        window,
        gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
    }
    .try_build();

    let entry = show_when_ready(built, |entry| entry.borrow_window().set_visible(true))?;

    log::info!(
        "window {:?} open: \"{}\" {}x{}",
        entry.borrow_window().id(),
        config.title,
        config.width,
        config.height
    );
    Ok(entry)
}

/// Shows the window only once its graphics context exists, so a failed
/// bring-up never flashes an empty window.
fn show_when_ready<T>(
    built: anyhow::Result<T>,
    show: impl FnOnce(&T),
) -> Result<T, FatalInitError> {
    let entry = built.map_err(|e| FatalInitError::new(InitStage::Graphics, e))?;
    show(&entry);
    Ok(entry)
}

fn center(window: &Window) {
    let Some(monitor) = window.primary_monitor().or_else(|| window.current_monitor()) else {
        log::debug!("no monitor reported; leaving window placement to the platform");
        return;
    };

    let position = centered_position(monitor.position(), monitor.size(), window.outer_size());
    window.set_outer_position(position);
}

/// Whether `event` is the release of the configured stop key.
fn is_stop_event(stop_key: Option<Key>, event: &InputEvent) -> bool {
    match (stop_key, event) {
        (
            Some(stop),
            InputEvent::Key {
                key,
                state: KeyState::Released,
                ..
            },
        ) => *key == stop,
        _ => false,
    }
}

impl ApplicationHandler for Registry {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);
        self.create_pending(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let stop_key = self.stop_key;
        let Some(entry) = self.windows.get_mut(&window_id) else {
            return;
        };

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                if is_stop_event(stop_key, &ev) {
                    log::info!("stop key released");
                    *fields.close_requested = true;
                }
                fields.input_state.apply_event(fields.input_frame, ev);
            }

            match &event {
                WindowEvent::CloseRequested => {
                    log::info!("close requested for window {window_id:?}");
                    *fields.close_requested = true;
                }
                WindowEvent::Resized(size) => fields.gpu.resize(*size),
                WindowEvent::ScaleFactorChanged { .. } => {
                    fields.gpu.resize(fields.window.inner_size());
                }
                _ => {}
            }
        });
    }
}
