use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface;
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Owns wgpu core objects, the surface configuration and the frame waiting
/// to be presented.
///
/// Rendering and presentation are split: [`submit`](Self::submit) queues the
/// GPU work and parks the surface texture, [`present`](Self::present) shows
/// it. The engine loop presents at the start of the next iteration.
pub struct Gpu<'w> {
    /// Surface bound to the window. The window must outlive the `Gpu`.
    surface: wgpu::Surface<'w>,

    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    /// Submitted but not yet presented.
    pending: Option<wgpu::SurfaceTexture>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(surface::is_drawable(size), "window has zero size");

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("tempo device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps, prefer_srgb)
            .context("no supported surface formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface::choose_present_mode(&caps, present_mode),
            alpha_mode: surface::choose_alpha_mode(&caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let gpu = Self {
            surface,
            adapter,
            device,
            queue,
            config,
            size,
            pending: None,
        };

        let info = gpu.adapter.get_info();
        log::info!(
            "gpu ready: {} ({:?}), format {:?}, present mode {:?}",
            info.name,
            info.backend,
            gpu.config.format,
            gpu.config.present_mode
        );

        Ok(gpu)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        self.config.present_mode
    }

    /// Current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    /// Whether the surface currently has a non-zero extent.
    pub fn is_drawable(&self) -> bool {
        surface::is_drawable(self.size)
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reconfigures the surface after a resize.
    ///
    /// Zero-sized updates are recorded but not applied.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !surface::is_drawable(new_size) {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.reconfigure();
    }

    /// Switches between synchronized and free-running presentation.
    pub fn set_present_mode(&mut self, mode: wgpu::PresentMode) {
        let caps = self.surface.get_capabilities(&self.adapter);
        let mode = surface::choose_present_mode(&caps, mode);
        if mode == self.config.present_mode {
            return;
        }

        log::debug!("present mode {:?} -> {:?}", self.config.present_mode, mode);
        self.config.present_mode = mode;
        self.reconfigure();
    }

    fn reconfigure(&mut self) {
        // A parked texture belongs to the old swapchain.
        self.pending = None;
        if surface::is_drawable(self.size) {
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Whether there is a submitted frame waiting for [`present`](Self::present).
    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Acquires the next surface texture and creates an encoder.
    ///
    /// A frame that was submitted but never presented is presented first,
    /// since the swapchain will not hand out another texture while it is held.
    pub fn begin_frame(&mut self) -> std::result::Result<GpuFrame, SurfaceError> {
        self.present();

        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("tempo frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands and parks the texture for presentation.
    pub fn submit(&mut self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        self.pending = Some(surface_texture);
    }

    /// Presents the parked frame, if any. Returns whether something was shown.
    pub fn present(&mut self) -> bool {
        match self.pending.take() {
            Some(texture) => {
                texture.present();
                true
            }
            None => false,
        }
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring
    /// the surface when that is the fix.
    pub fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        let action = surface::classify_surface_error(&err);
        if action == SurfaceErrorAction::Reconfigured {
            self.reconfigure();
        }
        action
    }
}
