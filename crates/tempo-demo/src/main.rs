//! Tempo demo: opens a window and runs the engine loop on it.
//!
//! Usage:
//!   tempo-demo [--fps 60] [--ups 30] [--vsync] [--width 800] [--height 600]

mod pulse;

use anyhow::Result;
use clap::Parser;
use tempo_engine::config::{EngineConfig, RateConfig, WindowConfig};
use tempo_engine::core::Engine;
use tempo_engine::device::GpuInit;
use tempo_engine::input::Key;
use tempo_engine::logging::{init_logging, LoggingConfig};
use tempo_engine::time::Millis;
use tempo_engine::window::WinitWindowSystem;

use pulse::{KeyLogger, PulseRenderer};

#[derive(Parser)]
#[command(name = "tempo-demo")]
#[command(about = "Fixed-step game loop demo - Escape or the close button quits")]
struct Args {
    /// Target render rate (frames per second)
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Target simulation rate (updates per second)
    #[arg(long, default_value_t = 30.0)]
    ups: f64,

    /// Synchronize presentation with the display
    #[arg(long)]
    vsync: bool,

    /// Window width in logical pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Window title
    #[arg(long, default_value = "tempo")]
    title: String,

    /// Log filter (env_logger syntax); overrides RUST_LOG
    #[arg(long)]
    log: Option<String>,

    /// Do not close the window when Escape is released
    #[arg(long)]
    no_stop_key: bool,
}

impl Args {
    fn engine_config(&self) -> Result<EngineConfig> {
        Ok(EngineConfig {
            window: WindowConfig {
                title: self.title.clone(),
                width: self.width,
                height: self.height,
                ..WindowConfig::default()
            },
            rates: RateConfig::new(self.fps, self.ups, self.vsync)?,
            stop_key: (!self.no_stop_key).then_some(Key::Escape),
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &args.log {
        logging = logging.with_filter(filter.clone());
    }
    init_logging(logging);

    let config = args.engine_config()?;
    let gpu_init = GpuInit::default().with_vsync(config.rates.vsync);
    let mut windows = WinitWindowSystem::new(gpu_init, config.stop_key)?;
    let mut engine = Engine::new(config)?;

    let mut updates: u64 = 0;
    let mut sim = |_dt: Millis| updates += 1;

    let report = engine.run(
        &mut windows,
        |_, _| KeyLogger::default(),
        |_, _| PulseRenderer::new(),
        &mut sim,
    )?;

    log::info!(
        "done: {} frames, {} updates, {:.2} ms left in accumulator",
        report.frames,
        updates,
        report.accumulator_ms
    );
    Ok(())
}
