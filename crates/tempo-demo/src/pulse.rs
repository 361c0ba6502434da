use tempo_engine::core::{FrameInfo, InputHandler, Renderer};
use tempo_engine::input::{Key, KeyboardInput};
use tempo_engine::window::{WindowId, WinitWindowSystem};

/// Length of one full color cycle in simulated time.
const PERIOD_MS: f64 = 4000.0;

/// Clears the window to a color that cycles with simulated time.
///
/// Because the hue follows `FrameInfo::sim_time_ms`, a change of render rate
/// does not change how fast the color moves.
#[derive(Debug, Default)]
pub struct PulseRenderer {
    skipped: u64,
}

impl PulseRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer<WinitWindowSystem> for PulseRenderer {
    fn init(&mut self, _windows: &mut WinitWindowSystem, window: &WindowId) -> anyhow::Result<()> {
        log::debug!("pulse renderer attached to {window:?}");
        Ok(())
    }

    fn render(&mut self, windows: &mut WinitWindowSystem, window: &WindowId, frame: &FrameInfo) {
        let color = pulse_color(frame.sim_time_ms());
        if !windows.draw(window, |_ctx, target| target.clear(color)) {
            self.skipped += 1;
            log::trace!("frame {} not drawn ({} skipped so far)", frame.index, self.skipped);
        }
    }
}

/// Maps simulated time to a slowly rotating color.
pub fn pulse_color(sim_time_ms: f64) -> wgpu::Color {
    let phase = (sim_time_ms / PERIOD_MS).fract() * std::f64::consts::TAU;
    let wave = |offset: f64| 0.5 + 0.5 * (phase + offset).sin();

    wgpu::Color {
        r: 0.1 + 0.4 * wave(0.0),
        g: 0.1 + 0.4 * wave(std::f64::consts::TAU / 3.0),
        b: 0.1 + 0.4 * wave(2.0 * std::f64::consts::TAU / 3.0),
        a: 1.0,
    }
}

/// Keyboard handler that logs key presses after each snapshot.
#[derive(Debug, Default)]
pub struct KeyLogger {
    keys: KeyboardInput,
}

impl InputHandler<WinitWindowSystem> for KeyLogger {
    fn update(&mut self, windows: &mut WinitWindowSystem, window: &WindowId) {
        self.keys.update(windows, window);

        for key in &self.keys.frame().keys_pressed {
            log::debug!("key down: {key}");
        }
        if self.keys.pressed(Key::Space) {
            log::info!("space pressed");
        }
    }
}
