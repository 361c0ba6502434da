use winit::dpi::{PhysicalPosition, PhysicalSize};

/// Top-left position that centers `window` on a monitor.
///
/// A window larger than the monitor is pinned to the monitor origin.
pub fn centered_position(
    monitor_origin: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let dx = monitor_size.width.saturating_sub(window.width) / 2;
    let dy = monitor_size.height.saturating_sub(window.height) / 2;
    PhysicalPosition::new(
        monitor_origin.x.saturating_add(dx as i32),
        monitor_origin.y.saturating_add(dy as i32),
    )
}
