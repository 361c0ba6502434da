//! Platform windows.
//!
//! Owns the `winit` event loop and the windows created on it, each bound to
//! its own GPU context. The engine loop drives it through `WindowSystem`.

mod placement;
mod winit_system;

pub use placement::centered_position;
pub use winit_system::WinitWindowSystem;
pub use winit::window::WindowId;
