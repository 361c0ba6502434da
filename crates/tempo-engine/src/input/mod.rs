//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The window system translates platform events into `InputEvent`s while it
//! polls; handlers read a snapshot of the result once per iteration.

mod frame;
mod handler;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use handler::KeyboardInput;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, Modifiers};
