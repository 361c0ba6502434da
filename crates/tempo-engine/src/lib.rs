//! Tempo engine crate.
//!
//! A single-window game loop: fixed-rate simulation steps decoupled from a
//! paced render rate, plus the platform and GPU plumbing to run it.

pub mod config;
pub mod core;
pub mod device;
pub mod error;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;

pub use config::{EngineConfig, RateConfig, WindowConfig};
pub use core::{Engine, EngineLoop, FrameInfo, Renderer};
pub use error::{FatalInitError, InitStage};
pub use window::WinitWindowSystem;
