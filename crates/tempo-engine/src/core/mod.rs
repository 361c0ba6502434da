//! Core loop contracts and drivers.
//!
//! `collab` defines what the loop needs from the outside world (windows,
//! input, rendering, simulation). `engine_loop` drives one window through
//! the frame cycle, and `lifecycle` wraps it in init and shutdown.

mod collab;
mod engine_loop;
mod lifecycle;

#[cfg(test)]
pub(crate) mod testing;

pub use collab::{FrameInfo, InputHandler, InputSource, Renderer, Simulation, WindowSystem};
pub use engine_loop::{EngineLoop, Iteration, LoopReport, LoopStatus, TimingState};
pub use lifecycle::{Engine, EngineState};
