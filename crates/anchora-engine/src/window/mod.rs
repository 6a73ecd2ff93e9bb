//! Window + animation loop.
//!
//! Owns the `winit` EventLoop and the single scene window, and wires them to
//! the GPU layer. Every redraw is one animation frame; the next one is
//! requested as soon as the current one is presented.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
