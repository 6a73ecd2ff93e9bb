//! Anchora engine crate.
//!
//! Desktop host for the AR scenes: window loop, GPU device, frame timing,
//! input, and a small instanced mesh renderer.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod render;
