//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per presented frame. The
//! `timestamp_ms` it reports is what the AR frame driver receives.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
