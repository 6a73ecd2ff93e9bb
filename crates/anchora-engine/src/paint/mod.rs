//! Colors used by renderers.

mod color;

pub use color::Color;
