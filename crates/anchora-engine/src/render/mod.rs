//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into the
//! frame's [`RenderTarget`].
//!
//! Convention: right-handed world space, +Y up, camera looking down -Z,
//! `[0, 1]` clip-space depth. Matrices are column-major `[[f32; 4]; 4]`.

mod camera;
mod ctx;
pub mod mesh;

pub use camera::Camera;
pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{Mesh, MeshInstance, MeshList, MeshRenderer};
