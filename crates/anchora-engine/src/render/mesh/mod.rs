//! Instanced mesh rendering.
//!
//! A fixed set of unit meshes lives on the GPU; each draw is an instance with
//! a model matrix and a color. Scenes scale meshes through the model matrix.

mod geometry;
mod list;
mod renderer;

pub use geometry::{MeshData, MeshVertex, RING_INNER_RATIO, RING_SEGMENTS};
pub use list::{MeshBatch, MeshInstance, MeshList};
pub use renderer::MeshRenderer;

/// Built-in unit meshes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Mesh {
    /// Axis-aligned cube, side 1, centered.
    Cube,
    /// Flat annulus in the XY plane, outer radius 1, facing +Z.
    Ring,
    /// Square in the XY plane, side 1, centered, facing +Z.
    Quad,
}

impl Mesh {
    /// Draw order: opaque meshes first, flat (possibly translucent) ones last.
    pub const ALL: [Mesh; 3] = [Mesh::Cube, Mesh::Ring, Mesh::Quad];

    pub fn geometry(self) -> MeshData {
        match self {
            Mesh::Cube => geometry::cube(),
            Mesh::Ring => geometry::ring(RING_INNER_RATIO, RING_SEGMENTS),
            Mesh::Quad => geometry::quad(),
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
