use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

use super::Mesh;

/// Per-instance data (80 bytes):
///
///  offset  0  model   [[f32; 4]; 4]  loc 2..5 (one column per location)
///  offset 64  color   [f32; 4]       loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl MeshInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4
    ];

    pub fn new(model: [[f32; 4]; 4], color: Color) -> Self {
        Self {
            model,
            color: color.to_array(),
        }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// A contiguous run of instances sharing one mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshBatch {
    pub mesh: Mesh,
    pub instances: Range<u32>,
}

/// Draws recorded for one frame.
///
/// Reuse across frames with [`clear`](Self::clear) to keep the allocation.
#[derive(Debug, Default)]
pub struct MeshList {
    items: Vec<(Mesh, MeshInstance)>,
}

impl MeshList {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, mesh: Mesh, model: [[f32; 4]; 4], color: Color) {
        self.items.push((mesh, MeshInstance::new(model, color)));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Instances grouped by mesh in [`Mesh::ALL`] order, plus the batch ranges.
    ///
    /// Within a mesh, push order is preserved.
    pub fn batches(&self) -> (Vec<MeshInstance>, Vec<MeshBatch>) {
        let mut instances = Vec::with_capacity(self.items.len());
        let mut batches = Vec::new();

        for mesh in Mesh::ALL {
            let start = instances.len() as u32;
            instances.extend(
                self.items
                    .iter()
                    .filter(|(m, _)| *m == mesh)
                    .map(|(_, inst)| *inst),
            );
            let end = instances.len() as u32;
            if end > start {
                batches.push(MeshBatch {
                    mesh,
                    instances: start..end,
                });
            }
        }

        (instances, batches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const I: [[f32; 4]; 4] = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];

    #[test]
    fn instance_is_80_bytes() {
        assert_eq!(std::mem::size_of::<MeshInstance>(), 80);
    }

    #[test]
    fn batches_group_by_mesh_in_draw_order() {
        let mut list = MeshList::new();
        list.push(Mesh::Quad, I, Color::WHITE);
        list.push(Mesh::Cube, I, Color::BLACK);
        list.push(Mesh::Quad, I, Color::BLACK);

        let (instances, batches) = list.batches();
        assert_eq!(instances.len(), 3);
        assert_eq!(
            batches,
            vec![
                MeshBatch { mesh: Mesh::Cube, instances: 0..1 },
                MeshBatch { mesh: Mesh::Quad, instances: 1..3 },
            ]
        );
        // Push order kept inside the quad batch.
        assert_eq!(instances[1].color, Color::WHITE.to_array());
        assert_eq!(instances[2].color, Color::BLACK.to_array());
    }

    #[test]
    fn clear_empties_the_list() {
        let mut list = MeshList::new();
        list.push(Mesh::Ring, I, Color::WHITE);
        list.clear();
        assert!(list.is_empty());
        assert!(list.batches().1.is_empty());
    }
}
