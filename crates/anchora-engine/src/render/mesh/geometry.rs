use bytemuck::{Pod, Zeroable};

/// Inner radius of [`Mesh::Ring`](super::Mesh::Ring) relative to its outer radius.
pub const RING_INNER_RATIO: f32 = 0.75;
pub const RING_SEGMENTS: u16 = 32;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // pos
        1 => Float32x3  // normal
    ];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU-side indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let base = self.vertices.len() as u16;
        self.vertices
            .extend(corners.into_iter().map(|pos| MeshVertex { pos, normal }));
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

pub(super) fn cube() -> MeshData {
    const H: f32 = 0.5;
    let mut data = MeshData::default();

    // Counter-clockwise seen from outside.
    data.push_quad([[-H, -H, H], [H, -H, H], [H, H, H], [-H, H, H]], [0.0, 0.0, 1.0]);
    data.push_quad([[H, -H, -H], [-H, -H, -H], [-H, H, -H], [H, H, -H]], [0.0, 0.0, -1.0]);
    data.push_quad([[H, -H, H], [H, -H, -H], [H, H, -H], [H, H, H]], [1.0, 0.0, 0.0]);
    data.push_quad([[-H, -H, -H], [-H, -H, H], [-H, H, H], [-H, H, -H]], [-1.0, 0.0, 0.0]);
    data.push_quad([[-H, H, H], [H, H, H], [H, H, -H], [-H, H, -H]], [0.0, 1.0, 0.0]);
    data.push_quad([[-H, -H, -H], [H, -H, -H], [H, -H, H], [-H, -H, H]], [0.0, -1.0, 0.0]);

    data
}

pub(super) fn ring(inner: f32, segments: u16) -> MeshData {
    let segments = segments.max(3);
    let mut data = MeshData::default();
    let normal = [0.0, 0.0, 1.0];

    for i in 0..segments {
        let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
        let (s, c) = theta.sin_cos();
        data.vertices.push(MeshVertex { pos: [c * inner, s * inner, 0.0], normal });
        data.vertices.push(MeshVertex { pos: [c, s, 0.0], normal });
    }

    for i in 0..segments {
        let j = (i + 1) % segments;
        let (in_i, out_i) = (2 * i, 2 * i + 1);
        let (in_j, out_j) = (2 * j, 2 * j + 1);
        data.indices
            .extend_from_slice(&[in_i, out_i, out_j, in_i, out_j, in_j]);
    }

    data
}

pub(super) fn quad() -> MeshData {
    const H: f32 = 0.5;
    let mut data = MeshData::default();
    data.push_quad([[-H, -H, 0.0], [H, -H, 0.0], [H, H, 0.0], [-H, H, 0.0]], [0.0, 0.0, 1.0]);
    data
}
