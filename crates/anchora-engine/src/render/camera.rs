use bytemuck::{Pod, Zeroable};

/// Combined view-projection matrix, column-major.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub view_proj: [[f32; 4]; 4],
}

impl Camera {
    pub const IDENTITY: Camera = Camera {
        view_proj: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn new(view_proj: [[f32; 4]; 4]) -> Self {
        Self { view_proj }
    }

    pub(crate) fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}
