//! Pose helpers on top of `glam`.
//!
//! Conventions: right-handed, +Y up, the camera looks down -Z. `Mat4` is
//! column-major, the same layout as an XR pose's `transform.matrix`, so
//! platform matrices can be copied verbatim.

pub use glam::{Mat4, Vec3};

/// Read and edit a rigid transform as a pose.
pub trait Pose {
    /// Position part of the transform.
    fn translation(&self) -> Vec3;

    /// Unit direction the pose faces (its -Z axis).
    fn forward(&self) -> Vec3;

    /// Same orientation, moved to `position`.
    fn with_translation(&self, position: Vec3) -> Self;
}

impl Pose for Mat4 {
    #[inline]
    fn translation(&self) -> Vec3 {
        self.w_axis.truncate()
    }

    #[inline]
    fn forward(&self) -> Vec3 {
        (-self.z_axis.truncate()).normalize_or_zero()
    }

    #[inline]
    fn with_translation(&self, position: Vec3) -> Self {
        let mut out = *self;
        out.w_axis = position.extend(1.0);
        out
    }
}
