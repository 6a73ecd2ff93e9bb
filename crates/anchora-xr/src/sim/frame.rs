use crate::feature::ReferenceSpaceType;
use crate::math::{Mat4, Pose};
use crate::platform::{XrFrame, XrHitTestResult};

use super::session::{SimHitTestSource, SimSpace};

const PARALLEL_EPS: f32 = 1e-5;

/// One tick of the simulated device.
#[derive(Debug, Clone)]
pub struct SimFrame {
    session_id: u64,
    viewer: Mat4,
    surface_visible: bool,
    surface_height: f32,
    max_distance: f32,
}

impl SimFrame {
    pub(crate) fn new(session_id: u64, viewer: Mat4, surface_visible: bool, surface_height: f32, max_distance: f32) -> Self {
        Self {
            session_id,
            viewer,
            surface_visible,
            surface_height,
            max_distance,
        }
    }

    /// Origin of `space` in world coordinates for this frame.
    fn origin(&self, space: &SimSpace) -> Option<Mat4> {
        if space.session_id != self.session_id {
            return None;
        }
        Some(match space.kind {
            ReferenceSpaceType::Viewer => self.viewer,
            _ => Mat4::IDENTITY,
        })
    }

    fn cast(&self, ray: Mat4) -> Option<Mat4> {
        let origin = ray.translation();
        let dir = ray.forward();
        if dir.y.abs() < PARALLEL_EPS {
            return None;
        }

        let t = (self.surface_height - origin.y) / dir.y;
        if t <= 0.0 || t > self.max_distance {
            return None;
        }

        // Surface normal on +Y, -Z turned toward the ray's heading.
        let point = origin + dir * t;
        let yaw = (-dir.x).atan2(-dir.z);
        Some(Mat4::from_translation(point) * Mat4::from_rotation_y(yaw))
    }
}

/// Intersection of the viewer ray with the simulated surface.
#[derive(Debug, Clone)]
pub struct SimHit {
    session_id: u64,
    world: Mat4,
    frame_viewer: Mat4,
}

impl XrHitTestResult for SimHit {
    type Space = SimSpace;

    fn pose(&self, base: &SimSpace) -> Option<Mat4> {
        if base.session_id != self.session_id {
            return None;
        }
        let base_origin = match base.kind {
            ReferenceSpaceType::Viewer => self.frame_viewer,
            _ => Mat4::IDENTITY,
        };
        Some(base_origin.inverse() * self.world)
    }
}

impl XrFrame for SimFrame {
    type Space = SimSpace;
    type HitTestSource = SimHitTestSource;
    type HitResult = SimHit;

    fn hit_test_results(&self, source: &SimHitTestSource) -> Vec<SimHit> {
        // Sources from an ended session yield nothing.
        if source.session_id != self.session_id || !self.surface_visible {
            return Vec::new();
        }
        let Some(ray) = self.origin(&source.space) else {
            return Vec::new();
        };

        self.cast(ray)
            .map(|world| SimHit {
                session_id: self.session_id,
                world,
                frame_viewer: self.viewer,
            })
            .into_iter()
            .collect()
    }

    fn viewer_pose(&self, base: &SimSpace) -> Option<Mat4> {
        let origin = self.origin(base)?;
        Some(origin.inverse() * self.viewer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn space(kind: ReferenceSpaceType) -> SimSpace {
        SimSpace { kind, session_id: 1 }
    }

    fn looking_down(yaw: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)) * Mat4::from_rotation_y(yaw) * Mat4::from_rotation_x(-core::f32::consts::FRAC_PI_4)
    }

    #[test]
    fn stale_source_yields_no_results() {
        let frame = SimFrame::new(2, looking_down(0.0), true, 0.0, 10.0);
        let source = SimHitTestSource {
            space: space(ReferenceSpaceType::Viewer),
            session_id: 1,
        };
        assert!(frame.hit_test_results(&source).is_empty());
    }

    #[test]
    fn hidden_surface_yields_no_results() {
        let frame = SimFrame::new(1, looking_down(0.0), false, 0.0, 10.0);
        let source = SimHitTestSource {
            space: space(ReferenceSpaceType::Viewer),
            session_id: 1,
        };
        assert!(frame.hit_test_results(&source).is_empty());
    }

    #[test]
    fn hit_beyond_max_distance_is_dropped() {
        let frame = SimFrame::new(1, looking_down(0.0), true, 0.0, 1.0);
        let source = SimHitTestSource {
            space: space(ReferenceSpaceType::Viewer),
            session_id: 1,
        };
        assert!(frame.hit_test_results(&source).is_empty());
    }

    #[test]
    fn hit_pose_faces_ray_heading() {
        let yaw = core::f32::consts::FRAC_PI_2;
        let frame = SimFrame::new(1, looking_down(yaw), true, 0.0, 10.0);
        let source = SimHitTestSource {
            space: space(ReferenceSpaceType::Viewer),
            session_id: 1,
        };
        let hits = frame.hit_test_results(&source);
        let pose = hits[0].pose(&space(ReferenceSpaceType::Local)).unwrap();

        // Yawed a quarter turn left: the ray heads toward -X.
        let p = pose.translation();
        assert!((p - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-4, "{p:?}");
        assert!((pose.forward() - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn viewer_pose_in_viewer_space_is_identity() {
        let frame = SimFrame::new(1, looking_down(0.3), true, 0.0, 10.0);
        let pose = frame.viewer_pose(&space(ReferenceSpaceType::Viewer)).unwrap();
        assert!((pose.translation()).length() < 1e-5);
        assert!((pose.forward() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
