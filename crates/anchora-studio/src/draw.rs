//! Scene content: cameras and the mesh lists handed to the renderers.

use std::f32::consts::FRAC_PI_2;

use anchora_engine::paint::Color;
use anchora_engine::render::{Camera, Mesh, MeshList};
use anchora_xr::{ArView, FrameOutcome, Mat4, SessionState, Vec3};

use crate::scene::Scene;

pub const FOV_Y_DEG: f32 = 70.0;
pub const Z_NEAR: f32 = 0.01;
pub const Z_FAR: f32 = 20.0;

/// HUD bar height in logical pixels.
pub const HUD_BAR_PX: f32 = 48.0;

const CUBE_SIZE: f32 = 0.1;
const RETICLE_RADIUS: f32 = 0.05;
const CARD_SIZE: f32 = 0.15;
const CARD_LIFT: f32 = 0.1;
const FLOOR_SIZE: f32 = 8.0;

pub const CLEAR: Color = Color::linear(0.02, 0.02, 0.03, 1.0);

fn green() -> Color {
    Color::hex(0x00ff00)
}

/// Camera for a viewer pose (world-from-viewer).
pub fn viewer_camera(viewer: Mat4, aspect: f32) -> Camera {
    let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, Z_NEAR, Z_FAR);
    Camera::new((proj * viewer.inverse()).to_cols_array_2d())
}

/// Spin applied to demo cubes, X then Y like an XYZ Euler rotation.
pub fn spin(angle: f32) -> Mat4 {
    Mat4::from_rotation_x(angle) * Mat4::from_rotation_y(angle)
}

/// Hello-cube: a unit cube at the origin, seen from 5 m away.
pub fn hello_cube(list: &mut MeshList, aspect: f32, angle: f32) -> Camera {
    list.clear();
    list.push(Mesh::Cube, spin(angle).to_cols_array_2d(), green());

    let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, 0.1, 1000.0);
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    Camera::new((proj * view).to_cols_array_2d())
}

/// Per-frame inputs of the AR scenes besides the engine view.
#[derive(Debug, Copy, Clone)]
pub struct ArLook {
    pub scene: Scene,
    /// Fallback viewer pose while the platform gives none.
    pub device_pose: Mat4,
    pub surface_height: f32,
    pub surface_visible: bool,
    pub spin: f32,
    pub card_tint: Color,
}

/// Model matrix of the placed cube. Only the hello-AR cube spins.
pub fn cube_model(scene: Scene, transform: Mat4, angle: f32) -> Mat4 {
    let size = Mat4::from_scale(Vec3::splat(CUBE_SIZE));
    match scene {
        Scene::HelloAr => transform * spin(angle) * size,
        _ => transform * size,
    }
}

/// Fills the world list for an AR scene and returns its camera.
pub fn ar_scene(view: &ArView<'_>, look: &ArLook, list: &mut MeshList, aspect: f32) -> Camera {
    list.clear();

    if look.surface_visible {
        let floor = Mat4::from_translation(Vec3::new(0.0, look.surface_height - 0.001, 0.0))
            * Mat4::from_rotation_x(-FRAC_PI_2)
            * Mat4::from_scale(Vec3::splat(FLOOR_SIZE));
        list.push(Mesh::Quad, floor.to_cols_array_2d(), Color::linear(0.08, 0.08, 0.1, 1.0));
    }

    let object = view.object;
    if object.is_visible() {
        match look.scene {
            Scene::Overlay => {
                let card = object.transform()
                    * Mat4::from_translation(Vec3::new(0.0, CARD_LIFT, 0.0))
                    * Mat4::from_scale(Vec3::splat(CARD_SIZE));
                list.push(Mesh::Quad, card.to_cols_array_2d(), look.card_tint);
            }
            _ => {
                let cube = cube_model(look.scene, object.transform(), look.spin);
                list.push(Mesh::Cube, cube.to_cols_array_2d(), green());
            }
        }
    }

    if look.scene.shows_reticle() {
        if let Some(pose) = view.reticle.pose() {
            let ring = pose * Mat4::from_rotation_x(-FRAC_PI_2) * Mat4::from_scale(Vec3::splat(RETICLE_RADIUS));
            list.push(Mesh::Ring, ring.to_cols_array_2d(), Color::WHITE);
        }
    }

    viewer_camera(view.viewer.unwrap_or(look.device_pose), aspect)
}

/// Bar color for a session state.
pub fn status_color(state: SessionState) -> Color {
    match state {
        SessionState::Idle => Color::hex(0x3a3a44),
        SessionState::Requesting => Color::hex(0xd9a21b),
        SessionState::Active => Color::hex(0x1f8f4e),
        SessionState::Ended => Color::hex(0x8f1f2a),
    }
}

/// Tracking lamp color for a frame outcome.
pub fn outcome_color(outcome: FrameOutcome) -> Color {
    match outcome {
        FrameOutcome::Tracking(_) => Color::hex(0x2ee66b),
        FrameOutcome::NoSurfaceTracked => Color::hex(0xe6c02e),
        FrameOutcome::AcquisitionPending | FrameOutcome::ReferenceSpacePending => Color::hex(0x2e8be6),
        FrameOutcome::AcquisitionFailed | FrameOutcome::ReferenceSpaceFailed => Color::hex(0xe62e3d),
        FrameOutcome::HitTestDisabled | FrameOutcome::NoXrFrame | FrameOutcome::Inactive => {
            Color::hex(0x55555f)
        }
    }
}

/// Fills the HUD list (NDC, identity camera): a status bar plus a tracking lamp.
pub fn hud(list: &mut MeshList, window_height: f32, state: SessionState, outcome: FrameOutcome) {
    list.clear();
    if window_height <= 0.0 {
        return;
    }

    let bar_h = 2.0 * HUD_BAR_PX / window_height;
    let bar = Mat4::from_translation(Vec3::new(0.0, 1.0 - bar_h * 0.5, 0.5)) * Mat4::from_scale(Vec3::new(2.0, bar_h, 1.0));
    list.push(Mesh::Quad, bar.to_cols_array_2d(), status_color(state).with_alpha(0.85));

    let lamp_h = bar_h * 0.5;
    let lamp = Mat4::from_translation(Vec3::new(-0.95, 1.0 - bar_h * 0.5, 0.4)) * Mat4::from_scale(Vec3::new(lamp_h, lamp_h, 1.0));
    list.push(Mesh::Quad, lamp.to_cols_array_2d(), outcome_color(outcome));
}

/// Whether a logical-pixel position lies on the HUD bar.
#[inline]
pub fn on_hud_bar(_x: f32, y: f32) -> bool {
    (0.0..HUD_BAR_PX).contains(&y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(camera: &Camera, p: Vec3) -> (f32, f32, f32) {
        let q = Mat4::from_cols_array_2d(&camera.view_proj).project_point3(p);
        (q.x, q.y, q.z)
    }

    #[test]
    fn viewer_camera_centers_forward_point() {
        let viewer = Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0));
        let camera = viewer_camera(viewer, 16.0 / 9.0);
        let (x, y, z) = clip(&camera, Vec3::new(0.0, 1.6, -2.0));
        assert!(x.abs() < 1e-5 && y.abs() < 1e-5, "({x}, {y})");
        assert!((0.0..=1.0).contains(&z), "depth {z}");
    }

    #[test]
    fn point_behind_viewer_is_clipped() {
        let camera = viewer_camera(Mat4::IDENTITY, 1.0);
        let (_, _, z) = clip(&camera, Vec3::new(0.0, 0.0, 2.0));
        assert!(!(0.0..=1.0).contains(&z));
    }

    #[test]
    fn hud_bar_hit_region() {
        assert!(on_hud_bar(10.0, 0.0));
        assert!(on_hud_bar(500.0, HUD_BAR_PX - 1.0));
        assert!(!on_hud_bar(10.0, HUD_BAR_PX));
    }

    #[test]
    fn hud_has_bar_and_lamp() {
        let mut list = MeshList::new();
        hud(&mut list, 720.0, SessionState::Active, FrameOutcome::NoSurfaceTracked);
        assert_eq!(list.len(), 2);

        hud(&mut list, 0.0, SessionState::Idle, FrameOutcome::Inactive);
        assert!(list.is_empty());
    }

    #[test]
    fn only_hello_ar_cube_spins() {
        let at = Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0));
        let still = at * Mat4::from_scale(Vec3::splat(CUBE_SIZE));
        assert_eq!(cube_model(Scene::HitTest, at, 1.2), still);
        assert_ne!(cube_model(Scene::HelloAr, at, 1.2), still);
        assert_eq!(cube_model(Scene::HelloAr, at, 0.0), still);
    }
}
