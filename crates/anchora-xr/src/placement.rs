use crate::math::{Mat4, Pose, Vec3};
use crate::reticle::Reticle;

/// How a selection copies the reticle transform onto the placed object.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PlacementPolicy {
    /// Copy the full reticle transform (position and surface orientation).
    #[default]
    FullPose,
    /// Copy only the position; the object keeps its own orientation.
    PositionOnly,
}

/// The virtual content the user positions.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct PlacedObject {
    visible: bool,
    transform: Mat4,
}

impl PlacedObject {
    /// Invisible and unpositioned.
    pub const fn hidden() -> Self {
        Self {
            visible: false,
            transform: Mat4::IDENTITY,
        }
    }

    pub const fn visible_at(transform: Mat4) -> Self {
        Self {
            visible: true,
            transform,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn transform(&self) -> Mat4 {
        self.transform
    }
}

/// Observable result of a selection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SelectOutcome {
    /// The suppression flag swallowed this selection.
    Suppressed,
    /// No surface tracked; nothing changed.
    NoSurface,
    /// The object became visible.
    Placed,
    /// The already visible object was moved.
    Moved,
}

/// Owns the [`PlacedObject`] and the one-shot suppression flag.
#[derive(Debug, Clone)]
pub struct PlacementController {
    policy: PlacementPolicy,
    initial: PlacedObject,
    object: PlacedObject,
    suppress_next: bool,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self::new(PlacementPolicy::default(), PlacedObject::hidden())
    }
}

impl PlacementController {
    pub fn new(policy: PlacementPolicy, initial: PlacedObject) -> Self {
        Self {
            policy,
            initial,
            object: initial,
            suppress_next: false,
        }
    }

    #[inline]
    pub fn object(&self) -> &PlacedObject {
        &self.object
    }

    #[inline]
    pub fn policy(&self) -> PlacementPolicy {
        self.policy
    }

    /// Restores the initial object and clears suppression (new session).
    pub fn reset(&mut self) {
        self.object = self.initial;
        self.suppress_next = false;
    }

    /// Makes the next selection a no-op.
    ///
    /// Used when one user gesture is delivered both to in-session UI and as an
    /// XR select; the UI handler calls this so the select does not also place.
    pub fn suppress_next_select(&mut self) {
        self.suppress_next = true;
    }

    #[inline]
    pub fn is_suppressing(&self) -> bool {
        self.suppress_next
    }

    /// Handles one selection against the current reticle.
    pub fn on_select(&mut self, reticle: &Reticle) -> SelectOutcome {
        if self.take_suppression() {
            return SelectOutcome::Suppressed;
        }

        let Some(pose) = reticle.pose() else {
            return SelectOutcome::NoSurface;
        };

        self.place(pose)
    }

    /// Places the object at `offset` expressed in the frame of `origin`.
    ///
    /// Serves controller-relative placement (e.g. 0.3 m in front of the
    /// viewer) where no reticle is involved. Honors suppression.
    pub fn place_relative(&mut self, origin: &Mat4, offset: Vec3) -> SelectOutcome {
        if self.take_suppression() {
            return SelectOutcome::Suppressed;
        }

        let target = Mat4::from_translation(origin.transform_point3(offset));
        self.place(target)
    }

    fn take_suppression(&mut self) -> bool {
        if self.suppress_next {
            self.suppress_next = false;
            log::debug!("selection suppressed");
            return true;
        }
        false
    }

    fn place(&mut self, pose: Mat4) -> SelectOutcome {
        let transform = match self.policy {
            PlacementPolicy::FullPose => pose,
            PlacementPolicy::PositionOnly => self.object.transform.with_translation(pose.translation()),
        };

        self.object.transform = transform;

        if self.object.visible {
            log::debug!("object moved to {:?}", transform.translation());
            SelectOutcome::Moved
        } else {
            self.object.visible = true;
            log::info!("object placed at {:?}", transform.translation());
            SelectOutcome::Placed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked(pose: Mat4) -> Reticle {
        Reticle::tracking_at(pose)
    }

    fn t(x: f32, z: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, 0.0, z))
    }

    #[test]
    fn first_select_places_second_moves() {
        let mut ctl = PlacementController::default();

        assert_eq!(ctl.on_select(&tracked(t(1.0, -1.0))), SelectOutcome::Placed);
        assert!(ctl.object().is_visible());
        assert_eq!(ctl.object().transform(), t(1.0, -1.0));

        assert_eq!(ctl.on_select(&tracked(t(2.0, -3.0))), SelectOutcome::Moved);
        assert_eq!(ctl.object().transform(), t(2.0, -3.0));
    }

    #[test]
    fn select_without_surface_changes_nothing() {
        let mut ctl = PlacementController::default();
        let before = *ctl.object();
        assert_eq!(ctl.on_select(&Reticle::default()), SelectOutcome::NoSurface);
        assert_eq!(*ctl.object(), before);
    }

    #[test]
    fn suppression_consumes_exactly_one_select() {
        let mut ctl = PlacementController::default();
        ctl.suppress_next_select();

        assert_eq!(ctl.on_select(&tracked(t(1.0, 0.0))), SelectOutcome::Suppressed);
        assert!(!ctl.object().is_visible());
        assert!(!ctl.is_suppressing());

        assert_eq!(ctl.on_select(&tracked(t(1.0, 0.0))), SelectOutcome::Placed);
    }

    #[test]
    fn suppression_clears_even_without_surface() {
        let mut ctl = PlacementController::default();
        ctl.suppress_next_select();
        assert_eq!(ctl.on_select(&Reticle::default()), SelectOutcome::Suppressed);
        assert!(!ctl.is_suppressing());
    }

    #[test]
    fn position_only_keeps_orientation() {
        let spin = Mat4::from_rotation_y(0.5);
        let mut ctl = PlacementController::new(PlacementPolicy::PositionOnly, PlacedObject::visible_at(spin));

        let surface = Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0)) * Mat4::from_rotation_x(0.3);
        assert_eq!(ctl.on_select(&tracked(surface)), SelectOutcome::Moved);

        let placed = ctl.object().transform();
        assert_eq!(placed.translation(), Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(placed.with_translation(Vec3::ZERO), spin);
    }

    #[test]
    fn place_relative_uses_origin_frame() {
        let mut ctl = PlacementController::new(PlacementPolicy::FullPose, PlacedObject::visible_at(Mat4::IDENTITY));
        let viewer = Mat4::from_translation(Vec3::new(0.0, 1.6, 0.0));

        assert_eq!(ctl.place_relative(&viewer, Vec3::new(0.0, 0.0, -0.3)), SelectOutcome::Moved);
        let p = ctl.object().transform().translation();
        assert!((p - Vec3::new(0.0, 1.6, -0.3)).length() < 1e-6);
    }

    #[test]
    fn reset_restores_initial_object() {
        let mut ctl = PlacementController::default();
        ctl.on_select(&tracked(t(1.0, 1.0)));
        ctl.suppress_next_select();
        ctl.reset();
        assert_eq!(*ctl.object(), PlacedObject::hidden());
        assert!(!ctl.is_suppressing());
    }
}
