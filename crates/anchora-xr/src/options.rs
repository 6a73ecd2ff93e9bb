use crate::feature::{Feature, ReferenceSpaceType, SessionInit, SessionMode};
use crate::math::Vec3;
use crate::placement::{PlacedObject, PlacementPolicy};

/// What a selection targets.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SelectTarget {
    /// Place at the reticle (hit-test placement).
    Reticle,
    /// Place at a fixed offset in front of the viewer; no hit-test involved.
    ViewerOffset(Vec3),
}

/// Engine configuration for one scene.
///
/// Keep presets in sync with the scenes shipped by the studio.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub mode: SessionMode,
    pub init: SessionInit,

    /// Space used to resolve poses into renderable transforms.
    pub reference_space: ReferenceSpaceType,

    pub select_target: SelectTarget,
    pub placement: PlacementPolicy,

    /// Object state restored whenever a session becomes active.
    pub initial_object: PlacedObject,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mode: SessionMode::ImmersiveAr,
            init: SessionInit::default().require(Feature::HitTest),
            reference_space: ReferenceSpaceType::Local,
            select_target: SelectTarget::Reticle,
            placement: PlacementPolicy::FullPose,
            initial_object: PlacedObject::hidden(),
        }
    }
}

impl EngineOptions {
    /// Controller-relative placement without hit-testing.
    pub fn hello_ar() -> Self {
        Self {
            init: SessionInit::default().dom_overlay("body"),
            select_target: SelectTarget::ViewerOffset(Vec3::new(0.0, 0.0, -0.3)),
            initial_object: PlacedObject::visible_at(Default::default()),
            ..Self::default()
        }
    }

    /// Reticle placement of an always-visible object.
    pub fn hit_test() -> Self {
        Self {
            init: SessionInit::default()
                .require(Feature::HitTest)
                .dom_overlay("body"),
            placement: PlacementPolicy::PositionOnly,
            initial_object: PlacedObject::visible_at(Default::default()),
            ..Self::default()
        }
    }

    /// Reticle placement of an object that appears on the first selection.
    pub fn overlay() -> Self {
        Self {
            init: SessionInit::default()
                .require(Feature::HitTest)
                .optional(Feature::DomOverlay)
                .dom_overlay("body"),
            placement: PlacementPolicy::PositionOnly,
            initial_object: PlacedObject::hidden(),
            ..Self::default()
        }
    }

    /// Whether sessions under these options can run hit-testing.
    pub fn wants_hit_test(&self) -> bool {
        self.init.requested().contains(Feature::HitTest)
    }
}
