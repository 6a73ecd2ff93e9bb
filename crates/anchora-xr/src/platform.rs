//! AR platform contract.
//!
//! The engine never talks to a device directly. Hosts implement these traits
//! over their XR runtime (or use [`crate::sim`]). All handles are
//! single-threaded: the engine runs on the render thread only.

use std::cell::Cell;
use std::rc::Rc;

use crate::feature::{FeatureSet, ReferenceSpaceType, SessionInit, SessionMode};
use crate::math::Mat4;
use crate::pending::XrRequest;

/// Entry point of the platform (the host's XR capability object).
pub trait XrSystem {
    type Session: XrSession;

    /// Whether sessions of `mode` can be requested at all.
    fn is_supported(&self, mode: SessionMode) -> bool;

    /// Requests a session. Resolves with the handle or rejects.
    fn request_session(&self, mode: SessionMode, init: &SessionInit) -> XrRequest<Self::Session>;
}

/// Options for a hit-test source request.
#[derive(Debug, Clone)]
pub struct HitTestOptions<S> {
    /// Space the hit-test ray is anchored to.
    pub space: S,
}

/// A running session handle. Cheap to clone; clones refer to the same session.
pub trait XrSession: Clone + 'static {
    type Space: Clone + 'static;
    type HitTestSource: 'static;
    type Frame: XrFrame<Space = Self::Space, HitTestSource = Self::HitTestSource>;

    /// Features the platform actually granted.
    fn enabled_features(&self) -> FeatureSet;

    fn request_reference_space(&self, kind: ReferenceSpaceType) -> XrRequest<Self::Space>;

    fn request_hit_test_source(
        &self,
        options: HitTestOptions<Self::Space>,
    ) -> XrRequest<Self::HitTestSource>;

    /// Registers the signal the platform fires when the session ends on its own.
    fn on_end(&self, signal: EndSignal);

    /// Asks the platform to end the session.
    fn end(&self);
}

/// Per-frame platform state.
pub trait XrFrame {
    type Space;
    type HitTestSource;
    type HitResult: XrHitTestResult<Space = Self::Space>;

    /// Ranked results for `source` this frame, best first.
    fn hit_test_results(&self, source: &Self::HitTestSource) -> Vec<Self::HitResult>;

    /// Pose of the viewer (phone/headset) expressed in `base`.
    fn viewer_pose(&self, base: &Self::Space) -> Option<Mat4>;
}

/// One intersection between the hit-test ray and real-world geometry.
pub trait XrHitTestResult {
    type Space;

    /// Pose of the intersection expressed in `base`, if it can be resolved.
    fn pose(&self, base: &Self::Space) -> Option<Mat4>;
}

/// One-shot cancellation token for session end.
///
/// Created by the session manager at start and handed to the platform, which
/// fires it when the session ends outside the engine's control. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct EndSignal(Rc<Cell<bool>>);

impl EndSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self) {
        self.0.set(true);
    }

    #[inline]
    pub fn is_fired(&self) -> bool {
        self.0.get()
    }
}
