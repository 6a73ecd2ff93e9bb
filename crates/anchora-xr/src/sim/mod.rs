//! Simulated AR platform.
//!
//! A virtual device standing at `device_position` above a single horizontal
//! surface (the floor). Its hit-test ray is the viewer's forward axis, like a
//! phone-style AR session aiming through the screen center.
//!
//! Every asynchronous request resolves after `latency_polls` polls, which
//! lets tests step through "not yet resolved" frames deterministically. Call
//! counters record every platform request.

mod delay;
mod frame;
mod session;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::XrError;
use crate::feature::{FeatureSet, SessionInit, SessionMode};
use crate::math::{Mat4, Vec3};
use crate::pending::XrRequest;
use crate::platform::XrSystem;

pub use frame::{SimFrame, SimHit};
pub use session::{SimHitTestSource, SimSession, SimSpace};

use delay::Delay;

/// Simulated device configuration.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Whether `immersive-ar` is available at all.
    pub supported: bool,
    /// When set, every session request is rejected with this reason.
    pub deny_reason: Option<String>,
    /// Polls each request stays pending before resolving.
    pub latency_polls: u32,
    /// Features the device can grant.
    pub available_features: FeatureSet,
    /// Reject requests whose required features are not all available.
    pub strict_required: bool,
    /// Height of the tracked surface plane.
    pub surface_height: f32,
    /// Hits farther than this along the ray are discarded.
    pub max_distance: f32,
    /// Viewer position in the local space.
    pub device_position: Vec3,
    /// Grant non-viewer reference spaces. When false only `viewer` resolves.
    pub world_spaces_supported: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            supported: true,
            deny_reason: None,
            latency_polls: 2,
            available_features: FeatureSet::from_slice(&crate::feature::Feature::ALL),
            strict_required: true,
            surface_height: 0.0,
            max_distance: 10.0,
            device_position: Vec3::new(0.0, 1.6, 0.0),
            world_spaces_supported: true,
        }
    }
}

/// Running totals of platform requests.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SimCounters {
    pub session_requests: u32,
    pub viewer_space_requests: u32,
    /// Requests for any non-viewer reference space.
    pub world_space_requests: u32,
    pub hit_test_source_requests: u32,
    pub sessions_ended: u32,
    /// Engine-side `end` calls, whether or not the session was still running.
    pub end_requests: u32,
}

pub(crate) struct SimShared {
    config: RefCell<SimConfig>,
    viewer: Cell<Mat4>,
    surface_visible: Cell<bool>,
    fail_hit_test: Cell<bool>,
    counters: Cell<SimCounters>,
    current: RefCell<Option<SimSession>>,
    next_session_id: Cell<u64>,
}

impl SimShared {
    pub(crate) fn bump(&self, f: impl FnOnce(&mut SimCounters)) {
        let mut c = self.counters.get();
        f(&mut c);
        self.counters.set(c);
    }

    pub(crate) fn latency(&self) -> u32 {
        self.config.borrow().latency_polls
    }

    pub(crate) fn world_spaces_supported(&self) -> bool {
        self.config.borrow().world_spaces_supported
    }

    pub(crate) fn fail_hit_test(&self) -> bool {
        self.fail_hit_test.get()
    }

    pub(crate) fn release(&self, id: u64) {
        let mut current = self.current.borrow_mut();
        if current.as_ref().is_some_and(|s| s.id() == id) {
            *current = None;
        }
    }

    pub(crate) fn delayed<T: 'static>(&self, value: Result<T, XrError>) -> XrRequest<T> {
        Box::pin(Delay::new(self.latency(), value))
    }
}

/// Handle to the simulated platform. Clones share the same device.
#[derive(Clone)]
pub struct SimXr {
    shared: Rc<SimShared>,
}

impl Default for SimXr {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl SimXr {
    pub fn new(config: SimConfig) -> Self {
        let viewer = Mat4::from_translation(config.device_position);
        Self {
            shared: Rc::new(SimShared {
                config: RefCell::new(config),
                viewer: Cell::new(viewer),
                surface_visible: Cell::new(true),
                fail_hit_test: Cell::new(false),
                counters: Cell::new(SimCounters::default()),
                current: RefCell::new(None),
                next_session_id: Cell::new(1),
            }),
        }
    }

    pub fn counters(&self) -> SimCounters {
        self.shared.counters.get()
    }

    pub fn config(&self) -> SimConfig {
        self.shared.config.borrow().clone()
    }

    pub fn set_latency(&self, polls: u32) {
        self.shared.config.borrow_mut().latency_polls = polls;
    }

    /// Makes future hit-test source requests fail.
    pub fn set_fail_hit_test(&self, fail: bool) {
        self.shared.fail_hit_test.set(fail);
    }

    /// Hides or shows the tracked surface (no hit-test results while hidden).
    pub fn set_surface_visible(&self, visible: bool) {
        self.shared.surface_visible.set(visible);
    }

    pub fn viewer_pose(&self) -> Mat4 {
        self.shared.viewer.get()
    }

    pub fn set_viewer_pose(&self, pose: Mat4) {
        self.shared.viewer.set(pose);
    }

    /// Orients the device: `yaw` about +Y, then `pitch` about the local +X.
    pub fn look(&self, yaw: f32, pitch: f32) {
        let position = self.shared.config.borrow().device_position;
        self.set_viewer_pose(Mat4::from_translation(position) * Mat4::from_rotation_y(yaw) * Mat4::from_rotation_x(pitch));
    }

    /// The running session, if any.
    pub fn current_session(&self) -> Option<SimSession> {
        self.shared.current.borrow().clone()
    }

    /// Produces this tick's frame for the running session.
    pub fn begin_frame(&self) -> Option<SimFrame> {
        let session = self.current_session()?;
        let config = self.shared.config.borrow();
        Some(SimFrame::new(
            session.id(),
            self.shared.viewer.get(),
            self.shared.surface_visible.get(),
            config.surface_height,
            config.max_distance,
        ))
    }

    /// Ends the running session from the platform side (user left AR).
    pub fn end_session(&self) {
        if let Some(session) = self.current_session() {
            session.end_from_platform();
        }
    }
}

impl XrSystem for SimXr {
    type Session = SimSession;

    fn is_supported(&self, mode: SessionMode) -> bool {
        let config = self.shared.config.borrow();
        config.supported && mode != SessionMode::ImmersiveVr
    }

    fn request_session(&self, mode: SessionMode, init: &SessionInit) -> XrRequest<SimSession> {
        self.shared.bump(|c| c.session_requests += 1);

        let config = self.shared.config.borrow().clone();
        let missing = init.required_features.difference(config.available_features);

        let result = if let Some(reason) = config.deny_reason {
            Err(XrError::SessionRequestDenied { reason })
        } else if !config.supported {
            Err(XrError::UnsupportedPlatform(mode))
        } else if config.strict_required && !missing.is_empty() {
            Err(XrError::SessionRequestDenied {
                reason: format!("unsupported required features {missing}"),
            })
        } else {
            let id = self.shared.next_session_id.get();
            self.shared.next_session_id.set(id + 1);

            let granted = init.requested().intersection(config.available_features);
            let session = SimSession::new(self.shared.clone(), id, granted);
            *self.shared.current.borrow_mut() = Some(session.clone());
            Ok(session)
        };

        self.shared.delayed(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature, ReferenceSpaceType};
    use crate::math::Pose;
    use crate::platform::{HitTestOptions, XrFrame, XrHitTestResult, XrSession};

    fn granted_session(sim: &SimXr) -> SimSession {
        let init = SessionInit::default().require(Feature::HitTest);
        pollster::block_on(sim.request_session(SessionMode::ImmersiveAr, &init)).unwrap()
    }

    #[test]
    fn requests_are_counted() {
        let sim = SimXr::default();
        let session = granted_session(&sim);
        let _ = session.request_reference_space(ReferenceSpaceType::Viewer);
        let _ = session.request_reference_space(ReferenceSpaceType::Local);

        let c = sim.counters();
        assert_eq!(c.session_requests, 1);
        assert_eq!(c.viewer_space_requests, 1);
        assert_eq!(c.world_space_requests, 1);
    }

    #[test]
    fn denied_request_rejects() {
        let sim = SimXr::new(SimConfig {
            deny_reason: Some("user declined".into()),
            ..SimConfig::default()
        });
        let init = SessionInit::default();
        let err = pollster::block_on(sim.request_session(SessionMode::ImmersiveAr, &init)).unwrap_err();
        assert_eq!(err, XrError::SessionRequestDenied { reason: "user declined".into() });
        assert!(sim.current_session().is_none());
    }

    #[test]
    fn forward_ray_hits_floor() {
        let sim = SimXr::default();
        // Look 45 degrees down from 1.6 m: the floor hit is 1.6 m ahead.
        sim.look(0.0, -core::f32::consts::FRAC_PI_4);
        let session = granted_session(&sim);

        let local = pollster::block_on(session.request_reference_space(ReferenceSpaceType::Local)).unwrap();
        let viewer = pollster::block_on(session.request_reference_space(ReferenceSpaceType::Viewer)).unwrap();
        let source = pollster::block_on(session.request_hit_test_source(HitTestOptions { space: viewer })).unwrap();

        let frame = sim.begin_frame().unwrap();
        let hits = frame.hit_test_results(&source);
        assert_eq!(hits.len(), 1);

        let p = hits[0].pose(&local).unwrap().translation();
        assert!((p - Vec3::new(0.0, 0.0, -1.6)).length() < 1e-4, "hit at {p:?}");
    }

    #[test]
    fn level_gaze_misses_floor() {
        let sim = SimXr::default();
        let session = granted_session(&sim);
        let viewer = pollster::block_on(session.request_reference_space(ReferenceSpaceType::Viewer)).unwrap();
        let source = pollster::block_on(session.request_hit_test_source(HitTestOptions { space: viewer })).unwrap();

        let frame = sim.begin_frame().unwrap();
        assert!(frame.hit_test_results(&source).is_empty());
    }

    #[test]
    fn platform_end_fires_signal_and_clears_session() {
        let sim = SimXr::default();
        let session = granted_session(&sim);
        let signal = crate::platform::EndSignal::new();
        session.on_end(signal.clone());

        sim.end_session();
        assert!(signal.is_fired());
        assert!(sim.current_session().is_none());
        assert!(sim.begin_frame().is_none());
        assert_eq!(sim.counters().sessions_ended, 1);
    }
}
