//! Per-frame orchestration.
//!
//! Fixed order inside [`FrameDriver::frame`]:
//! 1. observe session end
//! 2. resolve reference space and session (abort the AR part if missing)
//! 3. run the hit-test acquisition protocol
//! 4. update the reticle
//! 5. handle selections queued since the previous frame
//! 6. render (always)

use crate::error::XrError;
use crate::math::Mat4;
use crate::options::{EngineOptions, SelectTarget};
use crate::placement::{PlacedObject, PlacementController, SelectOutcome};
use crate::platform::{XrFrame, XrSession, XrSystem};
use crate::reticle::{Reticle, ReticleTracker, ReticleUpdate};
use crate::session::{AcquisitionStatus, SessionManager, SessionState};

/// Frame object type delivered by the platform of `X`.
pub type FrameOf<X> = <<X as XrSystem>::Session as XrSession>::Frame;

/// What the AR part of a frame did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No active session; render only.
    Inactive,
    /// Session active but the host supplied no XR frame this tick.
    NoXrFrame,
    /// The preferred reference space has not resolved yet.
    ReferenceSpacePending,
    /// The platform rejected the preferred reference space; nothing is tracked.
    ReferenceSpaceFailed,
    /// The session runs without hit-testing.
    HitTestDisabled,
    /// The hit-test source has not resolved yet; reticle left as it was.
    AcquisitionPending,
    /// The hit-test source could not be acquired for this session.
    AcquisitionFailed,
    /// Hit-test ran and found nothing; reticle hidden.
    NoSurfaceTracked,
    /// Reticle visible at this pose.
    Tracking(Mat4),
}

/// Summary of one frame, returned to the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub timestamp: f64,
    pub outcome: FrameOutcome,
    /// Selections consumed by the placement controller this frame.
    pub selections: usize,
    /// Whether the session ended since the previous frame.
    pub session_ended: bool,
}

/// Read-only view handed to the render step.
#[derive(Debug)]
pub struct ArView<'a> {
    pub timestamp: f64,
    pub state: SessionState,
    pub outcome: FrameOutcome,
    /// Viewer pose in the reference space, when one is available this frame.
    pub viewer: Option<Mat4>,
    pub reticle: &'a Reticle,
    pub object: &'a PlacedObject,
}

/// Engine instance: session manager + reticle tracker + placement controller.
///
/// Instances are independent; nothing is global.
pub struct FrameDriver<X: XrSystem> {
    manager: SessionManager<X>,
    tracker: ReticleTracker,
    placement: PlacementController,
    select_target: SelectTarget,
    queued_selects: usize,
}

impl<X: XrSystem> FrameDriver<X> {
    pub fn new(system: X, options: EngineOptions) -> Self {
        Self {
            manager: SessionManager::new(system, &options),
            tracker: ReticleTracker::new(),
            placement: PlacementController::new(options.placement, options.initial_object),
            select_target: options.select_target,
            queued_selects: 0,
        }
    }

    #[inline]
    pub fn manager(&self) -> &SessionManager<X> {
        &self.manager
    }

    #[inline]
    pub fn session_state(&self) -> SessionState {
        self.manager.state()
    }

    #[inline]
    pub fn reticle(&self) -> &Reticle {
        self.tracker.reticle()
    }

    #[inline]
    pub fn placed_object(&self) -> &PlacedObject {
        self.placement.object()
    }

    #[inline]
    pub fn placement(&self) -> &PlacementController {
        &self.placement
    }

    /// Starts a session. On success the reticle and object are reset.
    pub async fn start(&mut self) -> Result<(), XrError> {
        self.manager.start().await?;
        self.tracker.hide();
        self.placement.reset();
        self.queued_selects = 0;
        Ok(())
    }

    /// Ends the running session, if any.
    pub fn end(&mut self) {
        if self.manager.state() == SessionState::Active {
            self.manager.end();
            self.on_session_ended();
        }
    }

    /// Queues a selection signal for the next frame.
    pub fn select(&mut self) {
        if self.manager.state() == SessionState::Active {
            self.queued_selects += 1;
        } else {
            log::trace!("select ignored: no active session");
        }
    }

    /// Swallows the next selection (see [`PlacementController::suppress_next_select`]).
    pub fn suppress_next_select(&mut self) {
        self.placement.suppress_next_select();
    }

    fn on_session_ended(&mut self) {
        self.tracker.hide();
        self.queued_selects = 0;
    }

    /// Runs one frame.
    ///
    /// `xr_frame` is `None` for plain animation ticks. `render` is called
    /// exactly once, whatever state the AR part is in.
    pub fn frame<R>(&mut self, timestamp: f64, xr_frame: Option<&FrameOf<X>>, render: R) -> FrameReport
    where
        R: FnOnce(&ArView<'_>),
    {
        let session_ended = self.manager.sync_end();
        if session_ended {
            self.on_session_ended();
        }

        let (outcome, viewer) = match xr_frame {
            Some(frame) if self.manager.state() == SessionState::Active => self.advance(frame),
            None if self.manager.state() == SessionState::Active => (FrameOutcome::NoXrFrame, None),
            _ => (FrameOutcome::Inactive, None),
        };

        let selections = self.handle_selects(viewer);

        let view = ArView {
            timestamp,
            state: self.manager.state(),
            outcome,
            viewer,
            reticle: self.tracker.reticle(),
            object: self.placement.object(),
        };
        render(&view);

        FrameReport {
            timestamp,
            outcome,
            selections,
            session_ended,
        }
    }

    fn advance(&mut self, frame: &FrameOf<X>) -> (FrameOutcome, Option<Mat4>) {
        if self.manager.poll_reference_space().is_none() || self.manager.session().is_none() {
            if self.manager.reference_space_failed() {
                return (FrameOutcome::ReferenceSpaceFailed, None);
            }
            return (FrameOutcome::ReferenceSpacePending, None);
        }

        let status = self.manager.ensure_hit_test_source();

        let Some(space) = self.manager.reference_space() else {
            return (FrameOutcome::ReferenceSpacePending, None);
        };
        let viewer = frame.viewer_pose(space);

        let outcome = match status {
            AcquisitionStatus::Inactive => FrameOutcome::Inactive,
            AcquisitionStatus::Disabled => FrameOutcome::HitTestDisabled,
            AcquisitionStatus::Pending => FrameOutcome::AcquisitionPending,
            AcquisitionStatus::Failed => FrameOutcome::AcquisitionFailed,
            AcquisitionStatus::Ready => match self.manager.hit_test_source() {
                Some(source) => match self.tracker.update(frame, source, space) {
                    ReticleUpdate::Tracking(pose) => FrameOutcome::Tracking(pose),
                    ReticleUpdate::NoSurfaceTracked => FrameOutcome::NoSurfaceTracked,
                },
                None => FrameOutcome::AcquisitionPending,
            },
        };

        (outcome, viewer)
    }

    fn handle_selects(&mut self, viewer: Option<Mat4>) -> usize {
        let count = std::mem::take(&mut self.queued_selects);
        if self.manager.state() != SessionState::Active {
            return 0;
        }

        for _ in 0..count {
            let outcome = match self.select_target {
                SelectTarget::Reticle => self.placement.on_select(self.tracker.reticle()),
                SelectTarget::ViewerOffset(offset) => match viewer {
                    Some(origin) => self.placement.place_relative(&origin, offset),
                    None => SelectOutcome::NoSurface,
                },
            };
            log::trace!("select -> {outcome:?}");
        }
        count
    }
}

impl<X: XrSystem> std::fmt::Debug for FrameDriver<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("manager", &self.manager)
            .field("reticle", self.tracker.reticle())
            .field("object", self.placement.object())
            .field("queued_selects", &self.queued_selects)
            .finish()
    }
}
