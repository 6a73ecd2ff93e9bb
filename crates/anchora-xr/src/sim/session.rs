use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::XrError;
use crate::feature::{FeatureSet, ReferenceSpaceType};
use crate::pending::XrRequest;
use crate::platform::{EndSignal, HitTestOptions, XrSession};

use super::SimShared;
use super::frame::SimFrame;

/// Reference space handed out by a [`SimSession`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SimSpace {
    pub kind: ReferenceSpaceType,
    pub(crate) session_id: u64,
}

/// Hit-test source bound to the session that created it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SimHitTestSource {
    pub space: SimSpace,
    pub(crate) session_id: u64,
}

struct SessionInner {
    id: u64,
    features: FeatureSet,
    ended: Cell<bool>,
    end_signal: RefCell<Option<EndSignal>>,
}

/// Session handle of the simulated platform.
#[derive(Clone)]
pub struct SimSession {
    shared: Rc<SimShared>,
    inner: Rc<SessionInner>,
}

impl SimSession {
    pub(crate) fn new(shared: Rc<SimShared>, id: u64, features: FeatureSet) -> Self {
        Self {
            shared,
            inner: Rc::new(SessionInner {
                id,
                features,
                ended: Cell::new(false),
                end_signal: RefCell::new(None),
            }),
        }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    #[inline]
    pub fn is_ended(&self) -> bool {
        self.inner.ended.get()
    }

    pub(crate) fn end_from_platform(&self) {
        self.finish();
    }

    fn finish(&self) {
        if self.inner.ended.replace(true) {
            return;
        }
        self.shared.bump(|c| c.sessions_ended += 1);
        self.shared.release(self.inner.id);
        if let Some(signal) = self.inner.end_signal.borrow().as_ref() {
            signal.fire();
        }
    }

    fn ended_error(what: &'static str) -> XrError {
        XrError::RequestFailed {
            what,
            reason: "session has ended".into(),
        }
    }
}

impl std::fmt::Debug for SimSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimSession")
            .field("id", &self.inner.id)
            .field("features", &self.inner.features)
            .field("ended", &self.inner.ended.get())
            .finish()
    }
}

impl XrSession for SimSession {
    type Space = SimSpace;
    type HitTestSource = SimHitTestSource;
    type Frame = SimFrame;

    fn enabled_features(&self) -> FeatureSet {
        self.inner.features
    }

    fn request_reference_space(&self, kind: ReferenceSpaceType) -> XrRequest<SimSpace> {
        self.shared.bump(|c| match kind {
            ReferenceSpaceType::Viewer => c.viewer_space_requests += 1,
            _ => c.world_space_requests += 1,
        });

        let result = if self.is_ended() {
            Err(Self::ended_error("reference space"))
        } else if kind != ReferenceSpaceType::Viewer && !self.shared.world_spaces_supported() {
            Err(XrError::RequestFailed {
                what: "reference space",
                reason: format!("'{kind}' is not supported"),
            })
        } else {
            Ok(SimSpace {
                kind,
                session_id: self.inner.id,
            })
        };
        self.shared.delayed(result)
    }

    fn request_hit_test_source(&self, options: HitTestOptions<SimSpace>) -> XrRequest<SimHitTestSource> {
        self.shared.bump(|c| c.hit_test_source_requests += 1);

        let result = if self.is_ended() {
            Err(Self::ended_error("hit-test source"))
        } else if self.shared.fail_hit_test() {
            Err(XrError::RequestFailed {
                what: "hit-test source",
                reason: "tracking unavailable".into(),
            })
        } else if options.space.session_id != self.inner.id {
            Err(XrError::RequestFailed {
                what: "hit-test source",
                reason: "space belongs to another session".into(),
            })
        } else {
            Ok(SimHitTestSource {
                space: options.space,
                session_id: self.inner.id,
            })
        };
        self.shared.delayed(result)
    }

    fn on_end(&self, signal: EndSignal) {
        *self.inner.end_signal.borrow_mut() = Some(signal);
    }

    fn end(&self) {
        self.shared.bump(|c| c.end_requests += 1);
        self.finish();
    }
}
