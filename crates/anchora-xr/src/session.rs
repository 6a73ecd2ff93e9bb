//! Session lifecycle and hit-test source acquisition.
//!
//! `SessionManager` owns the platform session and everything derived from it.
//! State machine:
//!
//! ```text
//! Idle ──start()──▶ Requesting ──granted──▶ Active ──end──▶ Ended
//!   ▲                   │ denied                              │
//!   └───────────────────┘            start() ◀────────────────┘
//! ```
//!
//! The hit-test source is requested lazily from the frame loop, at most once
//! per active session, as a two-step chain (viewer space, then source). The
//! chain is polled, never awaited; dropping the session drops the chain, so a
//! source that resolves after the end is never stored.

use std::fmt;

use crate::error::XrError;
use crate::feature::{Feature, FeatureSet, ReferenceSpaceType, SessionInit, SessionMode};
use crate::options::EngineOptions;
use crate::pending::{Acquire, XrRequest};
use crate::platform::{EndSignal, HitTestOptions, XrSession, XrSystem};

/// Lifecycle state of the manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionState {
    Idle,
    Requesting,
    Active,
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Idle => "idle",
            SessionState::Requesting => "requesting",
            SessionState::Active => "active",
            SessionState::Ended => "ended",
        })
    }
}

/// Progress of the hit-test source acquisition for the current session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AcquisitionStatus {
    /// No active session.
    Inactive,
    /// The session was not granted `hit-test`.
    Disabled,
    /// Requested, not yet resolved.
    Pending,
    Ready,
    /// The platform rejected the chain; not retried for this session.
    Failed,
}

type SourceOf<X> = <<X as XrSystem>::Session as XrSession>::HitTestSource;
type SpaceOf<X> = <<X as XrSystem>::Session as XrSession>::Space;

struct ActiveSession<S: XrSession> {
    handle: S,
    features: FeatureSet,
    end_signal: EndSignal,
    reference_space: Acquire<S::Space>,
    /// One-shot guard, set before the first asynchronous step is issued.
    hit_test_requested: bool,
    hit_test_source: Option<Acquire<S::HitTestSource>>,
}

/// Owns the session, its reference space, and its hit-test source.
pub struct SessionManager<X: XrSystem> {
    system: X,
    mode: SessionMode,
    init: SessionInit,
    preferred_space: ReferenceSpaceType,

    state: SessionState,
    /// State to fall back to when a request does not produce a session.
    resting: SessionState,
    active: Option<ActiveSession<X::Session>>,
}

impl<X: XrSystem> SessionManager<X> {
    pub fn new(system: X, options: &EngineOptions) -> Self {
        Self {
            system,
            mode: options.mode,
            init: options.init.clone(),
            preferred_space: options.reference_space,
            state: SessionState::Idle,
            resting: SessionState::Idle,
            active: None,
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn system(&self) -> &X {
        &self.system
    }

    pub fn session(&self) -> Option<&X::Session> {
        self.active.as_ref().map(|a| &a.handle)
    }

    /// Features granted to the running session.
    pub fn enabled_features(&self) -> Option<FeatureSet> {
        self.active.as_ref().map(|a| a.features)
    }

    /// Requests a session and activates it once granted.
    ///
    /// Rejected with [`XrError::SessionAlreadyActive`] while a session is
    /// being requested or running; the running session is left untouched.
    /// Dropping the returned future before it resolves abandons the request.
    pub async fn start(&mut self) -> Result<(), XrError> {
        let request = self.begin_request()?;

        let guard = RequestGuard { manager: self };
        let result = request.await;
        guard.finish(result)
    }

    fn begin_request(&mut self) -> Result<XrRequest<X::Session>, XrError> {
        self.sync_end();

        match self.state {
            SessionState::Requesting => return Err(XrError::SessionAlreadyActive("being requested")),
            SessionState::Active => return Err(XrError::SessionAlreadyActive("active")),
            SessionState::Idle | SessionState::Ended => {}
        }

        if !self.system.is_supported(self.mode) {
            log::warn!("{} is not supported by the platform", self.mode);
            return Err(XrError::UnsupportedPlatform(self.mode));
        }

        log::info!(
            "requesting {} session (required {}, optional {})",
            self.mode,
            self.init.required_features,
            self.init.optional_features,
        );

        let request = self.system.request_session(self.mode, &self.init);
        self.resting = self.state;
        self.state = SessionState::Requesting;
        Ok(request)
    }

    fn activate(&mut self, result: Result<X::Session, XrError>) -> Result<(), XrError> {
        let handle = match result {
            Ok(handle) => handle,
            Err(err) => {
                self.state = self.resting;
                let err = match err {
                    XrError::SessionRequestDenied { .. } | XrError::UnsupportedPlatform(_) => err,
                    other => XrError::SessionRequestDenied {
                        reason: other.to_string(),
                    },
                };
                log::warn!("{err}");
                return Err(err);
            }
        };

        let features = handle.enabled_features();
        let missing = self.init.required_features.difference(features);
        if !missing.is_empty() {
            handle.end();
            self.state = self.resting;
            let err = XrError::missing_features(missing);
            log::warn!("{err}");
            return Err(err);
        }

        let end_signal = EndSignal::new();
        handle.on_end(end_signal.clone());

        let reference_space = Acquire::request(handle.request_reference_space(self.preferred_space));

        self.active = Some(ActiveSession {
            handle,
            features,
            end_signal,
            reference_space,
            hit_test_requested: false,
            hit_test_source: None,
        });
        self.state = SessionState::Active;

        log::info!(
            "{} session active (features {features}, space {})",
            self.mode,
            self.preferred_space,
        );
        Ok(())
    }

    /// Ends the session from the engine side.
    pub fn end(&mut self) {
        if self.sync_end() {
            return;
        }
        if let Some(active) = self.active.as_ref() {
            active.handle.end();
            self.teardown("ended by user");
        }
    }

    /// Observes the platform end signal and tears down if it fired.
    ///
    /// Returns `true` when a session was torn down by this call.
    pub fn sync_end(&mut self) -> bool {
        let fired = self
            .active
            .as_ref()
            .is_some_and(|a| a.end_signal.is_fired());

        if fired {
            self.teardown("ended by platform");
        }
        fired
    }

    fn teardown(&mut self, why: &str) {
        // Dropping the session drops the stored source, any in-flight
        // acquisition, and the one-shot flag together.
        self.active = None;
        self.state = SessionState::Ended;
        log::info!("session {why}");
    }

    /// Polls the preferred reference space. `None` until it resolves.
    pub fn poll_reference_space(&mut self) -> Option<&SpaceOf<X>> {
        let preferred = self.preferred_space;
        let active = self.active.as_mut()?;
        active.reference_space.poll(preferred.as_str())
    }

    pub fn reference_space(&self) -> Option<&SpaceOf<X>> {
        self.active.as_ref()?.reference_space.get()
    }

    /// Whether the platform rejected the preferred reference space.
    pub fn reference_space_failed(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.reference_space.is_failed())
    }

    /// Runs the acquisition protocol for this frame.
    ///
    /// The first call of a session issues the request; every call polls it.
    pub fn ensure_hit_test_source(&mut self) -> AcquisitionStatus {
        let Some(active) = self.active.as_mut() else {
            return AcquisitionStatus::Inactive;
        };

        if !active.features.contains(Feature::HitTest) {
            return AcquisitionStatus::Disabled;
        }

        if !active.hit_test_requested {
            active.hit_test_requested = true;
            log::debug!("requesting viewer space and hit-test source");

            let session = active.handle.clone();
            let chain: XrRequest<SourceOf<X>> = Box::pin(async move {
                let space = session.request_reference_space(ReferenceSpaceType::Viewer).await?;
                session.request_hit_test_source(HitTestOptions { space }).await
            });
            active.hit_test_source = Some(Acquire::request(chain));
        }

        let Some(slot) = active.hit_test_source.as_mut() else {
            return AcquisitionStatus::Pending;
        };

        if slot.poll("hit-test source").is_some() {
            AcquisitionStatus::Ready
        } else if slot.is_failed() {
            AcquisitionStatus::Failed
        } else {
            AcquisitionStatus::Pending
        }
    }

    pub fn hit_test_source(&self) -> Option<&SourceOf<X>> {
        self.active.as_ref()?.hit_test_source.as_ref()?.get()
    }

    /// Whether the one-shot acquisition request was issued for this session.
    pub fn hit_test_requested(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.hit_test_requested)
    }
}

impl<X: XrSystem> fmt::Debug for SessionManager<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("hit_test_requested", &self.hit_test_requested())
            .finish_non_exhaustive()
    }
}

/// Restores the resting state if `start` is dropped mid-request.
struct RequestGuard<'a, X: XrSystem> {
    manager: &'a mut SessionManager<X>,
}

impl<X: XrSystem> RequestGuard<'_, X> {
    fn finish(self, result: Result<X::Session, XrError>) -> Result<(), XrError> {
        // `activate` always leaves `Requesting`, so the drop below is a no-op.
        self.manager.activate(result)
    }
}

impl<X: XrSystem> Drop for RequestGuard<'_, X> {
    fn drop(&mut self) {
        if self.manager.state == SessionState::Requesting {
            log::debug!("session request abandoned");
            self.manager.state = self.manager.resting;
        }
    }
}
