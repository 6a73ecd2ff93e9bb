use thiserror::Error;

use crate::feature::{FeatureSet, SessionMode};

/// Errors surfaced by session startup and platform requests.
///
/// Only startup failures reach callers. Per-frame conditions (an acquisition
/// still in flight, no surface under the reticle) are reported as
/// [`FrameOutcome`](crate::driver::FrameOutcome) values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XrError {
    /// The host exposes no AR capability for the requested mode.
    #[error("{0} sessions are not supported on this platform")]
    UnsupportedPlatform(SessionMode),

    /// The platform refused the session (permission declined, feature missing).
    #[error("session request denied: {reason}")]
    SessionRequestDenied { reason: String },

    /// `start` was called while a session is being requested or already running.
    #[error("a session is already {0}")]
    SessionAlreadyActive(&'static str),

    /// A reference-space or hit-test-source request was rejected.
    #[error("{what} request failed: {reason}")]
    RequestFailed { what: &'static str, reason: String },

    /// A feature token did not name a known feature.
    #[error("unknown feature `{0}`")]
    UnknownFeature(String),
}

impl XrError {
    pub(crate) fn missing_features(missing: FeatureSet) -> Self {
        XrError::SessionRequestDenied {
            reason: format!("required features not granted: {missing}"),
        }
    }

    /// Whether this error came from the session-start path.
    pub fn is_startup(&self) -> bool {
        matches!(
            self,
            XrError::UnsupportedPlatform(_)
                | XrError::SessionRequestDenied { .. }
                | XrError::SessionAlreadyActive(_)
        )
    }
}
