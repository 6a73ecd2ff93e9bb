//! Anchora XR crate.
//!
//! Hit-test placement for AR sessions: session lifecycle, the reticle that
//! follows detected surfaces, and the placement of one virtual object on
//! selection. Platform access goes through the traits in [`platform`];
//! [`sim`] provides a simulated device.

pub mod math;
pub mod feature;
pub mod error;
pub mod platform;
pub mod pending;

pub mod session;
pub mod reticle;
pub mod placement;
pub mod options;
pub mod driver;

pub mod sim;

pub use driver::{ArView, FrameDriver, FrameOutcome, FrameReport};
pub use error::XrError;
pub use feature::{Feature, FeatureSet, ReferenceSpaceType, SessionInit, SessionMode};
pub use math::{Mat4, Pose, Vec3};
pub use options::{EngineOptions, SelectTarget};
pub use placement::{PlacedObject, PlacementController, PlacementPolicy, SelectOutcome};
pub use reticle::{Reticle, ReticleTracker, ReticleUpdate};
pub use session::{AcquisitionStatus, SessionManager, SessionState};
