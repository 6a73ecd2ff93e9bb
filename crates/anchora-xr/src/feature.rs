//! Session modes, feature flags, and reference-space types.
//!
//! Feature and space tokens use the platform's kebab-case spelling
//! (`hit-test`, `dom-overlay`, `local-floor`) so options can be passed
//! straight from a command line or a scene preset.

use std::fmt;
use std::str::FromStr;

use crate::error::XrError;

/// Kind of session requested from the platform.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SessionMode {
    /// Camera passthrough with world tracking.
    ImmersiveAr,
    /// Fully rendered immersive session.
    ImmersiveVr,
    /// Non-immersive, rendered into the page/window.
    Inline,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::ImmersiveAr => "immersive-ar",
            SessionMode::ImmersiveVr => "immersive-vr",
            SessionMode::Inline => "inline",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional platform capability a session may request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Feature {
    HitTest,
    DomOverlay,
    PlaneDetection,
    Local,
    LocalFloor,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::HitTest,
        Feature::DomOverlay,
        Feature::PlaneDetection,
        Feature::Local,
        Feature::LocalFloor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::HitTest => "hit-test",
            Feature::DomOverlay => "dom-overlay",
            Feature::PlaneDetection => "plane-detection",
            Feature::Local => "local",
            Feature::LocalFloor => "local-floor",
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = XrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| XrError::UnknownFeature(s.to_string()))
    }
}

/// Small copyable set of [`Feature`]s.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FeatureSet(u8);

impl FeatureSet {
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_slice(features: &[Feature]) -> Self {
        features.iter().fold(Self::empty(), |set, f| set.with(*f))
    }

    #[inline]
    pub fn with(self, feature: Feature) -> Self {
        Self(self.0 | feature.bit())
    }

    #[inline]
    pub fn insert(&mut self, feature: Feature) {
        self.0 |= feature.bit();
    }

    #[inline]
    pub fn contains(self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn union(self, other: FeatureSet) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub fn intersection(self, other: FeatureSet) -> Self {
        Self(self.0 & other.0)
    }

    /// Features of `self` that `other` does not contain.
    #[inline]
    pub fn difference(self, other: FeatureSet) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, feature) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(feature.as_str())?;
        }
        f.write_str("]")
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, f| set.with(f))
    }
}

/// Coordinate frame kinds a session can hand out.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ReferenceSpaceType {
    /// Anchored to the viewer (head/phone) each frame.
    Viewer,
    /// Anchored near the viewer's position at session start.
    Local,
    LocalFloor,
    BoundedFloor,
    Unbounded,
}

impl ReferenceSpaceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceSpaceType::Viewer => "viewer",
            ReferenceSpaceType::Local => "local",
            ReferenceSpaceType::LocalFloor => "local-floor",
            ReferenceSpaceType::BoundedFloor => "bounded-floor",
            ReferenceSpaceType::Unbounded => "unbounded",
        }
    }
}

impl fmt::Display for ReferenceSpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options passed with a session request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInit {
    /// The request is rejected if any of these cannot be granted.
    pub required_features: FeatureSet,
    /// Granted when available; never a reason for rejection.
    pub optional_features: FeatureSet,
    /// Name of the in-session overlay root, when `dom-overlay` is requested.
    pub dom_overlay_root: Option<String>,
}

impl SessionInit {
    pub fn require(mut self, feature: Feature) -> Self {
        self.required_features.insert(feature);
        self
    }

    pub fn optional(mut self, feature: Feature) -> Self {
        self.optional_features.insert(feature);
        self
    }

    /// Sets the overlay root and asks for `dom-overlay` unless already required.
    pub fn dom_overlay(mut self, root: impl Into<String>) -> Self {
        if !self.required_features.contains(Feature::DomOverlay) {
            self.optional_features.insert(Feature::DomOverlay);
        }
        self.dom_overlay_root = Some(root.into());
        self
    }

    /// Everything the session may end up with.
    pub fn requested(&self) -> FeatureSet {
        self.required_features.union(self.optional_features)
    }
}
