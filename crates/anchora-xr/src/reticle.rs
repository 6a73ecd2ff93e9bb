use crate::math::{Mat4, Pose};
use crate::platform::{XrFrame, XrHitTestResult};

/// Current estimate of where the user is pointing on a detected surface.
///
/// The transform is written straight from the latest hit-test pose. It is not
/// derived from any scene hierarchy, and it is only readable while visible.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Reticle {
    visible: bool,
    matrix: Mat4,
}

impl Reticle {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Pose of the tracked surface point, `None` while no surface is tracked.
    #[inline]
    pub fn pose(&self) -> Option<Mat4> {
        self.visible.then_some(self.matrix)
    }

    #[cfg(test)]
    pub(crate) fn tracking_at(matrix: Mat4) -> Self {
        Self { visible: true, matrix }
    }
}

/// Result of one reticle update.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ReticleUpdate {
    Tracking(Mat4),
    NoSurfaceTracked,
}

/// Sole writer of the [`Reticle`].
#[derive(Debug, Default)]
pub struct ReticleTracker {
    reticle: Reticle,
}

impl ReticleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reticle(&self) -> &Reticle {
        &self.reticle
    }

    /// Applies this frame's hit-test results.
    ///
    /// Only the first (best ranked) result is used. A result whose pose cannot
    /// be expressed in `space` counts as no surface.
    pub fn update<F>(&mut self, frame: &F, source: &F::HitTestSource, space: &F::Space) -> ReticleUpdate
    where
        F: XrFrame,
    {
        let pose = frame
            .hit_test_results(source)
            .first()
            .and_then(|hit| hit.pose(space));

        match pose {
            Some(matrix) => {
                if !self.reticle.visible {
                    log::debug!("surface acquired at {:?}", matrix.translation());
                }
                self.reticle.visible = true;
                self.reticle.matrix = matrix;
                ReticleUpdate::Tracking(matrix)
            }
            None => {
                if self.reticle.visible {
                    log::debug!("surface lost");
                }
                self.reticle.visible = false;
                ReticleUpdate::NoSurfaceTracked
            }
        }
    }

    /// Hides the reticle. The stale transform stays unreadable.
    pub fn hide(&mut self) {
        self.reticle.visible = false;
    }
}
