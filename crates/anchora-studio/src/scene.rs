use clap::ValueEnum;

use anchora_xr::EngineOptions;

/// Demo scenes shipped by the studio.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum Scene {
    /// Spinning cube, no AR session.
    HelloCube,
    /// Cube placed in front of the viewer on select.
    HelloAr,
    /// Cube moved to the reticle on select.
    HitTest,
    /// Image card that appears at the reticle on the first select.
    Overlay,
}

impl Scene {
    pub fn title(self) -> &'static str {
        match self {
            Scene::HelloCube => "anchora - hello cube",
            Scene::HelloAr => "anchora - hello AR",
            Scene::HitTest => "anchora - hit test",
            Scene::Overlay => "anchora - overlay",
        }
    }

    /// Engine options for scenes that run an AR session.
    pub fn engine_options(self) -> Option<EngineOptions> {
        match self {
            Scene::HelloCube => None,
            Scene::HelloAr => Some(EngineOptions::hello_ar()),
            Scene::HitTest => Some(EngineOptions::hit_test()),
            Scene::Overlay => Some(EngineOptions::overlay()),
        }
    }

    #[inline]
    pub fn shows_reticle(self) -> bool {
        matches!(self, Scene::HitTest | Scene::Overlay)
    }

    /// Clicks on the HUD bar are overlay UI taps rather than placements.
    #[inline]
    pub fn has_overlay_ui(self) -> bool {
        self == Scene::Overlay
    }
}
