//! Desktop studio for the anchora AR scenes.
//!
//! Runs one scene against the simulated device. Controls:
//! Enter start/end session, Space or left click select, arrows look around,
//! H toggle the surface, R recenter, S end the session from the device side,
//! Escape end the session (or quit when none is running).

mod draw;
mod scene;
mod studio;

use anyhow::Result;
use clap::Parser;

use anchora_engine::device::GpuInit;
use anchora_engine::logging::{LoggingConfig, init_logging};
use anchora_engine::window::{Runtime, RuntimeConfig};
use anchora_xr::sim::SimConfig;
use anchora_xr::{EngineOptions, Feature};

use crate::scene::Scene;
use crate::studio::Studio;

#[derive(Parser, Debug)]
#[command(name = "anchora-studio")]
#[command(about = "AR hit-test placement scenes on a simulated device")]
struct Cli {
    /// Scene to run
    #[arg(value_enum)]
    scene: Scene,

    /// Log filter (env_logger syntax); falls back to RUST_LOG
    #[arg(long)]
    log: Option<String>,

    /// Frames each simulated platform request stays pending
    #[arg(long, default_value_t = 2)]
    latency: u32,

    /// Pretend the device has no AR support
    #[arg(long)]
    unsupported: bool,

    /// Reject every session request with this reason
    #[arg(long, value_name = "REASON")]
    deny: Option<String>,

    /// Also request this feature as optional (e.g. plane-detection); repeatable
    #[arg(long = "optional-feature", value_name = "FEATURE")]
    optional_features: Vec<Feature>,
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            supported: !self.unsupported,
            deny_reason: self.deny.clone(),
            latency_polls: self.latency,
            ..SimConfig::default()
        }
    }

    /// Scene preset plus the extra optional features. `None` for scenes without a session.
    fn engine_options(&self) -> Option<EngineOptions> {
        let mut options = self.scene.engine_options()?;
        for &feature in &self.optional_features {
            if !options.init.required_features.contains(feature) {
                options.init = options.init.optional(feature);
            }
        }
        Some(options)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    log::info!("scene {:?}, request latency {} frame(s)", cli.scene, cli.latency);

    let config = RuntimeConfig {
        title: cli.scene.title().to_string(),
        ..RuntimeConfig::default()
    };
    let studio = Studio::new(cli.scene, cli.sim_config(), cli.engine_options());

    Runtime::run(config, GpuInit::default(), studio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_maps_flags_to_sim_config() {
        let cli = Cli::parse_from(["anchora-studio", "overlay", "--latency", "0", "--deny", "no camera"]);
        assert_eq!(cli.scene, Scene::Overlay);
        let config = cli.sim_config();
        assert_eq!(config.latency_polls, 0);
        assert_eq!(config.deny_reason.as_deref(), Some("no camera"));
        assert!(config.supported);
    }

    #[test]
    fn unsupported_flag_disables_platform() {
        let cli = Cli::parse_from(["anchora-studio", "hit-test", "--unsupported"]);
        assert!(!cli.sim_config().supported);
        assert_eq!(cli.sim_config().latency_polls, 2);
    }

    #[test]
    fn optional_feature_flag_extends_scene_request() {
        let cli = Cli::parse_from([
            "anchora-studio",
            "hit-test",
            "--optional-feature",
            "plane-detection",
            "--optional-feature",
            "hit-test",
        ]);
        let init = cli.engine_options().unwrap().init;
        assert!(init.optional_features.contains(Feature::PlaneDetection));
        assert!(init.required_features.contains(Feature::HitTest));
        assert!(!init.optional_features.contains(Feature::HitTest));
    }

    #[test]
    fn unknown_optional_feature_is_rejected() {
        let err = Cli::try_parse_from(["anchora-studio", "hit-test", "--optional-feature", "teleport"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("unknown feature `teleport`"));
    }

    #[test]
    fn hello_cube_has_no_session_options() {
        let cli = Cli::parse_from(["anchora-studio", "hello-cube", "--optional-feature", "local"]);
        assert!(cli.engine_options().is_none());
    }
}
