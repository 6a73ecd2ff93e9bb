use std::f32::consts::FRAC_PI_4;

use anchora_xr::sim::{SimConfig, SimXr};
use anchora_xr::{
    EngineOptions, Feature, FeatureSet, FrameDriver, FrameOutcome, FrameReport, Mat4, Pose, SessionInit,
    SessionState, Vec3, XrError,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

struct Rig {
    sim: SimXr,
    driver: FrameDriver<SimXr>,
    t: f64,
    renders: usize,
}

impl Rig {
    fn new(config: SimConfig, options: EngineOptions) -> Self {
        let sim = SimXr::new(config);
        // Aim at the floor in front of the device.
        sim.look(0.0, -FRAC_PI_4);
        let driver = FrameDriver::new(sim.clone(), options);
        Self {
            sim,
            driver,
            t: 0.0,
            renders: 0,
        }
    }

    fn with_latency(polls: u32) -> Self {
        Self::new(
            SimConfig {
                latency_polls: polls,
                ..SimConfig::default()
            },
            EngineOptions::default(),
        )
    }

    fn start(&mut self) -> Result<(), XrError> {
        pollster::block_on(self.driver.start())
    }

    fn frame(&mut self) -> FrameReport {
        self.t += 16.0;
        let xr_frame = self.sim.begin_frame();
        let mut rendered = false;
        let report = self.driver.frame(self.t, xr_frame.as_ref(), |_| rendered = true);
        assert!(rendered, "render step skipped at t={}", self.t);
        self.renders += 1;
        report
    }

    /// Runs frames until the reticle tracks a surface.
    fn frames_until_tracking(&mut self, max: usize) -> Mat4 {
        for _ in 0..max {
            if let FrameOutcome::Tracking(pose) = self.frame().outcome {
                return pose;
            }
        }
        panic!("no surface tracked within {max} frames");
    }
}

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-4
}

// ── Acquisition protocol ────────────────────────────────────────────────────

#[test]
fn acquisition_is_requested_once_per_session() {
    let mut rig = Rig::with_latency(4);
    rig.start().unwrap();

    for _ in 0..40 {
        rig.frame();
    }

    let c = rig.sim.counters();
    assert_eq!(c.viewer_space_requests, 1);
    assert_eq!(c.hit_test_source_requests, 1);
    assert!(rig.driver.manager().hit_test_requested());
    assert!(rig.driver.manager().hit_test_source().is_some());
}

#[test]
fn reticle_does_not_flip_before_source_resolves() {
    let mut rig = Rig::with_latency(3);
    rig.start().unwrap();

    let mut pending_frames = 0;
    loop {
        let report = rig.frame();
        match report.outcome {
            FrameOutcome::ReferenceSpacePending | FrameOutcome::AcquisitionPending => {
                pending_frames += 1;
                assert!(!rig.driver.reticle().is_visible());
            }
            FrameOutcome::Tracking(_) => break,
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(pending_frames < 50);
    }

    assert!(pending_frames > 0);
    assert!(rig.driver.reticle().is_visible());
}

#[test]
fn failed_acquisition_is_not_retried() {
    let mut rig = Rig::with_latency(1);
    rig.sim.set_fail_hit_test(true);
    rig.start().unwrap();

    let mut last = FrameOutcome::Inactive;
    for _ in 0..20 {
        last = rig.frame().outcome;
    }

    assert_eq!(last, FrameOutcome::AcquisitionFailed);
    assert_eq!(rig.sim.counters().hit_test_source_requests, 1);
    assert!(!rig.driver.reticle().is_visible());
    assert_eq!(rig.driver.session_state(), SessionState::Active);
}

#[test]
fn optional_hit_test_not_granted_disables_reticle() {
    let config = SimConfig {
        latency_polls: 0,
        available_features: FeatureSet::from_slice(&[Feature::DomOverlay, Feature::Local]),
        ..SimConfig::default()
    };
    let options = EngineOptions {
        init: SessionInit::default().optional(Feature::HitTest),
        ..EngineOptions::default()
    };
    let mut rig = Rig::new(config, options);
    rig.start().unwrap();

    assert_eq!(rig.frame().outcome, FrameOutcome::HitTestDisabled);
    assert_eq!(rig.sim.counters().hit_test_source_requests, 0);
    assert!(!rig.driver.manager().hit_test_requested());
}

#[test]
fn rejected_reference_space_is_reported() {
    let config = SimConfig {
        latency_polls: 1,
        world_spaces_supported: false,
        ..SimConfig::default()
    };
    let mut rig = Rig::new(config, EngineOptions::default());
    rig.start().unwrap();

    let mut last = FrameOutcome::Inactive;
    for _ in 0..10 {
        last = rig.frame().outcome;
    }

    assert_eq!(last, FrameOutcome::ReferenceSpaceFailed);
    assert_eq!(rig.driver.session_state(), SessionState::Active);
    assert_eq!(rig.sim.counters().world_space_requests, 1);
    assert_eq!(rig.sim.counters().hit_test_source_requests, 0);
    assert!(!rig.driver.reticle().is_visible());
}

// ── Reticle ─────────────────────────────────────────────────────────────────

#[test]
fn reticle_visible_after_hit_and_hidden_after_miss() {
    let mut rig = Rig::with_latency(0);
    rig.start().unwrap();

    let pose = rig.frames_until_tracking(5);
    assert!(close(pose.translation(), Vec3::new(0.0, 0.0, -1.6)));
    assert_eq!(rig.driver.reticle().pose(), Some(pose));

    rig.sim.set_surface_visible(false);
    assert_eq!(rig.frame().outcome, FrameOutcome::NoSurfaceTracked);
    assert!(!rig.driver.reticle().is_visible());
    assert_eq!(rig.driver.reticle().pose(), None);

    rig.sim.set_surface_visible(true);
    assert!(matches!(rig.frame().outcome, FrameOutcome::Tracking(_)));
}

#[test]
fn level_gaze_tracks_nothing() {
    let mut rig = Rig::with_latency(0);
    rig.sim.look(0.0, 0.0);
    rig.start().unwrap();

    for _ in 0..3 {
        rig.frame();
    }
    assert_eq!(rig.frame().outcome, FrameOutcome::NoSurfaceTracked);
}

// ── Placement ───────────────────────────────────────────────────────────────

#[test]
fn second_select_moves_the_same_object() {
    let mut rig = Rig::with_latency(0);
    rig.start().unwrap();
    let first = rig.frames_until_tracking(5);

    rig.driver.select();
    let report = rig.frame();
    assert_eq!(report.selections, 1);
    assert!(rig.driver.placed_object().is_visible());
    assert_eq!(rig.driver.placed_object().transform(), first);

    // Turn to the right; the reticle follows.
    rig.sim.look(-FRAC_PI_4, -FRAC_PI_4);
    let second = rig.frames_until_tracking(1);
    assert!(!close(first.translation(), second.translation()));

    rig.driver.select();
    rig.frame();
    assert!(rig.driver.placed_object().is_visible());
    assert_eq!(rig.driver.placed_object().transform(), second);
}

#[test]
fn select_without_surface_keeps_object() {
    let mut rig = Rig::new(
        SimConfig {
            latency_polls: 0,
            ..SimConfig::default()
        },
        EngineOptions::hit_test(),
    );
    rig.sim.set_surface_visible(false);
    rig.start().unwrap();

    rig.frame();
    let before = *rig.driver.placed_object();

    rig.driver.select();
    let report = rig.frame();
    assert_eq!(report.selections, 1);
    assert_eq!(*rig.driver.placed_object(), before);
}

#[test]
fn overlay_object_hidden_until_first_select() {
    let mut rig = Rig::new(
        SimConfig {
            latency_polls: 0,
            ..SimConfig::default()
        },
        EngineOptions::overlay(),
    );
    rig.start().unwrap();
    let pose = rig.frames_until_tracking(5);
    assert!(!rig.driver.placed_object().is_visible());

    rig.driver.select();
    rig.frame();
    let object = rig.driver.placed_object();
    assert!(object.is_visible());
    // Position-only placement keeps the initial orientation.
    assert!(close(object.transform().translation(), pose.translation()));
    assert!(close(object.transform().forward(), Vec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn suppressed_select_is_swallowed_once() {
    let mut rig = Rig::with_latency(0);
    rig.start().unwrap();
    rig.frames_until_tracking(5);

    rig.driver.suppress_next_select();
    rig.driver.select();
    rig.frame();
    assert!(!rig.driver.placed_object().is_visible());

    rig.driver.select();
    rig.frame();
    assert!(rig.driver.placed_object().is_visible());
}

#[test]
fn viewer_offset_placement_ignores_hit_test() {
    let mut rig = Rig::new(
        SimConfig {
            latency_polls: 0,
            ..SimConfig::default()
        },
        EngineOptions::hello_ar(),
    );
    rig.sim.look(0.0, 0.0);
    rig.start().unwrap();

    assert_eq!(rig.frame().outcome, FrameOutcome::HitTestDisabled);

    rig.driver.select();
    rig.frame();
    let p = rig.driver.placed_object().transform().translation();
    assert!(close(p, Vec3::new(0.0, 1.6, -0.3)), "{p:?}");
    assert_eq!(rig.sim.counters().hit_test_source_requests, 0);
}

#[test]
fn select_without_session_is_ignored() {
    let mut rig = Rig::with_latency(0);
    rig.driver.select();
    let report = rig.frame();
    assert_eq!(report.outcome, FrameOutcome::Inactive);
    assert_eq!(report.selections, 0);
}

// ── Session lifecycle ───────────────────────────────────────────────────────

#[test]
fn restart_repeats_acquisition_from_scratch() {
    let mut rig = Rig::with_latency(1);
    rig.start().unwrap();
    rig.frames_until_tracking(20);

    rig.driver.end();
    assert_eq!(rig.driver.session_state(), SessionState::Ended);
    assert!(!rig.driver.reticle().is_visible());
    assert!(rig.driver.manager().hit_test_source().is_none());
    assert!(!rig.driver.manager().hit_test_requested());

    assert_eq!(rig.frame().outcome, FrameOutcome::Inactive);

    rig.start().unwrap();
    assert!(!rig.driver.manager().hit_test_requested());
    rig.frames_until_tracking(20);

    let c = rig.sim.counters();
    assert_eq!(c.session_requests, 2);
    assert_eq!(c.viewer_space_requests, 2);
    assert_eq!(c.hit_test_source_requests, 2);
    assert_eq!(c.sessions_ended, 1);
}

#[test]
fn end_during_acquisition_drops_the_chain() {
    let mut rig = Rig::with_latency(3);
    rig.start().unwrap();

    // Run until the chain has asked for the viewer space but not the source.
    let mut frames = 0;
    while rig.frame().outcome != FrameOutcome::AcquisitionPending {
        frames += 1;
        assert!(frames < 20);
    }
    assert_eq!(rig.sim.counters().viewer_space_requests, 1);
    assert_eq!(rig.sim.counters().hit_test_source_requests, 0);

    rig.driver.end();
    for _ in 0..10 {
        assert_eq!(rig.frame().outcome, FrameOutcome::Inactive);
    }

    // The abandoned chain never reached its second step.
    let c = rig.sim.counters();
    assert_eq!(c.viewer_space_requests, 1);
    assert_eq!(c.hit_test_source_requests, 0);
    assert!(rig.driver.manager().hit_test_source().is_none());

    rig.start().unwrap();
    rig.frames_until_tracking(30);
    let c = rig.sim.counters();
    assert_eq!(c.viewer_space_requests, 2);
    assert_eq!(c.hit_test_source_requests, 1);
}

#[test]
fn platform_end_is_observed_on_next_frame() {
    let mut rig = Rig::with_latency(0);
    rig.start().unwrap();
    rig.frames_until_tracking(5);

    rig.sim.end_session();
    let report = rig.frame();
    assert!(report.session_ended);
    assert_eq!(report.outcome, FrameOutcome::Inactive);
    assert_eq!(rig.driver.session_state(), SessionState::Ended);
    assert!(!rig.driver.reticle().is_visible());
    assert!(rig.driver.manager().hit_test_source().is_none());
}

#[test]
fn user_end_after_platform_end_is_not_sent_again() {
    let mut rig = Rig::with_latency(0);
    rig.start().unwrap();
    rig.frames_until_tracking(5);

    // Platform ends first; the engine ends before the next frame sees it.
    rig.sim.end_session();
    rig.driver.end();

    let c = rig.sim.counters();
    assert_eq!(c.sessions_ended, 1);
    assert_eq!(c.end_requests, 0);
    assert_eq!(rig.driver.session_state(), SessionState::Ended);
    assert!(!rig.driver.reticle().is_visible());
    assert!(!rig.frame().session_ended);
}

#[test]
fn second_start_while_active_is_rejected() {
    let mut rig = Rig::with_latency(0);
    rig.start().unwrap();

    let err = rig.start().unwrap_err();
    assert!(matches!(err, XrError::SessionAlreadyActive(_)));
    assert_eq!(rig.driver.session_state(), SessionState::Active);
    assert_eq!(rig.sim.counters().session_requests, 1);
}

#[test]
fn unsupported_platform_never_activates() {
    let mut rig = Rig::new(
        SimConfig {
            supported: false,
            ..SimConfig::default()
        },
        EngineOptions::default(),
    );

    let err = rig.start().unwrap_err();
    assert!(matches!(err, XrError::UnsupportedPlatform(_)));
    assert!(err.is_startup());
    assert_eq!(rig.driver.session_state(), SessionState::Idle);
    assert_eq!(rig.sim.counters().session_requests, 0);

    assert_eq!(rig.frame().outcome, FrameOutcome::Inactive);
    assert_eq!(rig.renders, 1);
}

#[test]
fn denied_request_returns_to_idle() {
    let mut rig = Rig::new(
        SimConfig {
            deny_reason: Some("permission declined".into()),
            ..SimConfig::default()
        },
        EngineOptions::default(),
    );

    let err = rig.start().unwrap_err();
    assert_eq!(
        err,
        XrError::SessionRequestDenied {
            reason: "permission declined".into()
        }
    );
    assert_eq!(rig.driver.session_state(), SessionState::Idle);
    assert_eq!(rig.frame().outcome, FrameOutcome::Inactive);
}

#[test]
fn missing_required_feature_ends_granted_session() {
    let config = SimConfig {
        latency_polls: 0,
        available_features: FeatureSet::from_slice(&[Feature::DomOverlay, Feature::Local]),
        strict_required: false,
        ..SimConfig::default()
    };
    let mut rig = Rig::new(config, EngineOptions::default());

    let err = rig.start().unwrap_err();
    assert!(matches!(err, XrError::SessionRequestDenied { .. }));
    assert_eq!(rig.driver.session_state(), SessionState::Idle);
    assert!(rig.sim.current_session().is_none());
    assert_eq!(rig.sim.counters().sessions_ended, 1);
}

// ── End-to-end ──────────────────────────────────────────────────────────────

#[test]
fn start_track_place_end() {
    let mut rig = Rig::with_latency(0);
    rig.start().unwrap();

    // Frame 1: hit-test source not yet available, render still runs.
    rig.sim.set_latency(1);
    let report = rig.frame();
    rig.sim.set_latency(0);
    assert_eq!(report.outcome, FrameOutcome::AcquisitionPending);
    assert!(!rig.driver.reticle().is_visible());
    assert_eq!(rig.renders, 1);

    // Frame 2: source resolves and the hit-test returns pose P.
    let FrameOutcome::Tracking(p) = rig.frame().outcome else {
        panic!("surface not tracked on frame 2");
    };
    assert_eq!(rig.driver.reticle().pose(), Some(p));

    rig.driver.select();
    rig.frame();
    assert!(rig.driver.placed_object().is_visible());
    assert_eq!(rig.driver.placed_object().transform(), p);

    rig.driver.end();
    assert!(!rig.driver.reticle().is_visible());
    assert!(rig.driver.manager().hit_test_source().is_none());
    assert_eq!(rig.sim.counters().hit_test_source_requests, 1);
}
