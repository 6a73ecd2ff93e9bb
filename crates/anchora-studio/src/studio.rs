use std::f32::consts::FRAC_PI_4;
use std::mem::discriminant;

use anchora_engine::core::{App, AppControl, FrameCtx};
use anchora_engine::input::{Key, MouseButton};
use anchora_engine::paint::Color;
use anchora_engine::render::{Camera, MeshList, MeshRenderer};
use anchora_xr::sim::{SimConfig, SimXr};
use anchora_xr::{EngineOptions, FrameDriver, FrameOutcome, SessionState};

use crate::draw::{self, ArLook};
use crate::scene::Scene;

/// Radians per second for arrow-key steering.
const LOOK_RATE: f32 = 1.2;
const PITCH_MIN: f32 = -1.45;
const PITCH_MAX: f32 = 0.6;
const SPIN_STEP: f32 = 0.01;

const CARD_TINTS: [u32; 2] = [0xf2efe6, 0x9fd3ff];

/// One scene running against the simulated device.
pub struct Studio {
    scene: Scene,
    sim: SimXr,
    driver: Option<FrameDriver<SimXr>>,
    surface_height: f32,

    world: MeshList,
    hud: MeshList,
    world_renderer: MeshRenderer,
    hud_renderer: MeshRenderer,

    yaw: f32,
    pitch: f32,
    spin: f32,
    surface_visible: bool,
    card_tint: usize,

    last_state: SessionState,
    last_outcome: FrameOutcome,
}

impl Studio {
    /// `options` is `None` for scenes without an AR session.
    pub fn new(scene: Scene, config: SimConfig, options: Option<EngineOptions>) -> Self {
        let surface_height = config.surface_height;
        let sim = SimXr::new(config);
        let driver = options.map(|options| FrameDriver::new(sim.clone(), options));

        let mut studio = Self {
            scene,
            sim,
            driver,
            surface_height,
            world: MeshList::new(),
            hud: MeshList::new(),
            world_renderer: MeshRenderer::new(),
            hud_renderer: MeshRenderer::new(),
            yaw: 0.0,
            pitch: -FRAC_PI_4,
            spin: 0.0,
            surface_visible: true,
            card_tint: 0,
            last_state: SessionState::Idle,
            last_outcome: FrameOutcome::Inactive,
        };
        studio.apply_look();
        studio
    }

    fn is_active(&self) -> bool {
        self.driver
            .as_ref()
            .is_some_and(|d| d.session_state() == SessionState::Active)
    }

    fn apply_look(&self) {
        self.sim.look(self.yaw, self.pitch);
    }

    fn toggle_session(&mut self) {
        let Some(driver) = self.driver.as_mut() else { return };

        if driver.session_state() == SessionState::Active {
            driver.end();
            return;
        }

        match pollster::block_on(driver.start()) {
            Ok(()) => log::info!("AR session started ({:?})", self.scene),
            Err(err) if err.is_startup() => log::warn!("could not start AR session: {err}"),
            Err(err) => log::error!("AR session start failed: {err}"),
        }
    }

    fn select(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.select();
        }
    }

    /// A tap on the in-session overlay: the platform still reports a select,
    /// which must not place anything.
    fn overlay_tap(&mut self) {
        let Some(driver) = self.driver.as_mut() else { return };
        driver.suppress_next_select();
        driver.select();
        self.card_tint = (self.card_tint + 1) % CARD_TINTS.len();
        log::debug!("overlay tapped");
    }

    fn handle_input(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        let frame = ctx.input_frame;

        if frame.key_pressed(Key::Escape) {
            if !self.is_active() {
                return AppControl::Exit;
            }
            if let Some(driver) = self.driver.as_mut() {
                driver.end();
            }
        }

        if frame.key_pressed(Key::Enter) {
            self.toggle_session();
        }

        if frame.key_pressed(Key::Space) {
            self.select();
        }

        for (x, y) in frame.presses(MouseButton::Left) {
            if draw::on_hud_bar(x, y) && self.scene.has_overlay_ui() && self.is_active() {
                self.overlay_tap();
            } else {
                self.select();
            }
        }

        if frame.key_pressed(Key::H) {
            self.surface_visible = !self.surface_visible;
            self.sim.set_surface_visible(self.surface_visible);
            log::info!("surface {}", if self.surface_visible { "shown" } else { "hidden" });
        }

        if frame.key_pressed(Key::R) {
            self.yaw = 0.0;
            self.pitch = -FRAC_PI_4;
        }

        if frame.key_pressed(Key::S) {
            log::info!("leaving AR from the device side");
            self.sim.end_session();
        }

        let step = LOOK_RATE * ctx.time.dt;
        let axis = |neg: Key, pos: Key| {
            (ctx.input.key_down(pos) as i32 - ctx.input.key_down(neg) as i32) as f32
        };
        self.yaw += step * axis(Key::ArrowRight, Key::ArrowLeft);
        self.pitch = (self.pitch + step * axis(Key::ArrowDown, Key::ArrowUp)).clamp(PITCH_MIN, PITCH_MAX);
        self.apply_look();

        AppControl::Continue
    }

    fn note_state(&mut self, ctx: &FrameCtx<'_, '_>, state: SessionState, outcome: FrameOutcome) {
        if state != self.last_state {
            log::debug!("session {} -> {}", self.last_state, state);
            ctx.window.set_title(&format!("{} [{state}]", self.scene.title()));
            self.last_state = state;
        }
        if discriminant(&outcome) != discriminant(&self.last_outcome) {
            log::debug!("frame outcome: {outcome:?}");
        }
        self.last_outcome = outcome;
    }
}

impl App for Studio {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_input(ctx) == AppControl::Exit {
            ctx.runtime.exit();
        }

        self.spin += SPIN_STEP;
        let aspect = ctx.gpu.aspect();
        let (_, height) = ctx.window.logical_size();

        let look = ArLook {
            scene: self.scene,
            device_pose: self.sim.viewer_pose(),
            surface_height: self.surface_height,
            surface_visible: self.surface_visible,
            spin: self.spin,
            card_tint: Color::hex(CARD_TINTS[self.card_tint]),
        };

        let mut status = None;
        let world_camera = match self.driver.as_mut() {
            None => draw::hello_cube(&mut self.world, aspect, self.spin),
            Some(driver) => {
                let xr_frame = self.sim.begin_frame();
                let world = &mut self.world;
                let mut camera = Camera::IDENTITY;

                let report = driver.frame(ctx.time.timestamp_ms, xr_frame.as_ref(), |view| {
                    camera = draw::ar_scene(view, &look, world, aspect);
                });
                if report.session_ended {
                    log::info!("AR session ended");
                }

                let state = driver.session_state();
                draw::hud(&mut self.hud, height, state, report.outcome);
                status = Some((state, report.outcome));
                camera
            }
        };

        if let Some((state, outcome)) = status {
            self.note_state(ctx, state, outcome);
        }

        let world = &self.world;
        let hud = &self.hud;
        let world_renderer = &mut self.world_renderer;
        let hud_renderer = &mut self.hud_renderer;
        ctx.render(draw::CLEAR, |rctx, target| {
            world_renderer.render(rctx, target, &world_camera, world);
            hud_renderer.render(rctx, target, &Camera::IDENTITY, hud);
        })
    }

    fn on_exit(&mut self) {
        if let Some(driver) = self.driver.as_mut() {
            driver.end();
        }
        log::info!("studio closed");
    }
}
