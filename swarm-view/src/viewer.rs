//! Interactive particle swarm viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a running
//! [`SimulationLoop`] and implements [`eframe::App`] to control it and to
//! paint the swarm's display list every frame.

use crate::canvas::{Palette, commands_to_shapes};
use eframe::App;
use log::warn;
use rand::rngs::StdRng;
use std::time::Duration;
use swarm_core::{
    config::{Config, PointerMode},
    error::Result,
    input::InputBridge,
    scheduler::Scheduler,
    simulation::{LoopState, SimulationLoop},
    surface::{RecordingSurface, Surface},
    swarm::ParticleSwarm,
};

/// Surface size used until the first frame reports the real canvas size.
const INITIAL_SURFACE: (f32, f32) = (800.0, 600.0);
const BACKGROUND: egui::Color32 = egui::Color32::from_gray(18);

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: a [`SimulationLoop`] over a shared
///   [`ParticleSwarm`] drawing onto a [`RecordingSurface`].
/// - An [`InputBridge`] receiving pointer events from the canvas.
/// - UI state mirrored from the swarm (size, easing, fps, toggles).
///
/// The typical per-frame update is:
/// 1. Report the frame time to the scheduler (frame-driven mode ticks here).
/// 2. Build the control panels and apply changes to the swarm.
/// 3. Forward pointer events, then paint the latest display list.
///
/// ### Fields
/// - `sim` - The frame loop and its shared swarm.
/// - `input` - Pointer endpoint bound to the same swarm.
/// - `cfg` - Settings used for resets and edited by the panels.
/// - `palette` - Colours for replaying the display list.
/// - `hovered` - Whether the pointer was over the canvas last frame.
/// - `last_error` - Most recent error, shown in the status bar.
pub struct Viewer<S: Scheduler> {
    sim: SimulationLoop<RecordingSurface, StdRng, S>,
    input: InputBridge<RecordingSurface>,
    cfg: Config,
    palette: Palette,
    hovered: bool,
    last_error: Option<String>,
}

impl<S: Scheduler> Viewer<S> {
    /// Creates the swarm described by `cfg` and starts ticking it at
    /// `cfg.fps` on `scheduler`.
    pub fn new(cfg: Config, scheduler: S) -> Result<Self> {
        let (w, h) = INITIAL_SURFACE;
        let swarm = ParticleSwarm::new(RecordingSurface::new(w, h), &cfg)?;
        let mut sim = SimulationLoop::new(swarm, scheduler);
        sim.start(cfg.fps)?;
        let input = sim.input();

        Ok(Self {
            sim,
            input,
            cfg,
            palette: Palette::default(),
            hovered: false,
            last_error: None,
        })
    }

    /// Logs and remembers an error for the status bar.
    fn report(&mut self, result: Result<()>) {
        if let Err(err) = result {
            warn!("{err}");
            self.last_error = Some(err.to_string());
        }
    }

    fn toggle_running(&mut self) {
        if self.sim.is_running() {
            self.sim.stop();
        } else {
            let started = self.sim.start(self.cfg.fps);
            self.report(started);
        }
    }

    /// Applies a new frame rate, restarting the loop if it is running.
    fn set_fps(&mut self, fps: f32) {
        self.cfg.fps = fps;
        if self.sim.is_running() {
            let restarted = self.sim.start(fps);
            self.report(restarted);
        }
    }

    fn set_size(&mut self, size: usize) {
        let resized = self.sim.swarm().lock().resize(size);
        if resized.is_ok() {
            self.cfg.size = size;
        }
        self.report(resized);
    }

    fn set_easing(&mut self, easing: f32) {
        let applied = self.sim.swarm().lock().set_easing(easing);
        if applied.is_ok() {
            self.cfg.easing = easing;
        }
        self.report(applied);
    }

    fn set_heading(&mut self, heading: bool) {
        self.cfg.heading = heading;
        self.sim.swarm().lock().set_heading(heading);
    }

    fn set_pointer_mode(&mut self, mode: PointerMode) {
        self.cfg.pointer = mode;
        self.sim.swarm().lock().set_pointer_mode(mode);
    }

    /// Replaces the swarm with a freshly spawned one on the current surface
    /// size. The loop keeps its state and schedule.
    fn reset(&mut self) {
        let mut swarm = self.sim.swarm().lock();
        let size = swarm.surface().size();
        match ParticleSwarm::new(RecordingSurface::new(size.width, size.height), &self.cfg) {
            Ok(fresh) => {
                *swarm = fresh;
                drop(swarm);
                self.last_error = None;
            }
            Err(err) => {
                drop(swarm);
                self.report(Err(err));
            }
        }
    }

    /// Keeps the recording surface the size of the canvas.
    fn sync_surface(&mut self, width: f32, height: f32) {
        let mut swarm = self.sim.swarm().lock();
        let size = swarm.surface().size();
        if size.width != width || size.height != height {
            swarm.surface_mut().resize(width, height);
        }
    }

    /// Forwards pointer state for one frame, in surface coordinates.
    ///
    /// - `hover` - Pointer position while over the canvas.
    /// - `pressed` - Position of a click on the canvas this frame.
    fn handle_pointer(&mut self, hover: Option<egui::Pos2>, pressed: Option<egui::Pos2>) {
        match (hover, self.hovered) {
            (Some(_), false) => self.input.on_pointer_enter(),
            (None, true) => self.input.on_pointer_leave(),
            _ => {}
        }
        self.hovered = hover.is_some();

        if let Some(p) = hover {
            let moved = self.input.on_pointer_move(p.x, p.y);
            self.report(moved);
        }
        if let Some(p) = pressed {
            let clicked = self.input.on_pointer_down(p.x, p.y);
            self.report(clicked);
        }
    }

    /// Builds the top panel UI (run controls, frame rate, reset).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let label = if self.sim.is_running() { "⏸ Pause" } else { "▶ Run" };
                if ui.button(label).clicked() {
                    self.toggle_running();
                }

                let mut fps = self.cfg.fps;
                let changed = ui
                    .add(
                        egui::DragValue::new(&mut fps)
                            .prefix("fps = ")
                            .range(1.0..=240.0)
                            .speed(1.0),
                    )
                    .changed();
                if changed {
                    self.set_fps(fps);
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }
            });
        });
    }

    /// Builds the bottom status bar (particle count, frames, loop state).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let state = match self.sim.state() {
                    LoopState::Running { fps } => format!("running @ {fps:.0} fps"),
                    LoopState::Stopped => "paused".to_owned(),
                };
                ui.label(state);
                ui.label(format!("frames = {}", self.sim.frames()));
                ui.separator();
                ui.label(format!("particles = {}", self.sim.swarm().lock().len()));
                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                }
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Swarm");
                ui.separator();

                let mut size = self.cfg.size;
                let resized = ui
                    .horizontal(|ui| {
                        ui.label("size:");
                        ui.add(egui::DragValue::new(&mut size).range(1..=2000).speed(1.0))
                            .changed()
                    })
                    .inner;
                if resized {
                    self.set_size(size);
                }

                let mut easing = self.cfg.easing;
                if ui
                    .add(egui::Slider::new(&mut easing, 0.01..=1.0).text("easing"))
                    .changed()
                {
                    self.set_easing(easing);
                }

                let mut heading = self.cfg.heading;
                if ui.checkbox(&mut heading, "draw heading").changed() {
                    self.set_heading(heading);
                }

                ui.separator();
                ui.label("Target follows");
                let mut mode = self.cfg.pointer;
                ui.radio_value(&mut mode, PointerMode::Follow, "pointer");
                ui.radio_value(&mut mode, PointerMode::Click, "clicks");
                if mode != self.cfg.pointer {
                    self.set_pointer_mode(mode);
                }

                ui.separator();
                let attraction = self.sim.swarm().lock().scene().attraction;
                ui.label(if attraction {
                    "attraction: on"
                } else {
                    "attraction: off (pointer outside)"
                });

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config {
                        seed: self.cfg.seed,
                        ..Config::default()
                    };
                    self.reset();
                }
            });
    }

    /// Builds the central panel where the swarm is drawn and steered.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(BACKGROUND))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::click());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                self.sync_surface(rect.width(), rect.height());

                let to_surface = |p: egui::Pos2| egui::pos2(p.x - rect.min.x, p.y - rect.min.y);
                let hover = response.hover_pos().map(to_surface);
                let pressed = if response.clicked() {
                    response.interact_pointer_pos().map(to_surface)
                } else {
                    None
                };
                self.handle_pointer(hover, pressed);

                // Copy the display list so the tick thread is not held up by painting.
                let commands = self.sim.swarm().lock().surface().commands().to_vec();
                painter.extend(commands_to_shapes(&commands, rect.min, self.palette));
            });
    }
}

impl<S: Scheduler> App for Viewer<S> {
    /// eframe callback that advances frame-driven schedules and builds all
    /// UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt);
        if self.sim.is_running() {
            self.sim.advance(Duration::from_secs_f32(dt.max(0.0)));
        }

        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);

        if self.sim.is_running() {
            ctx.request_repaint();
        }
    }
}
