//! Application entry point for the particle swarm viewer.
//!
//! This binary parses command-line options, builds a [`Config`] and hands a
//! [`Viewer`] to eframe. All interaction and drawing live in the `viewer`
//! module; the `canvas` module replays the swarm's display list with egui.

mod canvas;
mod viewer;

use anyhow::{Context, anyhow};
use clap::{Parser, ValueEnum};
use log::info;
use std::{fs, path::PathBuf};
use swarm_core::{
    config::{Config, PointerMode},
    scheduler::{ManualScheduler, Scheduler, ThreadScheduler},
};
use viewer::Viewer;

const TITLE: &str = "Particle Swarm";

/// How the simulation loop is clocked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum SchedulerKind {
    /// A background thread ticks the swarm on its own timer.
    #[default]
    Thread,
    /// The UI frame clock drives the ticks.
    Frame,
}

/// Interactive particle swarm that follows the pointer.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON configuration file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of particles.
    #[arg(long)]
    size: Option<usize>,

    /// Attraction easing of the particles.
    #[arg(long)]
    easing: Option<f32>,

    /// Simulation frames per second.
    #[arg(long)]
    fps: Option<f32>,

    /// Seed for a reproducible swarm.
    #[arg(long)]
    seed: Option<u64>,

    /// Move the target only on clicks instead of following the pointer.
    #[arg(long)]
    click_to_target: bool,

    /// Do not spawn the leader particle.
    #[arg(long)]
    no_leader: bool,

    #[arg(long, value_enum, default_value_t = SchedulerKind::Thread)]
    scheduler: SchedulerKind,
}

impl Args {
    /// Loads the configuration file (if any) and applies the flag overrides.
    fn to_config(&self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(size) = self.size {
            cfg.size = size;
        }
        if let Some(easing) = self.easing {
            cfg.easing = easing;
        }
        if let Some(fps) = self.fps {
            cfg.fps = fps;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if self.click_to_target {
            cfg.pointer = PointerMode::Click;
        }
        if self.no_leader {
            cfg.leader = false;
        }

        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }
}

/// Builds the viewer and runs the native window until it is closed.
fn launch<S: Scheduler + 'static>(cfg: Config, scheduler: S) -> anyhow::Result<()> {
    let viewer = Viewer::new(cfg, scheduler).context("failed to create the swarm")?;
    let options = eframe::NativeOptions::default();

    eframe::run_native(TITLE, options, Box::new(|_cc| Ok(Box::new(viewer))))
        .map_err(|err| anyhow!("viewer failed: {err}"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let cfg = args.to_config()?;
    info!("starting {TITLE} with {cfg:?} on {:?} scheduler", args.scheduler);

    match args.scheduler {
        SchedulerKind::Thread => launch(cfg, ThreadScheduler),
        SchedulerKind::Frame => launch(cfg, ManualScheduler::new()),
    }
}
