//! The frame loop driving a shared swarm.
//!
//! [`SimulationLoop`] owns the start/stop lifecycle:
//!
//! ```text
//! Stopped --start(fps)--> Running --stop()--> Stopped
//!            ^                |
//!            +--start(fps)----+   (replaces the running schedule)
//! ```
//!
//! Each repetition locks the swarm for the whole tick, so ticks never
//! overlap each other or an input update. Dropping the loop drops its task
//! handle, which cancels the schedule.

use crate::{
    config::validate_fps,
    error::Result,
    input::InputBridge,
    scheduler::{Scheduler, TaskHandle},
    surface::Surface,
    swarm::{ParticleSwarm, SharedSwarm},
};
use log::{debug, info};
use rand::{Rng, rngs::StdRng};
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LoopState {
    Stopped,
    Running { fps: f32 },
}

/// Interval between frames for a target rate: `1000 / fps` milliseconds,
/// truncated to whole milliseconds and never below one.
///
/// ### Errors
/// [`crate::error::SimError::Configuration`] unless `fps` is finite and
/// positive.
pub fn frame_interval(fps: f32) -> Result<Duration> {
    validate_fps(fps)?;
    let millis = (1000.0 / fps).trunc() as u64;
    Ok(Duration::from_millis(millis.max(1)))
}

/// Drives [`ParticleSwarm::tick`] at a fixed frame rate.
///
/// ### Type parameters
/// - `D`, `R` - Surface and random source of the swarm.
/// - `S` - The [`Scheduler`] providing the periodic timer.
pub struct SimulationLoop<D, R, S>
where
    S: Scheduler,
{
    swarm: SharedSwarm<D, R>,
    scheduler: S,
    task: Option<S::Handle>,
    state: LoopState,
    frames: Arc<AtomicU64>,
}

impl<D, S> SimulationLoop<D, StdRng, S>
where
    D: Surface + Send + 'static,
    S: Scheduler,
{
    /// Shorthand for a loop over a swarm with the default random source.
    pub fn with_default_rng(swarm: ParticleSwarm<D>, scheduler: S) -> Self {
        Self::new(swarm, scheduler)
    }
}

impl<D, R, S> SimulationLoop<D, R, S>
where
    D: Surface + Send + 'static,
    R: Rng + Send + 'static,
    S: Scheduler,
{
    pub fn new(swarm: ParticleSwarm<D, R>, scheduler: S) -> Self {
        Self::from_shared(swarm.into_shared(), scheduler)
    }

    pub fn from_shared(swarm: SharedSwarm<D, R>, scheduler: S) -> Self {
        Self {
            swarm,
            scheduler,
            task: None,
            state: LoopState::Stopped,
            frames: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn swarm(&self) -> &SharedSwarm<D, R> {
        &self.swarm
    }

    /// Returns an input endpoint bound to this loop's swarm.
    pub fn input(&self) -> InputBridge<D, R> {
        InputBridge::new(Arc::clone(&self.swarm))
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    /// Ticks completed since the loop was created.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Reports host time to the scheduler; see [`Scheduler::advance`].
    pub fn advance(&mut self, elapsed: Duration) {
        self.scheduler.advance(elapsed);
    }

    /// Starts ticking at `fps` frames per second.
    ///
    /// A running schedule is cancelled before the new one is created, so
    /// there are never two concurrent tickers.
    ///
    /// ### Errors
    /// [`crate::error::SimError::Configuration`] for an unusable `fps`. No
    /// timer is created and the current state is kept.
    pub fn start(&mut self, fps: f32) -> Result<()> {
        let interval = frame_interval(fps)?;

        if let Some(previous) = self.task.take() {
            debug!("replacing running schedule");
            previous.cancel();
        }

        let swarm = Arc::clone(&self.swarm);
        let frames = Arc::clone(&self.frames);
        let handle = self.scheduler.schedule_repeating(interval, move || {
            swarm.lock().tick();
            frames.fetch_add(1, Ordering::Relaxed);
        });

        self.task = Some(handle);
        self.state = LoopState::Running { fps };
        info!(
            "simulation started at {fps} fps ({} ms per frame)",
            interval.as_millis()
        );
        Ok(())
    }

    /// Stops ticking. No tick starts after this returns.
    ///
    /// Stopping a stopped loop does nothing. Must not be called while
    /// holding the swarm lock.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        task.cancel();
        self.state = LoopState::Stopped;
        info!("simulation stopped after {} frames", self.frames());
    }
}
