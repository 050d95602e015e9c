//! Core 2-D particle swarm simulation library.
//!
//! Main components:
//! - [`vector`] - mutable 2-D vector with chainable arithmetic.
//! - [`particle`] - a swarm member and its update / render rules.
//! - [`attractor`] - the leader particle that trails the target.
//! - [`swarm`] - an ordered set of particles sharing one scene.
//! - [`simulation`] - the start / stop frame loop.
//! - [`scheduler`] - periodic timers (threaded or host-driven).
//! - [`input`] - pointer events mapped onto swarm state.
//! - [`surface`] - the drawing capability and a recording implementation.
//! - [`config`] - tunables and the per-swarm scene.
//! - [`error`] - error types.
//! - [`types`] - shared type aliases and IDs.

pub mod attractor;
pub mod config;
pub mod error;
pub mod input;
pub mod particle;
pub mod scheduler;
pub mod simulation;
pub mod surface;
pub mod swarm;
pub mod types;
pub mod vector;

use config::{Config, DEFAULT_EASING, DEFAULT_SIZE};
use error::Result;
use surface::Surface;
use swarm::ParticleSwarm;

/// Builds a swarm of `size` particles with the given easing and otherwise
/// default settings.
///
/// [`DEFAULT_SIZE`] and [`DEFAULT_EASING`] are the customary values.
///
/// ### Errors
/// [`error::SimError::Configuration`] if `size` is zero or `easing` is not
/// finite.
pub fn create_swarm<D: Surface>(surface: D, size: usize, easing: f32) -> Result<ParticleSwarm<D>> {
    let cfg = Config {
        size,
        easing,
        ..Config::default()
    };
    ParticleSwarm::new(surface, &cfg)
}
