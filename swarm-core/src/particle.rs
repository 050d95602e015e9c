//! Particles and the standard update rule.
//!
//! A particle carries a position, a `direction` accumulator that acts as
//! momentum, and a mass that doubles as its render radius. Each step pulls
//! the particle toward the scene target with a distance-shaped force:
//!
//! 1. `delta = target - position`, `distance = |target - position|`.
//! 2. `delta` is scaled by [`NEAR_FACTOR`] inside [`NEAR_DISTANCE`], by
//!    `1 / sqrt(distance)` beyond it, then by [`DAMPING`].
//! 3. With attraction enabled `delta` is accumulated into `direction`.
//!    Direction never decays.
//! 4. `mass = max(1, ln(distance) / MASS_LOG_DIVISOR)`.
//! 5. `position += (delta + direction) * easing`, skipped when the particle
//!    already sits on the target.
//! 6. The position is clamped to the surface when the scene asks for it.
//!
//! The leader variant lives in [`crate::attractor`].

use crate::{
    config::{Boundary, Scene},
    error::{Result, SimError},
    surface::{Surface, SurfaceSize},
    types::ParticleId,
    vector::Vector2D,
};
use rand::Rng;
use std::f32::consts::TAU;

/// Below this distance the pull is a small constant fraction of `delta`.
pub const NEAR_DISTANCE: f32 = 100.0;
pub const NEAR_FACTOR: f32 = 0.01;
pub const DAMPING: f32 = 0.75;
pub const MASS_LOG_DIVISOR: f32 = 1.75;
/// Length of the heading line relative to `direction`.
pub const HEADING_SCALE: f32 = 0.2;
/// Initial direction components are drawn from `[-SPREAD / 2, SPREAD / 2)`.
pub const DIRECTION_SPREAD: f32 = 50.0;

/// Behaviour selector shared by every particle in a swarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    /// Momentum-driven particle that swells with distance.
    Standard,
    /// Slow proportional follower, see [`crate::attractor`].
    Leader,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vector2D,
    pub direction: Vector2D,
    pub mass: f32,
    pub(crate) kind: ParticleKind,
}

impl Particle {
    /// Creates a standard particle with unit mass.
    pub fn new(id: ParticleId, position: Vector2D, direction: Vector2D) -> Self {
        Self {
            id,
            position,
            direction,
            mass: 1.0,
            kind: ParticleKind::Standard,
        }
    }

    /// Creates a standard particle at a random spot on the surface with a
    /// random initial heading.
    pub fn spawn<R: Rng + ?Sized>(id: ParticleId, rng: &mut R, bounds: SurfaceSize) -> Self {
        let mut p = Self::new(id, Vector2D::ZERO, Vector2D::ZERO);
        p.randomize(rng, bounds);
        p.direction
            .randomize(rng, None)
            .subtract(0.5)
            .multiply(DIRECTION_SPREAD);
        p
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    /// Re-rolls the position uniformly over the full surface.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, bounds: SurfaceSize) -> &mut Self {
        self.position
            .randomize(rng, None)
            .multiply(Vector2D::new(bounds.width, bounds.height));
        self
    }

    /// Advances the particle by one simulation step.
    pub fn update(&mut self, scene: &Scene) -> &mut Self {
        match self.kind {
            ParticleKind::Standard => self.update_standard(scene),
            ParticleKind::Leader => self.update_leader(scene),
        }
        self
    }

    /// Draws the particle onto `surface`.
    ///
    /// ### Errors
    /// [`SimError::NonFiniteGeometry`] if the particle cannot be drawn. In
    /// that case nothing reaches the surface.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, scene: &Scene) -> Result<()> {
        match self.kind {
            ParticleKind::Standard => {
                self.check_geometry(scene.heading)?;
                self.render_standard(surface, scene.heading);
            }
            ParticleKind::Leader => {
                self.check_geometry(false)?;
                self.render_leader(surface);
            }
        }
        Ok(())
    }

    fn update_standard(&mut self, scene: &Scene) {
        let mut delta = scene.target;
        delta.subtract(self.position);
        let distance = self.position.distance(scene.target);

        if distance < NEAR_DISTANCE {
            delta.multiply(NEAR_FACTOR);
        } else {
            delta.multiply(1.0 / distance.sqrt());
        }
        delta.multiply(DAMPING);

        if scene.attraction {
            self.direction.add(delta);
        }

        // ln(0) is -inf, which the floor absorbs.
        self.mass = (distance.ln() / MASS_LOG_DIVISOR).max(1.0);

        if distance > 0.0 {
            delta.add(self.direction).multiply(scene.easing);
            self.position.add(delta);
        }

        if scene.boundary == Boundary::Clamp {
            self.position.x = clamp_axis(self.position.x, scene.bounds.width);
            self.position.y = clamp_axis(self.position.y, scene.bounds.height);
        }
    }

    fn render_standard<S: Surface + ?Sized>(&self, surface: &mut S, heading: bool) {
        let Vector2D { x, y } = self.position;

        surface.begin_shape();
        surface.arc(x, y, self.mass, 0.0, TAU, true);
        surface.fill();

        if heading {
            surface.begin_shape();
            surface.move_to(x, y);
            surface.line_to(
                x + self.direction.x * HEADING_SCALE,
                y + self.direction.y * HEADING_SCALE,
            );
            surface.stroke();
        }
    }

    fn check_geometry(&self, with_heading: bool) -> Result<()> {
        let finite = self.position.is_finite()
            && self.mass.is_finite()
            && (!with_heading || self.direction.is_finite());
        if finite {
            Ok(())
        } else {
            Err(SimError::NonFiniteGeometry {
                x: self.position.x,
                y: self.position.y,
                radius: self.mass,
            })
        }
    }
}

/// Keeps `v` inside `[1, extent - 1]`. NaN passes through untouched.
fn clamp_axis(v: f32, extent: f32) -> f32 {
    if v <= 1.0 {
        1.0
    } else if v >= extent - 1.0 {
        extent - 1.0
    } else {
        v
    }
}
