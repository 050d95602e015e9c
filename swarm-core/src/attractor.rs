//! The leader particle: a heavy, slow follower of the scene target.
//!
//! A leader uses its own fixed easing and ignores the attraction flag. It
//! moves a constant fraction of the remaining distance each step, without
//! momentum or force shaping, and is drawn as an outline.

use crate::{
    config::Scene,
    particle::{Particle, ParticleKind},
    surface::Surface,
    types::ParticleId,
    vector::Vector2D,
};
use std::f32::consts::TAU;

pub const LEADER_MASS: f32 = 50.0;
pub const LEADER_EASING: f32 = 0.05;

impl Particle {
    /// Creates a leader at `position`.
    pub fn leader(id: ParticleId, position: Vector2D) -> Self {
        Self {
            id,
            position,
            direction: Vector2D::ZERO,
            mass: LEADER_MASS,
            kind: ParticleKind::Leader,
        }
    }

    pub(crate) fn update_leader(&mut self, scene: &Scene) {
        if self.position.distance(scene.target) > 0.0 {
            let mut delta = scene.target;
            delta.subtract(self.position).multiply(LEADER_EASING);
            self.position.add(delta);
        }
    }

    pub(crate) fn render_leader<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.begin_shape();
        surface.arc(self.position.x, self.position.y, self.mass, 0.0, TAU, true);
        surface.stroke();
    }
}
