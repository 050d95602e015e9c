//! Pointer input forwarding.
//!
//! Hosts translate their native pointer events into [`PointerEvent`]s and
//! feed them to a swarm, either directly through
//! [`ParticleSwarm::handle_pointer`] or through an [`InputBridge`] when the
//! swarm is shared with a running loop.

use crate::{
    config::PointerMode,
    error::Result,
    surface::Surface,
    swarm::{ParticleSwarm, SharedSwarm},
    vector::Vector2D,
};
use rand::{Rng, rngs::StdRng};
use std::sync::Arc;

/// A pointer event in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Move { x: f32, y: f32 },
    Down { x: f32, y: f32 },
    Enter,
    Leave,
}

impl<D: Surface, R: Rng> ParticleSwarm<D, R> {
    /// Applies a pointer event to the shared target and attraction flag.
    ///
    /// - `Move` retargets the swarm in [`PointerMode::Follow`] only.
    /// - `Down` always retargets.
    /// - `Enter` / `Leave` switch attraction on / off.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<()> {
        match event {
            PointerEvent::Move { x, y } => {
                if self.pointer_mode() == PointerMode::Follow {
                    self.set_target(Vector2D::new(x, y))?;
                }
            }
            PointerEvent::Down { x, y } => self.set_target(Vector2D::new(x, y))?,
            PointerEvent::Enter => self.set_attraction(true),
            PointerEvent::Leave => self.set_attraction(false),
        }
        Ok(())
    }
}

/// Cloneable input endpoint for a [`SharedSwarm`].
///
/// Each event takes the swarm lock, so updates never interleave with a tick.
pub struct InputBridge<D, R = StdRng> {
    swarm: SharedSwarm<D, R>,
}

impl<D, R> Clone for InputBridge<D, R> {
    fn clone(&self) -> Self {
        Self {
            swarm: Arc::clone(&self.swarm),
        }
    }
}

impl<D: Surface, R: Rng> InputBridge<D, R> {
    pub fn new(swarm: SharedSwarm<D, R>) -> Self {
        Self { swarm }
    }

    pub fn dispatch(&self, event: PointerEvent) -> Result<()> {
        self.swarm.lock().handle_pointer(event)
    }

    pub fn on_pointer_move(&self, x: f32, y: f32) -> Result<()> {
        self.dispatch(PointerEvent::Move { x, y })
    }

    pub fn on_pointer_down(&self, x: f32, y: f32) -> Result<()> {
        self.dispatch(PointerEvent::Down { x, y })
    }

    pub fn on_pointer_enter(&self) {
        // Enter / Leave cannot fail.
        let _ = self.dispatch(PointerEvent::Enter);
    }

    pub fn on_pointer_leave(&self) {
        let _ = self.dispatch(PointerEvent::Leave);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, error::SimError, surface::RecordingSurface};

    fn swarm(pointer: PointerMode) -> ParticleSwarm<RecordingSurface> {
        let cfg = Config {
            size: 3,
            pointer,
            seed: Some(1),
            ..Config::default()
        };
        ParticleSwarm::new(RecordingSurface::new(100.0, 100.0), &cfg).unwrap()
    }

    #[test]
    fn follow_mode_tracks_moves_and_presses() {
        let mut s = swarm(PointerMode::Follow);

        s.handle_pointer(PointerEvent::Move { x: 10.0, y: 20.0 }).unwrap();
        assert_eq!(s.scene().target, Vector2D::new(10.0, 20.0));

        s.handle_pointer(PointerEvent::Down { x: 30.0, y: 40.0 }).unwrap();
        assert_eq!(s.scene().target, Vector2D::new(30.0, 40.0));
    }

    #[test]
    fn click_mode_ignores_moves() {
        let mut s = swarm(PointerMode::Click);

        s.handle_pointer(PointerEvent::Move { x: 10.0, y: 20.0 }).unwrap();
        assert_eq!(s.scene().target, Vector2D::new(50.0, 50.0));

        s.handle_pointer(PointerEvent::Down { x: 30.0, y: 40.0 }).unwrap();
        assert_eq!(s.scene().target, Vector2D::new(30.0, 40.0));
    }

    #[test]
    fn hover_toggles_attraction() {
        let mut s = swarm(PointerMode::Follow);

        s.handle_pointer(PointerEvent::Leave).unwrap();
        assert!(!s.scene().attraction);

        s.handle_pointer(PointerEvent::Enter).unwrap();
        assert!(s.scene().attraction);
    }

    #[test]
    fn bridge_updates_shared_swarm() {
        let shared = swarm(PointerMode::Follow).into_shared();
        let bridge = InputBridge::new(Arc::clone(&shared));
        let other = bridge.clone();

        bridge.on_pointer_move(5.0, 6.0).unwrap();
        other.on_pointer_leave();

        let s = shared.lock();
        assert_eq!(s.scene().target, Vector2D::new(5.0, 6.0));
        assert!(!s.scene().attraction);
    }

    #[test]
    fn bridge_rejects_non_finite_coordinates() {
        let bridge = InputBridge::new(swarm(PointerMode::Follow).into_shared());
        assert!(matches!(
            bridge.on_pointer_down(f32::NAN, 1.0),
            Err(SimError::InvalidArgument(_))
        ));
    }
}
