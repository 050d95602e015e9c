//! The particle swarm: an ordered set of particles sharing one scene.
//!
//! A tick runs in two interleaved steps per member:
//! 1. [`Particle::update`] against the shared [`Scene`].
//! 2. [`Particle::render`] onto the swarm's surface.
//!
//! The surface is cleared once before the first member. No particle reads
//! another's state, so iteration order only affects draw overlap.

use crate::{
    config::{Config, PointerMode, Scene, validate_easing, validate_size},
    error::{Result, SimError},
    particle::Particle,
    surface::Surface,
    types::ParticleId,
    vector::Vector2D,
};
use log::{debug, warn};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::Arc;

/// A swarm shared between the simulation loop and input sources.
pub type SharedSwarm<D, R = StdRng> = Arc<Mutex<ParticleSwarm<D, R>>>;

/// Outcome of a single [`ParticleSwarm::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Members that were updated and drawn.
    pub drawn: usize,
    /// Members whose render failed and was skipped.
    pub skipped: usize,
}

/// A swarm of particles following a shared target on one surface.
///
/// ### Type parameters
/// - `D` - The drawing surface.
/// - `R` - Random source used when spawning particles.
#[derive(Debug)]
pub struct ParticleSwarm<D, R = StdRng> {
    particles: Vec<Particle>,
    leader: Option<Particle>,
    scene: Scene,
    pointer: PointerMode,
    surface: D,
    rng: R,
    next_id: ParticleId,
}

impl<D: Surface> ParticleSwarm<D, StdRng> {
    /// Creates a swarm seeded from `cfg.seed`, or from the OS when unset.
    pub fn new(surface: D, cfg: &Config) -> Result<Self> {
        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(surface, cfg, rng)
    }
}

impl<D: Surface, R: Rng> ParticleSwarm<D, R> {
    /// Creates a swarm drawing its randomness from `rng`.
    ///
    /// The shared target starts at the centre of the surface, as does the
    /// leader when `cfg.leader` is set.
    ///
    /// ### Errors
    /// [`SimError::Configuration`] if `cfg` does not validate.
    pub fn with_rng(surface: D, cfg: &Config, rng: R) -> Result<Self> {
        cfg.validate()?;

        let bounds = surface.size();
        let mut swarm = Self {
            particles: Vec::with_capacity(cfg.size),
            leader: None,
            scene: Scene::new(bounds, cfg),
            pointer: cfg.pointer,
            surface,
            rng,
            next_id: 0,
        };
        swarm.grow_to(cfg.size);

        if cfg.leader {
            let id = swarm.allocate_id();
            let (cx, cy) = bounds.center();
            swarm.leader = Some(Particle::leader(id, Vector2D::new(cx, cy)));
        }

        debug!(
            "created swarm of {} particles on {}x{} surface",
            cfg.size, bounds.width, bounds.height
        );
        Ok(swarm)
    }

    /// Wraps the swarm for sharing with a loop and an input bridge.
    pub fn into_shared(self) -> SharedSwarm<D, R> {
        Arc::new(Mutex::new(self))
    }

    /// Number of standard particles (the leader is not counted).
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn leader(&self) -> Option<&Particle> {
        self.leader.as_ref()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    /// Swaps in a new drawing surface and returns the previous one.
    pub fn replace_surface(&mut self, surface: D) -> D {
        let previous = std::mem::replace(&mut self.surface, surface);
        self.scene.bounds = self.surface.size();
        previous
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer
    }

    pub fn set_pointer_mode(&mut self, mode: PointerMode) {
        self.pointer = mode;
    }

    /// Grows or shrinks the swarm to exactly `size` particles.
    ///
    /// Shrinking keeps the first `size` particles in insertion order.
    /// Growing appends freshly randomized particles.
    ///
    /// ### Errors
    /// [`SimError::Configuration`] if `size` is zero. The swarm is unchanged.
    pub fn resize(&mut self, size: usize) -> Result<()> {
        validate_size(size)?;

        let current = self.particles.len();
        if size < current {
            self.particles.truncate(size);
        } else {
            self.grow_to(size);
        }

        debug!("resized swarm {current} -> {size}");
        Ok(())
    }

    /// Sets the easing read by every standard particle on its next update.
    pub fn set_easing(&mut self, easing: f32) -> Result<()> {
        if validate_easing(easing).is_err() {
            return Err(SimError::InvalidArgument("easing must be finite"));
        }
        self.scene.easing = easing;
        Ok(())
    }

    /// Moves the shared target. Takes effect on the next tick.
    pub fn set_target(&mut self, target: Vector2D) -> Result<()> {
        if !target.is_finite() {
            return Err(SimError::InvalidArgument("target must be finite"));
        }
        self.scene.target = target;
        Ok(())
    }

    pub fn set_attraction(&mut self, enabled: bool) {
        self.scene.attraction = enabled;
    }

    pub fn set_heading(&mut self, enabled: bool) {
        self.scene.heading = enabled;
    }

    /// Clears the surface, then updates and renders every member.
    ///
    /// A member whose render fails is logged and skipped; the rest of the
    /// batch still runs.
    pub fn tick(&mut self) -> TickSummary {
        let bounds = self.surface.size();
        self.scene.bounds = bounds;
        self.surface.clear(0.0, 0.0, bounds.width, bounds.height);

        let mut summary = TickSummary::default();
        for p in self.particles.iter_mut().chain(self.leader.iter_mut()) {
            p.update(&self.scene);
            match p.render(&mut self.surface, &self.scene) {
                Ok(()) => summary.drawn += 1,
                Err(err) => {
                    summary.skipped += 1;
                    warn!("skipping particle {}: {err}", p.id);
                }
            }
        }
        summary
    }

    fn grow_to(&mut self, size: usize) {
        let bounds = self.surface.size();
        while self.particles.len() < size {
            let id = self.allocate_id();
            let p = Particle::spawn(id, &mut self.rng, bounds);
            self.particles.push(p);
        }
    }

    fn allocate_id(&mut self) -> ParticleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Boundary,
        error::ConfigError,
        particle::ParticleKind,
        surface::{DrawCommand, RecordingSurface},
    };

    fn seeded(size: usize) -> ParticleSwarm<RecordingSurface> {
        let cfg = Config {
            size,
            seed: Some(11),
            ..Config::default()
        };
        ParticleSwarm::new(RecordingSurface::new(320.0, 240.0), &cfg).unwrap()
    }

    #[test]
    fn new_swarm_has_configured_size_and_centred_leader() {
        let swarm = seeded(20);

        assert_eq!(swarm.len(), 20);
        let leader = swarm.leader().expect("leader enabled by default");
        assert_eq!(leader.kind(), ParticleKind::Leader);
        assert_eq!(leader.position, Vector2D::new(160.0, 120.0));
        assert_eq!(swarm.scene().target, Vector2D::new(160.0, 120.0));
    }

    #[test]
    fn construction_rejects_bad_configuration() {
        let surface = RecordingSurface::new(10.0, 10.0);
        let cfg = Config {
            size: 0,
            ..Config::default()
        };
        let err = ParticleSwarm::new(surface, &cfg).unwrap_err();
        assert_eq!(err, SimError::Configuration(ConfigError::EmptySwarm));

        let surface = RecordingSurface::new(10.0, 10.0);
        let cfg = Config {
            fps: -5.0,
            ..Config::default()
        };
        let err = ParticleSwarm::new(surface, &cfg).unwrap_err();
        assert_eq!(err, SimError::Configuration(ConfigError::FrameRate(-5.0)));
    }

    #[test]
    fn same_seed_builds_same_swarm() {
        let a = seeded(8);
        let b = seeded(8);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn resize_shrink_then_grow_keeps_survivors() {
        let mut swarm = seeded(20);
        let first_five: Vec<Particle> = swarm.particles()[..5].to_vec();

        swarm.resize(5).unwrap();
        assert_eq!(swarm.len(), 5);

        swarm.resize(12).unwrap();
        assert_eq!(swarm.len(), 12);
        assert_eq!(&swarm.particles()[..5], first_five.as_slice());

        // Newcomers get fresh ids.
        let max_survivor = first_five.iter().map(|p| p.id).max().unwrap();
        assert!(swarm.particles()[5..].iter().all(|p| p.id > max_survivor));
    }

    #[test]
    fn resize_to_zero_is_rejected_and_leaves_swarm_alone() {
        let mut swarm = seeded(4);
        let err = swarm.resize(0).unwrap_err();
        assert_eq!(err, SimError::Configuration(ConfigError::EmptySwarm));
        assert_eq!(swarm.len(), 4);
    }

    #[test]
    fn tick_never_changes_particle_count() {
        let mut swarm = seeded(17);
        for _ in 0..50 {
            swarm.tick();
            assert_eq!(swarm.len(), 17);
        }
    }

    #[test]
    fn tick_clears_then_draws_every_member() {
        let mut swarm = seeded(6);

        let summary = swarm.tick();

        assert_eq!(summary, TickSummary { drawn: 7, skipped: 0 });
        assert_eq!(
            swarm.surface().commands()[0],
            DrawCommand::Clear {
                x: 0.0,
                y: 0.0,
                width: 320.0,
                height: 240.0
            }
        );
        // Body plus heading per particle, one outline for the leader.
        assert_eq!(swarm.surface().shape_count(), 6 * 2 + 1);
    }

    #[test]
    fn clamped_swarm_stays_on_surface() {
        let mut swarm = seeded(30);
        let targets = [
            Vector2D::new(0.0, 0.0),
            Vector2D::new(320.0, 240.0),
            Vector2D::new(5.0, 230.0),
            Vector2D::new(310.0, 3.0),
        ];

        for step in 0..400 {
            swarm.set_target(targets[(step / 50) % targets.len()]).unwrap();
            swarm.tick();
            for p in swarm.particles() {
                assert!(
                    (1.0..=319.0).contains(&p.position.x) && (1.0..=239.0).contains(&p.position.y),
                    "particle {} escaped to {:?}",
                    p.id,
                    p.position
                );
            }
        }
    }

    #[test]
    fn unbounded_swarm_is_not_clamped() {
        let cfg = Config {
            size: 3,
            boundary: Boundary::Unbounded,
            seed: Some(5),
            ..Config::default()
        };
        let swarm = ParticleSwarm::new(RecordingSurface::new(10.0, 10.0), &cfg).unwrap();
        assert_eq!(swarm.scene().boundary, Boundary::Unbounded);
    }

    #[test]
    fn shared_configuration_reaches_every_particle() {
        let mut swarm = seeded(10);
        swarm.set_target(Vector2D::new(12.0, 34.0)).unwrap();
        swarm.set_easing(0.1).unwrap();
        swarm.set_attraction(false);

        let directions: Vec<Vector2D> = swarm.particles().iter().map(|p| p.direction).collect();
        swarm.tick();

        assert_eq!(swarm.scene().target, Vector2D::new(12.0, 34.0));
        assert_eq!(swarm.scene().easing, 0.1);
        let after: Vec<Vector2D> = swarm.particles().iter().map(|p| p.direction).collect();
        assert_eq!(directions, after);
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        let mut swarm = seeded(2);

        assert!(matches!(
            swarm.set_target(Vector2D::new(f32::NAN, 0.0)),
            Err(SimError::InvalidArgument(_))
        ));
        assert!(matches!(
            swarm.set_easing(f32::INFINITY),
            Err(SimError::InvalidArgument(_))
        ));
        assert_eq!(swarm.scene().target, Vector2D::new(160.0, 120.0));
        assert_eq!(swarm.scene().easing, 0.35);
    }

    #[test]
    fn broken_particle_is_skipped_without_aborting_the_batch() {
        let mut swarm = seeded(4);
        swarm
            .particles
            .insert(1, Particle::new(99, Vector2D::new(f32::NAN, 5.0), Vector2D::ZERO));

        let summary = swarm.tick();

        assert_eq!(summary, TickSummary { drawn: 5, skipped: 1 });
        assert_eq!(swarm.len(), 5);
    }

    #[test]
    fn replace_surface_swaps_and_rebounds() {
        let mut swarm = seeded(3);
        let old = swarm.replace_surface(RecordingSurface::new(50.0, 60.0));

        assert_eq!(old.size().width, 320.0);
        assert_eq!(swarm.scene().bounds.width, 50.0);

        swarm.tick();
        for p in swarm.particles() {
            assert!(p.position.x <= 49.0 && p.position.y <= 59.0);
        }
    }

    #[test]
    fn independent_swarms_do_not_share_targets() {
        let mut a = seeded(3);
        let b = seeded(3);
        a.set_target(Vector2D::new(1.0, 1.0)).unwrap();
        assert_ne!(a.scene().target, b.scene().target);
    }
}
