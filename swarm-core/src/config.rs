use crate::{error::ConfigError, surface::SurfaceSize, vector::Vector2D};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SIZE: usize = 20;
pub const DEFAULT_EASING: f32 = 0.35;
pub const DEFAULT_FPS: f32 = 30.0;

/// What happens when a particle leaves the drawable area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Keep positions inside `[1, width - 1] x [1, height - 1]`.
    #[default]
    Clamp,
    /// Let particles wander off the surface.
    Unbounded,
}

/// Which pointer events move the shared target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerMode {
    /// Target follows pointer movement and presses.
    #[default]
    Follow,
    /// Target only moves on pointer presses.
    Click,
}

/// Swarm and loop configuration.
///
/// Every field has a default, so a partial JSON document is enough to
/// override a single value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of standard particles.
    pub size: usize,
    /// Attraction responsiveness of standard particles.
    pub easing: f32,
    /// Target frame rate of the simulation loop.
    pub fps: f32,
    /// Spawn a leader particle (the slow attractor).
    pub leader: bool,
    /// Draw the momentum line of standard particles.
    pub heading: bool,
    pub boundary: Boundary,
    pub pointer: PointerMode,
    /// Seed for reproducible runs; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            easing: DEFAULT_EASING,
            fps: DEFAULT_FPS,
            leader: true,
            heading: true,
            boundary: Boundary::Clamp,
            pointer: PointerMode::Follow,
            seed: None,
        }
    }
}

impl Config {
    /// Checks the values a swarm and its loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_size(self.size)?;
        validate_easing(self.easing)?;
        validate_fps(self.fps)?;
        Ok(())
    }
}

pub(crate) fn validate_size(size: usize) -> Result<(), ConfigError> {
    if size == 0 {
        return Err(ConfigError::EmptySwarm);
    }
    Ok(())
}

pub(crate) fn validate_easing(easing: f32) -> Result<(), ConfigError> {
    if !easing.is_finite() {
        return Err(ConfigError::Easing(easing));
    }
    Ok(())
}

pub(crate) fn validate_fps(fps: f32) -> Result<(), ConfigError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ConfigError::FrameRate(fps));
    }
    Ok(())
}

/// Swarm-wide state every particle reads during its update.
///
/// Owned by the swarm and handed to particles by reference, so one pointer
/// event retargets the whole swarm at once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scene {
    pub target: Vector2D,
    pub easing: f32,
    pub attraction: bool,
    pub bounds: SurfaceSize,
    pub boundary: Boundary,
    pub heading: bool,
}

impl Scene {
    /// Creates a scene whose target sits at the centre of `bounds`.
    pub fn new(bounds: SurfaceSize, cfg: &Config) -> Self {
        let (cx, cy) = bounds.center();
        Self {
            target: Vector2D::new(cx, cy),
            easing: cfg.easing,
            attraction: true,
            bounds,
            boundary: cfg.boundary,
            heading: cfg.heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.size, 20);
        assert_eq!(cfg.easing, 0.35);
        assert_eq!(cfg.fps, 30.0);
        assert!(cfg.leader);
        assert_eq!(cfg.boundary, Boundary::Clamp);
        assert_eq!(cfg.pointer, PointerMode::Follow);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unusable_values() {
        let mut cfg = Config::default();
        cfg.size = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::EmptySwarm));

        let mut cfg = Config::default();
        cfg.fps = -1.0;
        assert_eq!(cfg.validate(), Err(ConfigError::FrameRate(-1.0)));

        let mut cfg = Config::default();
        cfg.fps = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::FrameRate(0.0)));

        let mut cfg = Config::default();
        cfg.easing = f32::INFINITY;
        assert_eq!(cfg.validate(), Err(ConfigError::Easing(f32::INFINITY)));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{ "size": 64, "boundary": "unbounded", "pointer": "click" }"#)
                .unwrap();
        assert_eq!(cfg.size, 64);
        assert_eq!(cfg.boundary, Boundary::Unbounded);
        assert_eq!(cfg.pointer, PointerMode::Click);
        assert_eq!(cfg.easing, DEFAULT_EASING);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn scene_targets_surface_centre() {
        let scene = Scene::new(SurfaceSize::new(200.0, 100.0), &Config::default());
        assert_eq!(scene.target, Vector2D::new(100.0, 50.0));
        assert!(scene.attraction);
        assert_eq!(scene.easing, DEFAULT_EASING);
    }
}
