//! Error types for the swarm simulation.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised by the simulation core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// An operand or value the operation cannot work with.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A checked division hit a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Rejected configuration. Raised before any timer is started.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// A particle ended up with geometry the surface cannot draw.
    #[error("non-finite geometry at ({x}, {y}) with radius {radius}")]
    NonFiniteGeometry { x: f32, y: f32, radius: f32 },
}

/// Configuration problems detected by [`crate::config::Config::validate`]
/// and by the swarm / loop entry points.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("swarm size must be at least 1")]
    EmptySwarm,
    #[error("frame rate {0} must be finite and greater than zero")]
    FrameRate(f32),
    #[error("easing {0} must be finite")]
    Easing(f32),
}
