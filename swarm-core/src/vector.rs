//! Two-component vector with in-place, chainable arithmetic.
//!
//! [`Vector2D`] mirrors the small fluent API the particles are written
//! against: every arithmetic method mutates the receiver and hands back
//! `&mut Self`, and accepts either another vector (component-wise) or a
//! scalar (applied to both components) through [`Operand`].
//!
//! Plain arithmetic follows IEEE float semantics, so dividing by zero yields
//! infinities or NaN. [`Vector2D::checked_divide`] is the failing variant.

use crate::{
    error::{Result, SimError},
    surface::SurfaceSize,
};
use glam::Vec2;
use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

/// Right-hand side of a vector operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    Vector(Vector2D),
    Scalar(f32),
}

impl Operand {
    #[inline]
    fn components(self) -> (f32, f32) {
        match self {
            Operand::Vector(v) => (v.x, v.y),
            Operand::Scalar(s) => (s, s),
        }
    }
}

impl From<Vector2D> for Operand {
    fn from(v: Vector2D) -> Self {
        Operand::Vector(v)
    }
}

impl From<&Vector2D> for Operand {
    fn from(v: &Vector2D) -> Self {
        Operand::Vector(*v)
    }
}

impl From<f32> for Operand {
    fn from(s: f32) -> Self {
        Operand::Scalar(s)
    }
}

impl Vector2D {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn add(&mut self, rhs: impl Into<Operand>) -> &mut Self {
        let (x, y) = rhs.into().components();
        self.x += x;
        self.y += y;
        self
    }

    #[inline]
    pub fn subtract(&mut self, rhs: impl Into<Operand>) -> &mut Self {
        let (x, y) = rhs.into().components();
        self.x -= x;
        self.y -= y;
        self
    }

    #[inline]
    pub fn multiply(&mut self, rhs: impl Into<Operand>) -> &mut Self {
        let (x, y) = rhs.into().components();
        self.x *= x;
        self.y *= y;
        self
    }

    /// Divides in place. A zero divisor produces infinities or NaN.
    #[inline]
    pub fn divide(&mut self, rhs: impl Into<Operand>) -> &mut Self {
        let (x, y) = rhs.into().components();
        self.x /= x;
        self.y /= y;
        self
    }

    /// Divides in place, refusing any zero divisor component.
    ///
    /// The receiver is left untouched when an error is returned.
    ///
    /// ### Errors
    /// [`SimError::DivisionByZero`] if either divisor component is zero.
    pub fn checked_divide(&mut self, rhs: impl Into<Operand>) -> Result<&mut Self> {
        let rhs = rhs.into();
        let (x, y) = rhs.components();
        if x == 0.0 || y == 0.0 {
            return Err(SimError::DivisionByZero);
        }
        Ok(self.divide(rhs))
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: Vector2D) -> f32 {
        Vec2::from(*self).distance(Vec2::from(other))
    }

    /// Euclidean distance to an arbitrary operand.
    ///
    /// Distance is only defined between two points, so a scalar operand is
    /// rejected.
    ///
    /// ### Errors
    /// [`SimError::InvalidArgument`] if `other` is a scalar.
    pub fn distance_to(&self, other: impl Into<Operand>) -> Result<f32> {
        match other.into() {
            Operand::Vector(v) => Ok(self.distance(v)),
            Operand::Scalar(_) => Err(SimError::InvalidArgument(
                "distance requires a vector operand",
            )),
        }
    }

    /// Sets both components to uniform random values in `[0, 1)`.
    ///
    /// When `bounds` is given, `x` is scaled by `width / 10` and `y` by
    /// `height / 10`.
    ///
    /// ### Parameters
    /// - `rng` - Random source; pass a seeded generator for reproducible runs.
    /// - `bounds` - Optional surface dimensions used for scaling.
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bounds: Option<SurfaceSize>,
    ) -> &mut Self {
        let (sx, sy) = bounds.map_or((1.0, 1.0), |b| (b.width / 10.0, b.height / 10.0));
        self.x = rng.random::<f32>() * sx;
        self.y = rng.random::<f32>() * sy;
        self
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<Vec2> for Vector2D {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector2D> for Vec2 {
    fn from(v: Vector2D) -> Self {
        Vec2::new(v.x, v.y)
    }
}
