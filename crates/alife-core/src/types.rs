//! Core type definitions for the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use uuid::Uuid;

/// Unique identifier for a life, used to correlate log events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LifeId(pub Uuid);

impl LifeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Random v4 id drawn from `rng`, so seeded runs repeat their ids
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl Default for LifeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LifeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D point or direction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn dist(&self, other: &Vector) -> f64 {
        (*self - *other).magnitude()
    }

    pub fn mult(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Same direction with the given length. A negative length flips the
    /// direction; the zero vector has no direction and stays zero.
    pub fn sized(&self, magnitude: f64) -> Self {
        let current = self.magnitude();
        if current == 0.0 {
            return Self::zero();
        }
        self.mult(magnitude / current)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;

    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        self.mult(rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A force applied to a body for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Force(pub Vector);

impl Force {
    pub fn new(vector: Vector) -> Self {
        Self(vector)
    }

    pub fn zero() -> Self {
        Self(Vector::zero())
    }

    pub fn vector(&self) -> Vector {
        self.0
    }

    /// Acceleration this force gives a body of `mass`
    pub fn acceleration_to(&self, mass: f64) -> Vector {
        if mass <= 0.0 {
            return Vector::zero();
        }
        self.0.mult(1.0 / mass)
    }

    /// Kinetic energy a body of `mass` gains from this force over one tick
    pub fn consumed_energy_with(&self, mass: f64) -> f64 {
        if mass <= 0.0 {
            return 0.0;
        }
        let magnitude = self.0.magnitude();
        magnitude * magnitude / (2.0 * mass)
    }
}

impl Add for Force {
    type Output = Force;

    fn add(self, rhs: Force) -> Force {
        Force(self.0 + rhs.0)
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn grey() -> Self {
        Self::new(0x80, 0x80, 0x80)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_life_id_from_seeded_rng() {
        let mut a = ChaCha8Rng::seed_from_u64(17);
        let mut b = ChaCha8Rng::seed_from_u64(17);

        let first = LifeId::from_rng(&mut a);
        assert_eq!(first, LifeId::from_rng(&mut b));
        assert_ne!(first, LifeId::from_rng(&mut a));
        assert_eq!(first.0.get_version_num(), 4);
    }

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(3.0, -1.0);
        assert_eq!(a + b, Vector::new(4.0, 1.0));
        assert_eq!(a - b, Vector::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vector::new(2.0, 4.0));
        assert_eq!(-a, Vector::new(-1.0, -2.0));
    }

    #[test]
    fn test_vector_distance() {
        let a = Vector::new(0.0, 0.0);
        let b = Vector::new(3.0, 4.0);
        assert_eq!(a.dist(&b), 5.0);
        assert_eq!(b.magnitude(), 5.0);
    }

    #[test]
    fn test_vector_sized() {
        let v = Vector::new(3.0, 4.0).sized(10.0);
        assert!((v.x - 6.0).abs() < 1e-12);
        assert!((v.y - 8.0).abs() < 1e-12);

        let reversed = Vector::new(0.0, 2.0).sized(-1.0);
        assert_eq!(reversed, Vector::new(0.0, -1.0));

        // No direction to keep
        assert_eq!(Vector::zero().sized(5.0), Vector::zero());
    }

    #[test]
    fn test_force_conversion() {
        let force = Force::new(Vector::new(0.0, 1.0));
        assert_eq!(force.acceleration_to(0.5), Vector::new(0.0, 2.0));
        assert_eq!(force.consumed_energy_with(0.5), 1.0);

        assert_eq!(force.acceleration_to(0.0), Vector::zero());
        assert_eq!(force.consumed_energy_with(0.0), 0.0);
        assert_eq!(Force::zero().consumed_energy_with(1.0), 0.0);
    }

    #[test]
    fn test_color_display() {
        assert_eq!(Color::new(255, 0, 16).to_string(), "#ff0010");
    }
}
