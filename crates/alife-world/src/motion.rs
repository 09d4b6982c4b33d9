//! Bounded motion inside a circular habitat.

use alife_core::{Force, Vector};

/// Velocity damping applied to lives moving inside a colony
pub const INTERIOR_FRICTION: f64 = 0.85;

/// A circular container a population lives in
pub trait Habitat {
    fn center(&self) -> Vector;

    fn diameter(&self) -> f64;

    fn friction_at(&self, position: Vector) -> f64;

    fn force_at(&self, position: Vector) -> Force;
}

/// The inside of a colony. Member positions are relative to the colony, so
/// the interior is centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interior {
    diameter: f64,
}

impl Interior {
    pub fn new(diameter: f64) -> Self {
        Self { diameter }
    }
}

impl Habitat for Interior {
    fn center(&self) -> Vector {
        Vector::zero()
    }

    fn diameter(&self) -> f64 {
        self.diameter
    }

    fn friction_at(&self, _position: Vector) -> f64 {
        INTERIOR_FRICTION
    }

    fn force_at(&self, _position: Vector) -> Force {
        Force::zero()
    }
}

/// Advance a body by one tick and keep it inside `habitat`.
///
/// Returns the new position and velocity. A body whose next position would
/// leave the habitat is stopped on the wall: it sits exactly at the allowed
/// radius and its velocity is zeroed.
pub fn confine<H: Habitat + ?Sized>(
    habitat: &H,
    position: Vector,
    velocity: Vector,
    force: Force,
    mass: f64,
    size: f64,
) -> (Vector, Vector) {
    let acceleration = force.acceleration_to(mass);
    let friction = habitat.friction_at(position);

    let center = habitat.center();
    let radius = ((habitat.diameter() - size) / 2.0).max(0.0);
    let offset = position + velocity - center;

    if offset.magnitude() > radius {
        (center + offset.sized(radius), Vector::zero())
    } else {
        (center + offset, velocity.mult(friction) + acceleration)
    }
}
