//! Terrain the top-level population moves through.

use crate::motion::Habitat;
use alife_core::{Force, TerrainConfig, Vector, WorldConfig};

/// Terrain friction is a multiplier on velocity: 0 stops a body, 1 is frictionless.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    size: Vector,
    kind: TerrainConfig,
}

impl Terrain {
    pub fn from_config(config: &WorldConfig) -> Self {
        Self {
            size: Vector::new(config.width, config.height),
            kind: config.terrain.clone(),
        }
    }

    pub fn fricted(size: Vector, friction: f64) -> Self {
        Self {
            size,
            kind: TerrainConfig::Fricted { friction },
        }
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    pub fn kind(&self) -> &TerrainConfig {
        &self.kind
    }

    pub fn friction_at(&self, position: Vector) -> f64 {
        match &self.kind {
            TerrainConfig::Fricted { friction } => *friction,
            TerrainConfig::Vanilla {
                friction,
                immobilized_width,
                ..
            } => {
                let width = *immobilized_width;
                if width <= 0.0 {
                    return *friction;
                }
                if position.x < width {
                    return (position.x / width).max(0.0);
                }
                if position.x > self.size.x - width {
                    return ((self.size.x - position.x) / width).max(0.0);
                }
                if position.y < width {
                    return (position.y / width).max(0.0);
                }
                if position.y > self.size.y - width {
                    return ((self.size.y - position.y) / width).max(0.0);
                }
                *friction
            }
            TerrainConfig::Gravitational {
                center,
                gravity,
                atmosphere_enabled,
            } => {
                if !atmosphere_enabled {
                    return 1.0;
                }
                let atmosphere_height = gravity / 2.0;
                let distance = center.dist(&position).max(0.1);
                if distance > atmosphere_height {
                    return 1.0;
                }
                1.0 - ((distance - atmosphere_height) / atmosphere_height).powi(12)
            }
        }
    }

    pub fn force_at(&self, position: Vector) -> Force {
        match &self.kind {
            TerrainConfig::Fricted { .. } => Force::zero(),
            TerrainConfig::Vanilla {
                gravity_center: Some(center),
                gravity,
                ..
            } => gravity_toward(*center, *gravity, position),
            TerrainConfig::Vanilla { .. } => Force::zero(),
            TerrainConfig::Gravitational { center, gravity, .. } => {
                gravity_toward(*center, *gravity, position)
            }
        }
    }
}

/// Inverse-square pull with the distance floored at a tenth of the gravity,
/// so a body sitting on the center is not flung away.
fn gravity_toward(center: Vector, gravity: f64, position: Vector) -> Force {
    if gravity <= 0.0 {
        return Force::zero();
    }
    let distance = center.dist(&position).max(gravity / 10.0);
    let magnitude = gravity / (distance * distance);
    Force::new((center - position).sized(magnitude))
}

impl Habitat for Terrain {
    fn center(&self) -> Vector {
        self.size.mult(0.5)
    }

    fn diameter(&self) -> f64 {
        self.size.x.min(self.size.y)
    }

    fn friction_at(&self, position: Vector) -> f64 {
        Terrain::friction_at(self, position)
    }

    fn force_at(&self, position: Vector) -> Force {
        Terrain::force_at(self, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vanilla(gravity_center: Option<Vector>) -> Terrain {
        Terrain::from_config(&WorldConfig {
            width: 100.0,
            height: 100.0,
            terrain: TerrainConfig::Vanilla {
                gravity_center,
                gravity: 50.0,
                friction: 0.9,
                immobilized_width: 10.0,
            },
        })
    }

    #[test]
    fn test_fricted_terrain() {
        let terrain = Terrain::fricted(Vector::new(200.0, 100.0), 0.85);
        assert_eq!(terrain.friction_at(Vector::new(3.0, 3.0)), 0.85);
        assert_eq!(terrain.force_at(Vector::new(3.0, 3.0)), Force::zero());
        assert_eq!(terrain.center(), Vector::new(100.0, 50.0));
        assert_eq!(terrain.diameter(), 100.0);
    }

    #[test]
    fn test_vanilla_border_friction() {
        let terrain = vanilla(None);
        assert_eq!(terrain.friction_at(Vector::new(50.0, 50.0)), 0.9);
        assert_eq!(terrain.friction_at(Vector::new(5.0, 50.0)), 0.5);
        assert_eq!(terrain.friction_at(Vector::new(98.0, 50.0)), 0.2);
        assert_eq!(terrain.friction_at(Vector::new(50.0, 0.0)), 0.0);
        assert_eq!(terrain.force_at(Vector::new(20.0, 20.0)), Force::zero());
    }

    #[test]
    fn test_gravity_points_at_center() {
        let terrain = vanilla(Some(Vector::new(50.0, 50.0)));
        let force = terrain.force_at(Vector::new(60.0, 50.0)).vector();
        assert!(force.x < 0.0);
        assert!(force.y.abs() < 1e-12);
        assert!((force.magnitude() - 50.0 / 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_gravity_distance_is_floored() {
        let terrain = vanilla(Some(Vector::new(50.0, 50.0)));
        // Floor is gravity / 10 = 5
        let near = terrain.force_at(Vector::new(50.5, 50.0)).vector();
        assert!((near.magnitude() - 50.0 / 25.0).abs() < 1e-12);
        assert!(near.magnitude().is_finite());

        let on_center = terrain.force_at(Vector::new(50.0, 50.0));
        assert_eq!(on_center, Force::zero());
    }

    #[test]
    fn test_gravitational_atmosphere() {
        let terrain = Terrain::from_config(&WorldConfig {
            width: 400.0,
            height: 400.0,
            terrain: TerrainConfig::Gravitational {
                center: Vector::new(200.0, 200.0),
                gravity: 100.0,
                atmosphere_enabled: true,
            },
        });
        assert_eq!(terrain.friction_at(Vector::new(300.0, 200.0)), 1.0);
        let inside = terrain.friction_at(Vector::new(225.0, 200.0));
        assert!(inside < 1.0);
        assert!(inside > 0.0);
    }
}
