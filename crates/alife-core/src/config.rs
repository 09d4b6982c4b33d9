//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Vector;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Terrain the top-level population moves through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainConfig {
    /// Uniform friction, no force field
    Fricted { friction: f64 },
    /// Friction that drops to zero near the walls, optional point gravity
    Vanilla {
        gravity_center: Option<Vector>,
        gravity: f64,
        friction: f64,
        immobilized_width: f64,
    },
    /// Point gravity with a frictional atmosphere around the center
    Gravitational {
        center: Vector,
        gravity: f64,
        atmosphere_enabled: bool,
    },
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig::Fricted { friction: 0.85 }
    }
}

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the arena
    pub width: f64,
    /// Height of the arena
    pub height: f64,
    pub terrain: TerrainConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            terrain: TerrainConfig::default(),
        }
    }
}

/// Body and energy parameters for seeded lives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    /// Diameter of foragers; its square is the reproduction cost
    pub forager_size: f64,
    /// Starting energy for seeded foragers
    pub initial_energy: f64,
    /// Probability that an offspring's gene is mutated (0.0 to 1.0)
    pub mutation_rate: f64,
    pub resource_size: f64,
    /// Energy a predator gains from eating a resource
    pub resource_energy: f64,
    pub decoration_size: f64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            forager_size: 10.0,
            initial_energy: 150.0,
            mutation_rate: 0.05,
            resource_size: 4.0,
            resource_energy: 30.0,
            decoration_size: 30.0,
        }
    }
}

/// How many lives of each kind to place at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    pub foragers: usize,
    pub resources: usize,
    pub decorations: usize,
    /// Starter colonies, each wrapping `colony_members` foragers
    pub colonies: usize,
    pub colony_members: usize,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            foragers: 100,
            resources: 300,
            decorations: 10,
            colonies: 5,
            colony_members: 4,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to run the simulation
    pub num_ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Ticks between population reports
    pub report_interval: u64,
    pub world: WorldConfig,
    pub life: LifeConfig,
    pub seeding: SeedingConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ticks: 10_000,
            seed: 0,
            report_interval: 100,
            world: WorldConfig::default(),
            life: LifeConfig::default(),
            seeding: SeedingConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Load and validate a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_interval == 0 {
            return Err(Error::Validation("report_interval must be positive".to_string()));
        }

        let world = &self.world;
        positive("world.width", world.width)?;
        positive("world.height", world.height)?;

        match &world.terrain {
            TerrainConfig::Fricted { friction } => unit_interval("terrain.friction", *friction)?,
            TerrainConfig::Vanilla {
                gravity,
                friction,
                immobilized_width,
                ..
            } => {
                unit_interval("terrain.friction", *friction)?;
                non_negative("terrain.gravity", *gravity)?;
                non_negative("terrain.immobilized_width", *immobilized_width)?;
                if *immobilized_width * 2.0 >= world.width.min(world.height) {
                    return Err(Error::Validation(format!(
                        "terrain.immobilized_width {} leaves no free space in a {}x{} world",
                        immobilized_width, world.width, world.height
                    )));
                }
            }
            TerrainConfig::Gravitational { gravity, .. } => {
                positive("terrain.gravity", *gravity)?;
            }
        }

        let life = &self.life;
        positive("life.forager_size", life.forager_size)?;
        positive("life.resource_size", life.resource_size)?;
        positive("life.decoration_size", life.decoration_size)?;
        non_negative("life.initial_energy", life.initial_energy)?;
        non_negative("life.resource_energy", life.resource_energy)?;
        unit_interval("life.mutation_rate", life.mutation_rate)?;

        if self.seeding.colonies > 0 && self.seeding.colony_members == 0 {
            return Err(Error::Validation(
                "seeding.colony_members must be positive when colonies are seeded".to_string(),
            ));
        }

        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(format!("{} must be positive ({} given)", name, value)))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(format!("{} must not be negative ({} given)", name, value)))
    }
}

fn unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Validation(format!("{} should be between 0-1 ({} given)", name, value)))
    }
}
