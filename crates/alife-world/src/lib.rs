//! World simulation engine.
//!
//! This module implements the circular arena where decorations, resources,
//! foragers and colonies move, eat and reproduce. Colonies run the same
//! population step over their own members.

pub mod colony;
pub mod life;
pub mod motion;
pub mod population;
pub mod simulation;
pub mod terrain;

pub use colony::Colony;
pub use life::{Body, Decoration, Forager, Life, LifeData, LifeKind, Resource};
pub use motion::{Habitat, Interior};
pub use population::{Scope, TickOutcome};
pub use simulation::{Census, Simulation, SimulationResult};
pub use terrain::Terrain;
