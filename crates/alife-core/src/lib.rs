//! Core types and utilities for the artificial life simulation.

pub mod types;
pub mod config;
pub mod error;
pub mod gene;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use gene::Gene;
