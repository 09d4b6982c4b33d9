//! Genetic trait carried by every edible life.
//!
//! A gene is a 24-bit code. The upper half is the feeding pattern, the lower
//! half the surface pattern other lives see. A predator may eat a prey when
//! its feeding pattern is close enough to the prey's surface pattern.

use crate::types::Color;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bits in a gene code
pub const GENE_BITS: u32 = 24;

const HALF_BITS: u32 = GENE_BITS / 2;
const HALF_MASK: u32 = (1 << HALF_BITS) - 1;
const CODE_MASK: u32 = (1 << GENE_BITS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gene {
    code: Option<u32>,
}

impl Gene {
    pub fn new(code: u32) -> Self {
        Self {
            code: Some(code & CODE_MASK),
        }
    }

    /// Gene of lives with no genetic identity
    pub fn empty() -> Self {
        Self { code: None }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(0..=CODE_MASK))
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_none()
    }

    pub fn code(&self) -> Option<u32> {
        self.code
    }

    pub fn feeding(&self) -> Option<u32> {
        self.code.map(|code| (code >> HALF_BITS) & HALF_MASK)
    }

    pub fn surface(&self) -> Option<u32> {
        self.code.map(|code| code & HALF_MASK)
    }

    /// Fraction of matching bits between this gene's feeding pattern and
    /// `other`'s surface pattern, in [0, 1]
    pub fn similarity_to(&self, other: &Gene) -> Option<f64> {
        let feeding = self.feeding()?;
        let surface = other.surface()?;
        let differing = (feeding ^ surface).count_ones();
        Some(1.0 - differing as f64 / HALF_BITS as f64)
    }

    /// Predation test. Empty genes neither eat nor get eaten.
    pub fn can_eat(&self, other: &Gene, threshold: f64) -> bool {
        self.similarity_to(other)
            .map(|similarity| similarity >= threshold)
            .unwrap_or(false)
    }

    pub fn copy(&self) -> Self {
        *self
    }

    /// Copy with one uniformly chosen bit flipped
    pub fn mutated<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        match self.code {
            Some(code) => Self::new(code ^ (1 << rng.gen_range(0..GENE_BITS))),
            None => Self::empty(),
        }
    }

    pub fn color(&self) -> Color {
        match self.code {
            Some(code) => Color::new(
                ((code >> 16) & 0xFF) as u8,
                ((code >> 8) & 0xFF) as u8,
                (code & 0xFF) as u8,
            ),
            None => Color::grey(),
        }
    }
}

impl Default for Gene {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{:06x}", code),
            None => write!(f, "empty"),
        }
    }
}
