//! Colonies: lives made of other lives.
//!
//! A colony runs the same population step as the world over its members,
//! inside its own disc. Member positions are relative to the colony center.
//! From the outside a colony looks like a single predator whose size and
//! gene are derived from its members.

use crate::life::{jitter, Body, Life};
use crate::motion::{self, Interior};
use crate::population::{self, Scope};
use alife_core::{Force, Gene, Vector};
use rand::Rng;
use tracing::trace;

/// Size of a colony with no members
pub const EMPTY_COLONY_SIZE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Colony {
    body: Body,
    members: Vec<Life>,
    gene: Gene,
}

impl Colony {
    /// Wrap `members`, whose positions must already be relative to the colony.
    /// The mass is the members' total at this point and is not updated later.
    pub fn new(position: Vector, members: Vec<Life>) -> Self {
        let mass = members.iter().map(Life::mass).sum();
        let mut colony = Self {
            body: Body::new(position, EMPTY_COLONY_SIZE, mass),
            members,
            gene: Gene::empty(),
        };
        colony.refresh();
        colony
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn members(&self) -> &[Life] {
        &self.members
    }

    pub fn gene(&self) -> Gene {
        self.gene
    }

    pub fn is_alive(&self) -> bool {
        self.members.iter().any(Life::is_alive)
    }

    /// Energy held by all members, recursively
    pub fn contained_energy(&self) -> f64 {
        self.members.iter().map(Life::total_energy).sum()
    }

    fn interior(&self) -> Interior {
        Interior::new(self.body.size())
    }

    /// Recompute size and gene from the current members
    fn refresh(&mut self) {
        let size = if self.members.is_empty() {
            EMPTY_COLONY_SIZE
        } else {
            let squares: f64 = self.members.iter().map(|life| life.size() * life.size()).sum();
            (squares * 6.0).sqrt()
        };
        self.body.set_size(size);

        self.gene = self
            .members
            .first()
            .map(|life| life.gene().copy())
            .unwrap_or_else(Gene::empty);
    }

    /// Step every member once, then drift. A colony with no living member
    /// falls apart and releases its members into the parent scope.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (Force, Vec<Life>) {
        if !self.is_alive() {
            return (Force::zero(), self.eaten());
        }

        let interior = self.interior();
        let outcome = population::advance(&mut self.members, &interior, Scope::Colony, rng);
        self.refresh();

        trace!(
            event = "colony_step",
            colony_id = %self.body.id,
            members = self.members.len(),
            births = outcome.births,
            predations = outcome.predations,
            "Colony advanced"
        );

        (jitter(rng), Vec::new())
    }

    /// Absorb `prey` as a new member
    pub fn eat(&mut self, mut prey: Life) -> Vec<Life> {
        let local = prey.position() - self.body.position;
        let (position, velocity) = motion::confine(
            &self.interior(),
            local,
            prey.velocity(),
            Force::zero(),
            prey.mass(),
            prey.size(),
        );
        prey.set_motion(position, velocity);

        trace!(
            event = "absorption",
            colony_id = %self.body.id,
            prey_id = %prey.id(),
            "Colony absorbed a life"
        );

        self.members.push(prey);
        self.refresh();
        Vec::new()
    }

    /// Release every member into the parent's frame, leaving the colony empty
    pub fn eaten(&mut self) -> Vec<Life> {
        let origin = self.body.position;
        let mut released = std::mem::take(&mut self.members);
        for life in &mut released {
            let body = life.body_mut();
            body.position = body.position + origin;
        }
        self.refresh();
        released
    }
}
