//! The per-tick population step shared by the world and every colony.

use crate::life::{predation_threshold, Life};
use crate::motion::{self, Habitat};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use tracing::{debug, trace};

/// Where a population lives. Only the world evicts its dead; a colony keeps
/// dead members, since they decide whether the colony itself is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    World,
    Colony,
}

/// What happened to a population during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub births: usize,
    pub predations: usize,
    pub evictions: usize,
    /// Lives freed from eaten or collapsed colonies
    pub released: usize,
}

impl AddAssign for TickOutcome {
    fn add_assign(&mut self, rhs: TickOutcome) {
        self.births += rhs.births;
        self.predations += rhs.predations;
        self.evictions += rhs.evictions;
        self.released += rhs.released;
    }
}

/// Advance `lives` by one tick inside `habitat`.
///
/// Lives are visited in index order and mutated in place, so a life sees the
/// effects of every life before it. A living life moves under its own force
/// plus the habitat's; a predator then scans the lives after it and eats the
/// first one it collides with and can eat. Eaten lives are gone for the rest
/// of the tick. Spawned and released lives are appended at the end.
pub fn advance<H, R>(lives: &mut Vec<Life>, habitat: &H, scope: Scope, rng: &mut R) -> TickOutcome
where
    H: Habitat + ?Sized,
    R: Rng + ?Sized,
{
    let mut outcome = TickOutcome::default();
    let mut slots: Vec<Option<Life>> = lives.drain(..).map(Some).collect();
    let mut additions: Vec<Life> = Vec::new();

    for i in 0..slots.len() {
        let evictable = match &slots[i] {
            Some(life) => life.is_evictable(),
            None => continue,
        };

        if scope == Scope::World && evictable {
            if let Some(mut dead) = slots[i].take() {
                let remains = dead.eaten();
                debug!(
                    event = "eviction",
                    life_id = %dead.id(),
                    kind = ?dead.kind(),
                    released = remains.len(),
                    "Dead life evicted"
                );
                outcome.evictions += 1;
                outcome.released += remains.len();
                additions.extend(remains);
            }
            continue;
        }

        let Some(life) = slots[i].as_mut() else {
            continue;
        };
        if !life.is_alive() {
            continue;
        }

        let (force, offspring) = life.next(rng);
        let force = force + habitat.force_at(life.position());
        let (position, velocity) = motion::confine(
            habitat,
            life.position(),
            life.velocity(),
            force,
            life.mass(),
            life.size(),
        );
        life.set_motion(position, velocity);

        outcome.births += offspring.len();
        additions.extend(offspring);

        if !life.is_predator() {
            continue;
        }

        let threshold = predation_threshold(rng);
        for j in (i + 1)..slots.len() {
            let catchable = match (&slots[i], &slots[j]) {
                (Some(predator), Some(prey)) => {
                    prey.is_edible()
                        && predator.is_colliding_with(prey)
                        && predator.gene().can_eat(&prey.gene(), threshold)
                }
                _ => false,
            };
            if !catchable {
                continue;
            }

            let Some(prey) = slots[j].take() else {
                continue;
            };
            let Some(predator) = slots[i].as_mut() else {
                break;
            };

            let prey_id = prey.id();
            let prey_kind = prey.kind();
            let remains = predator.eat(prey);
            trace!(
                event = "predation",
                predator_id = %predator.id(),
                predator_kind = ?predator.kind(),
                prey_id = %prey_id,
                prey_kind = ?prey_kind,
                threshold = threshold,
                released = remains.len(),
                "Predation"
            );

            outcome.predations += 1;
            outcome.released += remains.len();
            additions.extend(remains);
            break;
        }
    }

    lives.extend(slots.into_iter().flatten());
    lives.extend(additions);
    outcome
}
