//! Lives and their per-tick contract.

use crate::colony::Colony;
use alife_core::{Force, Gene, LifeId, Vector};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Half range of the random jitter force, per axis
pub const JITTER_MAX: f64 = 0.1;
/// Fraction of a force's kinetic cost a forager pays from its energy
pub const ENERGY_CONSUMPTION_RATE: f64 = 1.0 / 10.0;
/// Lower bound of the per-tick predation threshold; the upper bound is 1
pub const MIN_PREDATION_THRESHOLD: f64 = 0.9;

/// Mass per unit of squared radius for resources and foragers
const BODY_DENSITY: f64 = 0.02;
/// Mass per unit of squared radius for decorations
const DECORATION_DENSITY: f64 = 1.0 / 100.0;

/// Small random push, uniform on each axis in [-JITTER_MAX, JITTER_MAX)
pub fn jitter<R: Rng + ?Sized>(rng: &mut R) -> Force {
    Force::new(Vector::new(
        rng.gen_range(-JITTER_MAX..JITTER_MAX),
        rng.gen_range(-JITTER_MAX..JITTER_MAX),
    ))
}

/// Per-predator appetite for one tick
pub fn predation_threshold<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(MIN_PREDATION_THRESHOLD..1.0)
}

fn disc_mass(size: f64, density: f64) -> f64 {
    let radius = size / 2.0;
    radius * radius * density
}

/// Physical state shared by every life
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: LifeId,
    pub position: Vector,
    pub velocity: Vector,
    size: f64,
    mass: f64,
}

impl Body {
    pub fn new(position: Vector, size: f64, mass: f64) -> Self {
        Self {
            id: LifeId::new(),
            position,
            velocity: Vector::zero(),
            size: size.max(0.0),
            mass: mass.max(0.0),
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub(crate) fn set_size(&mut self, size: f64) {
        self.size = size.max(0.0);
    }

    /// True when the two discs overlap
    pub fn is_colliding_with(&self, other: &Body) -> bool {
        self.position.dist(&other.position) < (self.size + other.size) / 2.0
    }
}

/// Passive scenery. Never acts, never dies, cannot be eaten.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    body: Body,
}

impl Decoration {
    pub fn new(position: Vector, size: f64) -> Self {
        Self {
            body: Body::new(position, size, disc_mass(size, DECORATION_DENSITY)),
        }
    }
}

/// Immobile food with a fixed gene and energy
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    body: Body,
    gene: Gene,
    energy: f64,
}

impl Resource {
    pub fn new(position: Vector, gene: Gene, size: f64, energy: f64) -> Self {
        Self {
            body: Body::new(position, size, disc_mass(size, BODY_DENSITY)),
            gene,
            energy: energy.max(0.0),
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Consumption is flat: nothing is left behind
    pub fn eaten(&mut self) -> Vec<Life> {
        self.energy = 0.0;
        Vec::new()
    }
}

/// A mobile, energy-driven predator that reproduces by splitting
#[derive(Debug, Clone, PartialEq)]
pub struct Forager {
    body: Body,
    gene: Gene,
    energy: f64,
    mutation_rate: f64,
}

impl Forager {
    pub fn new(position: Vector, gene: Gene, size: f64, energy: f64, mutation_rate: f64) -> Self {
        Self {
            body: Body::new(position, size, disc_mass(size, BODY_DENSITY)),
            gene,
            energy: energy.max(0.0),
            mutation_rate,
        }
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn gene(&self) -> Gene {
        self.gene
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Energy spent on one split
    pub fn reproduction_cost(&self) -> f64 {
        self.body.size * self.body.size
    }

    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (Force, Vec<Life>) {
        if !self.is_alive() {
            return (Force::zero(), Vec::new());
        }

        let force = jitter(rng);
        let cost = force.consumed_energy_with(self.body.mass) * ENERGY_CONSUMPTION_RATE;
        self.energy = (self.energy - cost).max(0.0);

        let offspring = self
            .reproduce(rng)
            .map(|child| vec![Life::Forager(child)])
            .unwrap_or_default();

        (force, offspring)
    }

    /// Split once the energy exceeds twice the reproduction cost. Parent and
    /// child each keep half of what remains after paying the cost.
    pub(crate) fn reproduce<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Forager> {
        let cost = self.reproduction_cost();
        if self.energy <= cost * 2.0 {
            return None;
        }

        let energy_after = (self.energy - cost) / 2.0;
        self.energy = energy_after;

        let position = self.body.position + self.body.velocity.sized(self.body.size * -2.0);
        let gene = if rng.gen::<f64>() < self.mutation_rate {
            self.gene.mutated(rng)
        } else {
            self.gene.copy()
        };

        let mut child = Forager::new(position, gene, self.body.size, energy_after, self.mutation_rate);
        child.body.id = LifeId::from_rng(rng);
        child.body.velocity = self.body.velocity.sized(-1.0);

        trace!(
            event = "reproduction",
            parent_id = %self.body.id,
            offspring_id = %child.body.id,
            energy = energy_after,
            mutated = gene != self.gene,
            "Forager split"
        );

        Some(child)
    }

    /// Absorb the prey's energy and hand back whatever it releases
    pub fn eat(&mut self, mut prey: Life) -> Vec<Life> {
        self.energy += prey.energy();
        prey.eaten()
    }

    pub fn eaten(&mut self) -> Vec<Life> {
        self.energy = 0.0;
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeKind {
    Decoration,
    Resource,
    Forager,
    Colony,
}

/// Any simulated life
#[derive(Debug, Clone, PartialEq)]
pub enum Life {
    Decoration(Decoration),
    Resource(Resource),
    Forager(Forager),
    Colony(Colony),
}

impl Life {
    pub fn kind(&self) -> LifeKind {
        match self {
            Life::Decoration(_) => LifeKind::Decoration,
            Life::Resource(_) => LifeKind::Resource,
            Life::Forager(_) => LifeKind::Forager,
            Life::Colony(_) => LifeKind::Colony,
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            Life::Decoration(life) => &life.body,
            Life::Resource(life) => &life.body,
            Life::Forager(life) => &life.body,
            Life::Colony(life) => life.body(),
        }
    }

    pub fn body_mut(&mut self) -> &mut Body {
        match self {
            Life::Decoration(life) => &mut life.body,
            Life::Resource(life) => &mut life.body,
            Life::Forager(life) => &mut life.body,
            Life::Colony(life) => life.body_mut(),
        }
    }

    pub fn id(&self) -> LifeId {
        self.body().id
    }

    pub fn position(&self) -> Vector {
        self.body().position
    }

    pub fn velocity(&self) -> Vector {
        self.body().velocity
    }

    pub fn set_motion(&mut self, position: Vector, velocity: Vector) {
        let body = self.body_mut();
        body.position = position;
        body.velocity = velocity;
    }

    pub fn size(&self) -> f64 {
        self.body().size()
    }

    pub fn mass(&self) -> f64 {
        self.body().mass()
    }

    pub fn gene(&self) -> Gene {
        match self {
            Life::Decoration(_) => Gene::empty(),
            Life::Resource(life) => life.gene,
            Life::Forager(life) => life.gene,
            Life::Colony(life) => life.gene(),
        }
    }

    /// Energy this life hands to a predator. A colony keeps none of its own;
    /// its members carry it.
    pub fn energy(&self) -> f64 {
        match self {
            Life::Resource(life) => life.energy,
            Life::Forager(life) => life.energy,
            Life::Decoration(_) | Life::Colony(_) => 0.0,
        }
    }

    /// Energy held by this life and everything nested inside it
    pub fn total_energy(&self) -> f64 {
        match self {
            Life::Colony(colony) => colony.contained_energy(),
            other => other.energy(),
        }
    }

    /// Whether this life acts on its own. Resources never do.
    pub fn is_alive(&self) -> bool {
        match self {
            Life::Decoration(_) => true,
            Life::Resource(_) => false,
            Life::Forager(life) => life.is_alive(),
            Life::Colony(life) => life.is_alive(),
        }
    }

    /// Lives that may start a predation
    pub fn is_predator(&self) -> bool {
        matches!(self, Life::Forager(_) | Life::Colony(_))
    }

    pub fn is_edible(&self) -> bool {
        !matches!(self, Life::Decoration(_))
    }

    /// Dead lives a top-level driver removes from its population
    pub fn is_evictable(&self) -> bool {
        match self {
            Life::Forager(life) => !life.is_alive(),
            Life::Colony(life) => !life.is_alive(),
            Life::Decoration(_) | Life::Resource(_) => false,
        }
    }

    pub fn is_colliding_with(&self, other: &Life) -> bool {
        self.body().is_colliding_with(other.body())
    }

    /// Propose this tick's force and any newly spawned lives
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (Force, Vec<Life>) {
        match self {
            Life::Decoration(_) | Life::Resource(_) => (Force::zero(), Vec::new()),
            Life::Forager(life) => life.next(rng),
            Life::Colony(life) => life.next(rng),
        }
    }

    /// Consume `prey`. Returns lives released by the prey that rejoin the
    /// caller's population. Lives that cannot eat hand the prey back.
    pub fn eat(&mut self, prey: Life) -> Vec<Life> {
        match self {
            Life::Forager(life) => life.eat(prey),
            Life::Colony(life) => life.eat(prey),
            Life::Decoration(_) | Life::Resource(_) => vec![prey],
        }
    }

    /// Mark this life consumed and release whatever it contained
    pub fn eaten(&mut self) -> Vec<Life> {
        match self {
            Life::Decoration(_) => Vec::new(),
            Life::Resource(life) => life.eaten(),
            Life::Forager(life) => life.eaten(),
            Life::Colony(life) => life.eaten(),
        }
    }
}

impl From<Decoration> for Life {
    fn from(life: Decoration) -> Self {
        Life::Decoration(life)
    }
}

impl From<Resource> for Life {
    fn from(life: Resource) -> Self {
        Life::Resource(life)
    }
}

impl From<Forager> for Life {
    fn from(life: Forager) -> Self {
        Life::Forager(life)
    }
}

impl From<Colony> for Life {
    fn from(life: Colony) -> Self {
        Life::Colony(life)
    }
}

/// Serializable view of a life and, for colonies, its members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeData {
    pub id: LifeId,
    pub kind: LifeKind,
    pub position: Vector,
    pub velocity: Vector,
    pub size: f64,
    pub mass: f64,
    pub energy: f64,
    pub gene: Gene,
    pub alive: bool,
    pub members: Vec<LifeData>,
}

impl From<&Life> for LifeData {
    fn from(life: &Life) -> Self {
        let members = match life {
            Life::Colony(colony) => colony.members().iter().map(LifeData::from).collect(),
            _ => Vec::new(),
        };

        Self {
            id: life.id(),
            kind: life.kind(),
            position: life.position(),
            velocity: life.velocity(),
            size: life.size(),
            mass: life.mass(),
            energy: life.total_energy(),
            gene: life.gene(),
            alive: life.is_alive(),
            members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn forager(energy: f64) -> Forager {
        Forager::new(Vector::new(0.0, 0.0), Gene::new(0xABC_123), 10.0, energy, 0.0)
    }

    #[test]
    fn test_masses_follow_size() {
        assert_eq!(Forager::new(Vector::zero(), Gene::empty(), 10.0, 1.0, 0.0).body.mass(), 0.5);
        assert_eq!(Resource::new(Vector::zero(), Gene::empty(), 10.0, 1.0).body.mass(), 0.5);
        assert_eq!(Decoration::new(Vector::zero(), 20.0).body.mass(), 1.0);
    }

    #[test]
    fn test_decoration_is_inert() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut life = Life::from(Decoration::new(Vector::new(5.0, 5.0), 3.0));

        let (force, offspring) = life.next(&mut rng);
        assert_eq!(force, Force::zero());
        assert!(offspring.is_empty());
        assert!(life.is_alive());
        assert!(!life.is_edible());
        assert!(!life.is_evictable());
        assert!(life.gene().is_empty());
        assert_eq!(life.energy(), 0.0);
    }

    #[test]
    fn test_resource_contract() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut life = Life::from(Resource::new(Vector::zero(), Gene::new(1), 4.0, 50.0));

        assert!(!life.is_alive());
        assert!(!life.is_evictable());
        assert!(!life.is_predator());
        assert_eq!(life.next(&mut rng), (Force::zero(), Vec::new()));
        assert_eq!(life.energy(), 50.0);

        assert!(life.eaten().is_empty());
        assert_eq!(life.energy(), 0.0);

        // Idempotent after the first call
        assert!(life.eaten().is_empty());
        assert_eq!(life.energy(), 0.0);
    }

    #[test]
    fn test_dead_forager_does_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut dead = forager(0.0);
        assert!(!dead.is_alive());

        let (force, offspring) = dead.next(&mut rng);
        assert_eq!(force, Force::zero());
        assert!(offspring.is_empty());
        assert_eq!(dead.energy(), 0.0);
        assert!(Life::from(dead).is_evictable());
    }

    #[test]
    fn test_forager_pays_for_movement() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut life = forager(150.0);

        let (force, offspring) = life.next(&mut rng);
        assert!(offspring.is_empty());
        assert!(force.vector().x.abs() <= JITTER_MAX);
        assert!(force.vector().y.abs() <= JITTER_MAX);

        let expected = 150.0 - force.consumed_energy_with(0.5) * ENERGY_CONSUMPTION_RATE;
        assert!((life.energy() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_forager_energy_is_floored_at_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut life = forager(1e-9);
        for _ in 0..100 {
            life.next(&mut rng);
        }
        assert!(life.energy() >= 0.0);
    }

    #[test]
    fn test_rich_forager_splits_in_one_tick() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut parent = forager(1000.0);

        let (_, offspring) = parent.next(&mut rng);
        assert_eq!(offspring.len(), 1);

        // (1000 - 10²) / 2, less a tiny movement cost
        assert!((parent.energy() - 450.0).abs() < 0.01);
        assert_eq!(offspring[0].energy(), parent.energy());
        assert_eq!(offspring[0].kind(), LifeKind::Forager);
    }

    #[test]
    fn test_reproduction_conserves_energy_less_cost() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut parent = forager(777.0);
        let before = parent.energy();

        let child = parent.reproduce(&mut rng).unwrap();
        assert_eq!(parent.energy(), child.energy());
        assert_eq!(parent.energy() + child.energy(), before - parent.reproduction_cost());
    }

    #[test]
    fn test_no_split_at_threshold() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut parent = forager(200.0);
        assert!(parent.reproduce(&mut rng).is_none());
        assert_eq!(parent.energy(), 200.0);
    }

    #[test]
    fn test_offspring_spawns_behind_parent() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut parent = forager(500.0);
        parent.body.position = Vector::new(100.0, 100.0);
        parent.body.velocity = Vector::new(2.0, 0.0);

        let child = parent.reproduce(&mut rng).unwrap();
        assert_eq!(child.body.position, Vector::new(80.0, 100.0));
        assert_eq!(child.body.velocity, Vector::new(-1.0, 0.0));
        assert_eq!(child.body.size(), 10.0);
        assert_eq!(child.mutation_rate(), parent.mutation_rate());
    }

    #[test]
    fn test_offspring_id_follows_the_rng() {
        let mut a = ChaCha8Rng::seed_from_u64(4);
        let mut b = ChaCha8Rng::seed_from_u64(4);

        let first = forager(500.0).reproduce(&mut a).unwrap();
        let second = forager(500.0).reproduce(&mut b).unwrap();
        assert_eq!(first.body.id, second.body.id);
    }

    #[test]
    fn test_mutation_rate_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let gene = Gene::new(0x0F0_F0F);

        for _ in 0..20 {
            let mut never = Forager::new(Vector::zero(), gene, 10.0, 1000.0, 0.0);
            assert_eq!(never.reproduce(&mut rng).unwrap().gene(), gene);

            let mut always = Forager::new(Vector::zero(), gene, 10.0, 1000.0, 1.0);
            assert_ne!(always.reproduce(&mut rng).unwrap().gene(), gene);
        }
    }

    #[test]
    fn test_forager_eats_resource() {
        let mut predator = forager(10.0);
        let prey = Life::from(Resource::new(Vector::zero(), Gene::new(1), 4.0, 50.0));

        let released = predator.eat(prey);
        assert!(released.is_empty());
        assert_eq!(predator.energy(), 60.0);
    }

    #[test]
    fn test_eaten_forager_dies() {
        let mut prey = Life::from(forager(30.0));
        assert!(prey.eaten().is_empty());
        assert_eq!(prey.energy(), 0.0);
        assert!(!prey.is_alive());
    }

    #[test]
    fn test_forager_eating_colony_releases_members() {
        let members = vec![Life::from(forager(40.0)), Life::from(forager(25.0))];
        let colony = Life::from(Colony::new(Vector::new(10.0, 0.0), members));
        let mut predator = forager(10.0);

        let released = predator.eat(colony);
        assert_eq!(released.len(), 2);
        // Colony energy belongs to its members, which survive
        assert_eq!(predator.energy(), 10.0);
        assert_eq!(released.iter().map(Life::total_energy).sum::<f64>(), 65.0);
    }

    #[test]
    fn test_collision() {
        let a = Body::new(Vector::new(0.0, 0.0), 10.0, 1.0);
        let b = Body::new(Vector::new(9.0, 0.0), 10.0, 1.0);
        let c = Body::new(Vector::new(10.0, 0.0), 10.0, 1.0);
        assert!(a.is_colliding_with(&b));
        assert!(!a.is_colliding_with(&c));
    }

    #[test]
    fn test_life_data_snapshot() {
        let colony = Life::from(Colony::new(
            Vector::new(1.0, 2.0),
            vec![Life::from(forager(5.0))],
        ));
        let data = LifeData::from(&colony);
        assert_eq!(data.kind, LifeKind::Colony);
        assert_eq!(data.members.len(), 1);
        assert_eq!(data.energy, 5.0);

        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"kind\":\"colony\""));
    }

    proptest! {
        #[test]
        fn prop_movement_never_adds_energy(seed in any::<u64>(), energy in 0.0f64..200.0) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut life = forager(energy);
            let before = life.energy();
            let (_, offspring) = life.next(&mut rng);
            prop_assert!(offspring.is_empty());
            prop_assert!(life.energy() <= before);
            prop_assert!(life.energy() >= 0.0);
        }
    }
}
