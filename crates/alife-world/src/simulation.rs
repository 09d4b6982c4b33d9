//! Simulation engine for running a world.

use crate::colony::Colony;
use crate::life::{Decoration, Forager, Life, LifeData, LifeKind, Resource};
use crate::motion::Habitat;
use crate::population::{self, Scope, TickOutcome};
use crate::terrain::Terrain;
use alife_core::{Gene, LifeId, Result, SimulationConfig, Vector};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{event, info, instrument, trace, Level};

pub struct Simulation {
    terrain: Terrain,
    lives: Vec<Life>,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    tick: u64,
    totals: TickOutcome,
}

impl Simulation {
    /// Build a world and seed it as the configuration describes
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::with_lives(config, Vec::new())?;
        sim.seed_population();

        let census = sim.census();
        info!(
            event = "world_seeded",
            seed = sim.config.seed,
            foragers = census.foragers_alive,
            resources = census.resources,
            decorations = census.decorations,
            colonies = census.colonies,
            total_energy = census.total_energy,
            "World seeded"
        );

        Ok(sim)
    }

    /// Build a world around an explicit population
    pub fn with_lives(config: SimulationConfig, lives: Vec<Life>) -> Result<Self> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let terrain = Terrain::from_config(&config.world);

        Ok(Self {
            terrain,
            lives,
            config,
            rng,
            tick: 0,
            totals: TickOutcome::default(),
        })
    }

    pub fn lives(&self) -> &[Life] {
        &self.lives
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Outcomes summed over every tick so far
    pub fn totals(&self) -> TickOutcome {
        self.totals
    }

    /// Run the simulation for the configured number of ticks
    #[instrument(skip(self), fields(num_ticks = self.config.num_ticks, seed = self.config.seed))]
    pub fn run(&mut self) -> SimulationResult {
        info!("Starting simulation for {} ticks", self.config.num_ticks);

        for _ in 0..self.config.num_ticks {
            self.step();

            if self.tick % self.config.report_interval == 0 {
                self.emit_population_metrics();
            }

            if self.is_extinct() {
                info!(
                    event = "extinction",
                    tick = self.tick,
                    "No living forager or colony left, stopping early"
                );
                break;
            }
        }

        let result = self.collect_results();
        self.emit_run_summary(&result);
        result
    }

    /// Execute one simulation step
    pub fn step(&mut self) -> TickOutcome {
        let outcome = population::advance(&mut self.lives, &self.terrain, Scope::World, &mut self.rng);
        self.tick += 1;
        self.totals += outcome;

        trace!(
            tick = self.tick,
            population = self.lives.len(),
            births = outcome.births,
            predations = outcome.predations,
            evictions = outcome.evictions,
            "Tick complete"
        );

        outcome
    }

    pub fn census(&self) -> Census {
        Census::of(&self.lives)
    }

    fn is_extinct(&self) -> bool {
        !self
            .lives
            .iter()
            .any(|life| life.is_predator() && life.is_alive())
    }

    fn emit_population_metrics(&self) {
        let census = self.census();

        info!(
            event = "population_metrics",
            tick = self.tick,
            population = self.lives.len(),
            foragers_alive = census.foragers_alive,
            foragers_dead = census.foragers_dead,
            resources = census.resources,
            colonies = census.colonies,
            colony_members = census.colony_members,
            total_energy = census.total_energy,
            births_total = self.totals.births,
            predations_total = self.totals.predations,
            evictions_total = self.totals.evictions,
            "Population metrics snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "foragers_alive",
            gauge_value = census.foragers_alive,
            tick = self.tick,
            "Living foragers gauge"
        );
    }

    fn emit_run_summary(&self, result: &SimulationResult) {
        let census = &result.final_census;
        info!(
            event = "run_summary",
            ticks_run = result.ticks_run,
            seed = result.seed,
            foragers_alive = census.foragers_alive,
            resources_left = census.resources,
            colonies = census.colonies,
            total_energy = census.total_energy,
            births_total = result.totals.births,
            predations_total = result.totals.predations,
            evictions_total = result.totals.evictions,
            released_total = result.totals.released,
            "Simulation complete"
        );
    }

    fn collect_results(&self) -> SimulationResult {
        SimulationResult {
            seed: self.config.seed,
            ticks_run: self.tick,
            final_census: self.census(),
            totals: self.totals,
            survivors: self
                .lives
                .iter()
                .filter(|life| life.is_predator() && life.is_alive())
                .map(LifeData::from)
                .collect(),
        }
    }

    fn seed_population(&mut self) {
        let life = self.config.life.clone();
        let seeding = self.config.seeding.clone();

        for _ in 0..seeding.decorations {
            let position = self.random_position(life.decoration_size);
            self.push_seeded(Decoration::new(position, life.decoration_size).into());
        }

        for _ in 0..seeding.resources {
            let position = self.random_position(life.resource_size);
            let gene = Gene::random(&mut self.rng);
            self.push_seeded(Resource::new(position, gene, life.resource_size, life.resource_energy).into());
        }

        for _ in 0..seeding.foragers {
            let position = self.random_position(life.forager_size);
            let gene = Gene::random(&mut self.rng);
            self.push_seeded(
                Forager::new(position, gene, life.forager_size, life.initial_energy, life.mutation_rate)
                    .into(),
            );
        }

        for _ in 0..seeding.colonies {
            // Kin colony: every member starts with the same gene
            let gene = Gene::random(&mut self.rng);
            let count = seeding.colony_members as f64;
            let colony_size = (count * life.forager_size * life.forager_size * 6.0).sqrt();
            let interior_radius = (colony_size - life.forager_size) / 2.0;

            let members: Vec<Life> = (0..seeding.colony_members)
                .map(|_| {
                    let position = random_point_in_disc(&mut self.rng, Vector::zero(), interior_radius);
                    let mut member = Life::from(Forager::new(
                        position,
                        gene,
                        life.forager_size,
                        life.initial_energy,
                        life.mutation_rate,
                    ));
                    member.body_mut().id = LifeId::from_rng(&mut self.rng);
                    member
                })
                .collect();

            let position = self.random_position(colony_size);
            self.push_seeded(Colony::new(position, members).into());
        }
    }

    fn push_seeded(&mut self, mut life: Life) {
        life.body_mut().id = LifeId::from_rng(&mut self.rng);
        self.lives.push(life);
    }

    /// Uniform position where a body of `size` fits entirely inside the arena
    fn random_position(&mut self, size: f64) -> Vector {
        let radius = ((self.terrain.diameter() - size) / 2.0).max(0.0);
        random_point_in_disc(&mut self.rng, self.terrain.center(), radius)
    }
}

fn random_point_in_disc(rng: &mut ChaCha8Rng, center: Vector, radius: f64) -> Vector {
    let distance = radius * rng.gen::<f64>().sqrt();
    let angle = rng.gen_range(0.0..TAU);
    center + Vector::new(angle.cos(), angle.sin()).mult(distance)
}

/// Head count of a population, including lives nested in colonies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub foragers_alive: usize,
    pub foragers_dead: usize,
    pub resources: usize,
    pub decorations: usize,
    pub colonies: usize,
    /// Lives held inside colonies, at any depth
    pub colony_members: usize,
    pub total_energy: f64,
}

impl Census {
    pub fn of(lives: &[Life]) -> Self {
        let mut census = Census::default();
        for life in lives {
            census.record(life, false);
        }
        census.total_energy = lives.iter().map(Life::total_energy).sum();
        census
    }

    fn record(&mut self, life: &Life, nested: bool) {
        if nested {
            self.colony_members += 1;
        }

        match life.kind() {
            LifeKind::Decoration => self.decorations += 1,
            LifeKind::Resource => self.resources += 1,
            LifeKind::Forager if life.is_alive() => self.foragers_alive += 1,
            LifeKind::Forager => self.foragers_dead += 1,
            LifeKind::Colony => self.colonies += 1,
        }

        if let Life::Colony(colony) = life {
            for member in colony.members() {
                self.record(member, true);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub seed: u64,
    pub ticks_run: u64,
    pub final_census: Census,
    pub totals: TickOutcome,
    /// Living foragers and colonies at the end of the run
    pub survivors: Vec<LifeData>,
}
