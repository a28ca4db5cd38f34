//! World simulation engine - main simulation loop.

use crate::config::{Config, GenomeSource};
use crate::grid::Grid;
use crate::organism::{Creature, IdAllocator, Organism, OrganismId};
use crate::plant::Plant;
use crate::snapshot::{OrganismView, WorldSnapshot};
use crate::stats::{Stats, StatsHistory};
use crate::tile::Tile;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The simulation world
pub struct World {
    // Environment
    grid: Grid,

    // State
    pub time: u64,

    // Configuration
    pub config: Config,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,

    // ID generation
    ids: IdAllocator,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,

    // Per-step counters
    births_this_step: usize,
    deaths_this_step: usize,
    culled_this_step: usize,
}

impl World {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(mut config: Config, seed: u64) -> Self {
        config.sanitize();

        let grid = Grid::new(config.world.width, config.world.height);
        let stats_history = StatsHistory::new(
            config.logging.stats_interval,
            config.logging.history_length,
        );

        let mut world = Self {
            grid,
            time: 0,
            config,
            stats: Stats::new(),
            stats_history,
            ids: IdAllocator::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            births_this_step: 0,
            deaths_this_step: 0,
            culled_this_step: 0,
        };

        world.seed_population();
        world.stats.update(&world.grid);

        log::info!(
            "World created: {}x{} tiles, {} founders, seed {}",
            world.grid.width(),
            world.grid.height(),
            world.population(),
            seed
        );

        world
    }

    /// Place the founding clusters
    fn seed_population(&mut self) {
        let seeding = self.config.seeding.clone();

        for cluster in 0..seeding.n_clusters {
            let center = (
                self.rng.gen_range(0..self.grid.width()) as i64,
                self.rng.gen_range(0..self.grid.height()) as i64,
            );

            for _ in 0..seeding.cluster_size {
                let id = self.ids.allocate();
                let plant = match seeding.genome {
                    GenomeSource::Demo => Plant::demo(id),
                    GenomeSource::Random => Plant::random(id, seeding.max_attempts, &mut self.rng),
                };
                self.grid
                    .scatter_one(center, seeding.cluster_radius, plant.into(), &mut self.rng);
            }

            log::debug!(
                "Seeded cluster {} of {} plants around ({}, {})",
                cluster,
                seeding.cluster_size,
                center.0,
                center.1
            );
        }
    }

    /// Main simulation step
    pub fn step(&mut self) {
        self.births_this_step = 0;
        self.deaths_this_step = 0;
        self.culled_this_step = 0;

        // Phase 1: tiles in raster order, offspring scattered after each tile
        let sunlight = self.config.world.sunlight;
        for index in 0..self.grid.len() {
            let report = self
                .grid
                .simulate_tile(index, sunlight, &mut self.ids, &mut self.rng);
            self.births_this_step += report.births;
            self.deaths_this_step += report.deaths;
        }

        // Phase 2: periodic culling
        self.apply_culling();

        // Phase 3: statistics
        self.update_stats();

        log::trace!(
            "Step {}: population {}, +{} -{}",
            self.time,
            self.stats.population,
            self.births_this_step,
            self.deaths_this_step
        );

        self.time += 1;
    }

    fn apply_culling(&mut self) {
        let period = self.config.culling.period;
        if period == 0 || (self.time + 1) % period != 0 {
            return;
        }

        let center = (
            self.rng.gen_range(0..self.grid.width()) as i64,
            self.rng.gen_range(0..self.grid.height()) as i64,
        );
        self.culled_this_step += self.kill_area(center, self.config.culling.radius);
    }

    /// Update statistics
    fn update_stats(&mut self) {
        self.stats.time = self.time;
        self.stats.births = self.births_this_step;
        self.stats.deaths = self.deaths_this_step;
        self.stats.culled = self.culled_this_step;
        self.stats.update(&self.grid);

        // Record history
        if self.stats_history.is_due(self.time) {
            self.stats_history.record(self.stats.clone());
        }
    }

    /// Run simulation for specified number of steps
    pub fn simulate(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Run simulation with callback for progress updates
    pub fn simulate_with_callback<F>(&mut self, steps: u64, mut callback: F)
    where
        F: FnMut(&World, u64),
    {
        for i in 0..steps {
            self.step();
            callback(self, i);
        }
    }

    /// Empty every tile within `radius` of `center`. Returns how many
    /// organisms were removed.
    pub fn kill_area(&mut self, center: (i64, i64), radius: u32) -> usize {
        let killed = self.grid.kill_area(center, radius);
        log::debug!(
            "Killed {} organisms within {} of ({}, {})",
            killed,
            radius,
            center.0,
            center.1
        );
        killed
    }

    /// Scatter organisms around `center` using the world's generator.
    ///
    /// Ids of the organisms should come from [`World::next_id`].
    pub fn scatter_all(
        &mut self,
        center: (i64, i64),
        radius: u32,
        creatures: impl IntoIterator<Item = Creature>,
    ) -> Vec<(usize, usize)> {
        let landed = self
            .grid
            .scatter_all(center, radius, creatures, &mut self.rng);
        log::debug!(
            "Scattered {} organisms within {} of ({}, {})",
            landed.len(),
            radius,
            center.0,
            center.1
        );
        landed
    }

    /// Scatter `count` fresh plants around `center`
    pub fn scatter_plants(
        &mut self,
        center: (i64, i64),
        radius: u32,
        count: usize,
        source: GenomeSource,
    ) -> Vec<(usize, usize)> {
        let max_attempts = self.config.seeding.max_attempts;
        let plants: Vec<Creature> = (0..count)
            .map(|_| {
                let id = self.ids.allocate();
                match source {
                    GenomeSource::Demo => Plant::demo(id).into(),
                    GenomeSource::Random => Plant::random(id, max_attempts, &mut self.rng).into(),
                }
            })
            .collect();
        self.scatter_all(center, radius, plants)
    }

    /// Reserve an id for an organism created outside the world
    pub fn next_id(&mut self) -> OrganismId {
        self.ids.allocate()
    }

    /// Read-only view of every organism, in raster order of their tiles
    pub fn organisms(&self) -> Vec<OrganismView> {
        self.grid
            .tiles()
            .iter()
            .flat_map(|tile| {
                tile.organisms()
                    .iter()
                    .map(move |creature| OrganismView::new(tile, creature))
            })
            .collect()
    }

    /// Normalised gene values of an organism, in gene-kind order
    pub fn gene_magnitudes(&self, id: OrganismId) -> Option<Vec<f32>> {
        self.grid
            .find(id)
            .map(|(_, creature)| creature.gene_magnitudes())
    }

    /// Tile at the given coordinates, wrapping around every edge
    pub fn tile_at(&self, x: i64, y: i64) -> &Tile {
        self.grid.tile_at(x, y)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Capture the current state for read-only consumers
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::from_world(self)
    }

    /// Get current population count
    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Check if population is extinct
    pub fn is_extinct(&self) -> bool {
        self.population() == 0
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
