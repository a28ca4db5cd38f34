//! # canopy
//!
//! Artificial-life simulator of plants competing for light on a toroidal grid.
//!
//! ## Features
//!
//! - **Evolvable**: every plant carries a genome of bounded, stepped genes
//! - **Competitive**: larger plants shade smaller ones on the same tile
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: Seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canopy::{World, Config};
//!
//! // Create world with default config
//! let config = Config::default();
//! let mut world = World::new(config);
//!
//! // Run simulation
//! world.simulate(1000);
//!
//! // Check results
//! println!("Population: {}", world.population());
//! println!("Biomass: {}", world.stats.total_biomass);
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use canopy::config::{Config, GenomeSource};
//!
//! let mut config = Config::default();
//! config.seeding.genome = GenomeSource::Demo;
//! config.culling.period = 250;
//! ```

pub mod config;
pub mod genetics;
pub mod grid;
pub mod organism;
pub mod plant;
pub mod snapshot;
pub mod stats;
pub mod tile;
pub mod world;

// Re-export main types
pub use config::Config;
pub use genetics::{Gene, GeneKind, Genome};
pub use grid::Grid;
pub use organism::{Creature, Organism, OrganismId};
pub use plant::Plant;
pub use tile::Tile;
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark on a randomly seeded world of the given size
pub fn benchmark(steps: u64, width: usize, height: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.world.width = width;
    config.world.height = height;

    let mut world = World::new(config);
    let initial_population = world.population();

    let start = Instant::now();
    world.simulate(steps);
    let elapsed = start.elapsed();

    BenchmarkResult {
        steps,
        width: world.grid().width(),
        height: world.grid().height(),
        initial_population,
        final_population: world.population(),
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: steps as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        final_biomass: world.stats.total_biomass,
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub steps: u64,
    pub width: usize,
    pub height: usize,
    pub initial_population: usize,
    pub final_population: usize,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
    pub final_biomass: u64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Grid: {}x{}", self.width, self.height)?;
        writeln!(f, "Population: {} -> {}", self.initial_population, self.final_population)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        writeln!(f, "Final biomass: {}", self.final_biomass)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let config = Config::default();
        let mut world = World::new(config);

        world.simulate(100);

        assert!(world.time == 100);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(50, 10, 6);

        assert_eq!(result.steps, 50);
        assert_eq!((result.width, result.height), (10, 6));
        assert!(result.steps_per_second > 0.0);
    }
}
