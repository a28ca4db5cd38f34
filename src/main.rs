//! canopy - CLI Entry Point
//!
//! Plant ecology simulator on a toroidal grid.

use canopy::{benchmark, Config, World};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "canopy")]
#[command(version)]
#[command(about = "Plant ecology simulator on a toroidal grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of steps to simulate
        #[arg(short, long, default_value = "10000")]
        steps: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,

        /// Write the stats history to this JSON file when done
        #[arg(long)]
        stats_out: Option<PathBuf>,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of steps
        #[arg(short, long, default_value = "1000")]
        steps: u64,

        /// Grid width
        #[arg(long, default_value = "22")]
        width: usize,

        /// Grid height
        #[arg(long, default_value = "10")]
        height: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            steps,
            seed,
            quiet,
            stats_out,
        } => run_simulation(config, steps, seed, quiet, stats_out),

        Commands::Benchmark {
            steps,
            width,
            height,
        } => {
            init_logging("info");
            run_benchmark(steps, width, height)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }
    }
}

fn run_simulation(
    config_path: PathBuf,
    steps: u64,
    seed: Option<u64>,
    quiet: bool,
    stats_out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Load or create config; the logger needs its level before corrections are reported
    let loaded = config_path.exists();
    let mut config = if loaded {
        Config::read(&config_path)?
    } else {
        Config::default()
    };
    init_logging(&config.logging.log_level);
    config.sanitize();

    if loaded {
        log::info!("Loaded config from {:?}", config_path);
    } else {
        log::info!("Using default configuration");
    }

    // Create world
    let mut world = if let Some(s) = seed {
        World::new_with_seed(config.clone(), s)
    } else {
        World::new(config.clone())
    };

    println!("Starting simulation");
    println!("  Initial population: {}", world.population());
    println!("  Grid size: {}x{}", config.world.width, config.world.height);
    println!("  Seed: {}", world.seed());
    println!("  Steps: {}", steps);
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval;

    for i in 0..steps {
        world.step();

        // Stats output
        if !quiet && i % stats_interval == 0 {
            println!("{}", world.stats.summary());
        }

        // Check for extinction
        if world.is_extinct() {
            println!("\nPopulation extinct at step {}", world.time);
            break;
        }
    }

    let elapsed = start.elapsed();
    let steps_per_sec = world.time as f64 / elapsed.as_secs_f64().max(f64::EPSILON);

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Steps: {}", world.time);
    println!("Speed: {:.1} steps/s", steps_per_sec);
    println!("Final population: {}", world.population());
    println!("Final biomass: {}", world.stats.total_biomass);

    if let Some(path) = stats_out {
        world.stats_history.save(&path.to_string_lossy())?;
        println!("Stats history: {:?}", path);
    }

    Ok(())
}

fn run_benchmark(steps: u64, width: usize, height: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== canopy Benchmark ===");
    println!("Steps: {}", steps);
    println!("Grid: {}x{}", width, height);
    println!();

    let result = benchmark(steps, width, height);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
