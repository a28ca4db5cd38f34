//! Configuration system for the canopy simulation.
//!
//! Supports YAML configuration files with sensible defaults. Out-of-range
//! numbers are corrected to the nearest bound instead of being rejected.

use crate::plant::DEFAULT_MAX_ATTEMPTS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub seeding: SeedingConfig,
    #[serde(default)]
    pub culling: CullingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World/environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Grid width in tiles
    pub width: usize,
    /// Grid height in tiles
    pub height: usize,
    /// Light delivered to every tile each step
    pub sunlight: f32,
}

/// Where founding genomes come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenomeSource {
    /// Every founder carries the demo genome
    Demo,
    /// Founders get random genomes, filtered for viability
    Random,
}

/// Initial population layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedingConfig {
    pub genome: GenomeSource,
    /// Number of founding clusters
    pub n_clusters: usize,
    /// Plants per cluster
    pub cluster_size: usize,
    /// Scatter radius around each cluster center
    pub cluster_radius: u32,
    /// Attempts at finding a viable random genome before settling
    pub max_attempts: u32,
}

/// Periodic area culling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CullingConfig {
    /// Steps between culls (0 disables culling)
    pub period: u64,
    /// Half-width of the square emptied by each cull
    pub radius: u32,
}

/// Logging and statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Steps between stats history records
    pub stats_interval: u64,
    /// Maximum number of records kept in the stats history
    pub history_length: usize,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 22,
            height: 10,
            sunlight: 200.0,
        }
    }
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            genome: GenomeSource::Random,
            n_clusters: 2,
            cluster_size: 50,
            cluster_radius: 1,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            period: 0,
            radius: 2,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 10,
            history_length: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, correcting out-of-range values
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        config.sanitize();
        Ok(config)
    }

    /// Parse a YAML file as written, without correcting anything
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Clamp every numeric value into its valid range.
    ///
    /// Returns a description of each correction made; each is also logged
    /// as a warning.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut fixes = Vec::new();

        if self.world.width == 0 {
            self.world.width = 1;
            fixes.push("world.width raised to 1".to_string());
        }
        if self.world.height == 0 {
            self.world.height = 1;
            fixes.push("world.height raised to 1".to_string());
        }
        if !self.world.sunlight.is_finite() || self.world.sunlight < 0.0 {
            let corrected = if self.world.sunlight == f32::INFINITY {
                f32::MAX
            } else {
                0.0
            };
            fixes.push(format!(
                "world.sunlight {} corrected to {}",
                self.world.sunlight, corrected
            ));
            self.world.sunlight = corrected;
        }

        if self.seeding.max_attempts == 0 {
            self.seeding.max_attempts = 1;
            fixes.push("seeding.max_attempts raised to 1".to_string());
        }

        // A square wider than the grid gains nothing
        let max_radius = self.world.width.max(self.world.height) as u32;
        if self.culling.radius > max_radius {
            fixes.push(format!(
                "culling.radius {} lowered to {}",
                self.culling.radius, max_radius
            ));
            self.culling.radius = max_radius;
        }
        if self.seeding.cluster_radius > max_radius {
            fixes.push(format!(
                "seeding.cluster_radius {} lowered to {}",
                self.seeding.cluster_radius, max_radius
            ));
            self.seeding.cluster_radius = max_radius;
        }

        if self.logging.stats_interval == 0 {
            self.logging.stats_interval = 1;
            fixes.push("logging.stats_interval raised to 1".to_string());
        }
        if self.logging.history_length == 0 {
            self.logging.history_length = 1;
            fixes.push("logging.history_length raised to 1".to_string());
        }

        for fix in &fixes {
            log::warn!("Config corrected: {}", fix);
        }
        fixes
    }
}

/// Errors that can occur while loading or saving configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Yaml(e) => write!(f, "YAML error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Yaml(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_needs_no_correction() {
        let mut config = Config::default();
        assert!(config.sanitize().is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.world.width, loaded.world.width);
        assert_eq!(config.seeding.genome, loaded.seeding.genome);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("canopy.yaml");

        let mut config = Config::default();
        config.seeding.genome = GenomeSource::Demo;
        config.culling.period = 25;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.seeding.genome, GenomeSource::Demo);
        assert_eq!(loaded.culling.period, 25);
    }

    #[test]
    fn test_optional_sections_default() {
        let yaml = "
world: { width: 5, height: 4, sunlight: 100.0 }
seeding: { genome: demo, n_clusters: 1, cluster_size: 3, cluster_radius: 0, max_attempts: 10 }
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.culling.period, 0);
        assert_eq!(config.logging.stats_interval, 10);
    }

    #[test]
    fn test_out_of_range_values_are_corrected() {
        let mut config = Config::default();
        config.world.width = 0;
        config.world.sunlight = -5.0;
        config.culling.radius = 1_000;
        config.logging.stats_interval = 0;
        config.seeding.max_attempts = 0;

        let fixes = config.sanitize();

        assert_eq!(fixes.len(), 5);
        assert_eq!(config.world.width, 1);
        assert_eq!(config.world.sunlight, 0.0);
        assert_eq!(config.culling.radius, 10);
        assert_eq!(config.logging.stats_interval, 1);
        assert_eq!(config.seeding.max_attempts, 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::from_file("/nonexistent/canopy.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
