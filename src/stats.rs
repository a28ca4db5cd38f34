//! Statistics tracking for the simulation.

use crate::genetics::GeneKind;
use crate::grid::Grid;
use crate::organism::{Creature, Organism, MAX_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Statistics snapshot for a simulation step
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Current simulation time
    pub time: u64,
    /// Total population count
    pub population: usize,
    /// Sum of sizes of every organism
    pub total_biomass: u64,
    /// Mean organism size
    pub size_mean: f32,
    /// Largest organism size
    pub size_max: u32,
    /// Mean energy across organisms
    pub energy_mean: f32,
    /// Mean age across organisms
    pub age_mean: f32,
    /// Births this step
    pub births: usize,
    /// Deaths this step
    pub deaths: usize,
    /// Organisms removed by culling this step
    pub culled: usize,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Update population figures from the current grid
    pub fn update(&mut self, grid: &Grid) {
        let mut population = 0usize;
        let mut biomass = 0u64;
        let mut size_max = 0u32;
        let mut energy_sum = 0.0f32;
        let mut age_sum = 0u64;

        for creature in grid.organisms() {
            population += 1;
            biomass += creature.size() as u64;
            size_max = size_max.max(creature.size());
            energy_sum += creature.energy();
            age_sum += creature.age() as u64;
        }

        self.population = population;
        self.total_biomass = biomass;
        self.size_max = size_max;

        if population == 0 {
            self.size_mean = 0.0;
            self.energy_mean = 0.0;
            self.age_mean = 0.0;
        } else {
            let n = population as f32;
            self.size_mean = biomass as f32 / n;
            self.energy_mean = energy_sum / n;
            self.age_mean = age_sum as f32 / n;
        }
    }

    /// Save stats to JSON file
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Pop:{:5} | Biomass:{:6} | Size:{:.1} (max {}) | Energy:{:.0} | Age:{:.0} | +{} -{}",
            self.time,
            self.population,
            self.total_biomass,
            self.size_mean,
            self.size_max,
            self.energy_mean,
            self.age_mean,
            self.births,
            self.deaths + self.culled,
        )
    }
}

/// Historical statistics tracker, bounded to the most recent records
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsHistory {
    /// Recorded stats snapshots, oldest first
    pub snapshots: VecDeque<Stats>,
    /// Recording interval
    pub interval: u64,
    /// Maximum number of snapshots kept
    pub capacity: usize,
}

impl StatsHistory {
    /// Create new history with recording interval and capacity
    pub fn new(interval: u64, capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity.min(4096)),
            interval: interval.max(1),
            capacity: capacity.max(1),
        }
    }

    /// Whether a snapshot should be taken at `time`
    #[inline]
    pub fn is_due(&self, time: u64) -> bool {
        time % self.interval == 0
    }

    /// Record a stats snapshot, dropping the oldest when full
    pub fn record(&mut self, stats: Stats) {
        if self.snapshots.len() >= self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(stats);
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest(&self) -> Option<&Stats> {
        self.snapshots.back()
    }

    /// Get population over time
    pub fn population_series(&self) -> Vec<(u64, usize)> {
        self.snapshots
            .iter()
            .map(|s| (s.time, s.population))
            .collect()
    }

    /// Get total biomass over time
    pub fn biomass_series(&self) -> Vec<(u64, u64)> {
        self.snapshots
            .iter()
            .map(|s| (s.time, s.total_biomass))
            .collect()
    }

    /// Save history to file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Count of organisms per size; entry `i` holds size `i + 1`.
///
/// Sizes beyond `MAX_SIZE` land in the last bucket.
pub fn size_histogram<'a>(organisms: impl IntoIterator<Item = &'a Creature>) -> Vec<usize> {
    let mut buckets = vec![0usize; MAX_SIZE as usize];
    for creature in organisms {
        let size = creature.size().clamp(1, MAX_SIZE);
        buckets[(size - 1) as usize] += 1;
    }
    buckets
}

/// Histogram of normalised gene values, one per gene kind in kind order.
///
/// Magnitudes in `[0, 1]` are split into `bins` equal buckets, the top one
/// closed on the right.
pub fn gene_histograms<'a>(
    organisms: impl IntoIterator<Item = &'a Creature>,
    bins: usize,
) -> Vec<(GeneKind, Vec<usize>)> {
    let bins = bins.max(1);
    let mut histograms: Vec<(GeneKind, Vec<usize>)> =
        GeneKind::ALL.iter().map(|&k| (k, vec![0; bins])).collect();

    for creature in organisms {
        for (kind, counts) in histograms.iter_mut() {
            if let Some(gene) = creature.genome().try_get(*kind) {
                let bucket = ((gene.magnitude() * bins as f32) as usize).min(bins - 1);
                counts[bucket] += 1;
            }
        }
    }

    histograms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::Plant;

    #[test]
    fn test_stats_update() {
        let mut grid = Grid::new(3, 3);
        grid.tile_at_mut(0, 0).add(Plant::demo(0));
        grid.tile_at_mut(1, 2).add(Plant::demo(1));
        let mut big = Plant::demo(2);
        big.grow();
        big.grow();
        grid.tile_at_mut(1, 2).add(big);

        let mut stats = Stats::new();
        stats.update(&grid);

        assert_eq!(stats.population, 3);
        assert_eq!(stats.total_biomass, 5);
        assert_eq!(stats.size_max, 3);
        assert!((stats.size_mean - 5.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_grid_stats() {
        let mut stats = Stats::new();
        stats.update(&Grid::new(2, 2));
        assert_eq!(stats.population, 0);
        assert_eq!(stats.energy_mean, 0.0);
    }

    #[test]
    fn test_stats_history() {
        let mut history = StatsHistory::new(10, 100);

        for i in 0..5 {
            let mut stats = Stats::new();
            stats.time = i * 10;
            stats.population = (i + 1) as usize * 100;
            history.record(stats);
        }

        let series = history.population_series();
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], (0, 100));
        assert_eq!(series[4], (40, 500));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = StatsHistory::new(1, 3);
        for t in 0..10 {
            history.record(Stats {
                time: t,
                ..Stats::default()
            });
        }
        assert_eq!(history.len(), 3);
        let times: Vec<u64> = history.biomass_series().iter().map(|&(t, _)| t).collect();
        assert_eq!(times, vec![7, 8, 9]);
    }

    #[test]
    fn test_size_histogram() {
        let mut big = Plant::demo(1);
        for _ in 0..9 {
            big.grow();
        }
        let creatures = vec![Creature::from(Plant::demo(0)), Creature::from(big), Creature::from(Plant::demo(2))];

        let histogram = size_histogram(&creatures);
        assert_eq!(histogram.len(), MAX_SIZE as usize);
        assert_eq!(histogram[0], 2);
        assert_eq!(histogram[9], 1);
        assert_eq!(histogram.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_gene_histograms_cover_every_kind() {
        let creatures: Vec<Creature> = (0..4).map(|id| Plant::demo(id).into()).collect();
        let histograms = gene_histograms(&creatures, 10);

        assert_eq!(histograms.len(), GeneKind::ALL.len());
        for (_, counts) in &histograms {
            assert_eq!(counts.iter().sum::<usize>(), 4);
        }
        // Starting size 1 sits at the bottom of its range
        let (_, starting) = histograms
            .iter()
            .find(|(k, _)| *k == GeneKind::StartingSize)
            .unwrap();
        assert_eq!(starting[0], 4);
    }
}
