//! Plants: the photosynthesising producer organism.
//!
//! A plant's economy is driven by three costs (sustain, grow, reproduce) and
//! one income (light). Its genome decides how much of its energy capacity it
//! insists on keeping in reserve before spending on growth or offspring.

use crate::genetics::{Gene, GeneKind, Genome};
use crate::organism::{
    Behavior, Creature, IdAllocator, Organism, OrganismId, ENERGY_PER_SIZE, MAX_MUTATION,
    MAX_SIZE, STARTING_ENERGY,
};
use rand::Rng;

/// Multiplier for the cost of surviving one step
pub const SUSTAIN_EFFICIENCY: f32 = 0.2;
/// Multiplier for the cost of creating an offspring
pub const CLONE_EFFICIENCY: f32 = 20.0;
/// Fraction of light a plant can capture
pub const PHOTO_EFFICIENCY: f32 = 0.2;
/// Multiplier for the cost of growing
pub const GROW_EFFICIENCY: f32 = 0.005;
/// Multiplier for the cost of spreading seeds
pub const SEED_EFFICIENCY: f32 = 2.0;
pub const MAX_STARTING_SIZE: u32 = 5;
pub const MAX_SEED_RANGE: u32 = 10;
pub const MIN_AGE: u32 = 100;
pub const MAX_AGE: u32 = 1000;

/// Default cap on attempts when generating a viable random genome
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Explicit trait values for a founding plant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantTraits {
    pub mutation_rate: u32,
    pub reproduce_behaviour: f32,
    pub grow_behaviour: f32,
    pub age_cap: u32,
    pub size_cap: u32,
    pub starting_size: u32,
    pub seed_range: u32,
}

impl PlantTraits {
    /// A known-viable configuration
    pub fn demo() -> Self {
        Self {
            mutation_rate: 1,
            reproduce_behaviour: 0.1,
            grow_behaviour: 0.1,
            age_cap: 500,
            size_cap: 50,
            starting_size: 1,
            seed_range: 5,
        }
    }

    /// Uniformly random traits within the gene ranges
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            mutation_rate: rng.gen_range(1..=MAX_MUTATION),
            reproduce_behaviour: one_decimal(rng.gen::<f32>()),
            grow_behaviour: one_decimal(rng.gen::<f32>()),
            age_cap: rng.gen_range(1..=10) * MIN_AGE,
            size_cap: rng.gen_range(1..=MAX_SIZE),
            starting_size: rng.gen_range(1..=MAX_STARTING_SIZE),
            seed_range: rng.gen_range(1..=MAX_SEED_RANGE),
        }
    }

    /// Build the full plant genome from these values (out-of-range values clamp)
    pub fn to_genome(&self) -> Genome {
        Genome::new()
            .with_gene(
                GeneKind::MutationRate,
                Gene::new(0.0, MAX_MUTATION as f32, 1.0, self.mutation_rate as f32),
            )
            .with_gene(
                GeneKind::ReproduceBehaviour,
                Gene::new(0.0, 0.9, 0.1, self.reproduce_behaviour),
            )
            .with_gene(GeneKind::GrowBehaviour, Gene::new(0.0, 0.9, 0.1, self.grow_behaviour))
            .with_gene(
                GeneKind::AgeCap,
                Gene::new(MIN_AGE as f32, MAX_AGE as f32, MIN_AGE as f32, self.age_cap as f32),
            )
            .with_gene(
                GeneKind::SizeCap,
                Gene::new(1.0, MAX_SIZE as f32, 1.0, self.size_cap as f32),
            )
            .with_gene(
                GeneKind::StartingSize,
                Gene::new(1.0, MAX_STARTING_SIZE as f32, 1.0, self.starting_size as f32),
            )
            .with_gene(
                GeneKind::SeedRange,
                Gene::new(1.0, MAX_SEED_RANGE as f32, 1.0, self.seed_range as f32),
            )
    }
}

fn one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// A photosynthesising organism
#[derive(Clone, Debug)]
pub struct Plant {
    id: OrganismId,
    genome: Genome,
    size: u32,
    energy: f32,
    age: u32,
}

impl Plant {
    /// Create a founding plant from explicit trait values
    pub fn new(id: OrganismId, traits: PlantTraits) -> Self {
        Self::with_genome(id, traits.to_genome())
    }

    /// Create a plant carrying the given genome, sized as a fresh offspring
    pub fn with_genome(id: OrganismId, genome: Genome) -> Self {
        let size = genome.get_value(GeneKind::StartingSize) as u32;
        Self {
            id,
            genome,
            size,
            energy: size as f32 * ENERGY_PER_SIZE * STARTING_ENERGY,
            age: 0,
        }
    }

    /// The demo plant
    pub fn demo(id: OrganismId) -> Self {
        Self::new(id, PlantTraits::demo())
    }

    /// A plant with random traits, regenerated while its genome is a dead end.
    ///
    /// Gives up after `max_attempts` tries and keeps the last attempt.
    pub fn random<R: Rng + ?Sized>(id: OrganismId, max_attempts: u32, rng: &mut R) -> Self {
        let mut plant = Self::new(id, PlantTraits::random(rng));
        let mut attempts = 1;
        while plant.is_genetic_dead_end() && attempts < max_attempts {
            plant = Self::new(id, PlantTraits::random(rng));
            attempts += 1;
        }
        plant
    }

    /// Absorb part of the available light as energy.
    ///
    /// Larger plants capture a larger share. Energy saturates at capacity but
    /// the intercepted light is gone either way. Returns what is left for the
    /// next plant.
    pub fn photosynthesize(&mut self, available: f32) -> f32 {
        let absorbed = available * PHOTO_EFFICIENCY * self.light_share();
        self.energy = (self.energy + absorbed).min(self.energy_capacity());
        available - absorbed
    }

    /// Fraction of `PHOTO_EFFICIENCY` this plant captures, in `[0.5, 1]`
    pub fn light_share(&self) -> f32 {
        (self.size as f32 + MAX_SIZE as f32) / (2.0 * MAX_SIZE as f32)
    }

    /// Maintenance cost of one step at the current size
    pub fn sustain_cost(&self) -> f32 {
        self.sustain_cost_at(self.size)
    }

    /// Maintenance cost of one step at `size`. Long-lived genomes pay more.
    pub fn sustain_cost_at(&self, size: u32) -> f32 {
        let age_cap = self.genome.get_value(GeneKind::AgeCap);
        size as f32 * SUSTAIN_EFFICIENCY * (1.0 + age_cap / MAX_AGE as f32)
    }

    /// Cost of one unit of growth, scaled by how large the genome aims to get
    pub fn grow_cost(&self) -> f32 {
        self.genome.get_value(GeneKind::SizeCap) * ENERGY_PER_SIZE * GROW_EFFICIENCY
    }

    /// Cost of producing and dispersing one offspring
    pub fn reproduce_cost(&self) -> f32 {
        let starting_size = self.genome.get_value(GeneKind::StartingSize);
        let seed_range = self.genome.get_value(GeneKind::SeedRange);
        let clone_cost = starting_size * ENERGY_PER_SIZE * CLONE_EFFICIENCY;
        let spread_cost = starting_size * seed_range * SEED_EFFICIENCY / MAX_SEED_RANGE as f32;
        clone_cost + spread_cost
    }

    /// True if this genome can never afford to grow from its starting size,
    /// or never afford to reproduce once fully grown, while honouring its
    /// own reserve thresholds.
    pub fn is_genetic_dead_end(&self) -> bool {
        let starting_size = self.genome.get_value(GeneKind::StartingSize) as u32;
        let size_cap = self.genome.get_value(GeneKind::SizeCap) as u32;
        let grow_reserve = self.genome.get_value(GeneKind::GrowBehaviour);
        let reproduce_reserve = self.genome.get_value(GeneKind::ReproduceBehaviour);

        let seedling_budget = starting_size as f32 * ENERGY_PER_SIZE * (1.0 - grow_reserve);
        if self.grow_cost() + self.sustain_cost_at(starting_size) >= seedling_budget {
            return true;
        }

        let mature_budget = size_cap as f32 * ENERGY_PER_SIZE * (1.0 - reproduce_reserve);
        self.reproduce_cost() + self.sustain_cost_at(size_cap) >= mature_budget
    }

    /// Whether growing now would still leave the genome's reserve intact
    pub fn should_grow(&self) -> bool {
        self.projected_ratio(self.grow_cost()) >= self.genome.get_value(GeneKind::GrowBehaviour)
    }

    /// Whether reproducing now would still leave the genome's reserve intact
    pub fn should_reproduce(&self) -> bool {
        self.projected_ratio(self.reproduce_cost())
            >= self.genome.get_value(GeneKind::ReproduceBehaviour)
    }

    fn projected_ratio(&self, cost: f32) -> f32 {
        let capacity = self.energy_capacity();
        if capacity <= 0.0 {
            return f32::NEG_INFINITY;
        }
        (self.energy - cost) / capacity
    }

    /// Grow by one unit and pay for it
    pub fn grow(&mut self) {
        self.size += 1;
        self.energy -= self.grow_cost();
    }

    /// Whether the size cap has been reached
    pub fn is_mature(&self) -> bool {
        self.size as f32 >= self.genome.get_value(GeneKind::SizeCap)
    }

    /// Offspring dispersal radius in tiles
    pub fn seed_range(&self) -> u32 {
        self.genome.get_value(GeneKind::SeedRange) as u32
    }
}

impl Organism for Plant {
    fn id(&self) -> OrganismId {
        self.id
    }

    fn genome(&self) -> &Genome {
        &self.genome
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn energy(&self) -> f32 {
        self.energy
    }

    fn age(&self) -> u32 {
        self.age
    }

    fn survive(&mut self) -> bool {
        self.energy -= self.sustain_cost();
        self.age += 1;
        self.energy > 0.0 && self.age as f32 <= self.genome.get_value(GeneKind::AgeCap)
    }

    fn reproduce<R: Rng + ?Sized>(&mut self, ids: &mut IdAllocator, rng: &mut R) -> Vec<Creature> {
        let mut child = Plant::with_genome(ids.allocate(), self.genome.clone());
        child.genome.mutate(rng);
        self.energy -= self.reproduce_cost();
        vec![Creature::Plant(child)]
    }

    fn choose_behavior<R: Rng + ?Sized>(&mut self, ids: &mut IdAllocator, rng: &mut R) -> Behavior {
        if !self.survive() {
            Behavior::Died
        } else if !self.is_mature() && self.should_grow() {
            self.grow();
            Behavior::Grew
        } else if self.should_reproduce() {
            let range = self.seed_range();
            Behavior::Reproduced {
                offspring: self.reproduce(ids, rng),
                range,
            }
        } else {
            Behavior::Idle
        }
    }
}

impl std::fmt::Display for Plant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Plant #{} - energy: {:.1}, size: {}, age: {}, genome: {}",
            self.id, self.energy, self.size, self.age, self.genome
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn plant_with_energy(traits: PlantTraits, size: u32, energy: f32) -> Plant {
        let mut plant = Plant::new(0, traits);
        plant.size = size;
        plant.energy = energy;
        plant
    }

    #[test]
    fn test_demo_plant_starts_as_seedling() {
        let plant = Plant::demo(3);
        assert_eq!(plant.id(), 3);
        assert_eq!(plant.size(), 1);
        assert_eq!(plant.age(), 0);
        assert!((plant.energy() - 10.0).abs() < 1e-6);
        assert_eq!(plant.genome().len(), GeneKind::ALL.len());
        assert!(!plant.is_genetic_dead_end());
    }

    #[test]
    fn test_photosynthesis_absorbs_size_scaled_share() {
        let mut plant = plant_with_energy(PlantTraits::demo(), 50, 0.0);
        let remaining = plant.photosynthesize(200.0);

        // 200 * 0.2 * (50 + 100) / 200 = 30
        assert!((plant.energy() - 30.0).abs() < 1e-4);
        assert!((remaining - 170.0).abs() < 1e-4);
    }

    #[test]
    fn test_photosynthesis_caps_energy() {
        let mut plant = plant_with_energy(PlantTraits::demo(), 1, 99.0);
        let remaining = plant.photosynthesize(200.0);

        assert_eq!(plant.energy(), 100.0);
        // Light is intercepted even when it cannot be stored
        assert!(remaining < 200.0);
    }

    #[test]
    fn test_costs_follow_genome() {
        let plant = Plant::demo(0);
        // 1 * 0.2 * (1 + 500 / 1000)
        assert!((plant.sustain_cost() - 0.3).abs() < 1e-5);
        // 50 * 100 * 0.005
        assert!((plant.grow_cost() - 25.0).abs() < 1e-4);
        // 1 * 100 * 20 + 1 * 5 * 2 / 10
        assert!((plant.reproduce_cost() - 2001.0).abs() < 1e-3);
    }

    #[test]
    fn test_longevity_tax() {
        let short = Plant::new(0, PlantTraits { age_cap: 100, ..PlantTraits::demo() });
        let long = Plant::new(1, PlantTraits { age_cap: 1000, ..PlantTraits::demo() });
        assert!(long.sustain_cost() > short.sustain_cost());
    }

    #[test]
    fn test_dead_end_when_growth_unaffordable() {
        // grow cost 50 + sustain vs a seedling budget of 100 * (1 - 0.9) = 10
        let traits = PlantTraits {
            size_cap: 100,
            grow_behaviour: 0.9,
            starting_size: 1,
            ..PlantTraits::demo()
        };
        let plant = Plant::new(0, traits);
        assert!(plant.grow_cost() + plant.sustain_cost() > 10.0);
        assert!(plant.is_genetic_dead_end());
    }

    #[test]
    fn test_dead_end_when_reproduction_unaffordable() {
        // A size-10 adult holds at most 1000 energy, an offspring costs 2000+
        let traits = PlantTraits { size_cap: 10, ..PlantTraits::demo() };
        assert!(Plant::new(0, traits).is_genetic_dead_end());
    }

    #[test]
    fn test_random_plants_are_usually_viable() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let viable = (0..50)
            .map(|i| Plant::random(i, DEFAULT_MAX_ATTEMPTS, &mut rng))
            .filter(|p| !p.is_genetic_dead_end())
            .count();
        assert!(viable > 40, "only {} of 50 random plants viable", viable);
    }

    #[test]
    fn test_random_with_single_attempt_keeps_whatever_it_got() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let plant = Plant::random(9, 1, &mut rng);
        assert_eq!(plant.id(), 9);
        assert_eq!(plant.age(), 0);
    }

    #[test]
    fn test_survive_ages_and_charges_maintenance() {
        let mut plant = Plant::demo(0);
        assert!(plant.survive());
        assert_eq!(plant.age(), 1);
        assert!((plant.energy() - 9.7).abs() < 1e-5);
    }

    #[test]
    fn test_dies_of_old_age() {
        let mut plant = plant_with_energy(PlantTraits { age_cap: 100, ..PlantTraits::demo() }, 1, 100.0);
        plant.age = 100;
        assert!(!plant.survive());
    }

    #[test]
    fn test_dies_of_starvation() {
        let mut plant = plant_with_energy(PlantTraits::demo(), 10, 0.5);
        assert!(!plant.survive());
    }

    #[test]
    fn test_choose_behavior_grows_when_rich() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut ids = IdAllocator::new();
        let mut plant = plant_with_energy(PlantTraits::demo(), 1, 100.0);

        assert!(matches!(plant.choose_behavior(&mut ids, &mut rng), Behavior::Grew));
        assert_eq!(plant.size(), 2);
        assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn test_choose_behavior_reproduces_at_size_cap() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut ids = IdAllocator::new();
        ids.allocate();
        let mut plant = plant_with_energy(PlantTraits::demo(), 50, 5000.0);
        let cost = plant.reproduce_cost();

        match plant.choose_behavior(&mut ids, &mut rng) {
            Behavior::Reproduced { offspring, range } => {
                assert_eq!(range, 5);
                assert_eq!(offspring.len(), 1);
                let child = &offspring[0];
                assert_eq!(child.id(), 1);
                assert_eq!(child.size(), 1);
                assert_eq!(child.age(), 0);
                assert!((child.energy() - 10.0).abs() < 1e-5);
            }
            other => panic!("expected reproduction, got {:?}", other),
        }

        // Size did not change and the offspring was paid for
        assert_eq!(plant.size(), 50);
        assert!((plant.energy() - (5000.0 - plant.sustain_cost() - cost)).abs() < 1e-2);
    }

    #[test]
    fn test_choose_behavior_idles_when_poor() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut ids = IdAllocator::new();
        let mut plant = plant_with_energy(PlantTraits::demo(), 50, 600.0);

        assert!(matches!(plant.choose_behavior(&mut ids, &mut rng), Behavior::Idle));
        assert_eq!(plant.size(), 50);
    }

    #[test]
    fn test_choose_behavior_reports_death() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut ids = IdAllocator::new();
        let mut plant = plant_with_energy(PlantTraits::demo(), 20, 1.0);

        assert!(matches!(plant.choose_behavior(&mut ids, &mut rng), Behavior::Died));
    }

    #[test]
    fn test_offspring_genome_is_independent() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut ids = IdAllocator::new();
        let mut parent = Plant::new(
            ids.allocate(),
            PlantTraits { mutation_rate: 10, ..PlantTraits::demo() },
        );
        parent.energy = 1e6;
        let before = parent.genome().magnitudes();

        for _ in 0..20 {
            parent.reproduce(&mut ids, &mut rng);
        }

        assert_eq!(parent.genome().magnitudes(), before);
    }

    #[test]
    fn test_traits_out_of_range_are_clamped() {
        let traits = PlantTraits {
            mutation_rate: 99,
            age_cap: 5,
            starting_size: 40,
            ..PlantTraits::demo()
        };
        let genome = traits.to_genome();
        assert_eq!(genome.get_value(GeneKind::MutationRate), MAX_MUTATION as f32);
        assert_eq!(genome.get_value(GeneKind::AgeCap), MIN_AGE as f32);
        assert_eq!(genome.get_value(GeneKind::StartingSize), MAX_STARTING_SIZE as f32);
    }
}
