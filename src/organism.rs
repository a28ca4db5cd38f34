//! Organism lifecycle contract and the tagged union of organism kinds.

use crate::genetics::Genome;
use crate::plant::Plant;
use rand::Rng;

/// Unique organism identifier
pub type OrganismId = u64;

/// Maximum energy stored per unit of size
pub const ENERGY_PER_SIZE: f32 = 100.0;

/// Fraction of maximum energy a newborn starts with
pub const STARTING_ENERGY: f32 = 0.1;

/// Upper bound of the mutation-rate gene
pub const MAX_MUTATION: u32 = 10;

/// Upper bound of the size-cap gene
pub const MAX_SIZE: u32 = 100;

/// Hands out organism ids, never reusing one
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next: OrganismId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next id
    #[inline]
    pub fn allocate(&mut self) -> OrganismId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// What an organism did during its turn.
///
/// Organisms never touch the grid themselves; the owning tile applies the
/// outcome (removal, or handing the brood back to the grid for scattering).
#[derive(Debug)]
pub enum Behavior {
    /// Maintenance could not be paid or the age cap was passed
    Died,
    /// Grew by one unit of size
    Grew,
    /// Produced offspring to be scattered within `range` tiles
    Reproduced { offspring: Vec<Creature>, range: u32 },
    /// Alive, but neither grew nor reproduced
    Idle,
}

/// Lifecycle contract shared by every organism kind.
///
/// Per step, in order: maintenance (`survive`), then, if still alive, at most
/// one of grow or reproduce. `choose_behavior` is the single entry point and
/// calls `survive` exactly once.
pub trait Organism {
    fn id(&self) -> OrganismId;

    fn genome(&self) -> &Genome;

    fn size(&self) -> u32;

    fn energy(&self) -> f32;

    fn age(&self) -> u32;

    /// Pay the per-step maintenance cost, age by one step, and report whether
    /// the organism is still alive.
    fn survive(&mut self) -> bool;

    /// Produce mutated offspring and pay for them
    fn reproduce<R: Rng + ?Sized>(&mut self, ids: &mut IdAllocator, rng: &mut R) -> Vec<Creature>;

    /// Run one step of this organism's life
    fn choose_behavior<R: Rng + ?Sized>(&mut self, ids: &mut IdAllocator, rng: &mut R) -> Behavior;

    /// Energy the organism can hold at its current size
    fn energy_capacity(&self) -> f32 {
        self.size() as f32 * ENERGY_PER_SIZE
    }

    /// Stored energy as a fraction of capacity
    fn energy_ratio(&self) -> f32 {
        let capacity = self.energy_capacity();
        if capacity <= 0.0 {
            0.0
        } else {
            self.energy() / capacity
        }
    }

    /// Normalised gene values, one per carried gene kind, in kind order
    fn gene_magnitudes(&self) -> Vec<f32> {
        self.genome().magnitudes()
    }
}

/// Every organism kind that can live on a tile.
///
/// Only producers exist today. Code that needs a specific kind asks through
/// `as_plant` rather than assuming it.
#[derive(Clone, Debug)]
pub enum Creature {
    Plant(Plant),
}

impl Creature {
    pub fn as_plant(&self) -> Option<&Plant> {
        match self {
            Creature::Plant(plant) => Some(plant),
        }
    }

    pub fn as_plant_mut(&mut self) -> Option<&mut Plant> {
        match self {
            Creature::Plant(plant) => Some(plant),
        }
    }

    /// Short name of the organism kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            Creature::Plant(_) => "plant",
        }
    }
}

impl From<Plant> for Creature {
    fn from(plant: Plant) -> Self {
        Creature::Plant(plant)
    }
}

impl Organism for Creature {
    fn id(&self) -> OrganismId {
        match self {
            Creature::Plant(p) => p.id(),
        }
    }

    fn genome(&self) -> &Genome {
        match self {
            Creature::Plant(p) => p.genome(),
        }
    }

    fn size(&self) -> u32 {
        match self {
            Creature::Plant(p) => p.size(),
        }
    }

    fn energy(&self) -> f32 {
        match self {
            Creature::Plant(p) => p.energy(),
        }
    }

    fn age(&self) -> u32 {
        match self {
            Creature::Plant(p) => p.age(),
        }
    }

    fn survive(&mut self) -> bool {
        match self {
            Creature::Plant(p) => p.survive(),
        }
    }

    fn reproduce<R: Rng + ?Sized>(&mut self, ids: &mut IdAllocator, rng: &mut R) -> Vec<Creature> {
        match self {
            Creature::Plant(p) => p.reproduce(ids, rng),
        }
    }

    fn choose_behavior<R: Rng + ?Sized>(&mut self, ids: &mut IdAllocator, rng: &mut R) -> Behavior {
        match self {
            Creature::Plant(p) => p.choose_behavior(ids, rng),
        }
    }
}
