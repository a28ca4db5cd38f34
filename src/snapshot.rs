//! Snapshot structures for read-only consumers.
//!
//! These are lightweight copies of simulation state. Charts and viewers work
//! from them instead of borrowing the world.

use crate::organism::{Creature, Organism, OrganismId};
use crate::stats::Stats;
use crate::tile::Tile;
use serde::{Deserialize, Serialize};

/// Lightweight view of an organism
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrganismView {
    pub id: OrganismId,
    pub kind: String,
    pub x: usize,
    pub y: usize,
    pub size: u32,
    pub energy: f32,
    pub age: u32,
    /// Normalised gene values in gene-kind order
    pub gene_magnitudes: Vec<f32>,
}

impl OrganismView {
    pub fn new(tile: &Tile, creature: &Creature) -> Self {
        Self {
            id: creature.id(),
            kind: creature.kind_name().to_string(),
            x: tile.x(),
            y: tile.y(),
            size: creature.size(),
            energy: creature.energy(),
            age: creature.age(),
            gene_magnitudes: creature.gene_magnitudes(),
        }
    }
}

/// Complete world snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Current simulation time
    pub time: u64,
    pub width: usize,
    pub height: usize,
    /// Statistics
    pub stats: Stats,
    /// All organisms, in raster order of their tiles
    pub organisms: Vec<OrganismView>,
    /// Population per tile (row-major, width x height)
    pub occupancy: Vec<usize>,
}

impl WorldSnapshot {
    /// Create a snapshot from the current world state
    pub fn from_world(world: &crate::World) -> Self {
        let grid = world.grid();

        Self {
            time: world.time,
            width: grid.width(),
            height: grid.height(),
            stats: world.stats.clone(),
            organisms: world.organisms(),
            occupancy: grid.tiles().iter().map(Tile::len).collect(),
        }
    }

    /// Look up an organism by id
    pub fn organism(&self, id: OrganismId) -> Option<&OrganismView> {
        self.organisms.iter().find(|o| o.id == id)
    }

    /// Population of the tile at `(x, y)`, if it is on the grid
    pub fn occupancy_at(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.occupancy.get(y * self.width + x).copied()
    }
}
