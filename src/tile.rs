//! A single grid cell and the organisms living on it.

use crate::organism::{Behavior, Creature, IdAllocator, Organism, OrganismId};
use crate::plant::Plant;
use rand::Rng;
use std::cmp::Reverse;

/// Offspring produced on a tile, waiting to be scattered by the grid
#[derive(Debug)]
pub struct Brood {
    /// Coordinates of the tile the parent lives on
    pub origin: (usize, usize),
    /// Maximum scatter distance along each axis
    pub range: u32,
    pub offspring: Vec<Creature>,
}

/// Outcome of one tile step
#[derive(Debug, Default)]
pub struct TileReport {
    pub broods: Vec<Brood>,
    /// Offspring produced, whether or not the broods were scattered yet
    pub births: usize,
    pub deaths: usize,
    pub growths: usize,
    /// Light left over after every plant had its turn
    pub unused_light: f32,
}

/// One cell of the toroidal grid
#[derive(Clone, Debug)]
pub struct Tile {
    x: usize,
    y: usize,
    organisms: Vec<Creature>,
}

impl Tile {
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            organisms: Vec::new(),
        }
    }

    #[inline]
    pub fn x(&self) -> usize {
        self.x
    }

    #[inline]
    pub fn y(&self) -> usize {
        self.y
    }

    /// Organisms on this tile, in insertion order
    pub fn organisms(&self) -> &[Creature] {
        &self.organisms
    }

    pub fn len(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn add(&mut self, creature: impl Into<Creature>) {
        self.organisms.push(creature.into());
    }

    /// Remove an organism by id. Removing an absent organism does nothing.
    pub fn remove(&mut self, id: OrganismId) -> Option<Creature> {
        let index = self.position(id)?;
        Some(self.organisms.remove(index))
    }

    pub fn get(&self, id: OrganismId) -> Option<&Creature> {
        self.organisms.iter().find(|c| c.id() == id)
    }

    /// Remove every organism, returning how many were present
    pub fn clear(&mut self) -> usize {
        let count = self.organisms.len();
        self.organisms.clear();
        count
    }

    fn position(&self, id: OrganismId) -> Option<usize> {
        self.organisms.iter().position(|c| c.id() == id)
    }

    /// Indices of the plants on this tile, largest first, ties in insertion order
    fn light_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = self
            .organisms
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_plant().map(|_| i))
            .collect();
        // Stable sort keeps insertion order among equal sizes
        order.sort_by_key(|&i| Reverse(self.organisms[i].size()));
        order
    }

    /// Plants on this tile, largest first, ties in insertion order
    pub fn plants_by_size_desc(&self) -> Vec<&Plant> {
        self.light_order()
            .into_iter()
            .filter_map(|i| self.organisms[i].as_plant())
            .collect()
    }

    /// Let every plant photosynthesise from a shared, depleting budget,
    /// largest plant first. Returns the light nobody captured.
    pub fn distribute_light(&mut self, total: f32) -> f32 {
        let mut remaining = total;
        for index in self.light_order() {
            if let Some(plant) = self.organisms[index].as_plant_mut() {
                remaining = plant.photosynthesize(remaining);
            }
        }
        remaining
    }

    /// Run one step on this tile.
    ///
    /// Light is distributed first. Behaviour is then evaluated for the
    /// organisms present when the call started; the dead are removed in place
    /// and offspring are returned as broods for the grid to scatter, so nothing
    /// born here acts before the next time this tile is visited.
    pub fn simulate<R: Rng + ?Sized>(
        &mut self,
        light: f32,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> TileReport {
        let mut report = TileReport {
            unused_light: self.distribute_light(light),
            ..TileReport::default()
        };

        let snapshot: Vec<OrganismId> = self.organisms.iter().map(|c| c.id()).collect();

        for id in snapshot {
            let Some(index) = self.position(id) else {
                continue;
            };

            match self.organisms[index].choose_behavior(ids, rng) {
                Behavior::Died => {
                    self.organisms.remove(index);
                    report.deaths += 1;
                }
                Behavior::Grew => report.growths += 1,
                Behavior::Reproduced { offspring, range } => {
                    report.births += offspring.len();
                    report.broods.push(Brood {
                        origin: (self.x, self.y),
                        range,
                        offspring,
                    });
                }
                Behavior::Idle => {}
            }
        }

        report
    }
}
