//! Toroidal grid of tiles with wraparound addressing and seed dispersal.

use crate::organism::{Creature, IdAllocator, Organism, OrganismId};
use crate::tile::{Tile, TileReport};
use rand::Rng;

/// Toroidal grid owning every tile by value.
///
/// Tiles are stored row-major and carry no reference back to the grid;
/// operations needing neighbourhood context (scatter, culling) live here.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    /// tiles[y * width + x]
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create an empty grid. Zero dimensions are raised to 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(x, y)))
            .collect();

        Self {
            width,
            height,
            tiles,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of tiles
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Map any integer coordinates onto the grid
    #[inline]
    pub fn wrap(&self, x: i64, y: i64) -> (usize, usize) {
        (
            x.rem_euclid(self.width as i64) as usize,
            y.rem_euclid(self.height as i64) as usize,
        )
    }

    #[inline]
    fn index_of(&self, x: i64, y: i64) -> usize {
        let (x, y) = self.wrap(x, y);
        y * self.width + x
    }

    /// Tile at the given coordinates, wrapping around every edge
    pub fn tile_at(&self, x: i64, y: i64) -> &Tile {
        &self.tiles[self.index_of(x, y)]
    }

    pub fn tile_at_mut(&mut self, x: i64, y: i64) -> &mut Tile {
        let index = self.index_of(x, y);
        &mut self.tiles[index]
    }

    /// Tiles in raster order (row by row, left to right)
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Every organism on the grid, in raster order of their tiles
    pub fn organisms(&self) -> impl Iterator<Item = &Creature> {
        self.tiles.iter().flat_map(|t| t.organisms().iter())
    }

    /// Total number of organisms
    pub fn population(&self) -> usize {
        self.tiles.iter().map(Tile::len).sum()
    }

    /// Locate an organism together with the tile it lives on
    pub fn find(&self, id: OrganismId) -> Option<(&Tile, &Creature)> {
        self.tiles
            .iter()
            .find_map(|t| t.get(id).map(|creature| (t, creature)))
    }

    /// Place an organism on a random tile within `radius` of `center` along
    /// each axis. Returns where it landed.
    pub fn scatter_one<R: Rng + ?Sized>(
        &mut self,
        center: (i64, i64),
        radius: u32,
        creature: Creature,
        rng: &mut R,
    ) -> (usize, usize) {
        let (dx, dy) = if radius == 0 {
            (0, 0)
        } else {
            let r = radius as i64;
            (rng.gen_range(-r..=r), rng.gen_range(-r..=r))
        };

        let (cx, cy) = self.wrap(center.0, center.1);
        let (x, y) = self.wrap(cx as i64 + dx, cy as i64 + dy);
        self.tiles[y * self.width + x].add(creature);
        (x, y)
    }

    /// Scatter each organism independently around `center`
    pub fn scatter_all<R: Rng + ?Sized>(
        &mut self,
        center: (i64, i64),
        radius: u32,
        creatures: impl IntoIterator<Item = Creature>,
        rng: &mut R,
    ) -> Vec<(usize, usize)> {
        creatures
            .into_iter()
            .map(|creature| self.scatter_one(center, radius, creature, rng))
            .collect()
    }

    /// Empty every tile in the square of side `2 * radius + 1` around
    /// `center`. Returns how many organisms were removed.
    pub fn kill_area(&mut self, center: (i64, i64), radius: u32) -> usize {
        let r = radius as i64;
        let (cx, cy) = self.wrap(center.0, center.1);
        let (cx, cy) = (cx as i64, cy as i64);
        // A square wider than the grid covers each column/row once
        let span_x = (2 * r + 1).min(self.width as i64);
        let span_y = (2 * r + 1).min(self.height as i64);

        let mut killed = 0;
        for dy in 0..span_y {
            for dx in 0..span_x {
                killed += self.tile_at_mut(cx - r + dx, cy - r + dy).clear();
            }
        }
        killed
    }

    /// Run one step on the tile at raster position `index` and scatter the
    /// offspring it produced. The returned report has its broods drained.
    pub fn simulate_tile<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        light: f32,
        ids: &mut IdAllocator,
        rng: &mut R,
    ) -> TileReport {
        let mut report = self.tiles[index].simulate(light, ids, rng);

        for brood in report.broods.drain(..) {
            let center = (brood.origin.0 as i64, brood.origin.1 as i64);
            self.scatter_all(center, brood.range, brood.offspring, rng);
        }

        report
    }

    /// Sum of sizes of every organism
    pub fn total_biomass(&self) -> u64 {
        self.organisms().map(|c| c.size() as u64).sum()
    }
}
