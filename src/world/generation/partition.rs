//! Region partitioner
//!
//! Weighted discrete Voronoi under the L1 metric: every tile takes the
//! biome of the seed minimising `(|dx| + |dy|) / weight`.

use rand::Rng;

use crate::world::{Biome, Grid, Position};

/// Lightest seed weight drawn by [`random_seeds`]
pub const MIN_SEED_WEIGHT: f32 = 1.0;
/// Heaviest seed weight drawn by [`random_seeds`]
pub const MAX_SEED_WEIGHT: f32 = 3.0;

/// One region centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seed {
    pub pos: Position,
    /// Heavier seeds claim larger regions
    pub weight: f32,
    pub biome: Biome,
}

impl Seed {
    pub fn new(pos: Position, weight: f32, biome: Biome) -> Self {
        Self { pos, weight, biome }
    }

    fn weighted_distance(&self, pos: Position) -> f32 {
        self.pos.distance(&pos) as f32 / self.weight
    }
}

/// One seed per biome at a random position with a random weight
pub fn random_seeds(rng: &mut impl Rng, width: i32, height: i32, biomes: &[Biome]) -> Vec<Seed> {
    if width <= 0 || height <= 0 {
        return Vec::new();
    }
    biomes
        .iter()
        .map(|&biome| {
            let pos = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));
            let weight = rng.gen_range(MIN_SEED_WEIGHT..=MAX_SEED_WEIGHT);
            Seed::new(pos, weight, biome)
        })
        .collect()
}

/// Index of the nearest seed; ties go to the earlier seed
pub fn nearest_seed(seeds: &[Seed], pos: Position) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, seed) in seeds.iter().enumerate() {
        let d = seed.weighted_distance(pos);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Label every tile with its nearest seed's biome
///
/// With no seeds the grid is left untouched.
pub fn partition(grid: &mut Grid, seeds: &[Seed]) {
    if seeds.is_empty() {
        log::warn!("Partition skipped: no seeds");
        return;
    }
    for tile in &mut grid.tiles {
        if let Some(i) = nearest_seed(seeds, tile.pos) {
            tile.biome = seeds[i].biome;
        }
    }
    log::debug!(
        "Partitioned {}x{} grid into {} regions",
        grid.width,
        grid.height,
        seeds.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use crate::world::tile::{Appearance, TileCategory};

    fn blank(width: i32, height: i32) -> Grid {
        Grid::new(width, height, Appearance::new(TileCategory::Dirt, 0), Biome::Hearth)
    }

    #[test]
    fn test_two_corner_seeds() {
        let mut grid = blank(10, 10);
        let seeds = [
            Seed::new(Position::new(0, 0), 1.0, Biome::Meadow),
            Seed::new(Position::new(9, 9), 1.0, Biome::Desert),
        ];
        partition(&mut grid, &seeds);
        assert_eq!(grid.get(0, 0).map(|t| t.biome), Some(Biome::Meadow));
        assert_eq!(grid.get(9, 9).map(|t| t.biome), Some(Biome::Desert));
        // (9,0) is equidistant: the earlier seed wins
        assert_eq!(grid.get(9, 0).map(|t| t.biome), Some(Biome::Meadow));
    }

    #[test]
    fn test_weight_grows_region() {
        let heavy = [
            Seed::new(Position::new(0, 0), 3.0, Biome::Forest),
            Seed::new(Position::new(9, 0), 1.0, Biome::Tundra),
        ];
        // Distance 7 / 3 beats distance 2 / 1
        assert_eq!(nearest_seed(&heavy, Position::new(7, 0)), Some(0));
        assert_eq!(nearest_seed(&heavy, Position::new(9, 0)), Some(1));
        assert_eq!(nearest_seed(&[], Position::new(0, 0)), None);
    }

    #[test]
    fn test_every_tile_labelled_by_a_seed() {
        let mut rng = StdRng::seed_from_u64(11);
        let biomes = [Biome::Meadow, Biome::Forest, Biome::Marsh];
        let seeds = random_seeds(&mut rng, 30, 20, &biomes);
        assert_eq!(seeds.len(), 3);
        assert!(seeds
            .iter()
            .all(|s| (MIN_SEED_WEIGHT..=MAX_SEED_WEIGHT).contains(&s.weight)));

        let mut grid = blank(30, 20);
        partition(&mut grid, &seeds);
        assert!(grid.tiles.iter().all(|t| biomes.contains(&t.biome)));
        // Every seed owns its own tile unless a heavier seed swallowed it
        for seed in &seeds {
            let owner = nearest_seed(&seeds, seed.pos).map(|i| seeds[i].biome);
            assert_eq!(grid.at(seed.pos).map(|t| t.biome), owner);
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seeds() {
        let seeds = random_seeds(&mut StdRng::seed_from_u64(3), 25, 25, &[Biome::Crypt, Biome::Cavern]);
        let mut a = blank(25, 25);
        let mut b = blank(25, 25);
        partition(&mut a, &seeds);
        partition(&mut b, &seeds);
        let labels = |g: &Grid| g.tiles.iter().map(|t| t.biome).collect::<Vec<_>>();
        assert_eq!(labels(&a), labels(&b));
    }
}
