//! Tile grid
//!
//! The 2D array of tiles an environment owns. Every lookup is bounds
//! checked and returns `None` off-grid.

use serde::{Deserialize, Serialize};

use super::biome::Biome;
use super::geom::{Position, Rect};
use super::tile::{Appearance, Tile, TILE_SIZE};

/// Row-major tile storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid with every tile sharing one appearance and biome
    pub fn new(width: i32, height: i32, appearance: Appearance, biome: Biome) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(Position::new(x, y), appearance, biome));
            }
        }
        Self { width, height, tiles }
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Convert 1D index to 2D coordinates
    #[inline]
    pub fn idx_to_xy(&self, idx: usize) -> (i32, i32) {
        let idx = idx as i32;
        (idx % self.width, idx / self.width)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.in_bounds(pos.x, pos.y)
    }

    pub fn contains_rect(&self, rect: &Rect) -> bool {
        self.in_bounds(rect.x1, rect.y1) && self.in_bounds(rect.x2, rect.y2)
    }

    pub fn bounds(&self) -> Rect {
        Rect::with_size(0, 0, self.width, self.height)
    }

    /// Get tile at position
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            Some(&self.tiles[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    /// Get mutable tile at position
    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if self.in_bounds(x, y) {
            let idx = self.xy_to_idx(x, y);
            Some(&mut self.tiles[idx])
        } else {
            None
        }
    }

    pub fn at(&self, pos: Position) -> Option<&Tile> {
        self.get(pos.x, pos.y)
    }

    pub fn at_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.get_mut(pos.x, pos.y)
    }

    /// Set tile appearance at position
    pub fn set_appearance(&mut self, pos: Position, appearance: Appearance) {
        if let Some(tile) = self.at_mut(pos) {
            tile.appearance = appearance;
        }
    }

    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map_or(true, |t| t.blocked)
    }

    /// On-grid tiles of the 3x3 block centred on `pos`, centre included
    pub fn vicinity(&self, pos: Position) -> Vec<Position> {
        let mut around = Vec::with_capacity(9);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let p = pos.offset(dx, dy);
                if self.contains(p) {
                    around.push(p);
                }
            }
        }
        around
    }

    /// Grid extent in pixels
    pub fn pixel_size(&self) -> (f32, f32) {
        (self.width as f32 * TILE_SIZE, self.height as f32 * TILE_SIZE)
    }

    /// All positions whose tile passes the filter
    pub fn positions_where(&self, filter: impl Fn(&Tile) -> bool) -> Vec<Position> {
        self.tiles.iter().filter(|t| filter(t)).map(|t| t.pos).collect()
    }

    /// Mark the outer ring of the grid unbreakable and blocked
    pub fn seal_border(&mut self, appearance: Appearance) {
        let bounds = self.bounds();
        let ring: Vec<Position> = bounds.perimeter().collect();
        for pos in ring {
            if let Some(tile) = self.at_mut(pos) {
                tile.appearance = appearance;
                tile.blocked = true;
                tile.unbreakable = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::TileCategory;

    fn grass() -> Appearance {
        Appearance::new(TileCategory::Grass, 0)
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(7, 5, grass(), Biome::Meadow);
        let idx = grid.xy_to_idx(3, 4);
        assert_eq!(grid.idx_to_xy(idx), (3, 4));
        assert_eq!(grid.tiles[idx].pos, Position::new(3, 4));
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let mut grid = Grid::new(4, 4, grass(), Biome::Meadow);
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert!(grid.get_mut(4, 0).is_none());
        assert!(grid.is_blocked(10, 10));
    }

    #[test]
    fn test_vicinity_near_edge() {
        let grid = Grid::new(4, 4, grass(), Biome::Meadow);
        assert_eq!(grid.vicinity(Position::new(0, 0)).len(), 4);
        assert_eq!(grid.vicinity(Position::new(1, 1)).len(), 9);
    }

    #[test]
    fn test_seal_border() {
        let mut grid = Grid::new(5, 4, grass(), Biome::Meadow);
        grid.seal_border(Appearance::new(TileCategory::Rock, 0));
        assert!(grid.get(0, 2).map_or(false, |t| t.unbreakable && t.blocked));
        assert!(grid.get(2, 2).map_or(false, |t| !t.unbreakable));
    }
}
