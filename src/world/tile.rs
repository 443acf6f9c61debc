//! Tile definitions
//!
//! A tile is one grid cell: where it is, what it looks like, which biome it
//! belongs to, and handles to whatever occupies it.

use serde::{Deserialize, Serialize};

use super::biome::Biome;
use super::geom::Position;

/// Tile edge length in pixels
pub const TILE_SIZE: f32 = 32.0;

/// Handle to a room owned by the same environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

/// Handle to an item owned by the same environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Handle to an entity owned by the same environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Broad visual category of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileCategory {
    // Open ground
    Grass,
    Dirt,
    Sand,
    Snow,
    Mud,
    Soil,
    Stone,
    Mycelium,
    Prism,

    // Solid ground
    Rock,
    Crystal,
    Void,

    // Structures
    Wall,
    Floor,
    Roof,
    Tunnel,
    Marker,
}

/// What a tile looks like: a category plus a sprite variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Appearance {
    pub category: TileCategory,
    pub variant: u8,
}

impl Appearance {
    pub const fn new(category: TileCategory, variant: u8) -> Self {
        Self { category, variant }
    }

    /// Appearance of player-placed construction tiles
    pub const MARKER: Appearance = Appearance::new(TileCategory::Marker, 0);

    pub fn glyph(&self) -> char {
        match self.category {
            TileCategory::Grass => {
                if self.variant % 2 == 0 {
                    '"'
                } else {
                    ','
                }
            }
            TileCategory::Dirt | TileCategory::Soil => '.',
            TileCategory::Sand => '·',
            TileCategory::Snow => '∙',
            TileCategory::Mud => '~',
            TileCategory::Stone => '.',
            TileCategory::Mycelium => '`',
            TileCategory::Prism => '∴',
            TileCategory::Rock => '▓',
            TileCategory::Crystal => '◊',
            TileCategory::Void => ' ',
            TileCategory::Wall => '#',
            TileCategory::Floor => '.',
            TileCategory::Roof => '≡',
            TileCategory::Tunnel => '.',
            TileCategory::Marker => '■',
        }
    }

    pub fn fg_color(&self) -> (u8, u8, u8) {
        match self.category {
            TileCategory::Grass => (90, 160, 70),
            TileCategory::Dirt => (130, 100, 70),
            TileCategory::Sand => (220, 200, 140),
            TileCategory::Snow => (230, 235, 245),
            TileCategory::Mud => (90, 80, 50),
            TileCategory::Soil => (110, 80, 50),
            TileCategory::Stone => (110, 110, 110),
            TileCategory::Mycelium => (170, 140, 190),
            // Hallucination tiles shift hue with the variant
            TileCategory::Prism => {
                let v = self.variant as u16 * 40;
                ((v % 256) as u8, ((v + 85) % 256) as u8, ((v + 170) % 256) as u8)
            }
            TileCategory::Rock => (70, 65, 60),
            TileCategory::Crystal => (120, 200, 255),
            TileCategory::Void => (10, 10, 20),
            TileCategory::Wall => (130, 110, 90),
            TileCategory::Floor => (150, 130, 100),
            TileCategory::Roof => (160, 60, 50),
            TileCategory::Tunnel => (80, 80, 80),
            TileCategory::Marker => (220, 180, 60),
        }
    }

    pub fn bg_color(&self) -> (u8, u8, u8) {
        match self.category {
            TileCategory::Grass => (20, 45, 20),
            TileCategory::Dirt | TileCategory::Soil => (35, 25, 15),
            TileCategory::Sand => (60, 50, 30),
            TileCategory::Snow => (70, 75, 85),
            TileCategory::Mud => (30, 25, 15),
            TileCategory::Stone | TileCategory::Tunnel => (20, 20, 20),
            TileCategory::Mycelium => (30, 20, 35),
            TileCategory::Prism => (25, 10, 40),
            TileCategory::Rock => (40, 35, 30),
            TileCategory::Crystal => (15, 30, 50),
            TileCategory::Void => (0, 0, 0),
            TileCategory::Wall => (40, 35, 30),
            TileCategory::Floor => (45, 35, 25),
            TileCategory::Roof => (60, 20, 15),
            TileCategory::Marker => (50, 40, 10),
        }
    }
}

/// A single grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub pos: Position,
    pub appearance: Appearance,
    pub biome: Biome,
    pub item: Option<ItemId>,
    pub entity: Option<EntityId>,
    pub room: Option<RoomId>,
    pub blocked: bool,
    pub hidden: bool,
    pub unbreakable: bool,
    /// Set on tiles the player built
    pub placed: bool,
}

impl Tile {
    pub fn new(pos: Position, appearance: Appearance, biome: Biome) -> Self {
        Self {
            pos,
            appearance,
            biome,
            item: None,
            entity: None,
            room: None,
            blocked: false,
            hidden: false,
            unbreakable: false,
            placed: false,
        }
    }

    /// Top-left corner of the tile in pixel space
    pub fn pixel_pos(&self) -> (f32, f32) {
        (self.pos.x as f32 * TILE_SIZE, self.pos.y as f32 * TILE_SIZE)
    }

    pub fn is_occupied(&self) -> bool {
        self.item.is_some() || self.entity.is_some()
    }

    /// Open ground nothing stands on
    pub fn is_free(&self) -> bool {
        !self.blocked && !self.is_occupied()
    }

    /// Drop item and entity handles, e.g. when the tile becomes a wall
    pub fn clear_occupancy(&mut self) {
        self.item = None;
        self.entity = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_position() {
        let tile = Tile::new(Position::new(3, 2), Appearance::MARKER, Biome::Meadow);
        assert_eq!(tile.pixel_pos(), (3.0 * TILE_SIZE, 2.0 * TILE_SIZE));
    }

    #[test]
    fn test_free_tile() {
        let mut tile = Tile::new(Position::new(0, 0), Appearance::MARKER, Biome::Meadow);
        assert!(tile.is_free());
        tile.item = Some(ItemId(1));
        assert!(!tile.is_free());
        tile.clear_occupancy();
        assert!(tile.is_free());
        tile.blocked = true;
        assert!(!tile.is_free());
    }
}
