//! Biome definitions and configuration
//!
//! Each biome has its own ground, fill, room style and spawn tables.

use crate::data::{EntityKind, ItemKind};
use crate::world::tile::{Appearance, TileCategory};
use crate::world::{Biome, RoomStyle};

/// Configuration for a specific biome
#[derive(Debug, Clone)]
pub struct BiomeConfig {
    /// Open ground category
    pub ground: TileCategory,
    /// Number of sprite variants the ground cycles through
    pub ground_variants: u8,
    /// Fill for solid, undug ground
    pub solid: Appearance,
    /// What dug-out ground turns into
    pub tunnel: Appearance,
    /// Default look of rooms built here
    pub style: RoomStyle,
    /// Per-tile spawn chance for each item kind
    pub items: &'static [(ItemKind, f64)],
    /// Per-tile spawn chance for each entity kind
    pub entities: &'static [(EntityKind, f64)],
}

const WOOD_FLOOR: Appearance = Appearance::new(TileCategory::Floor, 0);
const STONE_FLOOR: Appearance = Appearance::new(TileCategory::Floor, 1);
const LOG_WALL: Appearance = Appearance::new(TileCategory::Wall, 0);
const BRICK_WALL: Appearance = Appearance::new(TileCategory::Wall, 1);
const SHINGLE_ROOF: Appearance = Appearance::new(TileCategory::Roof, 0);
const GLASS_ROOF: Appearance = Appearance::new(TileCategory::Roof, 1);
const ROCK: Appearance = Appearance::new(TileCategory::Rock, 0);
const DIRT_TUNNEL: Appearance = Appearance::new(TileCategory::Tunnel, 0);
const STONE_TUNNEL: Appearance = Appearance::new(TileCategory::Tunnel, 1);

impl Biome {
    /// Get the configuration for this biome
    pub fn config(&self) -> BiomeConfig {
        match self {
            Biome::Meadow => BiomeConfig {
                ground: TileCategory::Grass,
                ground_variants: 4,
                solid: ROCK,
                tunnel: Appearance::new(TileCategory::Dirt, 0),
                style: RoomStyle { floor: WOOD_FLOOR, wall: LOG_WALL, roof: Some(SHINGLE_ROOF) },
                items: &[(ItemKind::Flower, 0.03), (ItemKind::Herb, 0.01), (ItemKind::Rock, 0.005)],
                entities: &[(EntityKind::Rabbit, 0.004), (EntityKind::Bee, 0.002), (EntityKind::Deer, 0.001)],
            },
            Biome::Forest => BiomeConfig {
                ground: TileCategory::Grass,
                ground_variants: 2,
                solid: ROCK,
                tunnel: Appearance::new(TileCategory::Dirt, 1),
                style: RoomStyle { floor: WOOD_FLOOR, wall: LOG_WALL, roof: Some(SHINGLE_ROOF) },
                items: &[(ItemKind::Mushroom, 0.015), (ItemKind::Herb, 0.015), (ItemKind::Plant, 0.02)],
                entities: &[(EntityKind::Deer, 0.003), (EntityKind::Wolf, 0.002), (EntityKind::Rabbit, 0.002)],
            },
            Biome::Desert => BiomeConfig {
                ground: TileCategory::Sand,
                ground_variants: 3,
                solid: Appearance::new(TileCategory::Rock, 1),
                tunnel: Appearance::new(TileCategory::Sand, 0),
                style: RoomStyle { floor: STONE_FLOOR, wall: BRICK_WALL, roof: Some(SHINGLE_ROOF) },
                items: &[(ItemKind::Rock, 0.02), (ItemKind::Bones, 0.005)],
                entities: &[(EntityKind::Scorpion, 0.003)],
            },
            Biome::Tundra => BiomeConfig {
                ground: TileCategory::Snow,
                ground_variants: 2,
                solid: Appearance::new(TileCategory::Rock, 2),
                tunnel: Appearance::new(TileCategory::Snow, 0),
                style: RoomStyle { floor: WOOD_FLOOR, wall: LOG_WALL, roof: Some(SHINGLE_ROOF) },
                items: &[(ItemKind::Rock, 0.01), (ItemKind::Crystal, 0.002)],
                entities: &[(EntityKind::Wolf, 0.003), (EntityKind::Deer, 0.001)],
            },
            Biome::Marsh => BiomeConfig {
                ground: TileCategory::Mud,
                ground_variants: 2,
                solid: ROCK,
                tunnel: Appearance::new(TileCategory::Mud, 0),
                style: RoomStyle { floor: WOOD_FLOOR, wall: LOG_WALL, roof: Some(SHINGLE_ROOF) },
                items: &[(ItemKind::Herb, 0.02), (ItemKind::Mushroom, 0.01)],
                entities: &[(EntityKind::Frog, 0.005), (EntityKind::Slime, 0.001)],
            },
            Biome::Hearth => BiomeConfig {
                ground: TileCategory::Grass,
                ground_variants: 2,
                solid: ROCK,
                tunnel: Appearance::new(TileCategory::Dirt, 0),
                style: RoomStyle { floor: WOOD_FLOOR, wall: LOG_WALL, roof: Some(SHINGLE_ROOF) },
                items: &[(ItemKind::Flower, 0.02)],
                entities: &[(EntityKind::Rabbit, 0.002)],
            },
            Biome::Garden => BiomeConfig {
                ground: TileCategory::Soil,
                ground_variants: 2,
                solid: ROCK,
                tunnel: Appearance::new(TileCategory::Soil, 0),
                style: RoomStyle { floor: STONE_FLOOR, wall: BRICK_WALL, roof: Some(GLASS_ROOF) },
                items: &[(ItemKind::Flower, 0.05), (ItemKind::Herb, 0.03), (ItemKind::Plant, 0.02)],
                entities: &[(EntityKind::Bee, 0.004), (EntityKind::Frog, 0.002), (EntityKind::Rabbit, 0.001)],
            },
            Biome::Crypt => BiomeConfig {
                ground: TileCategory::Stone,
                ground_variants: 3,
                solid: ROCK,
                tunnel: STONE_TUNNEL,
                style: RoomStyle { floor: STONE_FLOOR, wall: BRICK_WALL, roof: None },
                items: &[(ItemKind::Bones, 0.02), (ItemKind::Chest, 0.002)],
                entities: &[(EntityKind::Skeleton, 0.01), (EntityKind::Bat, 0.004), (EntityKind::Phantom, 0.001)],
            },
            Biome::Cavern => BiomeConfig {
                ground: TileCategory::Stone,
                ground_variants: 2,
                solid: ROCK,
                tunnel: DIRT_TUNNEL,
                style: RoomStyle { floor: STONE_FLOOR, wall: BRICK_WALL, roof: None },
                items: &[(ItemKind::Rock, 0.03), (ItemKind::Mushroom, 0.005)],
                entities: &[(EntityKind::Bat, 0.006), (EntityKind::Slime, 0.004), (EntityKind::CaveCrab, 0.003)],
            },
            Biome::CrystalGrotto => BiomeConfig {
                ground: TileCategory::Stone,
                ground_variants: 2,
                solid: Appearance::new(TileCategory::Crystal, 0),
                tunnel: STONE_TUNNEL,
                style: RoomStyle { floor: STONE_FLOOR, wall: BRICK_WALL, roof: None },
                items: &[(ItemKind::Crystal, 0.03)],
                entities: &[(EntityKind::CaveCrab, 0.006), (EntityKind::Bat, 0.002)],
            },
            Biome::FungalHollow => BiomeConfig {
                ground: TileCategory::Mycelium,
                ground_variants: 3,
                solid: ROCK,
                tunnel: DIRT_TUNNEL,
                style: RoomStyle { floor: STONE_FLOOR, wall: BRICK_WALL, roof: None },
                items: &[(ItemKind::Mushroom, 0.05)],
                entities: &[(EntityKind::Sporeling, 0.008), (EntityKind::Slime, 0.003)],
            },
            Biome::Dreamscape => BiomeConfig {
                ground: TileCategory::Prism,
                ground_variants: 6,
                solid: Appearance::new(TileCategory::Void, 0),
                tunnel: Appearance::new(TileCategory::Prism, 0),
                style: RoomStyle {
                    floor: Appearance::new(TileCategory::Prism, 3),
                    wall: Appearance::new(TileCategory::Crystal, 1),
                    roof: None,
                },
                items: &[(ItemKind::Crystal, 0.01), (ItemKind::Flower, 0.01)],
                entities: &[(EntityKind::Phantom, 0.006)],
            },
            Biome::Kaleidoscope => BiomeConfig {
                ground: TileCategory::Prism,
                ground_variants: 6,
                solid: Appearance::new(TileCategory::Void, 0),
                tunnel: Appearance::new(TileCategory::Prism, 5),
                style: RoomStyle {
                    floor: Appearance::new(TileCategory::Prism, 1),
                    wall: Appearance::new(TileCategory::Crystal, 2),
                    roof: None,
                },
                items: &[(ItemKind::Crystal, 0.02)],
                entities: &[(EntityKind::Mimic, 0.004), (EntityKind::Phantom, 0.002)],
            },
        }
    }

    /// Ground appearance for a given variant roll
    pub fn ground(&self, roll: u8) -> Appearance {
        let config = self.config();
        Appearance::new(config.ground, roll % config.ground_variants.max(1))
    }
}
