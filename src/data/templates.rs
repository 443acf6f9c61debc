//! Item and entity templates
//!
//! Every spawnable thing is a variant of [`ItemKind`] or [`EntityKind`]
//! mapping to an immutable template record. The string key survives only
//! for serialization and debug output.

use serde::{Deserialize, Serialize};

use crate::world::Biome;

/// Immutable description of an item kind
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    /// Stable key used in save files and logs
    pub key: &'static str,
    pub name: &'static str,
    pub glyph: char,
    pub fg: (u8, u8, u8),
    /// Whether the item blocks movement through its tile
    pub blocks: bool,
    /// Emits light (lamps, torches)
    pub light_radius: Option<i32>,
}

/// Immutable description of an entity kind
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub glyph: char,
    pub fg: (u8, u8, u8),
    pub hostile: bool,
    /// Biomes this entity may spawn in
    pub biomes: &'static [Biome],
}

/// Things that lie on tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Door,
    Light,
    Bed,
    Table,
    Chair,
    Shelf,
    Chest,
    Plant,
    Rug,
    StairsDown,
    Flower,
    Mushroom,
    Bones,
    Rock,
    Crystal,
    Herb,
}

/// Things that move around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Rabbit,
    Deer,
    Scorpion,
    Wolf,
    Frog,
    Skeleton,
    Bat,
    Slime,
    CaveCrab,
    Sporeling,
    Phantom,
    Mimic,
    Bee,
}

impl ItemKind {
    pub const ALL: [ItemKind; 16] = [
        ItemKind::Door,
        ItemKind::Light,
        ItemKind::Bed,
        ItemKind::Table,
        ItemKind::Chair,
        ItemKind::Shelf,
        ItemKind::Chest,
        ItemKind::Plant,
        ItemKind::Rug,
        ItemKind::StairsDown,
        ItemKind::Flower,
        ItemKind::Mushroom,
        ItemKind::Bones,
        ItemKind::Rock,
        ItemKind::Crystal,
        ItemKind::Herb,
    ];

    pub fn template(&self) -> &'static ItemTemplate {
        match self {
            ItemKind::Door => &DOOR,
            ItemKind::Light => &LIGHT,
            ItemKind::Bed => &BED,
            ItemKind::Table => &TABLE,
            ItemKind::Chair => &CHAIR,
            ItemKind::Shelf => &SHELF,
            ItemKind::Chest => &CHEST,
            ItemKind::Plant => &PLANT,
            ItemKind::Rug => &RUG,
            ItemKind::StairsDown => &STAIRS_DOWN,
            ItemKind::Flower => &FLOWER,
            ItemKind::Mushroom => &MUSHROOM,
            ItemKind::Bones => &BONES,
            ItemKind::Rock => &ROCK,
            ItemKind::Crystal => &CRYSTAL,
            ItemKind::Herb => &HERB,
        }
    }

    pub fn key(&self) -> &'static str {
        self.template().key
    }

    /// Reverse lookup by key
    pub fn from_key(key: &str) -> Option<ItemKind> {
        Self::ALL.iter().copied().find(|kind| kind.key() == key)
    }
}

impl EntityKind {
    pub const ALL: [EntityKind; 13] = [
        EntityKind::Rabbit,
        EntityKind::Deer,
        EntityKind::Scorpion,
        EntityKind::Wolf,
        EntityKind::Frog,
        EntityKind::Skeleton,
        EntityKind::Bat,
        EntityKind::Slime,
        EntityKind::CaveCrab,
        EntityKind::Sporeling,
        EntityKind::Phantom,
        EntityKind::Mimic,
        EntityKind::Bee,
    ];

    pub fn template(&self) -> &'static EntityTemplate {
        match self {
            EntityKind::Rabbit => &RABBIT,
            EntityKind::Deer => &DEER,
            EntityKind::Scorpion => &SCORPION,
            EntityKind::Wolf => &WOLF,
            EntityKind::Frog => &FROG,
            EntityKind::Skeleton => &SKELETON,
            EntityKind::Bat => &BAT,
            EntityKind::Slime => &SLIME,
            EntityKind::CaveCrab => &CAVE_CRAB,
            EntityKind::Sporeling => &SPORELING,
            EntityKind::Phantom => &PHANTOM,
            EntityKind::Mimic => &MIMIC,
            EntityKind::Bee => &BEE,
        }
    }

    pub fn key(&self) -> &'static str {
        self.template().key
    }

    pub fn from_key(key: &str) -> Option<EntityKind> {
        Self::ALL.iter().copied().find(|kind| kind.key() == key)
    }

    /// Whether this entity may live in the given biome
    pub fn allowed_in(&self, biome: Biome) -> bool {
        self.template().biomes.contains(&biome)
    }
}

// ============================================================================
// Item templates
// ============================================================================

static DOOR: ItemTemplate = ItemTemplate {
    key: "door",
    name: "Door",
    glyph: '+',
    fg: (139, 90, 43),
    blocks: false,
    light_radius: None,
};

static LIGHT: ItemTemplate = ItemTemplate {
    key: "light",
    name: "Lamp",
    glyph: '☀',
    fg: (255, 200, 50),
    blocks: true,
    light_radius: Some(4),
};

static BED: ItemTemplate = ItemTemplate {
    key: "bed",
    name: "Bed",
    glyph: 'Θ',
    fg: (180, 60, 60),
    blocks: true,
    light_radius: None,
};

static TABLE: ItemTemplate = ItemTemplate {
    key: "table",
    name: "Table",
    glyph: 'π',
    fg: (150, 100, 60),
    blocks: true,
    light_radius: None,
};

static CHAIR: ItemTemplate = ItemTemplate {
    key: "chair",
    name: "Chair",
    glyph: 'h',
    fg: (150, 100, 60),
    blocks: true,
    light_radius: None,
};

static SHELF: ItemTemplate = ItemTemplate {
    key: "shelf",
    name: "Shelf",
    glyph: '╫',
    fg: (120, 80, 50),
    blocks: true,
    light_radius: None,
};

static CHEST: ItemTemplate = ItemTemplate {
    key: "chest",
    name: "Chest",
    glyph: '▬',
    fg: (200, 160, 60),
    blocks: true,
    light_radius: None,
};

static PLANT: ItemTemplate = ItemTemplate {
    key: "plant",
    name: "Potted Plant",
    glyph: '♣',
    fg: (60, 160, 60),
    blocks: false,
    light_radius: None,
};

static RUG: ItemTemplate = ItemTemplate {
    key: "rug",
    name: "Rug",
    glyph: '░',
    fg: (150, 50, 80),
    blocks: false,
    light_radius: None,
};

static STAIRS_DOWN: ItemTemplate = ItemTemplate {
    key: "stairs_down",
    name: "Stairs Down",
    glyph: '>',
    fg: (200, 200, 200),
    blocks: false,
    light_radius: None,
};

static FLOWER: ItemTemplate = ItemTemplate {
    key: "flower",
    name: "Flower",
    glyph: '*',
    fg: (230, 120, 200),
    blocks: false,
    light_radius: None,
};

static MUSHROOM: ItemTemplate = ItemTemplate {
    key: "mushroom",
    name: "Mushroom",
    glyph: '♠',
    fg: (200, 120, 90),
    blocks: false,
    light_radius: None,
};

static BONES: ItemTemplate = ItemTemplate {
    key: "bones",
    name: "Bones",
    glyph: '%',
    fg: (200, 200, 180),
    blocks: false,
    light_radius: None,
};

static ROCK: ItemTemplate = ItemTemplate {
    key: "rock",
    name: "Rock",
    glyph: 'o',
    fg: (140, 130, 120),
    blocks: false,
    light_radius: None,
};

static CRYSTAL: ItemTemplate = ItemTemplate {
    key: "crystal",
    name: "Crystal Shard",
    glyph: '♦',
    fg: (120, 200, 255),
    blocks: false,
    light_radius: Some(2),
};

static HERB: ItemTemplate = ItemTemplate {
    key: "herb",
    name: "Herb",
    glyph: '¥',
    fg: (120, 200, 90),
    blocks: false,
    light_radius: None,
};

// ============================================================================
// Entity templates
// ============================================================================

static RABBIT: EntityTemplate = EntityTemplate {
    key: "rabbit",
    name: "Rabbit",
    glyph: 'r',
    fg: (200, 190, 170),
    hostile: false,
    biomes: &[Biome::Meadow, Biome::Forest, Biome::Garden, Biome::Hearth],
};

static DEER: EntityTemplate = EntityTemplate {
    key: "deer",
    name: "Deer",
    glyph: 'd',
    fg: (170, 120, 70),
    hostile: false,
    biomes: &[Biome::Forest, Biome::Meadow, Biome::Tundra],
};

static SCORPION: EntityTemplate = EntityTemplate {
    key: "scorpion",
    name: "Scorpion",
    glyph: 's',
    fg: (220, 150, 60),
    hostile: true,
    biomes: &[Biome::Desert],
};

static WOLF: EntityTemplate = EntityTemplate {
    key: "wolf",
    name: "Wolf",
    glyph: 'w',
    fg: (160, 160, 170),
    hostile: true,
    biomes: &[Biome::Tundra, Biome::Forest],
};

static FROG: EntityTemplate = EntityTemplate {
    key: "frog",
    name: "Frog",
    glyph: 'f',
    fg: (80, 200, 80),
    hostile: false,
    biomes: &[Biome::Marsh, Biome::Garden],
};

static SKELETON: EntityTemplate = EntityTemplate {
    key: "skeleton",
    name: "Skeleton",
    glyph: 'S',
    fg: (220, 220, 200),
    hostile: true,
    biomes: &[Biome::Crypt],
};

static BAT: EntityTemplate = EntityTemplate {
    key: "bat",
    name: "Bat",
    glyph: 'b',
    fg: (120, 90, 110),
    hostile: true,
    biomes: &[Biome::Cavern, Biome::Crypt, Biome::CrystalGrotto],
};

static SLIME: EntityTemplate = EntityTemplate {
    key: "slime",
    name: "Slime",
    glyph: 'j',
    fg: (100, 220, 120),
    hostile: true,
    biomes: &[Biome::Cavern, Biome::FungalHollow, Biome::Marsh],
};

static CAVE_CRAB: EntityTemplate = EntityTemplate {
    key: "cave_crab",
    name: "Cave Crab",
    glyph: 'c',
    fg: (200, 90, 70),
    hostile: true,
    biomes: &[Biome::CrystalGrotto, Biome::Cavern],
};

static SPORELING: EntityTemplate = EntityTemplate {
    key: "sporeling",
    name: "Sporeling",
    glyph: 'm',
    fg: (190, 150, 210),
    hostile: true,
    biomes: &[Biome::FungalHollow],
};

static PHANTOM: EntityTemplate = EntityTemplate {
    key: "phantom",
    name: "Phantom",
    glyph: 'P',
    fg: (180, 180, 255),
    hostile: true,
    biomes: &[Biome::Dreamscape, Biome::Kaleidoscope, Biome::Crypt],
};

static MIMIC: EntityTemplate = EntityTemplate {
    key: "mimic",
    name: "Mimic",
    glyph: 'M',
    fg: (255, 120, 200),
    hostile: true,
    biomes: &[Biome::Kaleidoscope],
};

static BEE: EntityTemplate = EntityTemplate {
    key: "bee",
    name: "Bee",
    glyph: 'B',
    fg: (250, 210, 60),
    hostile: false,
    biomes: &[Biome::Garden, Biome::Meadow],
};
