//! Biome labels
//!
//! Terrain categories assigned to tiles by the region partitioner.

use serde::{Deserialize, Serialize};

/// Terrain category of a tile, constrains what may spawn there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    // Surface
    Meadow,
    Forest,
    Desert,
    Tundra,
    Marsh,
    Hearth,
    Garden,

    // Underground
    Crypt,
    Cavern,
    CrystalGrotto,
    FungalHollow,

    // Hallucination
    Dreamscape,
    Kaleidoscope,
}

impl Biome {
    /// Get the biome name for display
    pub fn name(&self) -> &'static str {
        match self {
            Biome::Meadow => "Meadow",
            Biome::Forest => "Forest",
            Biome::Desert => "Desert",
            Biome::Tundra => "Tundra",
            Biome::Marsh => "Marsh",
            Biome::Hearth => "Hearth",
            Biome::Garden => "Garden",
            Biome::Crypt => "Crypt",
            Biome::Cavern => "Cavern",
            Biome::CrystalGrotto => "Crystal Grotto",
            Biome::FungalHollow => "Fungal Hollow",
            Biome::Dreamscape => "Dreamscape",
            Biome::Kaleidoscope => "Kaleidoscope",
        }
    }

    pub fn is_underground(&self) -> bool {
        matches!(
            self,
            Biome::Crypt | Biome::Cavern | Biome::CrystalGrotto | Biome::FungalHollow
        )
    }
}
