//! World module
//!
//! Contains the tile grid, rooms, environments, and procedural generation.

pub mod biome;
pub mod enclosure;
pub mod environment;
pub mod floorplan;
pub mod generation;
pub mod geom;
pub mod grid;
pub mod merge;
pub mod room;
pub mod tile;
mod visibility;

pub use biome::Biome;
pub use enclosure::Enclosure;
pub use environment::{EntityRecord, Environment, ItemRecord, Placement, WorldKind};
pub use floorplan::Floorplan;
pub use geom::{Position, Rect};
pub use grid::Grid;
pub use room::{FloorplanRoom, Room, RoomStyle};
pub use tile::{Appearance, EntityId, ItemId, RoomId, Tile, TileCategory, TILE_SIZE};
