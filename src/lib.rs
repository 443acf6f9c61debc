//! Tilesmith - procedural tile worlds with rooms, fog and a camera
//!
//! Builds biome-partitioned grids, places and merges rooms, detects
//! player-built enclosures, and tracks what the player has seen.

pub mod data;
pub mod error;
pub mod game;
pub mod render;
pub mod save;
pub mod world;

// Re-export commonly used types
pub use error::{BuildError, DataError, SaveError};
pub use game::GameContext;
pub use world::generation::{build_environment, BuildContext, BuildParams};
pub use world::{Environment, WorldKind};
