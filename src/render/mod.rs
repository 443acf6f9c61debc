//! Rendering
//!
//! A clamped camera over the grid and a terminal tile renderer that draws
//! through it.

pub mod camera;
pub mod tilemap;

pub use camera::{Camera, DEFAULT_ZOOM_STEP, MAX_ZOOM, MIN_ZOOM};
pub use tilemap::TileRenderer;
