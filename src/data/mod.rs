//! Data loading and external world content
//!
//! Item and entity registries, plus floorplans loaded from external RON
//! files so layouts can be edited without a rebuild.

pub mod loader;
pub mod templates;

pub use loader::{export_default_data, DataManager, FloorplanLibrary, DATA_DIR};
pub use templates::{EntityKind, EntityTemplate, ItemKind, ItemTemplate};
