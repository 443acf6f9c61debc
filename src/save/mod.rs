//! Save/load system
//!
//! Handles writing world snapshots to disk and reading them back.

pub mod snapshot;

pub use snapshot::{
    WorldSnapshot, SNAPSHOT_VERSION,
    save_world, load_world, save_to_path, load_from_path,
    delete_save, save_exists, save_path, save_directory,
};
