//! World snapshots
//!
//! Saves the current environment and player position to disk as JSON. The
//! camera is not stored; it is rebuilt around the player on load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SaveError;
use crate::world::generation::BuildParams;
use crate::world::{Environment, Position};

/// Snapshot file version for compatibility checking
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to resume in an environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub version: u32,
    pub player: Position,
    pub environment: Environment,
}

impl WorldSnapshot {
    pub fn new(environment: &Environment, player: Position) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            player,
            environment: environment.clone(),
        }
    }

    /// Reject snapshots whose handles no longer line up
    fn validate(&self) -> Result<(), SaveError> {
        let env = &self.environment;
        let grid = &env.grid;
        let expected = (grid.width as i64).checked_mul(grid.height as i64);
        if grid.width <= 0 || grid.height <= 0 || expected != Some(grid.tiles.len() as i64) {
            return Err(SaveError::InvalidData(format!(
                "grid is {}x{} but holds {} tiles",
                grid.width,
                grid.height,
                grid.tiles.len()
            )));
        }
        if let Some(room) = env.rooms.iter().find(|r| !r.is_consistent(grid)) {
            return Err(SaveError::InvalidData(format!("room '{}' does not match its tiles", room.name)));
        }
        if let Some(item) = env.items.iter().find(|i| grid.at(i.pos).and_then(|t| t.item) != Some(i.id)) {
            return Err(SaveError::InvalidData(format!("item {:?} is not on its tile", item.id)));
        }
        if let Some(entity) = env.entities.iter().find(|e| grid.at(e.pos).and_then(|t| t.entity) != Some(e.id)) {
            return Err(SaveError::InvalidData(format!("entity {:?} is not on its tile", entity.id)));
        }
        if !grid.contains(self.player) {
            return Err(SaveError::InvalidData(format!("player at {:?} is off the grid", self.player)));
        }
        Ok(())
    }
}

/// Get the save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "tilesmith", "Tilesmith") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// Get the path for a specific save slot
pub fn save_path(slot: u8) -> PathBuf {
    let mut path = save_directory();
    path.push(format!("world_{}.json", slot));
    path
}

/// Check if a save exists in the given slot
pub fn save_exists(slot: u8) -> bool {
    save_path(slot).exists()
}

/// Write a snapshot to an explicit path
pub fn save_to_path(path: &Path, environment: &Environment, player: Position) -> Result<(), SaveError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let snapshot = WorldSnapshot::new(environment, player);
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json)?;
    log::info!("Saved {} to {}", environment.name, path.display());
    Ok(())
}

/// Read a snapshot back, check it and rebuild the camera
pub fn load_from_path(path: &Path, screen_width: f32, screen_height: f32) -> Result<WorldSnapshot, SaveError> {
    let data = fs::read_to_string(path)?;
    let mut snapshot: WorldSnapshot = serde_json::from_str(&data)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }
    snapshot.validate()?;

    let env = &mut snapshot.environment;
    let fixed = BuildParams::for_kind(env.kind, env.level).fixed_camera;
    env.reset_camera(screen_width, screen_height, fixed);
    env.camera.follow(snapshot.player);

    log::info!("Loaded {} from {}", env.name, path.display());
    Ok(snapshot)
}

/// Save the environment to a slot
pub fn save_world(slot: u8, environment: &Environment, player: Position) -> Result<(), SaveError> {
    save_to_path(&save_path(slot), environment, player)
}

/// Load the environment from a slot
pub fn load_world(slot: u8, screen_width: f32, screen_height: f32) -> Result<WorldSnapshot, SaveError> {
    load_from_path(&save_path(slot), screen_width, screen_height)
}

/// Delete a save slot
pub fn delete_save(slot: u8) -> Result<(), SaveError> {
    let path = save_path(slot);
    if path.exists() {
        fs::remove_file(&path)?;
        log::info!("Deleted save slot {}", slot);
    }
    Ok(())
}
