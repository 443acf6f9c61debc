//! RON data loader
//!
//! Loads floorplans from external RON files, with fallback to the built-in
//! defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BuildError, DataError};
use crate::world::floorplan::{default_floorplans, Floorplan};

/// Where data files live relative to the working directory
pub const DATA_DIR: &str = "assets/data";

/// Named floorplans available to world builds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorplanLibrary {
    pub floorplans: Vec<Floorplan>,
}

impl FloorplanLibrary {
    /// Find a floorplan by name
    pub fn find(&self, name: &str) -> Option<&Floorplan> {
        self.floorplans.iter().find(|p| p.name == name)
    }

    /// Find a floorplan by name, failing the build when it is missing
    pub fn get(&self, name: &str) -> Result<&Floorplan, BuildError> {
        self.find(name)
            .ok_or_else(|| BuildError::MissingFloorplan(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.floorplans.iter().map(|p| p.name.as_str())
    }

    /// Drop plans that would fail to decode, keeping the rest
    fn validated(mut self) -> Self {
        self.floorplans.retain(|plan| match plan.cells() {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Dropping floorplan '{}': {}", plan.name, e);
                false
            }
        });
        self
    }
}

/// Manages all external world data
#[derive(Debug, Clone)]
pub struct DataManager {
    pub floorplans: FloorplanLibrary,
}

impl DataManager {
    /// Create a new DataManager, loading from files or using defaults
    pub fn new() -> Self {
        Self::load_from(Path::new(DATA_DIR))
    }

    /// Load data from a directory, file by file
    pub fn load_from(base_path: &Path) -> Self {
        Self {
            floorplans: Self::load_floorplans(base_path),
        }
    }

    fn load_floorplans(base_path: &Path) -> FloorplanLibrary {
        let path = base_path.join("floorplans.ron");
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => match ron::from_str::<FloorplanLibrary>(&content) {
                    Ok(library) => {
                        let library = library.validated();
                        log::info!("Loaded {} floorplans from {}", library.floorplans.len(), path.display());
                        return library;
                    }
                    Err(e) => log::warn!("Failed to parse floorplans.ron: {}", e),
                },
                Err(e) => log::warn!("Failed to read floorplans.ron: {}", e),
            }
        }
        FloorplanLibrary {
            floorplans: default_floorplans(),
        }
    }

    /// Look up a floorplan by name
    pub fn floorplan(&self, name: &str) -> Result<&Floorplan, BuildError> {
        self.floorplans.get(name)
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            floorplans: FloorplanLibrary {
                floorplans: default_floorplans(),
            },
        }
    }
}

/// Export all default data to RON files for easy editing
pub fn export_default_data(base_path: &Path) -> Result<(), DataError> {
    if !base_path.exists() {
        fs::create_dir_all(base_path)?;
    }

    let library = FloorplanLibrary {
        floorplans: default_floorplans(),
    };
    let text = ron::ser::to_string_pretty(&library, ron::ser::PrettyConfig::default())?;
    fs::write(base_path.join("floorplans.ron"), text)?;
    log::info!("Exported default data to {}", base_path.display());

    Ok(())
}
