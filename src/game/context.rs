//! Game context
//!
//! Everything a session shares: the random source, loaded data and every
//! environment built so far, keyed by where it sits in the world.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::data::DataManager;
use crate::error::BuildError;
use crate::world::generation::{build_environment, BuildContext, BuildParams};
use crate::world::{Environment, Position, WorldKind};

/// A world kind plus level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub kind: WorldKind,
    pub level: u32,
}

impl Location {
    pub fn new(kind: WorldKind, level: u32) -> Self {
        // Only numbered kinds keep their level
        let level = if kind.is_leveled() { level.max(1) } else { 0 };
        Self { kind, level }
    }
}

pub struct GameContext {
    pub rng: StdRng,
    pub data: DataManager,
    worlds: HashMap<Location, Environment>,
    current: Option<Location>,
}

impl GameContext {
    pub fn new(seed: u64, data: DataManager) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            data,
            worlds: HashMap::new(),
            current: None,
        }
    }

    /// Switch to an environment, building it on first visit
    ///
    /// A failed build leaves the current environment as it was.
    pub fn enter(&mut self, kind: WorldKind, level: u32) -> Result<&mut Environment, BuildError> {
        let location = Location::new(kind, level);
        let env = match self.worlds.entry(location) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                let params = BuildParams::for_kind(location.kind, location.level);
                let mut ctx = BuildContext {
                    rng: &mut self.rng,
                    data: &self.data,
                };
                match build_environment(location.kind, location.level, &params, &mut ctx) {
                    Ok(env) => slot.insert(env),
                    Err(e) => {
                        log::error!("Could not enter {:?}: {}", location, e);
                        return Err(e);
                    }
                }
            }
        };
        self.current = Some(location);
        log::info!("Entered {}", env.name);
        Ok(env)
    }

    /// Go one level deeper in the current leveled world
    pub fn descend(&mut self) -> Result<&mut Environment, BuildError> {
        let next = match self.current {
            Some(loc) if loc.kind.is_leveled() => Location::new(loc.kind, loc.level + 1),
            _ => Location::new(WorldKind::Dungeon, 1),
        };
        self.enter(next.kind, next.level)
    }

    /// Put a restored environment in the registry and make it current
    ///
    /// Visibility is rechecked at `player` with the roof logic forced.
    pub fn restore(&mut self, env: Environment, player: Position) -> &mut Environment {
        let location = Location::new(env.kind, env.level);
        self.current = Some(location);
        let env = match self.worlds.entry(location) {
            Entry::Occupied(mut slot) => {
                slot.insert(env);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(env),
        };
        env.check_tile(player.x, player.y, true);
        env
    }

    pub fn location(&self) -> Option<Location> {
        self.current
    }

    pub fn current(&self) -> Option<&Environment> {
        self.worlds.get(&self.current?)
    }

    pub fn current_mut(&mut self) -> Option<&mut Environment> {
        let location = self.current?;
        self.worlds.get_mut(&location)
    }

    /// Built levels of one world kind, shallowest first
    pub fn levels(&self, kind: WorldKind) -> Vec<&Environment> {
        let mut levels: Vec<(u32, &Environment)> = self
            .worlds
            .iter()
            .filter(|(loc, _)| loc.kind == kind)
            .map(|(loc, env)| (loc.level, env))
            .collect();
        levels.sort_by_key(|(level, _)| *level);
        levels.into_iter().map(|(_, env)| env).collect()
    }

    pub fn visited(&self) -> usize {
        self.worlds.len()
    }
}
