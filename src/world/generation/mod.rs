//! Procedural world generation
//!
//! One pipeline per world kind. Every build runs the same ordered steps:
//! partition into biomes, paint the ground, place rooms, merge them, carve
//! corridors, populate, pick the start, place stairs. A failed attempt is
//! thrown away and rebuilt from scratch.

pub mod biomes;
pub mod caves;
pub mod partition;
pub mod populate;
pub mod rooms;
pub mod surface;

pub use biomes::BiomeConfig;
pub use partition::{nearest_seed, partition, random_seeds, Seed};

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Biome, Environment, Position, WorldKind};
use crate::data::DataManager;
use crate::error::BuildError;

/// How many times a whole pipeline is retried before giving up
pub const BUILD_ATTEMPTS: u32 = 3;

/// Knobs for one environment build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildParams {
    pub width: i32,
    pub height: i32,
    /// Biomes to partition the grid into; the first one sets the theme
    pub biomes: Vec<Biome>,
    /// Partition seeds per listed biome
    pub seeds_per_biome: usize,
    /// Inclusive range of rectangular rooms to place
    pub room_count: (usize, usize),
    /// Inclusive range of room edge lengths
    pub room_size: (i32, i32),
    /// Floorplans to place, by name
    pub floorplans: Vec<String>,
    pub soundtrack: String,
    /// Start with every tile hidden
    pub fog: bool,
    /// Rooms get the theme's roof
    pub roofed: bool,
    /// Rooms reveal whole on first entry
    pub hidden_rooms: bool,
    /// Fill the grid with unbreakable-bordered rock before carving
    pub solid: bool,
    /// Camera does not follow the player
    pub fixed_camera: bool,
}

impl BuildParams {
    /// Defaults for a world kind at a given level
    pub fn for_kind(kind: WorldKind, level: u32) -> Self {
        let depth = level.max(1) as usize;
        let base = BuildParams {
            width: 80,
            height: 50,
            biomes: vec![Biome::Meadow],
            seeds_per_biome: 1,
            room_count: (0, 0),
            room_size: (5, 10),
            floorplans: Vec::new(),
            soundtrack: String::new(),
            fog: false,
            roofed: false,
            hidden_rooms: false,
            solid: false,
            fixed_camera: false,
        };
        match kind {
            WorldKind::Home => BuildParams {
                width: 40,
                height: 30,
                biomes: vec![Biome::Hearth],
                floorplans: vec!["cottage".into()],
                soundtrack: "home".into(),
                roofed: true,
                fixed_camera: true,
                ..base
            },
            WorldKind::Overworld => BuildParams {
                width: 160,
                height: 120,
                biomes: vec![Biome::Meadow, Biome::Forest, Biome::Desert, Biome::Tundra, Biome::Marsh],
                seeds_per_biome: 2,
                room_count: (3, 6),
                room_size: (5, 9),
                floorplans: vec!["hut".into(), "shed".into(), "chapel".into(), "cottage".into()],
                soundtrack: "overworld".into(),
                roofed: true,
                ..base
            },
            WorldKind::Dungeon => BuildParams {
                biomes: vec![Biome::Crypt],
                room_count: (6 + depth, 6 + depth),
                soundtrack: "dungeon".into(),
                fog: true,
                hidden_rooms: true,
                solid: true,
                ..base
            },
            WorldKind::Cave => BuildParams {
                biomes: vec![Biome::Cavern, Biome::CrystalGrotto, Biome::FungalHollow],
                soundtrack: "cave".into(),
                fog: true,
                solid: true,
                ..base
            },
            WorldKind::Hallucination => BuildParams {
                width: 60,
                height: 40,
                biomes: vec![Biome::Dreamscape, Biome::Kaleidoscope],
                seeds_per_biome: 6,
                room_count: (8 + depth, 10 + depth),
                room_size: (4, 9),
                soundtrack: "hallucination".into(),
                fog: true,
                hidden_rooms: true,
                ..base
            },
            WorldKind::Garden => BuildParams {
                width: 50,
                height: 36,
                biomes: vec![Biome::Garden],
                floorplans: vec!["greenhouse".into()],
                soundtrack: "garden".into(),
                roofed: true,
                ..base
            },
        }
    }
}

/// What a build may read and consume
pub struct BuildContext<'a> {
    pub rng: &'a mut StdRng,
    pub data: &'a DataManager,
}

/// Build an environment, retrying the whole pipeline on failure
pub fn build_environment(
    kind: WorldKind,
    level: u32,
    params: &BuildParams,
    ctx: &mut BuildContext,
) -> Result<Environment, BuildError> {
    let mut attempt = 1;
    loop {
        match build_once(kind, level, params, ctx) {
            Ok(env) => {
                log::info!(
                    "Built {} ({}x{}, {} rooms, {} items, {} entities) on attempt {}",
                    env.name,
                    env.width(),
                    env.height(),
                    env.rooms.len(),
                    env.items.len(),
                    env.entities.len(),
                    attempt
                );
                return Ok(env);
            }
            Err(err) if attempt < BUILD_ATTEMPTS => {
                log::warn!("{} build attempt {} failed: {}", kind.name(), attempt, err);
                attempt += 1;
            }
            Err(err) => {
                log::error!("{} build aborted: {}", kind.name(), err);
                return Err(BuildError::AttemptsExhausted {
                    kind,
                    attempts: attempt,
                    source: Box::new(err),
                });
            }
        }
    }
}

fn environment_name(kind: WorldKind, level: u32) -> String {
    if kind.is_leveled() {
        format!("{} {}", kind.name(), level)
    } else {
        kind.name().to_string()
    }
}

fn build_once(
    kind: WorldKind,
    level: u32,
    params: &BuildParams,
    ctx: &mut BuildContext,
) -> Result<Environment, BuildError> {
    let primary = params.biomes.first().copied().unwrap_or(Biome::Meadow);
    let style = primary.config().style;
    let theme = if params.roofed { style } else { style.without_roof() };
    let mut env = Environment::new(
        &environment_name(kind, level),
        kind,
        level,
        params.width,
        params.height,
        primary.ground(0),
        primary,
        theme,
    )?;
    env.soundtrack = params.soundtrack.clone();

    let biomes: Vec<Biome> = params
        .biomes
        .iter()
        .flat_map(|b| std::iter::repeat(*b).take(params.seeds_per_biome.max(1)))
        .collect();
    let seeds = random_seeds(ctx.rng, env.width(), env.height(), &biomes);
    partition(&mut env.grid, &seeds);

    paint_ground(&mut env, params, ctx.rng);
    log::debug!("{}: ground painted", env.name);

    // Rooms, merge and corridors differ per kind; each sets the start
    match kind {
        WorldKind::Home => surface::build_home(&mut env, params, ctx)?,
        WorldKind::Overworld => surface::build_overworld(&mut env, params, ctx)?,
        WorldKind::Garden => surface::build_garden(&mut env, params, ctx)?,
        WorldKind::Dungeon | WorldKind::Hallucination => rooms::build_rooms(&mut env, kind, params, ctx.rng)?,
        WorldKind::Cave => caves::build_caves(&mut env, ctx.rng),
    }

    let (items, entities) = populate::populate(&mut env, ctx.rng);
    log::debug!("{}: populated {} items, {} entities", env.name, items, entities);

    if kind.is_leveled() && populate::place_stairs(&mut env).is_none() {
        log::warn!("{}: no free tile for stairs", env.name);
    }

    if params.fog {
        env.fog_all();
        if !params.hidden_rooms {
            for room in &mut env.rooms {
                room.hidden = false;
            }
        }
    } else if params.hidden_rooms {
        for room in &mut env.rooms {
            room.hidden = true;
        }
    }
    Ok(env)
}

/// Give every tile its biome's ground, or solid fill
fn paint_ground(env: &mut Environment, params: &BuildParams, rng: &mut StdRng) {
    for tile in &mut env.grid.tiles {
        if params.solid {
            tile.appearance = tile.biome.config().solid;
            tile.blocked = true;
        } else {
            tile.appearance = tile.biome.ground(rng.gen());
        }
    }
    if params.solid {
        let rim = params.biomes.first().copied().unwrap_or(Biome::Cavern).config().solid;
        env.grid.seal_border(rim);
    }
}

/// An open tile of a room close to its middle, for corridors and starts
pub(crate) fn room_anchor(env: &Environment, id: super::RoomId) -> Option<Position> {
    let room = env.room(id)?;
    let center = room.bounds.center();
    room.interior()
        .copied()
        .filter(|p| !env.grid.is_blocked(p.x, p.y))
        .min_by_key(|p| p.distance(&center))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn build(kind: WorldKind, level: u32, seed: u64) -> Environment {
        let data = DataManager::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = BuildContext { rng: &mut rng, data: &data };
        build_environment(kind, level, &BuildParams::for_kind(kind, level), &mut ctx).unwrap()
    }

    fn assert_sound(env: &Environment) {
        for room in &env.rooms {
            assert!(room.is_consistent(&env.grid), "room {} inconsistent", room.name);
        }
        for item in &env.items {
            assert_eq!(env.grid.at(item.pos).and_then(|t| t.item), Some(item.id));
        }
        for entity in &env.entities {
            assert_eq!(env.grid.at(entity.pos).and_then(|t| t.entity), Some(entity.id));
        }
        let mut owners = std::collections::HashMap::new();
        for room in &env.rooms {
            for p in &room.tiles {
                assert!(owners.insert(*p, room.id).is_none(), "tile {:?} in two rooms", p);
            }
        }
    }

    #[test]
    fn test_every_kind_builds() {
        let kinds = [
            WorldKind::Home,
            WorldKind::Overworld,
            WorldKind::Dungeon,
            WorldKind::Cave,
            WorldKind::Hallucination,
            WorldKind::Garden,
        ];
        for kind in kinds {
            let env = build(kind, 1, 42);
            assert_eq!(env.kind, kind);
            assert!(env.grid.contains(env.start));
            assert!(!env.grid.is_blocked(env.start.x, env.start.y), "{:?} start blocked", kind);
            assert_sound(&env);
        }
    }

    #[test]
    fn test_dungeon_levels() {
        let env = build(WorldKind::Dungeon, 3, 9);
        assert_eq!(env.name, "Dungeon 3");
        assert!(env.items.iter().any(|i| i.kind == crate::data::ItemKind::StairsDown));
        assert!(env.grid.tiles.iter().all(|t| t.hidden));
        assert!(env.rooms.iter().all(|r| r.hidden));
        // Border is sealed
        assert!(env.grid.get(0, 0).map_or(false, |t| t.unbreakable));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = build(WorldKind::Cave, 2, 1234);
        let b = build(WorldKind::Cave, 2, 1234);
        assert_eq!(a.start, b.start);
        let blocked_a: Vec<bool> = a.grid.tiles.iter().map(|t| t.blocked).collect();
        let blocked_b: Vec<bool> = b.grid.tiles.iter().map(|t| t.blocked).collect();
        assert_eq!(blocked_a, blocked_b);
    }

    #[test]
    fn test_failing_build_reports_attempts() {
        let data = DataManager::default();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ctx = BuildContext { rng: &mut rng, data: &data };
        let params = BuildParams {
            floorplans: vec!["no such plan".into()],
            ..BuildParams::for_kind(WorldKind::Home, 0)
        };
        let result = build_environment(WorldKind::Home, 0, &params, &mut ctx);
        assert!(matches!(
            result,
            Err(BuildError::AttemptsExhausted { attempts: BUILD_ATTEMPTS, .. })
        ));
    }

    #[test]
    fn test_params_round_trip_through_ron() {
        let params = BuildParams::for_kind(WorldKind::Overworld, 0);
        let text = ron::to_string(&params).unwrap();
        let back: BuildParams = ron::from_str(&text).unwrap();
        assert_eq!(back, params);
    }
}
