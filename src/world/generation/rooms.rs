//! Room and corridor generator
//!
//! Rectangular rooms dropped at random, allowed to overlap, merged, then
//! joined centre to centre by L-shaped tunnels. Used for dungeon and
//! hallucination levels.

use rand::rngs::StdRng;
use rand::Rng;

use super::{room_anchor, BuildParams};
use crate::error::BuildError;
use crate::world::tile::{Appearance, TileCategory};
use crate::world::{Environment, Position, Rect, RoomId, WorldKind};

/// Place, merge and connect rooms, then pick the start
pub fn build_rooms(
    env: &mut Environment,
    kind: WorldKind,
    params: &BuildParams,
    rng: &mut StdRng,
) -> Result<(), BuildError> {
    let (min_count, max_count) = params.room_count;
    let count = rng.gen_range(min_count..=max_count.max(min_count));
    let (min_size, max_size) = params.room_size;
    let max_size = max_size.min(env.width() - 2).min(env.height() - 2);
    if max_size < 3 || min_size > max_size {
        return Err(BuildError::InvalidDimensions {
            width: env.width(),
            height: env.height(),
        });
    }

    for n in 0..count {
        let w = rng.gen_range(min_size.max(3)..=max_size);
        let h = rng.gen_range(min_size.max(3)..=max_size);
        let x = rng.gen_range(1..=env.width() - w - 1);
        let y = rng.gen_range(1..=env.height() - h - 1);
        let theme = env.theme;
        env.add_rect_room(&format!("chamber {}", n + 1), Rect::with_size(x, y, w, h), theme)?;
    }

    let merged = match kind {
        WorldKind::Hallucination => env.merge_rooms_by_component(),
        _ => env.merge_rooms(),
    };
    log::debug!("{}: {} rooms placed, {} merged away", env.name, count, merged);

    if kind == WorldKind::Hallucination {
        shift_room_colours(env, rng);
    }

    let ids: Vec<RoomId> = env.rooms.iter().map(|r| r.id).collect();
    let anchors: Vec<Position> = ids.iter().filter_map(|id| room_anchor(env, *id)).collect();
    for pair in anchors.windows(2) {
        connect(env, pair[0], pair[1], rng.gen_bool(0.5));
    }

    env.start = match anchors.first() {
        Some(first) => *first,
        None => carve_fallback(env),
    };
    Ok(())
}

/// Carve an L-shaped tunnel between two points
pub fn connect(env: &mut Environment, from: Position, to: Position, horizontal_first: bool) {
    if horizontal_first {
        env.create_horizontal_tunnel(from.x..=to.x, from.y);
        env.create_vertical_tunnel(from.y..=to.y, to.x);
    } else {
        env.create_vertical_tunnel(from.y..=to.y, from.x);
        env.create_horizontal_tunnel(from.x..=to.x, to.y);
    }
}

/// Each hallucination room gets its own random floor tint
fn shift_room_colours(env: &mut Environment, rng: &mut StdRng) {
    for room in &mut env.rooms {
        room.floor = Appearance::new(TileCategory::Prism, rng.gen_range(0..8));
        let look = room.interior_appearance();
        for pos in room.tiles.difference(&room.walls) {
            env.grid.set_appearance(*pos, look);
        }
    }
}

/// A small open patch in the middle, for levels where nothing was placed
fn carve_fallback(env: &mut Environment) -> Position {
    let center = Position::new(env.width() / 2, env.height() / 2);
    for y in center.y - 1..=center.y + 1 {
        env.create_horizontal_tunnel(center.x - 1..=center.x + 1, y);
    }
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Biome, RoomStyle};
    use rand::SeedableRng;

    fn solid_env() -> Environment {
        let style = RoomStyle {
            floor: Appearance::new(TileCategory::Floor, 0),
            wall: Appearance::new(TileCategory::Wall, 0),
            roof: None,
        };
        let mut env = Environment::new(
            "dig",
            WorldKind::Dungeon,
            1,
            40,
            30,
            Appearance::new(TileCategory::Rock, 0),
            Biome::Crypt,
            style,
        )
        .unwrap();
        for tile in &mut env.grid.tiles {
            tile.blocked = true;
        }
        env
    }

    #[test]
    fn test_connect_opens_path() {
        let mut env = solid_env();
        connect(&mut env, Position::new(2, 2), Position::new(10, 8), true);
        for x in 2..=10 {
            assert!(!env.grid.is_blocked(x, 2));
        }
        for y in 2..=8 {
            assert!(!env.grid.is_blocked(10, y));
        }
        assert!(env.grid.is_blocked(2, 8));
    }

    #[test]
    fn test_rooms_connected_and_merged() {
        let mut env = solid_env();
        let mut rng = StdRng::seed_from_u64(3);
        let params = BuildParams {
            room_count: (8, 8),
            room_size: (4, 8),
            ..BuildParams::for_kind(WorldKind::Dungeon, 1)
        };
        build_rooms(&mut env, WorldKind::Dungeon, &params, &mut rng).unwrap();
        assert!(!env.rooms.is_empty());
        assert!(!env.grid.is_blocked(env.start.x, env.start.y));
        for room in &env.rooms {
            assert!(room.is_consistent(&env.grid));
        }
        for (i, a) in env.rooms.iter().enumerate() {
            for b in env.rooms.iter().skip(i + 1) {
                assert!(a.tiles.is_disjoint(&b.tiles));
            }
        }
    }

    #[test]
    fn test_fallback_when_no_rooms() {
        let mut env = solid_env();
        let mut rng = StdRng::seed_from_u64(3);
        let params = BuildParams {
            room_count: (0, 0),
            ..BuildParams::for_kind(WorldKind::Dungeon, 1)
        };
        build_rooms(&mut env, WorldKind::Dungeon, &params, &mut rng).unwrap();
        assert_eq!(env.start, Position::new(20, 15));
        assert!(!env.grid.is_blocked(20, 15));
    }
}
