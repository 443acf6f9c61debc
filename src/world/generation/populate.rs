//! Population
//!
//! Rolls each biome's spawn table over open tiles. Misses and biome
//! mismatches are skipped; nothing here can fail a build.

use rand::Rng;

use crate::data::ItemKind;
use crate::world::{Environment, Position};

/// Scatter items and entities, returning how many of each were placed
pub fn populate(env: &mut Environment, rng: &mut impl Rng) -> (usize, usize) {
    let candidates = env.grid.positions_where(|t| t.is_free());
    let mut items = 0;
    let mut entities = 0;

    for pos in candidates {
        if pos == env.start {
            continue;
        }
        let Some(tile) = env.grid.at(pos) else {
            continue;
        };
        let biome = tile.biome;
        let in_room = tile.room.is_some();
        if in_room && env.room_at(pos.x, pos.y).map_or(true, |r| r.is_wall(pos)) {
            continue;
        }
        let config = biome.config();

        if let Some((kind, _)) = config.items.iter().find(|(_, chance)| rng.gen_bool(*chance)) {
            if env.spawn_item(*kind, pos).is_some() {
                items += 1;
                continue;
            }
        }

        // Entities stay out of rooms
        if in_room {
            continue;
        }
        if let Some((kind, _)) = config.entities.iter().find(|(_, chance)| rng.gen_bool(*chance)) {
            if !kind.allowed_in(biome) {
                log::debug!("Skipped {:?}: not native to {}", kind, biome.name());
                continue;
            }
            if env.spawn_entity(*kind, pos).is_some() {
                entities += 1;
            }
        }
    }
    (items, entities)
}

/// Put stairs down on the free tile furthest from the start
pub fn place_stairs(env: &mut Environment) -> Option<Position> {
    let start = env.start;
    let exit = env
        .grid
        .positions_where(|t| t.is_free())
        .into_iter()
        .filter(|p| *p != start)
        .max_by_key(|p| p.distance(&start))?;
    env.spawn_item(ItemKind::StairsDown, exit)?;
    Some(exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::{Appearance, TileCategory};
    use crate::world::{Biome, Rect, RoomStyle, WorldKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn env() -> Environment {
        let style = RoomStyle {
            floor: Appearance::new(TileCategory::Floor, 0),
            wall: Appearance::new(TileCategory::Wall, 0),
            roof: None,
        };
        Environment::new(
            "pop",
            WorldKind::Garden,
            0,
            40,
            40,
            Appearance::new(TileCategory::Soil, 0),
            Biome::Garden,
            style,
        )
        .unwrap()
    }

    #[test]
    fn test_population_respects_rules() {
        let mut env = env();
        let room = env.add_rect_room("shed", Rect::new(10, 10, 20, 20), env.theme).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let (items, entities) = populate(&mut env, &mut rng);
        assert!(items > 0);
        assert_eq!(items, env.items.len());
        assert_eq!(entities, env.entities.len());

        let room = env.room(room).unwrap();
        for record in &env.items {
            assert!(!room.is_wall(record.pos));
            assert_ne!(record.pos, env.start);
        }
        for record in &env.entities {
            assert!(!room.tiles.contains(&record.pos));
            assert!(record.kind.allowed_in(Biome::Garden));
        }
    }

    #[test]
    fn test_stairs_go_far_from_start() {
        let mut env = env();
        env.start = Position::new(0, 0);
        let exit = place_stairs(&mut env).unwrap();
        assert_eq!(exit, Position::new(39, 39));
        let id = env.grid.at(exit).and_then(|t| t.item).unwrap();
        assert_eq!(env.item(id).map(|r| r.kind), Some(ItemKind::StairsDown));
    }
}
