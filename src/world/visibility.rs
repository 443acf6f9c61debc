//! Fog of war and roof peeling
//!
//! Tiles start hidden on fogged levels and are revealed around the player
//! as they move. A revealed tile is never hidden again. Roofed rooms show
//! their roof from outside and their floor from inside.

use super::environment::Environment;
use super::tile::RoomId;

impl Environment {
    /// Update visibility for the player standing at (x, y)
    ///
    /// `startup` forces the roof logic to run even when the room has not
    /// changed, for the first check after entering an environment.
    pub fn check_tile(&mut self, x: i32, y: i32, startup: bool) {
        let Some(tile) = self.grid.get(x, y) else {
            return;
        };
        let pos = tile.pos;
        let current = tile.room;

        for p in self.grid.vicinity(pos) {
            if let Some(t) = self.grid.at_mut(p) {
                t.hidden = false;
            }
        }

        if let Some(id) = current {
            self.reveal_room(id);
        }

        if current != self.player_room || startup {
            if let Some(previous) = self.player_room.filter(|prev| Some(*prev) != current) {
                if let Some(room) = self.rooms.iter_mut().find(|r| r.id == previous) {
                    room.close_roof(&mut self.grid);
                }
            }
            if let Some(id) = current {
                if let Some(room) = self.rooms.iter_mut().find(|r| r.id == id) {
                    room.open_roof(&mut self.grid);
                }
            }
            self.player_room = current;
        }
    }

    /// Uncover a hidden room and every tile it owns
    fn reveal_room(&mut self, id: RoomId) {
        let Some(room) = self.rooms.iter_mut().find(|r| r.id == id) else {
            return;
        };
        if !room.hidden {
            return;
        }
        room.hidden = false;
        for p in &room.tiles {
            if let Some(t) = self.grid.at_mut(*p) {
                t.hidden = false;
            }
        }
        log::debug!("Revealed room {:?} '{}'", room.id, room.name);
    }

    /// Hide every tile and room, for fogged levels
    pub fn fog_all(&mut self) {
        for tile in &mut self.grid.tiles {
            tile.hidden = true;
        }
        for room in &mut self.rooms {
            room.hidden = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::world::tile::{Appearance, TileCategory};
    use crate::world::{Biome, Environment, Position, Rect, RoomStyle, WorldKind};

    fn style() -> RoomStyle {
        RoomStyle {
            floor: Appearance::new(TileCategory::Floor, 0),
            wall: Appearance::new(TileCategory::Wall, 0),
            roof: Some(Appearance::new(TileCategory::Roof, 0)),
        }
    }

    fn fogged() -> Environment {
        let mut env = Environment::new(
            "fog",
            WorldKind::Dungeon,
            1,
            16,
            16,
            Appearance::new(TileCategory::Stone, 0),
            Biome::Crypt,
            style(),
        )
        .unwrap();
        env.add_rect_room("hall", Rect::new(6, 6, 12, 12), style()).unwrap();
        env.fog_all();
        env
    }

    fn category(env: &Environment, x: i32, y: i32) -> Option<TileCategory> {
        env.grid.get(x, y).map(|t| t.appearance.category)
    }

    #[test]
    fn test_reveals_neighbourhood() {
        let mut env = fogged();
        env.check_tile(2, 2, false);
        for y in 1..=3 {
            for x in 1..=3 {
                assert!(!env.grid.get(x, y).unwrap().hidden);
            }
        }
        assert!(env.grid.get(4, 2).unwrap().hidden);
        assert!(env.grid.get(8, 8).unwrap().hidden);
    }

    #[test]
    fn test_entering_hidden_room_reveals_it() {
        let mut env = fogged();
        env.check_tile(9, 9, false);
        let room = &env.rooms[0];
        assert!(!room.hidden);
        assert!(room.tiles.iter().all(|p| !env.grid.at(*p).unwrap().hidden));
    }

    #[test]
    fn test_roof_peels_inside_and_returns_outside() {
        let mut env = fogged();
        assert_eq!(category(&env, 9, 9), Some(TileCategory::Roof));

        env.check_tile(9, 9, false);
        assert_eq!(category(&env, 9, 9), Some(TileCategory::Floor));
        assert_eq!(category(&env, 6, 6), Some(TileCategory::Wall));

        env.check_tile(2, 2, false);
        assert_eq!(category(&env, 9, 9), Some(TileCategory::Roof));
        assert_eq!(env.player_room, None);
    }

    #[test]
    fn test_startup_forces_peel() {
        let mut env = fogged();
        let id = env.rooms[0].id;
        // Stale state, as after a load
        env.player_room = Some(id);
        env.check_tile(9, 9, false);
        assert_eq!(category(&env, 9, 9), Some(TileCategory::Roof));
        env.check_tile(9, 9, true);
        assert_eq!(category(&env, 9, 9), Some(TileCategory::Floor));
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut env = fogged();
        env.check_tile(-3, 40, true);
        assert!(env.grid.tiles.iter().all(|t| t.hidden));
    }

    #[test]
    fn test_revealed_stays_revealed() {
        let mut env = fogged();
        let path = [(1, 1), (2, 2), (9, 9), (14, 14), (1, 14), (9, 9), (0, 0)];
        let mut seen: Vec<Position> = Vec::new();
        for (x, y) in path {
            env.check_tile(x, y, false);
            assert!(seen.iter().all(|p| !env.grid.at(*p).unwrap().hidden));
            seen.extend(env.grid.tiles.iter().filter(|t| !t.hidden).map(|t| t.pos));
        }
    }
}
