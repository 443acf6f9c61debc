//! Environments
//!
//! A named world instance: the grid, its rooms, and the items and entities
//! placed on it. Everything that changes tile ownership or occupancy goes
//! through here so the tile handles and the record lists stay in step.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::enclosure;
use super::floorplan::Floorplan;
use super::geom::{Position, Rect};
use super::grid::Grid;
use super::merge;
use super::room::{Room, RoomStyle};
use super::tile::{Appearance, EntityId, ItemId, RoomId, TILE_SIZE};
use super::Biome;
use crate::data::{EntityKind, ItemKind};
use crate::error::BuildError;
use crate::game::Clock;
use crate::render::Camera;

/// Which kind of world an environment is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldKind {
    Home,
    Overworld,
    Dungeon,
    Cave,
    Hallucination,
    Garden,
}

impl WorldKind {
    pub fn name(&self) -> &'static str {
        match self {
            WorldKind::Home => "Home",
            WorldKind::Overworld => "Overworld",
            WorldKind::Dungeon => "Dungeon",
            WorldKind::Cave => "Cave",
            WorldKind::Hallucination => "Hallucination",
            WorldKind::Garden => "Garden",
        }
    }

    /// Kinds that come in numbered levels
    pub fn is_leveled(&self) -> bool {
        matches!(self, WorldKind::Dungeon | WorldKind::Cave | WorldKind::Hallucination)
    }
}

/// An item lying on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: ItemId,
    pub kind: ItemKind,
    pub pos: Position,
}

/// An entity standing on a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Position,
}

/// Outcome of placing a construction tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Off-grid, unbreakable, occupied or already placed
    Refused,
    /// Placed, no loop closed
    Marker,
    /// Placed and closed a loop around the new room
    Enclosed(RoomId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub kind: WorldKind,
    pub level: u32,
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub items: Vec<ItemRecord>,
    pub entities: Vec<EntityRecord>,
    /// Default wall, floor and roof for rooms built here
    pub theme: RoomStyle,
    pub clock: Clock,
    /// Rebuilt on load
    #[serde(skip)]
    pub camera: Camera,
    pub start: Position,
    pub soundtrack: String,
    /// Room the player stood in at the last visibility check
    pub player_room: Option<RoomId>,
    next_room: u32,
    next_item: u32,
    next_entity: u32,
}

impl Environment {
    pub fn new(
        name: &str,
        kind: WorldKind,
        level: u32,
        width: i32,
        height: i32,
        ground: Appearance,
        biome: Biome,
        theme: RoomStyle,
    ) -> Result<Self, BuildError> {
        if width <= 0 || height <= 0 {
            return Err(BuildError::InvalidDimensions { width, height });
        }
        Ok(Self {
            name: name.to_string(),
            kind,
            level,
            grid: Grid::new(width, height, ground, biome),
            rooms: Vec::new(),
            items: Vec::new(),
            entities: Vec::new(),
            theme,
            clock: Clock::default(),
            camera: Camera::default(),
            start: Position::new(width / 2, height / 2),
            soundtrack: String::new(),
            player_room: None,
            next_room: 1,
            next_item: 1,
            next_entity: 1,
        })
    }

    pub fn width(&self) -> i32 {
        self.grid.width
    }

    pub fn height(&self) -> i32 {
        self.grid.height
    }

    // ------------------------------------------------------------------------
    // Rooms
    // ------------------------------------------------------------------------

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|r| r.id == id)
    }

    /// The room owning the tile at (x, y)
    pub fn room_at(&self, x: i32, y: i32) -> Option<&Room> {
        let id = self.grid.get(x, y)?.room?;
        self.room(id)
    }

    pub fn next_room_id(&mut self) -> RoomId {
        let id = RoomId(self.next_room);
        self.next_room += 1;
        id
    }

    fn biome_at(&self, pos: Position) -> Biome {
        self.grid
            .at(pos)
            .or_else(|| self.grid.tiles.first())
            .map_or(Biome::Meadow, |t| t.biome)
    }

    /// Build a rectangular room and take ownership of its tiles
    pub fn add_rect_room(&mut self, name: &str, rect: Rect, style: RoomStyle) -> Result<RoomId, BuildError> {
        let id = self.next_room_id();
        let biome = self.biome_at(rect.center());
        let room = Room::from_rect(id, name, rect, style, biome, &mut self.grid)?;
        self.rooms.push(room);
        self.prune_occupants();
        Ok(id)
    }

    /// Build a room from a floorplan and spawn the items it calls for
    pub fn add_floorplan_room(
        &mut self,
        plan: &Floorplan,
        origin: Position,
        style: RoomStyle,
    ) -> Result<RoomId, BuildError> {
        let id = self.next_room_id();
        let biome = self.biome_at(origin);
        let built = Room::from_floorplan(id, plan, origin, style, biome, &mut self.grid)?;
        self.rooms.push(built.room);
        self.prune_occupants();
        for (pos, kind) in built.items {
            if self.spawn_item(kind, pos).is_none() {
                log::debug!("Floorplan '{}': no room for {:?} at {:?}", plan.name, kind, pos);
            }
        }
        Ok(id)
    }

    /// Fuse overlapping rooms with the single pairwise pass
    pub fn merge_rooms(&mut self) -> usize {
        let merged = merge::merge_overlapping(&mut self.rooms, &mut self.grid);
        self.after_structure_change();
        merged
    }

    /// Fuse overlapping rooms one connected group at a time
    pub fn merge_rooms_by_component(&mut self) -> usize {
        let merged = merge::merge_components(&mut self.rooms, &mut self.grid);
        self.after_structure_change();
        merged
    }

    fn after_structure_change(&mut self) {
        self.rooms.retain(|r| !r.tiles.is_empty());
        if let Some(id) = self.player_room {
            if self.room(id).is_none() {
                self.player_room = None;
            }
        }
        self.prune_occupants();
    }

    // ------------------------------------------------------------------------
    // Tunnels
    // ------------------------------------------------------------------------

    /// Dig out one tile
    ///
    /// Room walls dissolve into floor; room-less ground takes its biome's
    /// tunnel look. Unbreakable and off-grid tiles are left alone.
    pub fn create_tunnel(&mut self, x: i32, y: i32) -> bool {
        let Some(tile) = self.grid.get(x, y) else {
            return false;
        };
        if tile.unbreakable {
            return false;
        }
        let pos = tile.pos;
        let biome = tile.biome;
        let item = tile.item;
        let owner = tile.room;

        match owner {
            Some(id) => {
                let Some(room) = self.rooms.iter_mut().find(|r| r.id == id) else {
                    return false;
                };
                if !room.is_wall(pos) {
                    return false;
                }
                room.dissolve_wall(pos, &mut self.grid);
                if let Some(tile) = self.grid.at_mut(pos) {
                    tile.placed = false;
                }
                self.prune_occupants();
            }
            None => {
                if let Some(id) = item {
                    self.remove_item(id);
                }
                let tunnel = biome.config().tunnel;
                if let Some(tile) = self.grid.at_mut(pos) {
                    tile.appearance = tunnel;
                    tile.blocked = false;
                    tile.placed = false;
                }
            }
        }
        true
    }

    /// Dig a row of tiles, returning how many changed
    pub fn create_horizontal_tunnel(&mut self, xs: RangeInclusive<i32>, y: i32) -> usize {
        let (start, end) = ordered(xs);
        (start..=end).filter(|&x| self.create_tunnel(x, y)).count()
    }

    /// Dig a column of tiles, returning how many changed
    pub fn create_vertical_tunnel(&mut self, ys: RangeInclusive<i32>, x: i32) -> usize {
        let (start, end) = ordered(ys);
        (start..=end).filter(|&y| self.create_tunnel(x, y)).count()
    }

    // ------------------------------------------------------------------------
    // Items and entities
    // ------------------------------------------------------------------------

    pub fn item(&self, id: ItemId) -> Option<&ItemRecord> {
        self.items.iter().find(|r| r.id == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.iter().find(|r| r.id == id)
    }

    /// Put an item on a tile that has none
    pub fn spawn_item(&mut self, kind: ItemKind, pos: Position) -> Option<ItemId> {
        let tile = self.grid.at_mut(pos)?;
        if tile.item.is_some() {
            return None;
        }
        let id = ItemId(self.next_item);
        self.next_item += 1;
        tile.item = Some(id);
        if kind.template().blocks {
            tile.blocked = true;
        }
        self.items.push(ItemRecord { id, kind, pos });
        Some(id)
    }

    /// Take an item off its tile
    pub fn remove_item(&mut self, id: ItemId) -> Option<ItemRecord> {
        let index = self.items.iter().position(|r| r.id == id)?;
        let record = self.items.remove(index);
        let is_wall = self.room_at(record.pos.x, record.pos.y).map_or(false, |r| r.is_wall(record.pos));
        if let Some(tile) = self.grid.at_mut(record.pos) {
            if tile.item == Some(id) {
                tile.item = None;
                if !is_wall && !tile.placed {
                    tile.blocked = false;
                }
            }
        }
        Some(record)
    }

    /// Put an entity on an open tile nobody stands on
    pub fn spawn_entity(&mut self, kind: EntityKind, pos: Position) -> Option<EntityId> {
        let tile = self.grid.at_mut(pos)?;
        if tile.blocked || tile.entity.is_some() {
            return None;
        }
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        tile.entity = Some(id);
        self.entities.push(EntityRecord { id, kind, pos });
        Some(id)
    }

    /// Move an entity to an open, empty tile
    pub fn move_entity(&mut self, id: EntityId, to: Position) -> bool {
        let Some(index) = self.entities.iter().position(|r| r.id == id) else {
            return false;
        };
        if !self.grid.at(to).map_or(false, |t| !t.blocked && t.entity.is_none()) {
            return false;
        }
        let from = self.entities[index].pos;
        if let Some(tile) = self.grid.at_mut(from) {
            if tile.entity == Some(id) {
                tile.entity = None;
            }
        }
        if let Some(tile) = self.grid.at_mut(to) {
            tile.entity = Some(id);
        }
        self.entities[index].pos = to;
        true
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<EntityRecord> {
        let index = self.entities.iter().position(|r| r.id == id)?;
        let record = self.entities.remove(index);
        if let Some(tile) = self.grid.at_mut(record.pos) {
            if tile.entity == Some(id) {
                tile.entity = None;
            }
        }
        Some(record)
    }

    /// Drop records whose tile no longer points back at them
    pub fn prune_occupants(&mut self) -> usize {
        let grid = &self.grid;
        let before = self.items.len() + self.entities.len();
        self.items.retain(|r| grid.at(r.pos).map_or(false, |t| t.item == Some(r.id)));
        self.entities.retain(|r| grid.at(r.pos).map_or(false, |t| t.entity == Some(r.id)));
        let pruned = before - self.items.len() - self.entities.len();
        if pruned > 0 {
            log::debug!("Pruned {} occupants displaced by walls", pruned);
        }
        pruned
    }

    // ------------------------------------------------------------------------
    // Sandbox construction
    // ------------------------------------------------------------------------

    /// Build a marker tile and check whether it closes a room
    pub fn place_tile(&mut self, x: i32, y: i32) -> Placement {
        let Some(tile) = self.grid.get(x, y) else {
            return Placement::Refused;
        };
        if tile.unbreakable || tile.placed || tile.is_occupied() {
            return Placement::Refused;
        }
        let pos = tile.pos;
        let biome = tile.biome;
        let owner = tile.room;

        if let Some(owner) = owner {
            if let Some(room) = self.room_mut(owner) {
                room.release(pos);
                room.recompute_bounds();
            }
        }
        if let Some(tile) = self.grid.at_mut(pos) {
            tile.placed = true;
            tile.blocked = true;
            tile.appearance = Appearance::MARKER;
            tile.room = None;
        }
        self.after_structure_change();

        let Some(found) = enclosure::detect(&self.grid, pos) else {
            return Placement::Marker;
        };
        let id = self.next_room_id();
        let style = RoomStyle {
            wall: Appearance::MARKER,
            ..self.theme
        };
        let Some(room) = Room::from_boundary(id, "enclosure", &found.walls, found.bounds, style, biome, &mut self.grid)
        else {
            return Placement::Marker;
        };

        for other in &mut self.rooms {
            let claimed: Vec<Position> = other.tiles.intersection(&room.tiles).copied().collect();
            if claimed.is_empty() {
                continue;
            }
            for p in claimed {
                other.release(p);
            }
            other.recompute_bounds();
        }
        log::info!("Enclosure closed: room {:?} with {} tiles", id, room.tiles.len());
        self.rooms.push(room);
        self.after_structure_change();
        Placement::Enclosed(id)
    }

    // ------------------------------------------------------------------------
    // Camera
    // ------------------------------------------------------------------------

    /// Rebuild the camera for a screen size and point it at the start
    pub fn reset_camera(&mut self, screen_width: f32, screen_height: f32, fixed: bool) {
        let world_width = self.width() as f32 * TILE_SIZE;
        let world_height = self.height() as f32 * TILE_SIZE;
        let mut camera = Camera::new(screen_width, screen_height, world_width, world_height);
        camera.follow(self.start);
        camera.set_fixed(fixed);
        self.camera = camera;
    }
}

fn ordered(range: RangeInclusive<i32>) -> (i32, i32) {
    let (a, b) = range.into_inner();
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::TileCategory;

    fn theme() -> RoomStyle {
        RoomStyle {
            floor: Appearance::new(TileCategory::Floor, 0),
            wall: Appearance::new(TileCategory::Wall, 0),
            roof: Some(Appearance::new(TileCategory::Roof, 0)),
        }
    }

    fn env(width: i32, height: i32) -> Environment {
        Environment::new(
            "test",
            WorldKind::Overworld,
            0,
            width,
            height,
            Appearance::new(TileCategory::Grass, 0),
            Biome::Meadow,
            theme(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_dimensions() {
        let result = Environment::new(
            "bad",
            WorldKind::Home,
            0,
            0,
            5,
            Appearance::MARKER,
            Biome::Meadow,
            theme(),
        );
        assert!(matches!(result, Err(BuildError::InvalidDimensions { width: 0, height: 5 })));
    }

    #[test]
    fn test_enclosure_from_placements() {
        let mut env = env(10, 10);
        let ring = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1)];
        let (last, rest) = ring.split_last().unwrap();
        for &(x, y) in rest {
            assert_eq!(env.place_tile(x, y), Placement::Marker);
        }
        assert!(env.rooms.is_empty());

        let Placement::Enclosed(id) = env.place_tile(last.0, last.1) else {
            panic!("ring did not close");
        };
        let room = env.room(id).unwrap();
        let interior: Vec<Position> = room.interior().copied().collect();
        assert_eq!(interior, vec![Position::new(1, 1)]);
        assert_eq!(room.walls.len(), 8);
        assert!(room.is_consistent(&env.grid));
        assert_eq!(env.grid.get(1, 1).and_then(|t| t.room), Some(id));
    }

    #[test]
    fn test_placement_refused() {
        let mut env = env(6, 6);
        assert_eq!(env.place_tile(-1, 0), Placement::Refused);
        env.spawn_item(ItemKind::Rock, Position::new(2, 2));
        assert_eq!(env.place_tile(2, 2), Placement::Refused);
        if let Some(tile) = env.grid.get_mut(3, 3) {
            tile.unbreakable = true;
        }
        assert_eq!(env.place_tile(3, 3), Placement::Refused);
        assert_eq!(env.place_tile(4, 4), Placement::Marker);
        assert_eq!(env.place_tile(4, 4), Placement::Refused);
    }

    #[test]
    fn test_placement_claims_from_room() {
        let mut env = env(12, 12);
        let id = env.add_rect_room("box", Rect::new(0, 0, 4, 4), theme()).unwrap();
        env.place_tile(2, 2);
        let room = env.room(id).unwrap();
        assert!(!room.tiles.contains(&Position::new(2, 2)));
        assert!(room.is_consistent(&env.grid));
    }

    #[test]
    fn test_tunnel_dissolves_wall() {
        let mut env = env(10, 10);
        let id = env.add_rect_room("box", Rect::new(1, 1, 5, 5), theme()).unwrap();
        assert!(env.create_tunnel(3, 1));
        let tile = env.grid.get(3, 1).unwrap();
        assert!(!tile.blocked);
        assert_eq!(tile.room, Some(id));
        assert!(!env.room(id).unwrap().is_wall(Position::new(3, 1)));
        assert!(env.room(id).unwrap().is_consistent(&env.grid));
    }

    #[test]
    fn test_tunnel_through_open_ground() {
        let mut env = env(10, 10);
        for tile in &mut env.grid.tiles {
            tile.blocked = true;
        }
        env.grid.seal_border(Appearance::new(TileCategory::Rock, 0));
        let dug = env.create_horizontal_tunnel(8..=0, 4);
        // The border tile at x = 0 is unbreakable
        assert_eq!(dug, 8);
        assert!(!env.grid.is_blocked(4, 4));
        assert!(env.grid.is_blocked(0, 4));
        assert_eq!(
            env.grid.get(4, 4).map(|t| t.appearance),
            Some(Biome::Meadow.config().tunnel)
        );
        assert_eq!(env.create_vertical_tunnel(1..=3, 2), 3);
    }

    #[test]
    fn test_wall_displaces_items() {
        let mut env = env(10, 10);
        env.spawn_item(ItemKind::Flower, Position::new(1, 1));
        env.spawn_item(ItemKind::Flower, Position::new(2, 2));
        env.add_rect_room("box", Rect::new(1, 1, 4, 4), theme()).unwrap();
        assert_eq!(env.items.len(), 1);
        assert_eq!(env.items[0].pos, Position::new(2, 2));
    }

    #[test]
    fn test_item_lifecycle() {
        let mut env = env(6, 6);
        let pos = Position::new(2, 3);
        let id = env.spawn_item(ItemKind::Chest, pos).unwrap();
        assert!(env.grid.at(pos).unwrap().blocked);
        assert!(env.spawn_item(ItemKind::Rock, pos).is_none());
        let record = env.remove_item(id).unwrap();
        assert_eq!(record.kind, ItemKind::Chest);
        assert!(!env.grid.at(pos).unwrap().blocked);
        assert_eq!(env.grid.at(pos).unwrap().item, None);
    }

    #[test]
    fn test_entity_lifecycle() {
        let mut env = env(6, 6);
        let id = env.spawn_entity(EntityKind::Rabbit, Position::new(1, 1)).unwrap();
        assert!(env.spawn_entity(EntityKind::Deer, Position::new(1, 1)).is_none());
        assert!(env.move_entity(id, Position::new(2, 1)));
        assert_eq!(env.grid.get(1, 1).unwrap().entity, None);
        assert_eq!(env.grid.get(2, 1).unwrap().entity, Some(id));
        assert!(!env.move_entity(id, Position::new(9, 9)));
        assert_eq!(env.remove_entity(id).map(|r| r.pos), Some(Position::new(2, 1)));
        assert!(env.entities.is_empty());
    }

    #[test]
    fn test_floorplan_room_spawns_items() {
        let mut env = env(12, 12);
        let plan = Floorplan::new("hut", &["L    ", "-----", "-b.p-", "--|--"]);
        let id = env.add_floorplan_room(&plan, Position::new(2, 2), theme()).unwrap();
        let kinds: Vec<ItemKind> = env.items.iter().map(|r| r.kind).collect();
        assert!(kinds.contains(&ItemKind::Door));
        assert!(kinds.contains(&ItemKind::Bed));
        assert!(kinds.contains(&ItemKind::Light));
        assert!(env.room(id).unwrap().is_consistent(&env.grid));
    }

    #[test]
    fn test_merge_keeps_handles_consistent() {
        let mut env = env(12, 12);
        env.add_rect_room("a", Rect::new(0, 0, 5, 5), theme()).unwrap();
        env.add_rect_room("b", Rect::new(4, 4, 9, 9), theme()).unwrap();
        env.merge_rooms();
        assert_eq!(env.rooms.len(), 1);
        assert!(env.rooms[0].is_consistent(&env.grid));
    }

    #[test]
    fn test_reset_camera_follows_start() {
        let mut env = env(100, 100);
        env.start = Position::new(0, 0);
        env.reset_camera(640.0, 480.0, false);
        assert_eq!((env.camera.x, env.camera.y), (0.0, 0.0));
        assert!(!env.camera.is_fixed());
    }
}
