//! Rooms
//!
//! A room is a named group of tiles with wall, floor and optional roof
//! appearances. Rooms are built three ways: from a rectangle, from a
//! floorplan, or from an arbitrary wall boundary drawn by the player.
//!
//! Membership invariants: `walls ⊆ tiles`, `corners ⊆ walls`,
//! `sides = walls \ corners`, and every tile in `tiles` points back at the
//! room through its `room` handle.

use std::collections::{BTreeSet, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::biome::Biome;
use super::floorplan::{Floorplan, Symbol};
use super::geom::{Position, Rect};
use super::grid::Grid;
use super::tile::{Appearance, RoomId};
use crate::data::ItemKind;
use crate::error::BuildError;

/// How many times a floorplan origin is shifted back onto the grid
pub const FLOORPLAN_RETRIES: u32 = 4;

/// Wall, floor and roof looks for a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStyle {
    pub floor: Appearance,
    pub wall: Appearance,
    pub roof: Option<Appearance>,
}

impl RoomStyle {
    pub fn without_roof(self) -> Self {
        Self { roof: None, ..self }
    }
}

/// A group of tiles forming one structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub floor: Appearance,
    pub wall: Appearance,
    pub roof: Option<Appearance>,
    /// Undiscovered rooms are revealed whole on first entry
    pub hidden: bool,
    pub biome: Biome,
    pub bounds: Rect,
    /// Roof currently peeled back (player inside)
    pub roof_open: bool,
    pub tiles: BTreeSet<Position>,
    pub walls: BTreeSet<Position>,
    pub corners: BTreeSet<Position>,
    pub sides: BTreeSet<Position>,
}

/// A room built from a floorplan plus the items its symbols call for
#[derive(Debug, Clone)]
pub struct FloorplanRoom {
    pub room: Room,
    pub items: Vec<(Position, ItemKind)>,
}

impl Room {
    fn empty(id: RoomId, name: &str, style: RoomStyle, biome: Biome, bounds: Rect) -> Self {
        Self {
            id,
            name: name.to_string(),
            floor: style.floor,
            wall: style.wall,
            roof: style.roof,
            hidden: false,
            biome,
            bounds,
            roof_open: false,
            tiles: BTreeSet::new(),
            walls: BTreeSet::new(),
            corners: BTreeSet::new(),
            sides: BTreeSet::new(),
        }
    }

    /// Build a room over an inclusive rectangle
    ///
    /// Border tiles become blocked walls with occupancy cleared, the rest
    /// becomes floor (or roof, when the style has one).
    pub fn from_rect(
        id: RoomId,
        name: &str,
        rect: Rect,
        style: RoomStyle,
        biome: Biome,
        grid: &mut Grid,
    ) -> Result<Room, BuildError> {
        if !grid.contains_rect(&rect) {
            return Err(BuildError::RoomOutOfBounds {
                name: name.to_string(),
                rect,
                width: grid.width,
                height: grid.height,
            });
        }

        let mut room = Room::empty(id, name, style, biome, rect);
        for pos in rect.positions() {
            if rect.is_border(pos) {
                room.set_wall(pos, grid);
                if rect.is_corner(pos) {
                    room.corners.insert(pos);
                }
            } else {
                room.set_interior(pos, grid);
            }
        }
        room.recompute_sides();
        Ok(room)
    }

    /// Build a room from a floorplan at `origin`
    ///
    /// When the plan overhangs the grid the origin is pulled back by the
    /// overflow and the placement retried, at most [`FLOORPLAN_RETRIES`]
    /// times.
    pub fn from_floorplan(
        id: RoomId,
        plan: &Floorplan,
        origin: Position,
        style: RoomStyle,
        biome: Biome,
        grid: &mut Grid,
    ) -> Result<FloorplanRoom, BuildError> {
        let cells = plan.cells()?;
        let (width, height) = plan.size();

        let mut origin = origin;
        let mut retries = 0;
        while !grid.contains_rect(&Rect::with_size(origin.x, origin.y, width, height)) {
            if retries == FLOORPLAN_RETRIES {
                return Err(BuildError::FloorplanRetriesExhausted {
                    name: plan.name.clone(),
                    retries,
                });
            }
            origin = shift_inside(origin, width, height, grid);
            retries += 1;
            log::warn!(
                "Floorplan '{}' overhangs the grid, retrying at ({}, {})",
                plan.name,
                origin.x,
                origin.y
            );
        }

        let footprint: Vec<Position> = cells
            .iter()
            .filter(|(_, _, s)| s.in_footprint())
            .map(|(dx, dy, _)| origin.offset(*dx, *dy))
            .collect();
        let bounds = Rect::bounding(&footprint)
            .unwrap_or_else(|| Rect::with_size(origin.x, origin.y, width, height));

        let style = if plan.roofed { style } else { style.without_roof() };
        let mut room = Room::empty(id, &plan.name, style, biome, bounds);
        let mut items = Vec::new();

        for (dx, dy, symbol) in cells {
            let pos = origin.offset(dx, dy);
            match symbol {
                Symbol::Wall => room.set_wall(pos, grid),
                Symbol::Door => {
                    room.set_wall(pos, grid);
                    if let Some(tile) = grid.at_mut(pos) {
                        tile.blocked = false;
                        tile.appearance = room.floor;
                    }
                    items.push((pos, ItemKind::Door));
                }
                Symbol::Floor => room.set_interior(pos, grid),
                Symbol::Furniture(kind) => {
                    room.set_interior(pos, grid);
                    if let Some(tile) = grid.at_mut(pos) {
                        tile.blocked = true;
                    }
                    items.push((pos, kind));
                }
                Symbol::Decor(kind) => {
                    room.set_interior(pos, grid);
                    items.push((pos, kind));
                }
                Symbol::Light => items.push((pos, ItemKind::Light)),
                Symbol::Outside => {}
            }
        }

        room.corners = room
            .walls
            .iter()
            .copied()
            .filter(|p| bounds.is_corner(*p))
            .collect();
        room.recompute_sides();
        Ok(FloorplanRoom { room, items })
    }

    /// Build a room enclosed by an arbitrary set of wall tiles
    ///
    /// Floods 4-connected from the bounding box's perimeter over non-wall
    /// tiles; whatever the flood cannot reach is interior. Returns `None`
    /// when nothing is enclosed.
    pub fn from_boundary(
        id: RoomId,
        name: &str,
        walls: &BTreeSet<Position>,
        bounds: Rect,
        style: RoomStyle,
        biome: Biome,
        grid: &mut Grid,
    ) -> Option<Room> {
        if !grid.contains_rect(&bounds) {
            return None;
        }

        let mut exterior: HashSet<Position> = HashSet::new();
        let mut queue: VecDeque<Position> = VecDeque::new();
        for pos in bounds.perimeter() {
            if !walls.contains(&pos) && exterior.insert(pos) {
                queue.push_back(pos);
            }
        }
        while let Some(pos) = queue.pop_front() {
            for next in pos.neighbors4() {
                if bounds.contains(next) && !walls.contains(&next) && exterior.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        let interior: Vec<Position> = bounds
            .positions()
            .filter(|p| !walls.contains(p) && !exterior.contains(p))
            .collect();
        if interior.is_empty() {
            return None;
        }

        let mut room = Room::empty(id, name, style, biome, bounds);
        for &pos in walls.iter().filter(|p| bounds.contains(**p)) {
            room.tiles.insert(pos);
            room.walls.insert(pos);
            if let Some(tile) = grid.at_mut(pos) {
                tile.room = Some(id);
            }
        }
        for pos in interior {
            room.set_interior(pos, grid);
        }
        room.corners = room
            .walls
            .iter()
            .copied()
            .filter(|p| is_junction(*p, &room.walls))
            .collect();
        room.recompute_sides();
        Some(room)
    }

    fn set_wall(&mut self, pos: Position, grid: &mut Grid) {
        if let Some(tile) = grid.at_mut(pos) {
            tile.appearance = self.wall;
            tile.blocked = true;
            tile.clear_occupancy();
            tile.room = Some(self.id);
            self.tiles.insert(pos);
            self.walls.insert(pos);
        }
    }

    fn set_interior(&mut self, pos: Position, grid: &mut Grid) {
        let look = self.interior_appearance();
        if let Some(tile) = grid.at_mut(pos) {
            tile.appearance = look;
            tile.blocked = false;
            tile.room = Some(self.id);
            self.tiles.insert(pos);
        }
    }

    /// What a non-wall tile looks like right now
    pub fn interior_appearance(&self) -> Appearance {
        match self.roof {
            Some(roof) if !self.roof_open => roof,
            _ => self.floor,
        }
    }

    pub fn recompute_sides(&mut self) {
        self.sides = self.walls.difference(&self.corners).copied().collect();
    }

    /// Tiles that are not walls
    pub fn interior(&self) -> impl Iterator<Item = &Position> + '_ {
        self.tiles.difference(&self.walls)
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.walls.contains(&pos)
    }

    /// Whether `pos` lies in the room's interior
    pub fn is_interior(&self, pos: Position) -> bool {
        self.tiles.contains(&pos) && !self.walls.contains(&pos)
    }

    /// Turn a wall into floor: appearance reset, unblocked, occupancy cleared
    pub fn dissolve_wall(&mut self, pos: Position, grid: &mut Grid) {
        if !self.walls.remove(&pos) {
            return;
        }
        self.corners.remove(&pos);
        self.sides.remove(&pos);
        let look = self.interior_appearance();
        if let Some(tile) = grid.at_mut(pos) {
            tile.appearance = look;
            tile.blocked = false;
            tile.clear_occupancy();
        }
    }

    /// Drop a tile from every membership set
    pub fn release(&mut self, pos: Position) {
        self.tiles.remove(&pos);
        self.walls.remove(&pos);
        self.corners.remove(&pos);
        self.sides.remove(&pos);
    }

    /// Shrink `bounds` to the tiles still owned
    pub fn recompute_bounds(&mut self) {
        if let Some(bounds) = Rect::bounding(&self.tiles) {
            self.bounds = bounds;
        }
    }

    /// Show the floor under the roof
    pub fn open_roof(&mut self, grid: &mut Grid) {
        if self.roof.is_none() {
            return;
        }
        self.roof_open = true;
        self.paint_interior(grid);
    }

    /// Put the roof back on
    pub fn close_roof(&mut self, grid: &mut Grid) {
        if self.roof.is_none() {
            return;
        }
        self.roof_open = false;
        self.paint_interior(grid);
    }

    fn paint_interior(&self, grid: &mut Grid) {
        let look = self.interior_appearance();
        for pos in self.interior() {
            grid.set_appearance(*pos, look);
        }
    }

    /// Check the membership invariants against the grid
    pub fn is_consistent(&self, grid: &Grid) -> bool {
        self.walls.is_subset(&self.tiles)
            && self.corners.is_subset(&self.walls)
            && self.sides == self.walls.difference(&self.corners).copied().collect()
            && self
                .tiles
                .iter()
                .all(|p| grid.at(*p).map_or(false, |t| t.room == Some(self.id)))
    }
}

/// Pull an origin back so a `width`x`height` block starts on the grid
fn shift_inside(origin: Position, width: i32, height: i32, grid: &Grid) -> Position {
    let mut x = origin.x;
    let mut y = origin.y;
    let overflow_x = x + width - grid.width;
    if overflow_x > 0 {
        x -= overflow_x;
    }
    let overflow_y = y + height - grid.height;
    if overflow_y > 0 {
        y -= overflow_y;
    }
    Position::new(x.max(0), y.max(0))
}

/// A wall bending from horizontal to vertical
fn is_junction(pos: Position, walls: &BTreeSet<Position>) -> bool {
    let left = walls.contains(&pos.offset(-1, 0));
    let right = walls.contains(&pos.offset(1, 0));
    let up = walls.contains(&pos.offset(0, -1));
    let down = walls.contains(&pos.offset(0, 1));
    (left || right) && (up || down) && !(left && right) && !(up && down)
}
