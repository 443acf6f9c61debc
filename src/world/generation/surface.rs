//! Surface worlds
//!
//! Home, overworld and garden: open ground with floorplan buildings. Paths
//! are dug only through open ground so they never break a building.

use rand::Rng;

use super::{room_anchor, BuildContext, BuildParams};
use crate::data::ItemKind;
use crate::error::BuildError;
use crate::world::tile::{Appearance, TileCategory};
use crate::world::{Environment, Floorplan, Position, Rect, RoomId};

/// Tries at finding a clear spot for each overworld building
const PLACEMENT_TRIES: usize = 20;

/// The player's house, centred, with the start inside it
pub fn build_home(env: &mut Environment, params: &BuildParams, ctx: &mut BuildContext) -> Result<(), BuildError> {
    let name = params.floorplans.first().map_or("cottage", |n| n.as_str());
    let plan = ctx.data.floorplans.get(name)?;
    let id = place_centered(env, plan)?;
    env.start = room_anchor(env, id).unwrap_or(env.start);
    Ok(())
}

/// Scattered buildings and ruins joined by dirt paths
pub fn build_overworld(
    env: &mut Environment,
    params: &BuildParams,
    ctx: &mut BuildContext,
) -> Result<(), BuildError> {
    let data = ctx.data;
    let mut doors: Vec<Position> = Vec::new();

    for name in &params.floorplans {
        let plan = data.floorplans.get(name)?;
        let (w, h) = plan.size();
        let Some(origin) = find_clear_spot(env, w, h, ctx) else {
            log::debug!("No clear spot for '{}'", plan.name);
            continue;
        };
        let theme = env.theme;
        let id = env.add_floorplan_room(plan, origin, theme)?;
        if let Some(door) = doorstep(env, id) {
            doors.push(door);
        }
    }

    let (min_count, max_count) = params.room_count;
    let ruins = ctx.rng.gen_range(min_count..=max_count.max(min_count));
    let (min_size, max_size) = params.room_size;
    let ruin_style = env.theme.without_roof();
    for n in 0..ruins {
        let w = ctx.rng.gen_range(min_size..=max_size);
        let h = ctx.rng.gen_range(min_size..=max_size);
        let Some(origin) = find_clear_spot(env, w, h, ctx) else {
            continue;
        };
        let rect = Rect::with_size(origin.x, origin.y, w, h);
        let id = env.add_rect_room(&format!("ruin {}", n + 1), rect, ruin_style)?;
        // Ruins are broken open on one side
        let gap = Position::new(rect.center().x, rect.y2);
        env.create_tunnel(gap.x, gap.y);
        if let Some(room) = env.room(id) {
            log::debug!("Ruin '{}' at {:?}", room.name, room.bounds);
        }
        doors.push(gap.offset(0, 1));
    }
    env.merge_rooms();

    for pair in doors.windows(2) {
        dig_path(env, pair[0], pair[1]);
    }
    env.start = doors
        .first()
        .copied()
        .filter(|p| !env.grid.is_blocked(p.x, p.y))
        .unwrap_or(env.start);
    clear_start(env);
    Ok(())
}

/// A greenhouse in the middle of planted beds
pub fn build_garden(env: &mut Environment, params: &BuildParams, ctx: &mut BuildContext) -> Result<(), BuildError> {
    let name = params.floorplans.first().map_or("greenhouse", |n| n.as_str());
    let plan = ctx.data.floorplans.get(name)?;
    let id = place_centered(env, plan)?;

    let bed = Appearance::new(TileCategory::Soil, 1);
    let bounds = env.room(id).map(|r| r.bounds).unwrap_or_else(|| env.grid.bounds());
    let rows = [bounds.y1 - 6, bounds.y2 + 4];
    for top in rows {
        for left in (2..env.width() - 8).step_by(9) {
            let patch = Rect::with_size(left, top, 6, 2);
            if !env.grid.contains_rect(&patch) {
                continue;
            }
            for pos in patch.positions() {
                env.grid.set_appearance(pos, bed);
                let crop = if ctx.rng.gen_bool(0.5) { ItemKind::Herb } else { ItemKind::Flower };
                if (pos.x + pos.y) % 2 == 0 {
                    env.spawn_item(crop, pos);
                }
            }
        }
    }

    env.start = doorstep(env, id).unwrap_or(env.start);
    clear_start(env);
    Ok(())
}

fn place_centered(env: &mut Environment, plan: &Floorplan) -> Result<RoomId, BuildError> {
    let (w, h) = plan.size();
    let origin = Position::new((env.width() - w) / 2, (env.height() - h) / 2);
    let theme = env.theme;
    env.add_floorplan_room(plan, origin, theme)
}

/// A random origin whose block, plus a one-tile margin, touches no room
fn find_clear_spot(env: &Environment, w: i32, h: i32, ctx: &mut BuildContext) -> Option<Position> {
    if env.width() < w + 4 || env.height() < h + 4 {
        return None;
    }
    for _ in 0..PLACEMENT_TRIES {
        let x = ctx.rng.gen_range(2..=env.width() - w - 2);
        let y = ctx.rng.gen_range(2..=env.height() - h - 2);
        let margin = Rect::new(x - 1, y - 1, x + w, y + h);
        if margin.positions().all(|p| env.grid.at(p).map_or(false, |t| t.room.is_none())) {
            return Some(Position::new(x, y));
        }
    }
    None
}

/// The open tile just outside a room's first door
fn doorstep(env: &Environment, id: RoomId) -> Option<Position> {
    let room = env.room(id)?;
    room.walls
        .iter()
        .filter(|p| !env.grid.is_blocked(p.x, p.y))
        .flat_map(|p| p.neighbors4())
        .find(|n| env.grid.at(*n).map_or(false, |t| t.room.is_none() && !t.blocked))
}

/// L-shaped path through open ground only
fn dig_path(env: &mut Environment, from: Position, to: Position) {
    let corner = Position::new(to.x, from.y);
    let legs = [(from, corner), (corner, to)];
    for (a, b) in legs {
        let steps = a.distance(&b);
        let (dx, dy) = ((b.x - a.x).signum(), (b.y - a.y).signum());
        for i in 0..=steps {
            let p = a.offset(dx * i, dy * i);
            let open_ground = env.grid.at(p).map_or(false, |t| t.room.is_none() && t.item.is_none());
            if open_ground {
                env.create_tunnel(p.x, p.y);
            }
        }
    }
}

/// Make sure the start tile is open ground with nothing on it
fn clear_start(env: &mut Environment) {
    let on_wall = env.room_at(env.start.x, env.start.y).map_or(false, |r| r.is_wall(env.start));
    if on_wall {
        let start = env.start;
        if let Some(open) = env
            .grid
            .positions_where(|t| t.room.is_none() && !t.blocked)
            .into_iter()
            .min_by_key(|p| p.distance(&start))
        {
            env.start = open;
        }
    }
    let start = env.start;
    if let Some(id) = env.grid.at(start).and_then(|t| t.item) {
        env.remove_item(id);
    }
    if let Some(tile) = env.grid.at_mut(start) {
        if tile.room.is_none() {
            tile.blocked = false;
        }
    }
}
