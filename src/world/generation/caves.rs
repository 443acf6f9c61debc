//! Cave generator using cellular automata
//!
//! Creates organic, natural-looking caverns in solid rock, then tunnels
//! every pocket into the largest one.

use rand::rngs::StdRng;
use rand::Rng;

use super::rooms::connect;
use crate::world::{Environment, Grid, Position};

const FILL_PROBABILITY: f64 = 0.45;
const SMOOTHING_PASSES: usize = 5;

/// Carve caverns into a solid environment and pick the start
pub fn build_caves(env: &mut Environment, rng: &mut StdRng) {
    let (width, height) = (env.width(), env.height());
    let mut open = vec![false; (width * height).max(0) as usize];

    // Initial random fill, border stays solid
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            open[env.grid.xy_to_idx(x, y)] = rng.gen_bool(FILL_PROBABILITY);
        }
    }

    for _ in 0..SMOOTHING_PASSES {
        let mut next = open.clone();
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                let walls = count_walls(&env.grid, &open, x, y);
                let idx = env.grid.xy_to_idx(x, y);
                if walls > 4 {
                    next[idx] = false;
                } else if walls < 4 {
                    next[idx] = true;
                }
            }
        }
        open = next;
    }

    for (idx, tile) in env.grid.tiles.iter_mut().enumerate() {
        if open[idx] && !tile.unbreakable {
            tile.appearance = tile.biome.ground(rng.gen());
            tile.blocked = false;
        }
    }

    ensure_connectivity(env, rng);

    let floor = env.grid.positions_where(|t| !t.blocked);
    env.start = if floor.is_empty() {
        carve_fallback(env)
    } else {
        floor[rng.gen_range(0..floor.len())]
    };
}

/// Count solid neighbours (8-directional), off-grid counts as solid
fn count_walls(grid: &Grid, open: &[bool], x: i32, y: i32) -> i32 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x + dx, y + dy);
            if !grid.in_bounds(nx, ny) || !open[grid.xy_to_idx(nx, ny)] {
                count += 1;
            }
        }
    }
    count
}

/// Open regions, 4-connected, largest first
fn regions(grid: &Grid) -> Vec<Vec<Position>> {
    let mut seen = vec![false; grid.tiles.len()];
    let mut found = Vec::new();
    for start in grid.positions_where(|t| !t.blocked) {
        if seen[grid.xy_to_idx(start.x, start.y)] {
            continue;
        }
        let mut region = Vec::new();
        let mut stack = vec![start];
        while let Some(pos) = stack.pop() {
            let idx = grid.xy_to_idx(pos.x, pos.y);
            if seen[idx] {
                continue;
            }
            seen[idx] = true;
            region.push(pos);
            for next in pos.neighbors4() {
                if grid.in_bounds(next.x, next.y)
                    && !grid.is_blocked(next.x, next.y)
                    && !seen[grid.xy_to_idx(next.x, next.y)]
                {
                    stack.push(next);
                }
            }
        }
        found.push(region);
    }
    found.sort_by(|a, b| b.len().cmp(&a.len()));
    found
}

/// Tunnel every smaller pocket into the largest cavern
fn ensure_connectivity(env: &mut Environment, rng: &mut StdRng) {
    let mut found = regions(&env.grid);
    if found.len() < 2 {
        return;
    }
    let main = found.remove(0);
    for pocket in &found {
        let from = pocket[0];
        let Some(to) = main.iter().min_by_key(|p| p.distance(&from)).copied() else {
            continue;
        };
        connect(env, from, to, rng.gen_bool(0.5));
    }
    log::debug!("{}: joined {} cave pockets", env.name, found.len());
}

/// A small cavern in the middle, for maps the automaton closed up
fn carve_fallback(env: &mut Environment) -> Position {
    let center = Position::new(env.width() / 2, env.height() / 2);
    for y in center.y - 2..=center.y + 2 {
        env.create_horizontal_tunnel(center.x - 3..=center.x + 3, y);
    }
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::{Appearance, TileCategory};
    use crate::world::{Biome, RoomStyle, WorldKind};
    use rand::SeedableRng;

    fn solid_env() -> Environment {
        let style = RoomStyle {
            floor: Appearance::new(TileCategory::Floor, 0),
            wall: Appearance::new(TileCategory::Wall, 0),
            roof: None,
        };
        let mut env = Environment::new(
            "cave",
            WorldKind::Cave,
            1,
            60,
            40,
            Appearance::new(TileCategory::Rock, 0),
            Biome::Cavern,
            style,
        )
        .unwrap();
        for tile in &mut env.grid.tiles {
            tile.blocked = true;
        }
        env.grid.seal_border(Appearance::new(TileCategory::Rock, 0));
        env
    }

    #[test]
    fn test_caves_are_connected() {
        let mut env = solid_env();
        let mut rng = StdRng::seed_from_u64(11);
        build_caves(&mut env, &mut rng);
        assert_eq!(regions(&env.grid).len(), 1);
        assert!(!env.grid.is_blocked(env.start.x, env.start.y));
    }

    #[test]
    fn test_border_stays_solid() {
        let mut env = solid_env();
        let mut rng = StdRng::seed_from_u64(5);
        build_caves(&mut env, &mut rng);
        for pos in env.grid.bounds().perimeter() {
            assert!(env.grid.is_blocked(pos.x, pos.y));
        }
    }
}
