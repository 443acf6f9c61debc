//! Enclosure detection
//!
//! Finds closed loops among player-placed tiles. The connected group of
//! placed tiles around the newest placement is rebuilt from scratch every
//! time; placements are rare enough that no incremental state is kept.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::geom::{Position, Rect};
use super::grid::Grid;

/// Shortest cycle, in tiles, that counts as a closed boundary
pub const MIN_LOOP_LEN: usize = 4;

/// A closed group of placed tiles, ready to become a room
#[derive(Debug, Clone, PartialEq)]
pub struct Enclosure {
    pub walls: BTreeSet<Position>,
    pub bounds: Rect,
}

/// Check whether the tile at `start` closes a loop of placed tiles
pub fn detect(grid: &Grid, start: Position) -> Option<Enclosure> {
    if !grid.at(start).map_or(false, |t| t.placed) {
        return None;
    }
    let adjacency = connected_placed(grid, start);
    if !has_loop(&adjacency, start) {
        return None;
    }
    let walls: BTreeSet<Position> = adjacency.keys().copied().collect();
    let bounds = Rect::bounding(&walls)?;
    Some(Enclosure { walls, bounds })
}

/// Breadth-first walk over 8-connected placed tiles, recording edges
fn connected_placed(grid: &Grid, start: Position) -> HashMap<Position, Vec<Position>> {
    let mut adjacency: HashMap<Position, Vec<Position>> = HashMap::new();
    let mut seen: HashSet<Position> = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(pos) = queue.pop_front() {
        let neighbors: Vec<Position> = pos
            .neighbors8()
            .into_iter()
            .filter(|n| grid.at(*n).map_or(false, |t| t.placed))
            .collect();
        for &n in &neighbors {
            if seen.insert(n) {
                queue.push_back(n);
            }
        }
        adjacency.insert(pos, neighbors);
    }
    adjacency
}

/// Depth-first search with an explicit stack
///
/// A back edge to a node still on the current path closes a cycle whose
/// length is the depth difference plus one.
fn has_loop(adjacency: &HashMap<Position, Vec<Position>>, root: Position) -> bool {
    let mut depth: HashMap<Position, usize> = HashMap::from([(root, 0)]);
    let mut on_path: HashSet<Position> = HashSet::from([root]);
    // (node, parent, index of next neighbour to try)
    let mut stack: Vec<(Position, Option<Position>, usize)> = vec![(root, None, 0)];

    while let Some(&(node, parent, next)) = stack.last() {
        let Some(neighbors) = adjacency.get(&node) else {
            stack.pop();
            continue;
        };
        if next >= neighbors.len() {
            on_path.remove(&node);
            stack.pop();
            continue;
        }
        if let Some(top) = stack.last_mut() {
            top.2 += 1;
        }

        let n = neighbors[next];
        if Some(n) == parent {
            continue;
        }
        let node_depth = depth.get(&node).copied().unwrap_or(0);
        if on_path.contains(&n) {
            let n_depth = depth.get(&n).copied().unwrap_or(0);
            if node_depth - n_depth + 1 >= MIN_LOOP_LEN {
                return true;
            }
        } else if !depth.contains_key(&n) {
            depth.insert(n, node_depth + 1);
            on_path.insert(n);
            stack.push((n, Some(node), 0));
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::{Appearance, TileCategory};
    use crate::world::Biome;

    fn grid_with(placed: &[(i32, i32)]) -> Grid {
        let mut grid = Grid::new(12, 12, Appearance::new(TileCategory::Grass, 0), Biome::Meadow);
        for &(x, y) in placed {
            if let Some(tile) = grid.get_mut(x, y) {
                tile.placed = true;
            }
        }
        grid
    }

    const RING: [(i32, i32); 8] = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1)];

    #[test]
    fn test_ring_closes_on_last_tile() {
        let grid = grid_with(&RING);
        let found = detect(&grid, Position::new(0, 1)).expect("ring should be closed");
        assert_eq!(found.walls.len(), 8);
        assert_eq!(found.bounds, Rect::new(0, 0, 2, 2));
    }

    #[test]
    fn test_open_line_has_no_loop() {
        let line: Vec<(i32, i32)> = (0..6).map(|x| (x, 3)).collect();
        let grid = grid_with(&line);
        assert!(detect(&grid, Position::new(5, 3)).is_none());
    }

    #[test]
    fn test_c_shape_has_no_loop() {
        let c = [(0, 0), (1, 0), (2, 0), (3, 0), (0, 1), (0, 2), (0, 3), (1, 3), (2, 3), (3, 3)];
        let grid = grid_with(&c);
        assert!(detect(&grid, Position::new(3, 3)).is_none());
    }

    #[test]
    fn test_diagonal_triangle_is_not_a_loop() {
        let grid = grid_with(&[(4, 4), (5, 4), (5, 5)]);
        assert!(detect(&grid, Position::new(5, 5)).is_none());
    }

    #[test]
    fn test_unplaced_start_is_ignored() {
        let grid = grid_with(&RING);
        assert!(detect(&grid, Position::new(1, 1)).is_none());
    }

    #[test]
    fn test_large_diamond_loop() {
        // Diagonal steps only; 4-connected flood still cannot leak through
        let diamond = [(5, 1), (6, 2), (7, 3), (6, 4), (5, 5), (4, 4), (3, 3), (4, 2)];
        let grid = grid_with(&diamond);
        assert!(detect(&grid, Position::new(4, 2)).is_some());
    }
}
