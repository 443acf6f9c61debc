//! Room merging
//!
//! Rooms placed independently may overlap. Merging dissolves the walls one
//! room leaves inside the other's interior and moves every tile to one
//! surviving room.
//!
//! [`merge_overlapping`] is the single pairwise pass. With three or more
//! mutually overlapping rooms its result depends on processing order;
//! [`merge_components`] merges each connected group of overlapping rooms in
//! one step and does not.

use std::collections::{BTreeSet, HashSet};

use super::geom::Position;
use super::grid::Grid;
use super::room::Room;
use super::tile::RoomId;

/// Walls of `a` inside `b` and walls of `b` inside `a`, if both exist
fn internal_walls(a: &Room, b: &Room) -> Option<(Vec<Position>, Vec<Position>)> {
    let a_in_b: Vec<Position> = a.walls.iter().copied().filter(|p| b.tiles.contains(p)).collect();
    let b_in_a: Vec<Position> = b.walls.iter().copied().filter(|p| a.tiles.contains(p)).collect();
    if a_in_b.is_empty() || b_in_a.is_empty() {
        None
    } else {
        Some((a_in_b, b_in_a))
    }
}

/// Whether two rooms overlap (each has walls inside the other)
pub fn overlaps(a: &Room, b: &Room) -> bool {
    internal_walls(a, b).is_some()
}

/// Fuse every overlapping pair of rooms, pairwise, in list order
///
/// The earlier room of a pair survives. Returns how many rooms were
/// merged away.
pub fn merge_overlapping(rooms: &mut Vec<Room>, grid: &mut Grid) -> usize {
    let snapshot: Vec<RoomId> = rooms.iter().map(|r| r.id).collect();
    let mut removed: HashSet<RoomId> = HashSet::new();

    for (i, &a_id) in snapshot.iter().enumerate() {
        for &b_id in &snapshot[i + 1..] {
            if removed.contains(&a_id) || removed.contains(&b_id) {
                continue;
            }
            let (Some(ai), Some(bi)) = (index_of(rooms, a_id), index_of(rooms, b_id)) else {
                continue;
            };
            let Some((a_in_b, b_in_a)) = internal_walls(&rooms[ai], &rooms[bi]) else {
                continue;
            };

            let a_dissolve: Vec<Position> = a_in_b
                .into_iter()
                .filter(|p| !rooms[bi].walls.contains(p))
                .collect();
            let b_dissolve: BTreeSet<Position> = b_in_a
                .into_iter()
                .filter(|p| !rooms[ai].walls.contains(p))
                .collect();

            let dissolved = rooms[bi].clone();
            let survivor = &mut rooms[ai];
            for pos in a_dissolve {
                survivor.dissolve_wall(pos, grid);
            }
            absorb(survivor, &dissolved, &b_dissolve, grid);
            log::debug!("Merged room {:?} into {:?}", b_id, a_id);
            removed.insert(b_id);
        }
    }

    rooms.retain(|r| !removed.contains(&r.id));
    removed.len() + reconcile_ownership(rooms, grid)
}

/// Fuse each connected group of overlapping rooms in one step
///
/// A wall survives only if it lies in no member's interior. The first
/// room of each group survives. Returns how many rooms were merged away.
pub fn merge_components(rooms: &mut Vec<Room>, grid: &mut Grid) -> usize {
    let n = rooms.len();
    let mut sets = DisjointSet::new(n);
    for i in 0..n {
        for j in i + 1..n {
            if overlaps(&rooms[i], &rooms[j]) {
                sets.union(i, j);
            }
        }
    }

    let mut removed: HashSet<RoomId> = HashSet::new();
    for root in 0..n {
        let members: Vec<usize> = (0..n).filter(|&i| sets.find(i) == root).collect();
        if members.len() < 2 {
            continue;
        }
        let interior: BTreeSet<Position> = members
            .iter()
            .flat_map(|&i| rooms[i].interior().copied().collect::<Vec<_>>())
            .collect();

        // Members are in ascending order, so the first is the survivor
        let survivor_idx = members[0];
        let others: Vec<Room> = members[1..].iter().map(|&i| rooms[i].clone()).collect();
        let survivor = &mut rooms[survivor_idx];

        let own_dissolve: Vec<Position> = survivor
            .walls
            .iter()
            .copied()
            .filter(|p| interior.contains(p))
            .collect();
        for pos in own_dissolve {
            survivor.dissolve_wall(pos, grid);
        }
        for other in &others {
            absorb(survivor, other, &interior, grid);
            removed.insert(other.id);
        }
        log::debug!("Merged {} rooms into {:?}", members.len(), survivor.id);
    }

    rooms.retain(|r| !removed.contains(&r.id));
    removed.len() + reconcile_ownership(rooms, grid)
}

/// Move every tile of `other` into `survivor`
///
/// Walls listed in `dissolve` become floor, the rest keep their wall and
/// corner membership.
fn absorb(survivor: &mut Room, other: &Room, dissolve: &BTreeSet<Position>, grid: &mut Grid) {
    let look = survivor.interior_appearance();
    for &pos in &other.tiles {
        survivor.tiles.insert(pos);
        let was_wall = other.walls.contains(&pos);
        if was_wall && !dissolve.contains(&pos) {
            survivor.walls.insert(pos);
            if other.corners.contains(&pos) {
                survivor.corners.insert(pos);
            }
        } else if was_wall && !survivor.walls.contains(&pos) {
            if let Some(tile) = grid.at_mut(pos) {
                tile.appearance = look;
                tile.blocked = false;
                tile.clear_occupancy();
            }
        }
    }

    // The later room overwrote handles of shared tiles when it was placed
    for &pos in &survivor.tiles {
        if let Some(tile) = grid.at_mut(pos) {
            tile.room = Some(survivor.id);
        }
    }
    survivor.bounds = survivor.bounds.union(&other.bounds);
    survivor.hidden = survivor.hidden && other.hidden;
    survivor.recompute_sides();
}

/// Drop tiles a room lists but no longer owns, then drop empty rooms
///
/// Covers rooms swallowed by a later room without mutual overlap.
/// Returns how many rooms were dropped.
pub fn reconcile_ownership(rooms: &mut Vec<Room>, grid: &Grid) -> usize {
    for room in rooms.iter_mut() {
        let foreign: Vec<Position> = room
            .tiles
            .iter()
            .copied()
            .filter(|p| grid.at(*p).map_or(true, |t| t.room != Some(room.id)))
            .collect();
        if foreign.is_empty() {
            continue;
        }
        for pos in foreign {
            room.release(pos);
        }
        room.recompute_bounds();
    }
    let before = rooms.len();
    rooms.retain(|r| !r.tiles.is_empty());
    before - rooms.len()
}

fn index_of(rooms: &[Room], id: RoomId) -> Option<usize> {
    rooms.iter().position(|r| r.id == id)
}

/// Union-find over room indices
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// The smaller index becomes the root
    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra < rb {
            self.parent[rb] = ra;
        } else if rb < ra {
            self.parent[ra] = rb;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::room::RoomStyle;
    use crate::world::tile::{Appearance, TileCategory};
    use crate::world::{Biome, Rect};

    fn style() -> RoomStyle {
        RoomStyle {
            floor: Appearance::new(TileCategory::Floor, 0),
            wall: Appearance::new(TileCategory::Wall, 0),
            roof: None,
        }
    }

    fn place(rects: &[Rect], grid: &mut Grid) -> Vec<Room> {
        rects
            .iter()
            .enumerate()
            .map(|(i, r)| Room::from_rect(RoomId(i as u32), "r", *r, style(), Biome::Crypt, grid).unwrap())
            .collect()
    }

    fn grid() -> Grid {
        Grid::new(20, 20, Appearance::new(TileCategory::Rock, 0), Biome::Crypt)
    }

    /// Walls whose whole 8-neighbourhood lies inside the room
    fn buried_walls(room: &Room) -> Vec<Position> {
        room.walls
            .iter()
            .copied()
            .filter(|w| w.neighbors8().iter().all(|n| room.tiles.contains(n)))
            .collect()
    }

    fn union_of(rects: &[Rect]) -> BTreeSet<Position> {
        rects.iter().flat_map(|r| r.positions().collect::<Vec<_>>()).collect()
    }

    #[test]
    fn test_disjoint_rooms_untouched() {
        let mut g = grid();
        let mut rooms = place(&[Rect::new(0, 0, 4, 4), Rect::new(8, 8, 12, 12)], &mut g);
        let before: Vec<_> = rooms.iter().map(|r| r.tiles.clone()).collect();
        assert_eq!(merge_overlapping(&mut rooms, &mut g), 0);
        assert_eq!(rooms.len(), 2);
        let after: Vec<_> = rooms.iter().map(|r| r.tiles.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_two_overlapping_rectangles() {
        let rects = [Rect::new(0, 0, 5, 5), Rect::new(4, 4, 9, 9)];
        let mut g = grid();
        let mut rooms = place(&rects, &mut g);
        assert_eq!(merge_overlapping(&mut rooms, &mut g), 1);
        assert_eq!(rooms.len(), 1);

        let room = &rooms[0];
        assert_eq!(room.tiles, union_of(&rects));
        assert!(room.is_consistent(&g));
        for pos in [Position::new(4, 4), Position::new(5, 5)] {
            assert!(!room.is_wall(pos), "{:?} should be floor", pos);
            assert!(g.at(pos).map_or(false, |t| !t.blocked));
        }
        assert!(buried_walls(room).is_empty());
        assert_eq!(room.bounds, Rect::new(0, 0, 9, 9));
    }

    #[test]
    fn test_contained_room_reconciled() {
        // The small room sits wholly in the big room's interior
        let mut g = grid();
        let mut rooms = place(&[Rect::new(0, 0, 10, 10), Rect::new(3, 3, 6, 6)], &mut g);
        merge_overlapping(&mut rooms, &mut g);
        assert_eq!(rooms.len(), 2);
        for room in &rooms {
            assert!(room.is_consistent(&g));
        }
        assert!(!rooms[0].tiles.contains(&Position::new(4, 4)));
    }

    #[test]
    fn test_three_way_mutual_overlap() {
        // Every pair overlaps, so order does not matter here
        let rects = [Rect::new(0, 0, 6, 6), Rect::new(4, 2, 10, 8), Rect::new(2, 4, 8, 10)];

        let mut g = grid();
        let mut pairwise = place(&rects, &mut g);
        merge_overlapping(&mut pairwise, &mut g);
        assert_eq!(pairwise.len(), 1);
        assert_eq!(pairwise[0].tiles, union_of(&rects));
        assert!(pairwise[0].is_consistent(&g));

        let mut g = grid();
        let mut grouped = place(&rects, &mut g);
        assert_eq!(merge_components(&mut grouped, &mut g), 2);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].tiles, union_of(&rects));
        assert!(grouped[0].is_consistent(&g));
        assert!(buried_walls(&grouped[0]).is_empty());
    }

    #[test]
    fn test_pairwise_pass_misses_chain_joined_last() {
        // The bridging room comes last, so the pairwise pass fuses it into
        // the first room and never revisits the second
        let rects = [Rect::new(0, 0, 4, 4), Rect::new(6, 0, 10, 4), Rect::new(2, 2, 8, 8)];

        let mut g = grid();
        let mut pairwise = place(&rects, &mut g);
        assert_eq!(merge_overlapping(&mut pairwise, &mut g), 1);
        assert_eq!(pairwise.len(), 2);
        assert_ne!(pairwise[0].tiles, union_of(&rects));

        let mut g = grid();
        let mut grouped = place(&rects, &mut g);
        assert_eq!(merge_components(&mut grouped, &mut g), 2);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].id, RoomId(0));
        assert_eq!(grouped[0].tiles, union_of(&rects));
        assert!(grouped[0].is_consistent(&g));
    }

    #[test]
    fn test_chain_merges_through_middle_room() {
        // Outer rooms only touch through the middle one
        let rects = [Rect::new(0, 0, 4, 4), Rect::new(3, 3, 8, 8), Rect::new(7, 7, 12, 12)];
        let mut g = grid();
        let mut rooms = place(&rects, &mut g);
        merge_components(&mut rooms, &mut g);
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, RoomId(0));
    }

    #[test]
    fn test_disjoint_set_roots_at_smallest() {
        let mut sets = DisjointSet::new(4);
        sets.union(3, 1);
        sets.union(1, 2);
        assert_eq!(sets.find(3), 1);
        assert_eq!(sets.find(0), 0);
    }
}
