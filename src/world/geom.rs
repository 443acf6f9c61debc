//! Grid geometry
//!
//! Positions and inclusive rectangles in tile coordinates.

use serde::{Deserialize, Serialize};

/// Position on the tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position
    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance (allows diagonal)
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours (may be off-grid)
    pub fn neighbors4(&self) -> [Position; 4] {
        [
            self.offset(0, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(0, 1),
        ]
    }

    /// The eight surrounding positions, row by row (may be off-grid)
    pub fn neighbors8(&self) -> [Position; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(-1, 0),
            self.offset(1, 0),
            self.offset(-1, 1),
            self.offset(0, 1),
            self.offset(1, 1),
        ]
    }
}

/// Inclusive rectangle of tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    /// Rectangle spanning both corners, in any order
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Rectangle from an origin and a size in tiles
    pub fn with_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width - 1, y + height - 1)
    }

    /// Smallest rectangle holding every position, `None` when empty
    pub fn bounding<'a>(positions: impl IntoIterator<Item = &'a Position>) -> Option<Rect> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for pos in iter {
            rect.x1 = rect.x1.min(pos.x);
            rect.y1 = rect.y1.min(pos.y);
            rect.x2 = rect.x2.max(pos.x);
            rect.y2 = rect.y2.max(pos.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1 + 1
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x1 && pos.x <= self.x2 && pos.y >= self.y1 && pos.y <= self.y2
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// True for tiles on the outer ring of the rectangle
    pub fn is_border(&self, pos: Position) -> bool {
        self.contains(pos)
            && (pos.x == self.x1 || pos.x == self.x2 || pos.y == self.y1 || pos.y == self.y2)
    }

    /// True for the four tiles at both-coordinate extremes
    pub fn is_corner(&self, pos: Position) -> bool {
        (pos.x == self.x1 || pos.x == self.x2) && (pos.y == self.y1 || pos.y == self.y2)
    }

    /// Every position, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y1..=self.y2).flat_map(move |y| (self.x1..=self.x2).map(move |x| Position::new(x, y)))
    }

    /// Positions on the outer ring, each once
    pub fn perimeter(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(move |p| self.is_border(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let rect = Rect::new(5, 7, 1, 2);
        assert_eq!((rect.x1, rect.y1, rect.x2, rect.y2), (1, 2, 5, 7));
        assert_eq!(rect.width(), 5);
        assert_eq!(rect.height(), 6);
    }

    #[test]
    fn test_perimeter_counts_each_tile_once() {
        let rect = Rect::new(0, 0, 2, 2);
        assert_eq!(rect.perimeter().count(), 8);
        assert!(!rect.is_border(Position::new(1, 1)));
        assert!(rect.is_corner(Position::new(2, 0)));
    }

    #[test]
    fn test_bounding_box() {
        let points = [Position::new(3, 1), Position::new(0, 4), Position::new(2, 2)];
        assert_eq!(Rect::bounding(&points), Some(Rect::new(0, 1, 3, 4)));
        assert_eq!(Rect::bounding(&[]), None);
    }
}
