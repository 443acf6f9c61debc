//! Floorplans
//!
//! Hand-authored room layouts written as rows of symbols.

use serde::{Deserialize, Serialize};

use crate::data::ItemKind;
use crate::error::BuildError;

/// What one floorplan symbol turns its tile into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// `-` solid wall
    Wall,
    /// `|` wall segment left passable, with a door on it
    Door,
    /// `.` bare floor
    Floor,
    /// Floor with a blocking item on it
    Furniture(ItemKind),
    /// Floor with a passable item on it
    Decor(ItemKind),
    /// `L` lamp just outside the room
    Light,
    /// ` ` not part of the room
    Outside,
}

impl Symbol {
    pub fn from_char(ch: char) -> Option<Symbol> {
        let symbol = match ch {
            '-' => Symbol::Wall,
            '|' => Symbol::Door,
            '.' => Symbol::Floor,
            'b' => Symbol::Furniture(ItemKind::Bed),
            't' => Symbol::Furniture(ItemKind::Table),
            'c' => Symbol::Furniture(ItemKind::Chair),
            's' => Symbol::Furniture(ItemKind::Shelf),
            'k' => Symbol::Furniture(ItemKind::Chest),
            'p' => Symbol::Decor(ItemKind::Plant),
            'r' => Symbol::Decor(ItemKind::Rug),
            'L' => Symbol::Light,
            ' ' => Symbol::Outside,
            _ => return None,
        };
        Some(symbol)
    }

    /// Whether the tile belongs to the room footprint
    pub fn in_footprint(&self) -> bool {
        !matches!(self, Symbol::Light | Symbol::Outside)
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Symbol::Wall | Symbol::Door)
    }
}

/// A named layout, one string per row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floorplan {
    pub name: String,
    pub rows: Vec<String>,
    /// Rooms built from this plan start with a roof
    #[serde(default = "default_roofed")]
    pub roofed: bool,
}

fn default_roofed() -> bool {
    true
}

impl Floorplan {
    pub fn new(name: impl Into<String>, rows: &[&str]) -> Self {
        Self {
            name: name.into(),
            rows: rows.iter().map(|r| r.to_string()).collect(),
            roofed: true,
        }
    }

    /// Size in tiles as (width, height)
    pub fn size(&self) -> (i32, i32) {
        let width = self.rows.first().map_or(0, |r| r.chars().count());
        (width as i32, self.rows.len() as i32)
    }

    /// Decode every cell as `(dx, dy, symbol)`
    pub fn cells(&self) -> Result<Vec<(i32, i32, Symbol)>, BuildError> {
        let expected = match self.rows.first() {
            Some(row) => row.chars().count(),
            None => return Err(BuildError::EmptyFloorplan(self.name.clone())),
        };
        let mut cells = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            let found = row.chars().count();
            if found != expected {
                return Err(BuildError::RaggedFloorplan {
                    name: self.name.clone(),
                    row: y,
                    expected,
                    found,
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let symbol = Symbol::from_char(ch).ok_or_else(|| BuildError::UnknownSymbol {
                    name: self.name.clone(),
                    symbol: ch,
                    x,
                    y,
                })?;
                cells.push((x as i32, y as i32, symbol));
            }
        }
        Ok(cells)
    }
}

/// Floorplans compiled into the crate
pub fn default_floorplans() -> Vec<Floorplan> {
    vec![
        Floorplan::new(
            "cottage",
            &[
                " L       L ",
                "-----------",
                "-b.r.....s-",
                "-....t.c..-",
                "-p.....c..-",
                "-----|-----",
            ],
        ),
        Floorplan::new(
            "hut",
            &[
                "L     ",
                "------",
                "-b..k-",
                "-....-",
                "--|---",
            ],
        ),
        Floorplan::new(
            "shed",
            &[
                "-----",
                "-s.k-",
                "-...|",
                "-----",
            ],
        ),
        Floorplan::new(
            "chapel",
            &[
                "    L    ",
                "---------",
                "-p.....p-",
                "-.c.c.c.-",
                "-.c.c.c.-",
                "-...t...-",
                "----|----",
            ],
        ),
        Floorplan::new(
            "greenhouse",
            &[
                "---------",
                "-ppp.ppp-",
                "-.......|",
                "-ppp.ppp-",
                "---------",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        for plan in default_floorplans() {
            assert!(plan.cells().is_ok(), "{} failed to parse", plan.name);
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let plan = Floorplan::new("bad", &["---", "-.", "---"]);
        assert!(matches!(
            plan.cells(),
            Err(BuildError::RaggedFloorplan { row: 1, expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_unknown_symbol_rejected() {
        let plan = Floorplan::new("bad", &["---", "-?-", "---"]);
        assert!(matches!(
            plan.cells(),
            Err(BuildError::UnknownSymbol { symbol: '?', x: 1, y: 1, .. })
        ));
    }

    #[test]
    fn test_roofed_defaults_when_missing_from_ron() {
        let plan: Floorplan = ron::from_str(r#"(name: "box", rows: ["---", "-.-", "---"])"#).unwrap();
        assert!(plan.roofed);
        assert_eq!(plan.size(), (3, 3));
    }
}
