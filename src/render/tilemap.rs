//! Tile map rendering
//!
//! Draws the part of an environment the camera sees into a terminal buffer.
//! At zoom 1 one cell shows one tile; zooming out packs several tiles into
//! a cell and the one under the cell centre wins.

use ratatui::{
    buffer::Buffer,
    layout::Rect as Area,
    style::{Color, Style},
    widgets::Widget,
};

use crate::world::tile::TILE_SIZE;
use crate::world::{Environment, Position};

const PLAYER_GLYPH: char = '@';
const PLAYER_COLOR: Color = Color::Rgb(255, 230, 120);

/// Renders an environment through its camera
pub struct TileRenderer<'a> {
    env: &'a Environment,
    player: Option<Position>,
}

impl<'a> TileRenderer<'a> {
    pub fn new(env: &'a Environment) -> Self {
        Self { env, player: None }
    }

    /// Draw the player marker on top of everything else
    pub fn with_player(mut self, pos: Position) -> Self {
        self.player = Some(pos);
        self
    }

    /// The tile under the centre of a viewport cell
    pub fn tile_under(&self, cx: u16, cy: u16) -> Position {
        let camera = &self.env.camera;
        let scale = TILE_SIZE / camera.zoom;
        let px = camera.x + (cx as f32 + 0.5) * scale;
        let py = camera.y + (cy as f32 + 0.5) * scale;
        Position::new((px / TILE_SIZE).floor() as i32, (py / TILE_SIZE).floor() as i32)
    }

    /// Glyph and colours for a tile, `None` off the grid
    pub fn cell_for(&self, pos: Position) -> Option<(char, Color, Color)> {
        let tile = self.env.grid.at(pos)?;
        if tile.hidden {
            return Some((' ', Color::Black, Color::Black));
        }
        let (br, bg, bb) = tile.appearance.bg_color();
        let background = Color::Rgb(br, bg, bb);

        if self.player == Some(pos) {
            return Some((PLAYER_GLYPH, PLAYER_COLOR, background));
        }
        if let Some(template) = tile.entity.and_then(|id| self.env.entity(id)).map(|e| e.kind.template()) {
            let (r, g, b) = template.fg;
            return Some((template.glyph, Color::Rgb(r, g, b), background));
        }
        if let Some(template) = tile.item.and_then(|id| self.env.item(id)).map(|i| i.kind.template()) {
            let (r, g, b) = template.fg;
            return Some((template.glyph, Color::Rgb(r, g, b), background));
        }
        let (r, g, b) = tile.appearance.fg_color();
        Some((tile.appearance.glyph(), Color::Rgb(r, g, b), background))
    }
}

impl Widget for TileRenderer<'_> {
    fn render(self, area: Area, buf: &mut Buffer) {
        for cy in 0..area.height {
            for cx in 0..area.width {
                let pos = self.tile_under(cx, cy);
                let (glyph, fg, bg) = self.cell_for(pos).unwrap_or((' ', Color::Reset, Color::Reset));
                if let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) {
                    cell.set_char(glyph).set_style(Style::default().fg(fg).bg(bg));
                }
            }
        }
    }
}
