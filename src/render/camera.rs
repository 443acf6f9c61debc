//! Camera
//!
//! A pixel-space viewport over the grid. The viewport never leaves the
//! world: after every update or zoom its left and top edges are at least
//! zero and its right and bottom edges at most the grid's pixel extent.

use crate::world::tile::TILE_SIZE;
use crate::world::{Position, Rect};

pub const DEFAULT_ZOOM_STEP: f32 = 0.25;
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Left edge in pixels
    pub x: f32,
    /// Top edge in pixels
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
    screen_width: f32,
    screen_height: f32,
    world_width: f32,
    world_height: f32,
    target: (f32, f32),
    fixed: bool,
}

impl Camera {
    /// Camera over a `world_width`x`world_height` pixel world, centred on it
    pub fn new(screen_width: f32, screen_height: f32, world_width: f32, world_height: f32) -> Self {
        let mut camera = Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            zoom: 1.0,
            screen_width: screen_width.max(0.0),
            screen_height: screen_height.max(0.0),
            world_width: world_width.max(0.0),
            world_height: world_height.max(0.0),
            target: (world_width / 2.0, world_height / 2.0),
            fixed: false,
        };
        camera.zoom = camera.zoom.clamp(camera.min_zoom(), camera.max_zoom());
        camera.resize_viewport();
        camera.center_on_target();
        camera
    }

    /// A camera that ignores updates and zooms
    pub fn fixed(screen_width: f32, screen_height: f32, world_width: f32, world_height: f32) -> Self {
        let mut camera = Self::new(screen_width, screen_height, world_width, world_height);
        camera.set_fixed(true);
        camera
    }

    /// Pin the viewport where it is, or release it
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn target(&self) -> (f32, f32) {
        self.target
    }

    /// Smallest zoom at which the viewport still fits inside the world
    fn min_zoom(&self) -> f32 {
        if self.world_width <= 0.0 || self.world_height <= 0.0 {
            return MIN_ZOOM;
        }
        let fit = (self.screen_width / self.world_width).max(self.screen_height / self.world_height);
        MIN_ZOOM.max(fit)
    }

    fn max_zoom(&self) -> f32 {
        MAX_ZOOM.max(self.min_zoom())
    }

    fn resize_viewport(&mut self) {
        self.width = (self.screen_width / self.zoom).min(self.world_width);
        self.height = (self.screen_height / self.zoom).min(self.world_height);
    }

    pub fn set_target(&mut self, x: f32, y: f32) {
        self.target = (x, y);
    }

    /// Target the centre of a tile and update
    pub fn follow(&mut self, pos: Position) {
        let half = TILE_SIZE / 2.0;
        self.set_target(pos.x as f32 * TILE_SIZE + half, pos.y as f32 * TILE_SIZE + half);
        self.update();
    }

    /// Move the viewport onto the target, then clamp it to the world
    pub fn update(&mut self) {
        if self.fixed {
            return;
        }
        self.center_on_target();
    }

    fn center_on_target(&mut self) {
        self.x += self.target.0 - (self.x + self.width / 2.0);
        self.y += self.target.1 - (self.y + self.height / 2.0);
        self.clamp();
    }

    fn clamp(&mut self) {
        self.x = self.x.max(0.0);
        self.y = self.y.max(0.0);
        if self.x + self.width > self.world_width {
            self.x = self.world_width - self.width;
        }
        if self.y + self.height > self.world_height {
            self.y = self.world_height - self.height;
        }
        self.x = self.x.max(0.0);
        self.y = self.y.max(0.0);
    }

    pub fn zoom_in(&mut self, step: f32) {
        self.set_zoom(self.zoom + step);
    }

    pub fn zoom_out(&mut self, step: f32) {
        self.set_zoom(self.zoom - step);
    }

    /// Set the zoom, clamped, then re-centre and re-clamp
    pub fn set_zoom(&mut self, value: f32) {
        if self.fixed || !value.is_finite() {
            return;
        }
        self.zoom = value.clamp(self.min_zoom(), self.max_zoom());
        self.resize_viewport();
        self.center_on_target();
    }

    /// New screen size, e.g. after a terminal resize
    pub fn resize(&mut self, screen_width: f32, screen_height: f32) {
        self.screen_width = screen_width.max(0.0);
        self.screen_height = screen_height.max(0.0);
        self.zoom = self.zoom.clamp(self.min_zoom(), self.max_zoom());
        self.resize_viewport();
        self.center_on_target();
    }

    /// Tiles at least partly inside the viewport
    pub fn visible_tiles(&self) -> Rect {
        let x1 = (self.x / TILE_SIZE).floor() as i32;
        let y1 = (self.y / TILE_SIZE).floor() as i32;
        let x2 = ((self.x + self.width) / TILE_SIZE).ceil() as i32 - 1;
        let y2 = ((self.y + self.height) / TILE_SIZE).ceil() as i32 - 1;
        Rect::new(x1, y1, x2.max(x1), y2.max(y1))
    }

    /// Convert a world pixel position to screen pixels
    pub fn to_screen(&self, px: f32, py: f32) -> (f32, f32) {
        ((px - self.x) * self.zoom, (py - self.y) * self.zoom)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_world(camera: &Camera, world_w: f32, world_h: f32) -> bool {
        camera.x >= 0.0
            && camera.y >= 0.0
            && camera.x + camera.width <= world_w + 1e-3
            && camera.y + camera.height <= world_h + 1e-3
    }

    #[test]
    fn test_target_origin_clamps_to_zero() {
        let mut camera = Camera::new(640.0, 480.0, 3200.0, 3200.0);
        camera.set_target(0.0, 0.0);
        camera.update();
        assert_eq!(camera.x, 0.0);
        assert_eq!(camera.y, 0.0);
    }

    #[test]
    fn test_target_far_corner_clamps_to_extent() {
        let mut camera = Camera::new(640.0, 480.0, 3200.0, 1600.0);
        camera.set_target(5000.0, 5000.0);
        camera.update();
        assert_eq!(camera.x + camera.width, 3200.0);
        assert_eq!(camera.y + camera.height, 1600.0);
    }

    #[test]
    fn test_follow_centres_on_tile() {
        let mut camera = Camera::new(320.0, 320.0, 3200.0, 3200.0);
        camera.follow(Position::new(50, 50));
        assert_eq!(camera.x + camera.width / 2.0, 50.0 * TILE_SIZE + TILE_SIZE / 2.0);
    }

    #[test]
    fn test_zoom_floor_keeps_viewport_inside_small_world() {
        // 10x5 tile world on a much larger screen
        let mut camera = Camera::new(1280.0, 960.0, 320.0, 160.0);
        camera.zoom_out(10.0);
        assert!(camera.zoom >= 1280.0 / 320.0);
        assert!(in_world(&camera, 320.0, 160.0));
    }

    #[test]
    fn test_zoom_is_bounded() {
        let mut camera = Camera::new(640.0, 480.0, 6400.0, 6400.0);
        camera.set_zoom(100.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
        camera.set_zoom(-3.0);
        assert_eq!(camera.zoom, MIN_ZOOM);
        assert!(camera.zoom > 0.0);
    }

    #[test]
    fn test_fixed_camera_ignores_changes() {
        let mut camera = Camera::fixed(640.0, 480.0, 3200.0, 3200.0);
        let (x, y, zoom) = (camera.x, camera.y, camera.zoom);
        camera.set_target(0.0, 0.0);
        camera.update();
        camera.zoom_in(DEFAULT_ZOOM_STEP);
        assert_eq!((camera.x, camera.y, camera.zoom), (x, y, zoom));
    }

    #[test]
    fn test_always_inside_world() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let (world_w, world_h) = (40.0 * TILE_SIZE, 25.0 * TILE_SIZE);
        let mut camera = Camera::new(800.0, 600.0, world_w, world_h);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            match rng.gen_range(0..4) {
                0 => {
                    camera.set_target(rng.gen_range(-500.0..2000.0), rng.gen_range(-500.0..2000.0));
                    camera.update();
                }
                1 => camera.zoom_in(rng.gen_range(0.0..1.0)),
                2 => camera.zoom_out(rng.gen_range(0.0..1.0)),
                _ => camera.set_zoom(rng.gen_range(-1.0..6.0)),
            }
            assert!(in_world(&camera, world_w, world_h), "{:?}", camera);
        }
    }
}
