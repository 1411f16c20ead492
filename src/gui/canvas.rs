use nalgebra::{Point2, Point3, Vector2};

use crate::assets::SpriteImage;
use crate::math::geometry::Rect;
use crate::orrery::Sprite;

// RGB, 0.0 to 1.0
pub type Color = Point3<f32>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    CloseRequested,
    // Screen-space position of the cursor when the left button went down
    LeftClick(Point2<f64>),
}

/// Everything the simulation needs from a window. All coordinates are in screen
/// space: origin at the top left, x to the right, y downwards, in pixels.
///
/// Drawing is in painter's order: within a frame, whatever is drawn later covers
/// what was drawn before it. Circles and lines are filled.
pub trait Canvas {
    fn size(&self) -> Vector2<f64>;

    fn center(&self) -> Point2<f64> {
        Point2::from(self.size() / 2.0)
    }

    /// Uploads a sprite so it can be drawn later.
    fn add_sprite(&mut self, image: &SpriteImage) -> Sprite;

    /// Drains every input event that arrived since the last call, oldest first.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    fn cursor_position(&self) -> Option<Point2<f64>>;

    fn clear(&mut self, color: &Color);

    fn draw_circle(&mut self, center: &Point2<f64>, radius: f64, color: &Color);

    fn draw_line(&mut self, from: &Point2<f64>, to: &Point2<f64>, width: f64, color: &Color);

    /// Draws `sprite` rotated counter-clockwise by `degrees`, centered in `bounds`.
    fn draw_sprite(&mut self, sprite: &Sprite, bounds: &Rect, degrees: f64);

    /// Shows the finished frame, then blocks until the next frame is due.
    /// Returns false once the window has gone away.
    fn present(&mut self) -> bool;
}
