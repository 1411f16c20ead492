use nalgebra::{Point2, Vector2};

/// An axis-aligned rectangle in screen space (x to the right, y downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    center: Point2<f64>,
    half_extents: Vector2<f64>,
}

impl Rect {
    pub fn from_center(center: Point2<f64>, size: Vector2<f64>) -> Self {
        Rect {
            center,
            half_extents: size / 2.0,
        }
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn size(&self) -> Vector2<f64> {
        self.half_extents * 2.0
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.half_extents.x
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.half_extents.x
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.half_extents.y
    }

    pub fn bottom(&self) -> f64 {
        self.center.y + self.half_extents.y
    }

    /// Half-open containment: the left and top edges are inside the rectangle,
    /// the right and bottom edges are not. An empty rectangle contains nothing.
    pub fn contains_point(&self, p: &Point2<f64>) -> bool {
        self.left() <= p.x && p.x < self.right() && self.top() <= p.y && p.y < self.bottom()
    }

    pub fn with_center(&self, center: Point2<f64>) -> Self {
        Rect {
            center,
            half_extents: self.half_extents,
        }
    }
}

/// Returns the size of the smallest axis-aligned box that holds a `size`-sized
/// rectangle after it has been rotated by `degrees`.
pub fn rotated_extents(size: &Vector2<f64>, degrees: f64) -> Vector2<f64> {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    Vector2::new(
        size.x * cos + size.y * sin,
        size.x * sin + size.y * cos,
    )
}
