use nalgebra::{Point2, Point3, Vector2};

use crate::consts::{ROTATION_DAMPING, SELECTION_LINE_WIDTH, SELECT_COLOR};
use crate::gui::Canvas;
use crate::math::geometry::{rotated_extents, Rect};

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpriteID(pub usize);

/// Handle to a sprite image that has been handed to a canvas, plus its unrotated size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub id: SpriteID,
    pub size: Vector2<f64>,
}

/// What a body revolves around. Parents always come earlier in the orrery than
/// their children, so this can never form a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Anchor,
    Body(BodyID),
}

// All the immutable info about a body
#[derive(Debug, Clone)]
pub struct BodyInfo {
    pub orbit_radius: f64,
    // radians per tick
    pub orbit_speed: f64,
    // degrees per tick, before damping
    pub rotation_speed: f64,
    pub selection_radius: f64,
    pub sprite: Sprite,
    pub parent: Parent,
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    location: Point2<f64>,
    orbit_center: Point2<f64>,
    orbit_angle: f64,
    rotation_angle: f64,
    // The angle the current bounds were computed for; lags rotation_angle by one step
    sprite_rotation: f64,
    bounds: Rect,
    selected: bool,
}

impl Body {
    /// Creates a body sitting on `anchor`, which is also its initial orbit center.
    pub fn new(id: BodyID, info: BodyInfo, orbit_angle: f64, anchor: Point2<f64>) -> Self {
        assert!(
            info.orbit_radius >= 0.0,
            "Orbit radius must be non-negative, got {}",
            info.orbit_radius
        );
        let bounds = Rect::from_center(anchor, info.sprite.size);

        Body {
            id,
            info,
            location: anchor,
            orbit_center: anchor,
            orbit_angle,
            rotation_angle: 0.0,
            sprite_rotation: 0.0,
            bounds,
            selected: false,
        }
    }

    pub fn parent_id(&self) -> Option<BodyID> {
        match self.info.parent {
            Parent::Anchor => None,
            Parent::Body(id) => Some(id),
        }
    }

    pub fn location(&self) -> Point2<f64> {
        self.location
    }

    pub fn orbit_center(&self) -> Point2<f64> {
        self.orbit_center
    }

    pub fn orbit_angle(&self) -> f64 {
        self.orbit_angle
    }

    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub fn sprite_rotation(&self) -> f64 {
        self.sprite_rotation
    }

    pub fn bounds(&self) -> &Rect {
        &self.bounds
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_orbit_center(&mut self, center: Point2<f64>) {
        self.orbit_center = center;
    }

    /// Places the body on its orbit at the current angle, then steps the angle.
    pub fn advance_orbit(&mut self) {
        let (sin, cos) = self.orbit_angle.sin_cos();
        self.location = self.orbit_center + self.info.orbit_radius * Vector2::new(sin, cos);
        self.bounds = self.bounds.with_center(self.location);
        self.orbit_angle += self.info.orbit_speed;
    }

    /// Refits the bounds to the sprite rotated by the current angle, then steps the angle.
    pub fn advance_rotation(&mut self) {
        self.sprite_rotation = self.rotation_angle;
        let extents = rotated_extents(&self.info.sprite.size, self.sprite_rotation);
        self.bounds = Rect::from_center(self.bounds.center(), extents);

        let step = self.info.rotation_speed * ROTATION_DAMPING;
        self.rotation_angle = wrap_degrees(self.rotation_angle + step);
    }

    pub fn update(&mut self) {
        self.advance_orbit();
        self.advance_rotation();
    }

    pub fn toggle_selection(&mut self) {
        self.selected = !self.selected;
    }

    pub fn contains_point(&self, p: &Point2<f64>) -> bool {
        self.bounds.contains_point(p)
    }

    pub fn render_selection<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if !self.selected {
            return;
        }

        let color = Point3::from(SELECT_COLOR);
        canvas.draw_circle(&self.location, self.info.selection_radius, &color);
        canvas.draw_line(
            &self.location,
            &self.orbit_center,
            SELECTION_LINE_WIDTH,
            &color,
        );
    }

    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.draw_sprite(&self.info.sprite, &self.bounds, self.sprite_rotation);
    }
}

// Passing 360 resets the angle to 0. Spinning backwards below 0 wraps around
// instead, so the angle stays in [0, 360) either way.
fn wrap_degrees(angle: f64) -> f64 {
    if angle >= 360.0 {
        return 0.0;
    }
    if angle >= 0.0 {
        return angle;
    }

    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
