use nalgebra::Point2;

use super::body::{Body, BodyID, BodyInfo, Parent, Sprite};
use crate::file::{ParentRef, Scene};

/// The registry of every body in the scene, in declaration order.
///
/// Bodies are never added or removed once the simulation starts, so a `BodyID`
/// doubles as an index into the registry.
#[derive(Debug, Clone)]
pub struct Orrery {
    bodies: Vec<Body>,
    anchor: Point2<f64>,
}

impl Orrery {
    pub fn new(anchor: Point2<f64>) -> Self {
        Orrery {
            bodies: vec![],
            anchor,
        }
    }

    /// Builds the orrery for a parsed scene. `sprites` must hold one sprite per body,
    /// in the same order as the scene declares them.
    pub fn from_scene(scene: &Scene, anchor: Point2<f64>, sprites: &[Sprite]) -> Self {
        assert_eq!(
            scene.bodies.len(),
            sprites.len(),
            "Need exactly one sprite per body"
        );

        let mut orrery = Orrery::new(anchor);
        for (spec, sprite) in scene.bodies.iter().zip(sprites) {
            let parent = match spec.parent {
                ParentRef::Anchor => Parent::Anchor,
                ParentRef::Index(idx) => Parent::Body(BodyID(idx as usize)),
            };
            let info = BodyInfo {
                orbit_radius: spec.orbit_radius as f64,
                orbit_speed: spec.orbit_speed,
                rotation_speed: spec.rotation_speed,
                selection_radius: spec.selection_radius as f64,
                sprite: *sprite,
                parent,
            };
            orrery.add_body(info, (spec.orbit_angle as f64).to_radians());
        }
        orrery
    }

    pub fn anchor(&self) -> Point2<f64> {
        self.anchor
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    pub fn child_bodies(&self, id: BodyID) -> impl Iterator<Item = &Body> {
        self.bodies()
            .filter(move |body| body.parent_id() == Some(id))
    }

    /// Adds a body orbiting `info.parent`, which must already be in the orrery.
    /// `orbit_angle` is in radians.
    pub fn add_body(&mut self, info: BodyInfo, orbit_angle: f64) -> BodyID {
        let id = BodyID(self.bodies.len());
        if let Parent::Body(parent_id) = info.parent {
            assert!(
                parent_id < id,
                "Body {:?} must come after its parent {:?}",
                id,
                parent_id
            );
        }

        self.bodies.push(Body::new(id, info, orbit_angle, self.anchor));
        id
    }

    /// Points every body at its parent's current location. This has to finish
    /// before any body moves, so that children see where their parents were at
    /// the end of the previous tick.
    pub fn resolve_orbit_centers(&mut self) {
        let centers: Vec<Option<Point2<f64>>> = self
            .bodies
            .iter()
            .map(|body| body.parent_id().map(|id| self.bodies[id.0].location()))
            .collect();

        for (body, center) in self.bodies.iter_mut().zip(centers) {
            if let Some(center) = center {
                body.set_orbit_center(center);
            }
        }
    }

    pub fn tick(&mut self) {
        self.resolve_orbit_centers();
        for body in self.bodies.iter_mut() {
            body.advance_orbit();
            body.advance_rotation();
        }
    }

    /// Toggles the selection of every body whose bounds contain `point`, returning
    /// the ones that changed.
    pub fn toggle_selection_at(&mut self, point: &Point2<f64>) -> Vec<BodyID> {
        let mut toggled = vec![];
        for body in self.bodies.iter_mut() {
            if body.contains_point(point) {
                body.toggle_selection();
                log::debug!(
                    "Body {:?} {}",
                    body.id,
                    if body.is_selected() {
                        "selected"
                    } else {
                        "deselected"
                    }
                );
                toggled.push(body.id);
            }
        }
        toggled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    use crate::orrery::SpriteID;

    fn anchor() -> Point2<f64> {
        Point2::new(640.0, 512.0)
    }

    fn info(orbit_radius: f64, orbit_speed: f64, parent: Parent) -> BodyInfo {
        BodyInfo {
            orbit_radius,
            orbit_speed,
            rotation_speed: 0.0,
            selection_radius: 10.0,
            sprite: Sprite {
                id: SpriteID(0),
                size: Vector2::new(20.0, 20.0),
            },
            parent,
        }
    }

    // anchor <- star <- planet <- moon
    fn chain() -> (Orrery, BodyID, BodyID, BodyID) {
        let mut orrery = Orrery::new(anchor());
        let star = orrery.add_body(info(0.0, 0.0, Parent::Anchor), 0.0);
        let planet = orrery.add_body(info(300.0, 0.01, Parent::Body(star)), 0.0);
        let moon = orrery.add_body(info(75.0, -0.05, Parent::Body(planet)), 0.0);
        (orrery, star, planet, moon)
    }

    #[test]
    fn test_children_see_previous_tick() {
        let (mut orrery, _, planet, moon) = chain();

        for _ in 0..20 {
            let planet_before = orrery.get_body(planet).location();
            orrery.tick();
            let planet_after = orrery.get_body(planet).location();

            assert_eq!(orrery.get_body(moon).orbit_center(), planet_before);
            assert_ne!(planet_before, planet_after);
        }
    }

    #[test]
    fn test_first_tick_positions() {
        let (mut orrery, star, planet, moon) = chain();
        orrery.tick();

        // Everyone starts on the anchor, so the first tick orbits around it
        assert_eq!(orrery.get_body(star).location(), anchor());
        assert_relative_eq!(
            orrery.get_body(planet).location(),
            anchor() + Vector2::new(0.0, 300.0)
        );
        assert_relative_eq!(
            orrery.get_body(moon).location(),
            anchor() + Vector2::new(0.0, 75.0)
        );

        orrery.tick();
        assert_relative_eq!(
            orrery.get_body(moon).orbit_center(),
            anchor() + Vector2::new(0.0, 300.0)
        );
    }

    #[test]
    fn test_anchored_bodies_keep_anchor() {
        let mut orrery = Orrery::new(anchor());
        let a = orrery.add_body(info(50.0, 0.1, Parent::Anchor), 0.0);
        let b = orrery.add_body(info(80.0, -0.1, Parent::Anchor), 1.0);

        for _ in 0..10 {
            orrery.tick();
            assert_eq!(orrery.get_body(a).orbit_center(), anchor());
            assert_eq!(orrery.get_body(b).orbit_center(), anchor());
        }
    }

    #[test]
    fn test_child_bodies() {
        let (orrery, star, planet, moon) = chain();
        let children: Vec<_> = orrery.child_bodies(star).map(|b| b.id).collect();
        assert_eq!(children, vec![planet]);
        assert_eq!(orrery.child_bodies(moon).count(), 0);
    }

    #[test]
    #[should_panic]
    fn test_forward_parent_panics() {
        let mut orrery = Orrery::new(anchor());
        orrery.add_body(info(10.0, 0.0, Parent::Body(BodyID(0))), 0.0);
    }

    #[test]
    fn test_selection_toggles() {
        let (mut orrery, star, planet, moon) = chain();
        orrery.tick();

        // Inside the planet only
        let click = anchor() + Vector2::new(5.0, 302.0);
        assert_eq!(orrery.toggle_selection_at(&click), vec![planet]);
        assert!(orrery.get_body(planet).is_selected());
        assert!(!orrery.get_body(star).is_selected());
        assert!(!orrery.get_body(moon).is_selected());

        // Outside everything
        assert!(orrery
            .toggle_selection_at(&Point2::new(0.0, 0.0))
            .is_empty());
        assert!(orrery.get_body(planet).is_selected());

        // Click again to deselect
        orrery.toggle_selection_at(&click);
        assert!(!orrery.get_body(planet).is_selected());
    }

    #[test]
    fn test_overlapping_bodies_all_toggle() {
        let mut orrery = Orrery::new(anchor());
        let a = orrery.add_body(info(0.0, 0.0, Parent::Anchor), 0.0);
        let b = orrery.add_body(info(5.0, 0.0, Parent::Anchor), 0.0);
        orrery.tick();

        let toggled = orrery.toggle_selection_at(&anchor());
        assert_eq!(toggled, vec![a, b]);
        assert!(orrery.bodies().all(|body| body.is_selected()));
    }
}
