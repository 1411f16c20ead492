use image::DynamicImage;
use kiss3d::event::{Action, MouseButton, WindowEvent};
use kiss3d::resource::TextureManager;
use kiss3d::scene::PlanarSceneNode;
use kiss3d::window::Window;
use nalgebra::{Isometry2, Point2, Translation2, UnitComplex, Vector2};

use super::canvas::{Canvas, Color, InputEvent};
use crate::assets::SpriteImage;
use crate::math::geometry::Rect;
use crate::orrery::{Sprite, SpriteID};

/// A `Canvas` backed by a kiss3d window.
///
/// kiss3d's planar scene has its origin in the middle of the window and y pointing
/// up, so everything is flipped over on the way in.
///
/// Everything is drawn with scene nodes, which kiss3d renders depth-first in the
/// order they were added. The root holds three groups: shapes drawn before the first
/// sprite of a frame, the sprites, and shapes drawn after the sprites. Shape nodes are
/// pooled and reused from frame to frame.
pub struct KissCanvas {
    window: Window,
    under: ShapeLayer,
    sprite_layer: PlanarSceneNode,
    over: ShapeLayer,
    sprites: Vec<PlanarSceneNode>,
    layout: FrameLayout,
}

impl KissCanvas {
    pub fn new(title: &str, size: (u32, u32), frame_rate: u64) -> Self {
        let mut window = Window::new_with_size(title, size.0, size.1);
        window.set_framerate_limit(Some(frame_rate));
        // We draw our own cursor
        window.hide_cursor(true);
        log::info!("Opened {}x{} window at {} fps", size.0, size.1, frame_rate);

        let under = ShapeLayer::new(window.add_planar_group());
        let sprite_layer = window.add_planar_group();
        let over = ShapeLayer::new(window.add_planar_group());

        KissCanvas {
            window,
            under,
            sprite_layer,
            over,
            sprites: vec![],
            layout: FrameLayout::default(),
        }
    }

    fn to_planar(&self, p: &Point2<f64>) -> Point2<f32> {
        to_planar(&self.size(), p)
    }

    fn next_shape(&mut self) -> &mut ShapeSlot {
        let (layer, index) = self.layout.next_slot();
        match layer {
            Layer::Under => self.under.slot(index),
            Layer::Over => self.over.slot(index),
        }
    }
}

impl Canvas for KissCanvas {
    fn size(&self) -> Vector2<f64> {
        Vector2::new(self.window.width() as f64, self.window.height() as f64)
    }

    fn add_sprite(&mut self, image: &SpriteImage) -> Sprite {
        let id = SpriteID(self.sprites.len());
        let size = image.size();

        let name = format!("sprite-{}", id.0);
        TextureManager::get_global_manager(|tm| {
            tm.add_image(DynamicImage::ImageRgba8(image.pixels.clone()), &name);
        });

        let mut node = self.sprite_layer.add_rectangle(size.x as f32, size.y as f32);
        node.set_texture_with_name(&name);
        // Hidden until it gets drawn for the first time
        node.set_visible(false);
        self.sprites.push(node);

        Sprite { id, size }
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut input = vec![];
        let mut events = self.window.events();
        for event in events.iter() {
            match event.value {
                WindowEvent::Close => input.push(InputEvent::CloseRequested),
                WindowEvent::MouseButton(MouseButton::Button1, Action::Press, _) => {
                    if let Some(position) = self.cursor_position() {
                        input.push(InputEvent::LeftClick(position));
                    }
                }
                _ => {}
            }
        }
        input
    }

    fn cursor_position(&self) -> Option<Point2<f64>> {
        self.window.cursor_pos().map(|(x, y)| Point2::new(x, y))
    }

    fn clear(&mut self, color: &Color) {
        self.window.set_background_color(color.x, color.y, color.z);
        self.layout = FrameLayout::default();
    }

    fn draw_circle(&mut self, center: &Point2<f64>, radius: f64, color: &Color) {
        let center = self.to_planar(center);
        self.next_shape().show_disc(&center, radius as f32, color);
    }

    fn draw_line(&mut self, from: &Point2<f64>, to: &Point2<f64>, width: f64, color: &Color) {
        let from = self.to_planar(from);
        let to = self.to_planar(to);
        self.next_shape().show_bar(&from, &to, width as f32, color);
    }

    fn draw_sprite(&mut self, sprite: &Sprite, bounds: &Rect, degrees: f64) {
        self.layout.sprite_drawn();

        let center = self.to_planar(&bounds.center());
        let node = &mut self.sprites[sprite.id.0];
        node.set_visible(true);
        node.set_local_translation(Translation2::new(center.x, center.y));
        node.set_local_rotation(UnitComplex::new(degrees.to_radians() as f32));
    }

    fn present(&mut self) -> bool {
        // Shapes left over from busier frames
        self.under.hide_from(self.layout.used(Layer::Under));
        self.over.hide_from(self.layout.used(Layer::Over));
        self.window.render()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Under,
    Over,
}

/// Hands out shape slots for one frame, in draw order. Shapes drawn before any
/// sprite go under the sprites, the rest go over them.
#[derive(Debug, Default)]
struct FrameLayout {
    sprites_started: bool,
    under: usize,
    over: usize,
}

impl FrameLayout {
    fn sprite_drawn(&mut self) {
        self.sprites_started = true;
    }

    fn next_slot(&mut self) -> (Layer, usize) {
        let (layer, used) = if self.sprites_started {
            (Layer::Over, &mut self.over)
        } else {
            (Layer::Under, &mut self.under)
        };
        let index = *used;
        *used += 1;
        (layer, index)
    }

    fn used(&self, layer: Layer) -> usize {
        match layer {
            Layer::Under => self.under,
            Layer::Over => self.over,
        }
    }
}

struct ShapeLayer {
    root: PlanarSceneNode,
    slots: Vec<ShapeSlot>,
}

impl ShapeLayer {
    fn new(root: PlanarSceneNode) -> Self {
        ShapeLayer {
            root,
            slots: vec![],
        }
    }

    fn slot(&mut self, index: usize) -> &mut ShapeSlot {
        // Slots are only ever appended, so their scene order is their index
        while self.slots.len() <= index {
            let slot = ShapeSlot::new(&mut self.root);
            self.slots.push(slot);
        }
        &mut self.slots[index]
    }

    fn hide_from(&mut self, used: usize) {
        for slot in self.slots.iter_mut().skip(used) {
            slot.group.set_visible(false);
        }
    }
}

/// One reusable position in the draw order, holding either a filled disc or a bar.
struct ShapeSlot {
    group: PlanarSceneNode,
    disc: PlanarSceneNode,
    bar: PlanarSceneNode,
}

impl ShapeSlot {
    fn new(parent: &mut PlanarSceneNode) -> Self {
        let mut group = parent.add_group();
        // Both start with a unit size and get scaled when shown
        let disc = group.add_circle(0.5);
        let bar = group.add_rectangle(1.0, 1.0);
        group.set_visible(false);
        ShapeSlot { group, disc, bar }
    }

    fn show_disc(&mut self, center: &Point2<f32>, radius: f32, color: &Color) {
        self.group.set_visible(true);
        self.bar.set_visible(false);

        self.disc.set_visible(true);
        self.disc.set_color(color.x, color.y, color.z);
        self.disc.set_local_scale(2.0 * radius, 2.0 * radius);
        self.disc
            .set_local_translation(Translation2::new(center.x, center.y));
    }

    fn show_bar(&mut self, from: &Point2<f32>, to: &Point2<f32>, width: f32, color: &Color) {
        self.group.set_visible(true);
        self.disc.set_visible(false);

        let (center, angle, length) = bar_placement(from, to);
        self.bar.set_visible(true);
        self.bar.set_color(color.x, color.y, color.z);
        self.bar.set_local_scale(length, width);
        self.bar
            .set_local_transformation(Isometry2::new(center.coords, angle));
    }
}

fn to_planar(size: &Vector2<f64>, p: &Point2<f64>) -> Point2<f32> {
    let half_size = size / 2.0;
    Point2::new((p.x - half_size.x) as f32, (half_size.y - p.y) as f32)
}

// Center, angle and length of a unit square stretched from `from` to `to`
fn bar_placement(from: &Point2<f32>, to: &Point2<f32>) -> (Point2<f32>, f32, f32) {
    let direction = *to - *from;
    let center = nalgebra::center(from, to);
    (center, direction.y.atan2(direction.x), direction.norm())
}
