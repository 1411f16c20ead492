use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use nalgebra::Vector2;

use crate::consts::COLOR_KEY;
use crate::file::{Scene, SceneError};

/// A decoded sprite, with color-keyed pixels already made transparent.
#[derive(Debug, Clone)]
pub struct SpriteImage {
    pub path: PathBuf,
    pub pixels: RgbaImage,
}

impl SpriteImage {
    pub fn from_pixels(path: PathBuf, mut pixels: RgbaImage) -> Self {
        apply_color_key(&mut pixels);
        SpriteImage { path, pixels }
    }

    pub fn open(path: &Path) -> Result<Self, SceneError> {
        let pixels = image::open(path)
            .map_err(|source| SceneError::Image {
                path: path.to_owned(),
                source,
            })?
            .to_rgba8();

        let sprite = SpriteImage::from_pixels(path.to_owned(), pixels);
        log::info!(
            "Loaded sprite {} ({}x{})",
            path.display(),
            sprite.pixels.width(),
            sprite.pixels.height()
        );
        Ok(sprite)
    }

    pub fn size(&self) -> Vector2<f64> {
        Vector2::new(self.pixels.width() as f64, self.pixels.height() as f64)
    }
}

/// Decodes the image of every body in the scene, in order, resolving the file
/// names against `images_dir`.
pub fn load_scene_images(scene: &Scene, images_dir: &Path) -> Result<Vec<SpriteImage>, SceneError> {
    scene
        .bodies
        .iter()
        .map(|spec| SpriteImage::open(&images_dir.join(&spec.image)))
        .collect()
}

fn apply_color_key(pixels: &mut RgbaImage) {
    let [r, g, b] = COLOR_KEY;
    for pixel in pixels.pixels_mut() {
        if pixel.0[..3] == [r, g, b] {
            *pixel = Rgba([r, g, b, 0]);
        }
    }
}
