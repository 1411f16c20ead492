pub const CAPTION: &str = "Orbiting & Rotating Planets";
pub const SCREEN_SIZE: (u32, u32) = (1280, 1024);
pub const FRAME_RATE: u64 = 30;

// Sprite images are looked up relative to this directory
pub const IMAGES_DIR: &str = "images";

// Pixels of exactly this color are made transparent when a sprite is decoded
pub const COLOR_KEY: [u8; 3] = [255, 0, 255];

// RGB, 0.0 to 1.0
pub const BACKGROUND_COLOR: [f32; 3] = [0.0, 0.0, 0.0];
pub const SELECT_COLOR: [f32; 3] = [44.0 / 255.0, 176.0 / 255.0, 218.0 / 255.0];

pub const CURSOR_RADIUS: f64 = 10.0;
pub const SELECTION_LINE_WIDTH: f64 = 4.0;

// Applied to every rotation increment, to slow down the visual spin
pub const ROTATION_DAMPING: f64 = 0.5;
