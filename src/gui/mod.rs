mod canvas;
mod controller;
mod simulation;
mod window;

pub use canvas::{Canvas, Color, InputEvent};
pub use controller::{Controller, FrameRateMonitor};
pub use simulation::{RunState, Simulation};
pub use window::KissCanvas;
