mod body;
mod orrery;

pub use body::{Body, BodyID, BodyInfo, Parent, Sprite, SpriteID};
pub use orrery::Orrery;
