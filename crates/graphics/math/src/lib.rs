//! Geometry and color types shared by the drawing crates

mod bitmap;
mod color;
mod rect;
mod vec2d;

pub use bitmap::Bitmap;
pub use color::{Color, ParseColorError};
pub use rect::Rectangle;
pub use vec2d::Vec2D;
