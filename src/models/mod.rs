pub mod gemini;
pub mod image;
pub mod slot;

pub use image::*;
pub use slot::*;
