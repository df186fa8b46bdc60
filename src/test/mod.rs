
pub use image::*;
