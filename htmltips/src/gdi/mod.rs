//! GDI Primitives
//!
//! The drawing surface used by the tooltip: a 32bpp DIB and the path
//! objects that describe the chrome outline.

pub mod dib;
pub mod path;

pub use dib::{fast_blur_alpha, Dib, RgbQuad};
pub use path::Path;
