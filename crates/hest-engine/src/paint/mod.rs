//! Color model shared between the scene and the renderer.
//!
//! Colors are linear with premultiplied alpha. Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
