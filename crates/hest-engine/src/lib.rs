//! Hest engine crate.
//!
//! Owns the platform runtime and the GPU resource layer used by the runner.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
