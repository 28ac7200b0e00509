//! Shader programs.
//!
//! A program is a vertex stage and a fragment stage, each loaded from its own
//! WGSL source. Sources are validated and reflected on the CPU before any GPU
//! object is created, so compile and link problems surface as [`ShaderError`]s
//! instead of device validation panics.
//!
//! Reflection exposes the declared uniforms (every member of the block at
//! `@group(0) @binding(0)`) and the vertex attributes. Uniform values are set
//! by name into a CPU shadow of the block and uploaded once per frame.

mod error;
mod program;
mod reflect;
mod uniform;

pub use error::ShaderError;
pub use program::ShaderProgram;
pub use reflect::{CompiledStage, ShaderAttribute, ShaderStage, ShaderUniform, UniformBlock, ValueType};
pub use uniform::{UniformStorage, UniformValue};
