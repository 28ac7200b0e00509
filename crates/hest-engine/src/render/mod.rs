//! GPU resource wrappers.
//!
//! Thin layers over wgpu objects: fixed-capacity vertex/index buffers, a
//! vertex array pairing a buffer with its layout, and a linked shader program
//! with a reflected uniform block.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod buffer;
mod ctx;
pub mod shader;
mod vertex;
mod vertex_array;

pub use buffer::{BufferError, BufferKind, BufferUsage, GpuBuffer, IndexBuffer, VertexBuffer};
pub use ctx::{RenderCtx, RenderTarget};
pub use shader::{ShaderError, ShaderProgram};
pub use vertex::{Vertex, VertexAttribute, VertexInfo, VertexPositionColor};
pub use vertex_array::VertexArray;
