use super::buffer::{BufferError, GpuBuffer, VertexBuffer};
use super::vertex::{Vertex, VertexAttribute, VertexInfo};

/// A vertex buffer plus the attribute layout the pipeline reads it with.
///
/// wgpu has no vertex array objects; the layout is baked into the render
/// pipeline and the buffer is bound to slot 0 at draw time.
#[derive(Debug)]
pub struct VertexArray<V: Vertex> {
    vertex_buffer: VertexBuffer<V>,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl<V: Vertex> VertexArray<V> {
    pub const SLOT: u32 = 0;

    pub fn new(vertex_buffer: VertexBuffer<V>) -> Result<Self, BufferError> {
        let attributes = translate_attributes(&V::INFO)?;
        Ok(Self {
            vertex_buffer,
            attributes,
        })
    }

    pub fn layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: V::INFO.size_in_bytes,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }

    pub fn attributes(&self) -> &'static [VertexAttribute] {
        V::INFO.attributes
    }

    /// Binds the written part of the vertex buffer; returns `false` if nothing was uploaded yet.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        match self.vertex_buffer.written_slice() {
            Some(slice) => {
                pass.set_vertex_buffer(Self::SLOT, slice);
                true
            }
            None => false,
        }
    }
}

pub(crate) fn translate_attributes(info: &VertexInfo) -> Result<Vec<wgpu::VertexAttribute>, BufferError> {
    info.attributes
        .iter()
        .map(|a| {
            let format = a.format().ok_or(BufferError::UnsupportedAttribute {
                location: a.location,
                component_count: a.component_count,
            })?;
            Ok(wgpu::VertexAttribute {
                format,
                offset: a.offset,
                shader_location: a.location,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::VertexPositionColor;

    #[test]
    fn position_color_translates_to_wgpu_attributes() {
        let attrs = translate_attributes(&VertexPositionColor::INFO).unwrap();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x2);
        assert_eq!((attrs[0].offset, attrs[0].shader_location), (0, 0));
        assert_eq!(attrs[1].format, wgpu::VertexFormat::Float32x4);
        assert_eq!((attrs[1].offset, attrs[1].shader_location), (8, 1));
    }

    #[test]
    fn oversized_attribute_is_rejected() {
        static BAD: [VertexAttribute; 1] = [VertexAttribute::new(3, 6, 0)];
        let info = VertexInfo { size_in_bytes: 24, attributes: &BAD };
        assert_eq!(
            translate_attributes(&info),
            Err(BufferError::UnsupportedAttribute { location: 3, component_count: 6 })
        );
    }
}
