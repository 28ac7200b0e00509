//! Vertex formats.
//!
//! A `VertexInfo` describes one interleaved vertex: its stride and the float
//! attributes it carries. Types implementing [`Vertex`] carry their layout as
//! an associated constant, so a buffer's element type and layout cannot drift apart.

use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;

/// One float attribute inside an interleaved vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    /// Shader input location (`@location(n)`).
    pub location: u32,
    /// Number of `f32` components (1..=4).
    pub component_count: u32,
    /// Byte offset from the start of the vertex.
    pub offset: u64,
}

impl VertexAttribute {
    pub const fn new(location: u32, component_count: u32, offset: u64) -> Self {
        Self { location, component_count, offset }
    }

    /// wgpu format for this attribute, or `None` for an unsupported component count.
    pub fn format(&self) -> Option<wgpu::VertexFormat> {
        match self.component_count {
            1 => Some(wgpu::VertexFormat::Float32),
            2 => Some(wgpu::VertexFormat::Float32x2),
            3 => Some(wgpu::VertexFormat::Float32x3),
            4 => Some(wgpu::VertexFormat::Float32x4),
            _ => None,
        }
    }
}

/// Interleaved vertex layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexInfo {
    pub size_in_bytes: u64,
    pub attributes: &'static [VertexAttribute],
}

impl VertexInfo {
    pub fn attribute(&self, location: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.location == location)
    }
}

/// A plain-old-data vertex with a fixed layout.
pub trait Vertex: Pod {
    const INFO: VertexInfo;
}

/// 2D position (logical px) plus a linear premultiplied RGBA color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct VertexPositionColor {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl VertexPositionColor {
    #[inline]
    pub fn new(position: Vec2, color: Color) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

impl Vertex for VertexPositionColor {
    const INFO: VertexInfo = VertexInfo {
        size_in_bytes: std::mem::size_of::<Self>() as u64,
        attributes: &[
            VertexAttribute::new(0, 2, std::mem::offset_of!(VertexPositionColor, position) as u64),
            VertexAttribute::new(1, 4, std::mem::offset_of!(VertexPositionColor, color) as u64),
        ],
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_color_layout() {
        let info = VertexPositionColor::INFO;
        assert_eq!(info.size_in_bytes, 24);
        assert_eq!(info.attributes[0], VertexAttribute::new(0, 2, 0));
        assert_eq!(info.attributes[1], VertexAttribute::new(1, 4, 8));
    }

    #[test]
    fn attribute_lookup_by_location() {
        let info = VertexPositionColor::INFO;
        assert_eq!(info.attribute(1).map(|a| a.component_count), Some(4));
        assert!(info.attribute(2).is_none());
    }

    #[test]
    fn component_count_maps_to_float_formats() {
        assert_eq!(VertexAttribute::new(0, 1, 0).format(), Some(wgpu::VertexFormat::Float32));
        assert_eq!(VertexAttribute::new(0, 4, 0).format(), Some(wgpu::VertexFormat::Float32x4));
        assert_eq!(VertexAttribute::new(0, 5, 0).format(), None);
        assert_eq!(VertexAttribute::new(0, 0, 0).format(), None);
    }

    #[test]
    fn vertex_bytes_are_interleaved() {
        let v = VertexPositionColor::new(Vec2::new(1.0, 2.0), Color::opaque(0.25, 0.5, 0.75));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        assert_eq!(floats, &[1.0, 2.0, 0.25, 0.5, 0.75, 1.0]);
    }
}
