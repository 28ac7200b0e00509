//! GPU buffer objects with a fixed element capacity.

use std::marker::PhantomData;

use bytemuck::Pod;
use thiserror::Error;

use super::vertex::Vertex;

/// What a buffer holds; decides its wgpu usage flags and count limits.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl BufferKind {
    pub const MIN_COUNT: usize = 1;

    pub const fn max_count(self) -> usize {
        match self {
            BufferKind::Vertex => 100_000,
            BufferKind::Index => 250_000,
        }
    }

    fn usages(self) -> wgpu::BufferUsages {
        let base = match self {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
        };
        base | wgpu::BufferUsages::COPY_DST
    }

    fn label(self) -> &'static str {
        match self {
            BufferKind::Vertex => "hest vertex buffer",
            BufferKind::Index => "hest index buffer",
        }
    }
}

/// Update frequency hint.
///
/// wgpu has no usage hints, so this is informational: both kinds accept `set_data`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    #[default]
    Static,
    /// Rewritten frequently.
    Stream,
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum BufferError {
    #[error("{kind:?} buffer element count {count} is outside {min}..={max}")]
    CountOutOfRange {
        kind: BufferKind,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("upload data is empty")]
    EmptyData,

    #[error("upload count {count} is invalid (capacity {capacity}, data length {data_len})")]
    InvalidCount {
        count: usize,
        capacity: usize,
        data_len: usize,
    },

    #[error("vertex attribute at location {location} has {component_count} components; 1..=4 supported")]
    UnsupportedAttribute { location: u32, component_count: u32 },
}

pub(crate) fn check_capacity(kind: BufferKind, count: usize) -> Result<(), BufferError> {
    let (min, max) = (BufferKind::MIN_COUNT, kind.max_count());
    if (min..=max).contains(&count) {
        Ok(())
    } else {
        Err(BufferError::CountOutOfRange { kind, count, min, max })
    }
}

pub(crate) fn check_upload(capacity: usize, data_len: usize, count: usize) -> Result<(), BufferError> {
    if data_len == 0 {
        return Err(BufferError::EmptyData);
    }
    if count == 0 || count > capacity || count > data_len {
        return Err(BufferError::InvalidCount { count, capacity, data_len });
    }
    Ok(())
}

/// Untyped storage shared by vertex and index buffers.
#[derive(Debug)]
pub struct RawBuffer {
    buffer: wgpu::Buffer,
    kind: BufferKind,
    usage: BufferUsage,
    stride: u64,
    capacity: usize,
    len: usize,
}

impl RawBuffer {
    fn new(
        device: &wgpu::Device,
        kind: BufferKind,
        stride: u64,
        count: usize,
        usage: BufferUsage,
    ) -> Result<Self, BufferError> {
        check_capacity(kind, count)?;

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(kind.label()),
            size: stride * count as u64,
            usage: kind.usages(),
            mapped_at_creation: false,
        });

        log::debug!("created {kind:?} buffer: {count} x {stride} bytes ({usage:?})");

        Ok(Self {
            buffer,
            kind,
            usage,
            stride,
            capacity: count,
            len: 0,
        })
    }

    fn write<T: Pod>(&mut self, queue: &wgpu::Queue, data: &[T], count: usize) -> Result<(), BufferError> {
        check_upload(self.capacity, data.len(), count)?;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&data[..count]));
        self.len = count;
        Ok(())
    }
}

/// Accessors common to every buffer wrapper.
pub trait GpuBuffer {
    fn raw(&self) -> &RawBuffer;

    fn kind(&self) -> BufferKind {
        self.raw().kind
    }

    fn usage(&self) -> BufferUsage {
        self.raw().usage
    }

    /// Element capacity fixed at creation.
    fn capacity(&self) -> usize {
        self.raw().capacity
    }

    /// Elements written by the last `set_data`.
    fn len(&self) -> usize {
        self.raw().len
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn size_in_bytes(&self) -> u64 {
        self.raw().stride * self.raw().capacity as u64
    }

    /// Slice covering the written elements; `None` before the first upload.
    fn written_slice(&self) -> Option<wgpu::BufferSlice<'_>> {
        let raw = self.raw();
        (raw.len > 0).then(|| raw.buffer.slice(..raw.stride * raw.len as u64))
    }

    fn buffer(&self) -> &wgpu::Buffer {
        &self.raw().buffer
    }
}

/// Typed vertex storage. The element type is fixed by `V`.
#[derive(Debug)]
pub struct VertexBuffer<V: Vertex> {
    raw: RawBuffer,
    _marker: PhantomData<V>,
}

impl<V: Vertex> VertexBuffer<V> {
    pub fn new(device: &wgpu::Device, vertex_count: usize, usage: BufferUsage) -> Result<Self, BufferError> {
        Ok(Self {
            raw: RawBuffer::new(device, BufferKind::Vertex, V::INFO.size_in_bytes, vertex_count, usage)?,
            _marker: PhantomData,
        })
    }

    /// Uploads `data[..count]` at the start of the buffer.
    pub fn set_data(&mut self, queue: &wgpu::Queue, data: &[V], count: usize) -> Result<(), BufferError> {
        self.raw.write(queue, data, count)
    }
}

impl<V: Vertex> GpuBuffer for VertexBuffer<V> {
    fn raw(&self) -> &RawBuffer {
        &self.raw
    }
}

/// 32-bit index storage.
#[derive(Debug)]
pub struct IndexBuffer {
    raw: RawBuffer,
}

impl IndexBuffer {
    pub const FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

    pub fn new(device: &wgpu::Device, index_count: usize, usage: BufferUsage) -> Result<Self, BufferError> {
        let stride = std::mem::size_of::<u32>() as u64;
        Ok(Self {
            raw: RawBuffer::new(device, BufferKind::Index, stride, index_count, usage)?,
        })
    }

    pub fn set_data(&mut self, queue: &wgpu::Queue, data: &[u32], count: usize) -> Result<(), BufferError> {
        self.raw.write(queue, data, count)
    }

    /// Binds the written indices; returns `false` if nothing was uploaded yet.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(slice) = self.written_slice() else { return false };
        pass.set_index_buffer(slice, Self::FORMAT);
        true
    }
}

impl GpuBuffer for IndexBuffer {
    fn raw(&self) -> &RawBuffer {
        &self.raw
    }
}
