use std::path::Path;

use wgpu::ShaderStages;

use crate::render::vertex::{Vertex, VertexAttribute};
use crate::render::{RenderCtx, VertexArray};

use super::reflect::{CompiledStage, ShaderAttribute, ShaderStage, ShaderUniform, UniformBlock};
use super::uniform::{buffer_size, UniformStorage, UniformValue};
use super::ShaderError;

/// A linked vertex + fragment shader pair with its uniform block and pipeline.
///
/// GPU objects are released when the program is dropped.
pub struct ShaderProgram {
    vertex_module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_module: wgpu::ShaderModule,
    fragment_entry: String,

    attributes: Vec<ShaderAttribute>,
    uniforms: Option<UniformBinding>,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
}

struct UniformBinding {
    storage: UniformStorage,
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl ShaderProgram {
    /// Loads, compiles and links a program from two WGSL files.
    pub fn from_files(
        device: &wgpu::Device,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex = CompiledStage::load(ShaderStage::Vertex, vertex_path.as_ref())?;
        let fragment = CompiledStage::load(ShaderStage::Fragment, fragment_path.as_ref())?;
        Self::link(device, &vertex, &fragment)
    }

    /// Links two compiled stages and creates their GPU modules.
    pub fn link(
        device: &wgpu::Device,
        vertex: &CompiledStage,
        fragment: &CompiledStage,
    ) -> Result<Self, ShaderError> {
        let interface = link_interface(vertex, fragment)?;

        let uniforms = interface
            .block
            .map(|block| UniformBinding::new(device, block, interface.visibility));

        let program = Self {
            vertex_module: create_module(device, vertex),
            vertex_entry: vertex.entry_point().to_string(),
            fragment_module: create_module(device, fragment),
            fragment_entry: fragment.entry_point().to_string(),
            attributes: vertex.attributes().to_vec(),
            uniforms,
            pipeline_format: None,
            pipeline: None,
        };

        log::debug!(
            "linked shader program: uniforms [{}], attributes [{}]",
            program.uniforms().iter().map(|u| format!("{}: {}", u.name, u.ty)).collect::<Vec<_>>().join(", "),
            program.attributes.iter().map(|a| format!("{}@{}", a.name, a.location)).collect::<Vec<_>>().join(", "),
        );

        Ok(program)
    }

    /// Declared members of the uniform block at `@group(0) @binding(0)`, used or not.
    pub fn uniforms(&self) -> &[ShaderUniform] {
        self.uniforms
            .as_ref()
            .map_or(&[], |u| u.storage.block().members.as_slice())
    }

    /// Vertex inputs, sorted by location.
    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.attributes
    }

    /// Writes a uniform into the CPU shadow; [`upload`](Self::upload) sends it to the GPU.
    pub fn set_uniform<T: UniformValue>(&mut self, name: &str, value: T) -> Result<(), ShaderError> {
        match self.uniforms.as_mut() {
            Some(u) => u.storage.set(name, value),
            None => Err(ShaderError::UnknownUniform(name.to_string())),
        }
    }

    /// The CPU shadow of the uniform block; `None` if the program declares none.
    pub fn uniform_storage_mut(&mut self) -> Option<&mut UniformStorage> {
        self.uniforms.as_mut().map(|u| &mut u.storage)
    }

    /// Uploads the uniform block if any value changed since the last upload.
    pub fn upload(&mut self, queue: &wgpu::Queue) {
        let Some(u) = self.uniforms.as_mut() else { return };
        if u.storage.take_dirty() {
            queue.write_buffer(&u.buffer, 0, u.storage.bytes());
        }
    }

    /// Builds the render pipeline for `vertex_array`'s layout and the surface format.
    ///
    /// Rebuilt only when the surface format changes.
    pub fn ensure_pipeline<V: Vertex>(
        &mut self,
        ctx: &RenderCtx<'_>,
        vertex_array: &VertexArray<V>,
    ) -> Result<(), ShaderError> {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return Ok(());
        }

        check_attributes(&self.attributes, vertex_array.attributes())?;

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            self.uniforms.iter().map(|u| &u.layout).collect();

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("hest program pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("hest program pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &self.vertex_module,
                entry_point: Some(&self.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[vertex_array.layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &self.fragment_module,
                entry_point: Some(&self.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("created pipeline for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        Ok(())
    }

    /// Sets the pipeline and uniform bind group; returns `false` if no pipeline exists yet.
    pub fn use_program(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(pipeline) = self.pipeline.as_ref() else { return false };
        pass.set_pipeline(pipeline);
        if let Some(u) = self.uniforms.as_ref() {
            pass.set_bind_group(0, &u.bind_group, &[]);
        }
        true
    }
}

impl UniformBinding {
    fn new(device: &wgpu::Device, block: UniformBlock, visibility: wgpu::ShaderStages) -> Self {
        let min_binding_size = std::num::NonZeroU64::new(u64::from(block.size));
        let storage = UniformStorage::new(block);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("hest program uniforms"),
            size: buffer_size(storage.block().size),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("hest program bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("hest program bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            storage,
            buffer,
            layout,
            bind_group,
        }
    }
}

fn create_module(device: &wgpu::Device, stage: &CompiledStage) -> wgpu::ShaderModule {
    let label = format!("hest {} shader", stage.stage());
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(stage.source().into()),
    })
}

/// What both stages agree on.
#[derive(Debug, PartialEq)]
pub(crate) struct LinkedInterface {
    pub block: Option<UniformBlock>,
    pub visibility: wgpu::ShaderStages,
}

pub(crate) fn link_interface(
    vertex: &CompiledStage,
    fragment: &CompiledStage,
) -> Result<LinkedInterface, ShaderError> {
    for (stage, expected) in [(vertex, ShaderStage::Vertex), (fragment, ShaderStage::Fragment)] {
        if stage.stage() != expected {
            return Err(ShaderError::Link(format!(
                "expected a {expected} stage, got a {} stage",
                stage.stage()
            )));
        }
    }

    let (block, visibility) = match (vertex.uniform_block(), fragment.uniform_block()) {
        (Some(v), Some(f)) if v != f => {
            return Err(ShaderError::Link(format!(
                "uniform block differs between stages (vertex: {}, fragment: {})",
                describe_block(v),
                describe_block(f),
            )));
        }
        (Some(v), Some(_)) => (Some(v.clone()), ShaderStages::VERTEX_FRAGMENT),
        (Some(v), None) => (Some(v.clone()), ShaderStage::Vertex.wgpu()),
        (None, Some(f)) => (Some(f.clone()), ShaderStage::Fragment.wgpu()),
        (None, None) => (None, ShaderStages::NONE),
    };

    Ok(LinkedInterface { block, visibility })
}


fn describe_block(block: &UniformBlock) -> String {
    block
        .members
        .iter()
        .map(|m| format!("{}@{}: {}", m.name, m.offset, m.ty))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every shader input must be fed by the vertex layout with the same number of floats.
pub(crate) fn check_attributes(
    shader: &[ShaderAttribute],
    layout: &[VertexAttribute],
) -> Result<(), ShaderError> {
    for attr in shader {
        let Some(provided) = layout.iter().find(|a| a.location == attr.location) else {
            return Err(ShaderError::AttributeMismatch {
                location: attr.location,
                reason: format!("`{}` is not provided by the vertex layout", attr.name),
            });
        };

        if attr.ty.component_count() != Some(provided.component_count) {
            return Err(ShaderError::AttributeMismatch {
                location: attr.location,
                reason: format!(
                    "`{}` is {} but the vertex layout provides {} float(s)",
                    attr.name, attr.ty, provided.component_count
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::ValueType;
    use crate::render::{Vertex, VertexPositionColor};

    const UNIFORMS: &str = r#"
struct Uniforms {
    viewport_size: vec2<f32>,
    color_factor: f32,
}

@group(0) @binding(0)
var<uniform> u: Uniforms;
"#;

    fn vertex_src(uniforms: &str) -> String {
        format!(
            "{uniforms}
struct VertexOutput {{
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
}}

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) color: vec4<f32>) -> VertexOutput {{
    var output: VertexOutput;
    output.clip = vec4<f32>(position / u.viewport_size, 0.0, 1.0);
    output.color = color;
    return output;
}}
"
        )
    }

    fn fragment_src(uniforms: &str) -> String {
        format!(
            "{uniforms}
@fragment
fn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> {{
    return color * u.color_factor;
}}
"
        )
    }

    fn stage(stage: ShaderStage, src: String) -> CompiledStage {
        CompiledStage::compile(stage, src).unwrap()
    }

    #[test]
    fn shared_block_is_visible_to_both_stages() {
        let v = stage(ShaderStage::Vertex, vertex_src(UNIFORMS));
        let f = stage(ShaderStage::Fragment, fragment_src(UNIFORMS));

        let linked = link_interface(&v, &f).unwrap();
        assert_eq!(linked.visibility, ShaderStages::VERTEX_FRAGMENT);
        let block = linked.block.unwrap();
        assert_eq!(block.member("color_factor").map(|m| m.ty), Some(ValueType::Float));
    }

    #[test]
    fn differing_blocks_fail_to_link() {
        let other = UNIFORMS.replace("color_factor: f32", "color_factor: vec2<f32>");
        let v = stage(ShaderStage::Vertex, vertex_src(UNIFORMS));
        let f = CompiledStage::compile(
            ShaderStage::Fragment,
            fragment_src(&other).replace("color * u.color_factor", "color * u.color_factor.x"),
        )
        .unwrap();

        let err = link_interface(&v, &f).unwrap_err();
        assert!(matches!(err, ShaderError::Link(_)));
        assert!(err.to_string().contains("uniform block differs"));
    }

    #[test]
    fn block_in_one_stage_is_visible_to_that_stage_only() {
        let v = stage(ShaderStage::Vertex, vertex_src(UNIFORMS));
        let f = stage(
            ShaderStage::Fragment,
            "@fragment\nfn fs_main(@location(0) color: vec4<f32>) -> @location(0) vec4<f32> { return color; }\n".to_string(),
        );

        let linked = link_interface(&v, &f).unwrap();
        assert_eq!(linked.visibility, ShaderStages::VERTEX);
        assert!(linked.block.is_some());
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let v = stage(ShaderStage::Vertex, vertex_src(UNIFORMS));
        let f = stage(ShaderStage::Fragment, fragment_src(UNIFORMS));
        assert!(matches!(link_interface(&f, &v), Err(ShaderError::Link(_))));
    }

    #[test]
    fn attributes_match_position_color_layout() {
        let v = stage(ShaderStage::Vertex, vertex_src(UNIFORMS));
        assert!(check_attributes(v.attributes(), VertexPositionColor::INFO.attributes).is_ok());
    }

    #[test]
    fn missing_layout_location_is_reported() {
        let shader = [ShaderAttribute { name: "uv".into(), location: 2, ty: ValueType::FloatVec2 }];
        let err = check_attributes(&shader, VertexPositionColor::INFO.attributes).unwrap_err();
        assert!(matches!(err, ShaderError::AttributeMismatch { location: 2, .. }));
    }

    #[test]
    fn component_count_mismatch_is_reported() {
        let shader = [ShaderAttribute { name: "color".into(), location: 1, ty: ValueType::FloatVec3 }];
        let err = check_attributes(&shader, VertexPositionColor::INFO.attributes).unwrap_err();
        assert_eq!(
            err.to_string(),
            "vertex attribute at location 1: `color` is vec3<f32> but the vertex layout provides 4 float(s)"
        );
    }
}
