use std::fmt;
use std::path::Path;

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{AddressSpace, Binding, Handle, Module, ScalarKind, Type, TypeInner};

use super::ShaderError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }

    pub(super) fn wgpu(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Type of a reflected uniform member or vertex input.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ValueType {
    Float,
    FloatVec2,
    FloatVec3,
    FloatVec4,
    /// Anything else (integers, matrices, arrays, ...). Reflected but not settable.
    Other,
}

impl ValueType {
    fn of(module: &Module, ty: Handle<Type>) -> Self {
        let is_f32 = |s: &naga::Scalar| s.kind == ScalarKind::Float && s.width == 4;
        match &module.types[ty].inner {
            TypeInner::Scalar(s) if is_f32(s) => ValueType::Float,
            TypeInner::Vector { size, scalar } if is_f32(scalar) => match *size as u32 {
                2 => ValueType::FloatVec2,
                3 => ValueType::FloatVec3,
                4 => ValueType::FloatVec4,
                _ => ValueType::Other,
            },
            _ => ValueType::Other,
        }
    }

    /// Number of `f32` components, or `None` for `Other`.
    pub fn component_count(self) -> Option<u32> {
        match self {
            ValueType::Float => Some(1),
            ValueType::FloatVec2 => Some(2),
            ValueType::FloatVec3 => Some(3),
            ValueType::FloatVec4 => Some(4),
            ValueType::Other => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Float => "f32",
            ValueType::FloatVec2 => "vec2<f32>",
            ValueType::FloatVec3 => "vec3<f32>",
            ValueType::FloatVec4 => "vec4<f32>",
            ValueType::Other => "an unsupported type",
        })
    }
}

/// A member of the uniform block.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderUniform {
    pub name: String,
    /// Byte offset inside the block.
    pub offset: u32,
    pub ty: ValueType,
}

/// A vertex stage input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderAttribute {
    pub name: String,
    pub location: u32,
    pub ty: ValueType,
}

/// The uniform block at `@group(0) @binding(0)`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformBlock {
    /// Size of the block as laid out by WGSL, in bytes.
    pub size: u32,
    pub members: Vec<ShaderUniform>,
}

impl UniformBlock {
    pub fn member(&self, name: &str) -> Option<&ShaderUniform> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// A validated, reflected WGSL source for one stage.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    stage: ShaderStage,
    source: String,
    entry_point: String,
    uniform_block: Option<UniformBlock>,
    attributes: Vec<ShaderAttribute>,
}

impl CompiledStage {
    /// Reads and compiles a stage from disk.
    pub fn load(stage: ShaderStage, path: &Path) -> Result<Self, ShaderError> {
        log::info!("loading {stage} shader from {}", path.display());
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            stage,
            path: path.to_path_buf(),
            source,
        })?;
        Self::compile(stage, source)
    }

    /// Parses, validates and reflects a WGSL source.
    pub fn compile(stage: ShaderStage, source: impl Into<String>) -> Result<Self, ShaderError> {
        let source = source.into();

        let module = naga::front::wgsl::parse_str(&source).map_err(|e| ShaderError::Compile {
            stage,
            message: e.emit_to_string(&source),
        })?;

        Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .map_err(|e| ShaderError::Compile {
                stage,
                message: error_chain(&e.into_inner()),
            })?;

        let entry = module
            .entry_points
            .iter()
            .find(|ep| ep.stage == stage.naga())
            .ok_or(ShaderError::MissingEntryPoint { stage })?;

        let attributes = match stage {
            ShaderStage::Vertex => reflect_attributes(&module, entry),
            ShaderStage::Fragment => Vec::new(),
        };

        Ok(Self {
            stage,
            entry_point: entry.name.clone(),
            uniform_block: reflect_uniform_block(&module)?,
            attributes,
            source,
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn uniform_block(&self) -> Option<&UniformBlock> {
        self.uniform_block.as_ref()
    }

    pub fn attributes(&self) -> &[ShaderAttribute] {
        &self.attributes
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(e) = source {
        message.push_str(": ");
        message.push_str(&e.to_string());
        source = e.source();
    }
    message
}

fn reflect_uniform_block(module: &Module) -> Result<Option<UniformBlock>, ShaderError> {
    let mut block = None;

    for (_, var) in module.global_variables.iter() {
        if var.space != AddressSpace::Uniform {
            continue;
        }
        let Some(binding) = var.binding.as_ref() else { continue };
        if binding.group != 0 || binding.binding != 0 {
            return Err(ShaderError::UnsupportedBinding {
                group: binding.group,
                binding: binding.binding,
            });
        }

        let inner = &module.types[var.ty].inner;
        let members = match inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .map(|m| ShaderUniform {
                    name: m.name.clone().unwrap_or_default(),
                    offset: m.offset,
                    ty: ValueType::of(module, m.ty),
                })
                .collect(),
            // A bare `var<uniform> x: f32` acts as a one-member block.
            _ => vec![ShaderUniform {
                name: var.name.clone().unwrap_or_default(),
                offset: 0,
                ty: ValueType::of(module, var.ty),
            }],
        };

        block = Some(UniformBlock {
            size: inner.size(module.to_ctx()),
            members,
        });
    }

    Ok(block)
}

fn reflect_attributes(module: &Module, entry: &naga::EntryPoint) -> Vec<ShaderAttribute> {
    let mut attributes = Vec::new();

    for arg in &entry.function.arguments {
        match (&arg.binding, &module.types[arg.ty].inner) {
            (Some(Binding::Location { location, .. }), _) => attributes.push(ShaderAttribute {
                name: arg.name.clone().unwrap_or_default(),
                location: *location,
                ty: ValueType::of(module, arg.ty),
            }),
            (None, TypeInner::Struct { members, .. }) => {
                for m in members {
                    if let Some(Binding::Location { location, .. }) = &m.binding {
                        attributes.push(ShaderAttribute {
                            name: m.name.clone().unwrap_or_default(),
                            location: *location,
                            ty: ValueType::of(module, m.ty),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    attributes.sort_by_key(|a| a.location);
    attributes
}
