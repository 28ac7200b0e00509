use std::path::PathBuf;

use thiserror::Error;

use super::reflect::{ShaderStage, ValueType};

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader `{}`", path.display())]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader failed to compile:\n{message}")]
    Compile { stage: ShaderStage, message: String },

    #[error("{stage} shader has no @{stage} entry point")]
    MissingEntryPoint { stage: ShaderStage },

    #[error("uniform at @group({group}) @binding({binding}) is unsupported; use @group(0) @binding(0)")]
    UnsupportedBinding { group: u32, binding: u32 },

    #[error("failed to link shader program: {0}")]
    Link(String),

    #[error("uniform `{0}` not found")]
    UnknownUniform(String),

    #[error("uniform `{name}` is declared as {declared}, value is {given}")]
    UniformType {
        name: String,
        declared: ValueType,
        given: ValueType,
    },

    #[error("vertex attribute at location {location}: {reason}")]
    AttributeMismatch { location: u32, reason: String },
}
