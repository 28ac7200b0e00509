use std::path::PathBuf;

use anyhow::{Result, ensure};
use clap::Parser;
use hest_engine::render::BufferKind;

use crate::blend::ColorBlend;
use crate::scene::{RectScene, SceneOptions};

/// Relative to the working directory, like any other path argument.
pub const DEFAULT_VERTEX_SHADER: &str = "shaders/vertex-shader.wgsl";
pub const DEFAULT_FRAGMENT_SHADER: &str = "shaders/fragment-shader.wgsl";

/// Hest runner - random colored boxes with an animated blend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// WGSL source of the vertex stage
    #[arg(long, default_value = DEFAULT_VERTEX_SHADER)]
    pub vertex_shader: PathBuf,

    /// WGSL source of the fragment stage
    #[arg(long, default_value = DEFAULT_FRAGMENT_SHADER)]
    pub fragment_shader: PathBuf,

    /// Seed for a reproducible scene
    #[arg(long)]
    pub seed: Option<u64>,

    /// Minimum number of boxes
    #[arg(long, default_value = "5")]
    pub min_boxes: u32,

    /// Maximum number of boxes (exclusive)
    #[arg(long, default_value = "250")]
    pub max_boxes: u32,

    /// Minimum box edge in logical pixels
    #[arg(long, default_value = "32")]
    pub min_box_size: u32,

    /// Maximum box edge in logical pixels (exclusive)
    #[arg(long, default_value = "128")]
    pub max_box_size: u32,

    /// Window width in logical pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, default_value = "756")]
    pub height: u32,

    /// Window title
    #[arg(long, default_value = "Hello Hest")]
    pub title: String,

    /// Blend factor change per frame
    #[arg(long)]
    pub blend_step: Option<f32>,

    /// Log filter, e.g. "debug" or "hest_runner=debug" (overrides RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,
}

/// Validated runner settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerOptions {
    pub vertex_shader_path: PathBuf,
    pub fragment_shader_path: PathBuf,
    pub scene: SceneOptions,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub blend_step: f32,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            vertex_shader_path: PathBuf::from(DEFAULT_VERTEX_SHADER),
            fragment_shader_path: PathBuf::from(DEFAULT_FRAGMENT_SHADER),
            scene: SceneOptions::default(),
            title: "Hello Hest".to_string(),
            width: 1280,
            height: 756,
            blend_step: ColorBlend::DEFAULT_STEP,
        }
    }
}

impl RunnerOptions {
    /// Checks that the ranges are non-empty and the largest scene fits the buffers.
    pub fn validate(&self) -> Result<()> {
        let count = &self.scene.box_count;
        ensure!(count.start >= 1, "--min-boxes must be at least 1");
        ensure!(
            count.start < count.end,
            "--min-boxes ({}) must be less than --max-boxes ({})",
            count.start,
            count.end
        );

        let max_boxes = (count.end - 1) as usize;
        let vertices = max_boxes * RectScene::VERTICES_PER_BOX;
        let indices = max_boxes * RectScene::INDICES_PER_BOX;
        ensure!(
            vertices <= BufferKind::Vertex.max_count() && indices <= BufferKind::Index.max_count(),
            "{max_boxes} boxes need {vertices} vertices and {indices} indices, over the buffer limits ({} / {})",
            BufferKind::Vertex.max_count(),
            BufferKind::Index.max_count()
        );

        let size = &self.scene.box_size;
        ensure!(size.start >= 1, "--min-box-size must be at least 1");
        ensure!(
            size.start < size.end,
            "--min-box-size ({}) must be less than --max-box-size ({})",
            size.start,
            size.end
        );

        ensure!(self.width > 0 && self.height > 0, "window size must be non-zero");
        ensure!(
            self.blend_step > 0.0 && self.blend_step <= 1.0,
            "--blend-step must be in (0, 1], got {}",
            self.blend_step
        );
        Ok(())
    }
}

impl TryFrom<Args> for RunnerOptions {
    type Error = anyhow::Error;

    fn try_from(args: Args) -> Result<Self> {
        let options = Self {
            vertex_shader_path: args.vertex_shader,
            fragment_shader_path: args.fragment_shader,
            scene: SceneOptions {
                box_count: args.min_boxes..args.max_boxes,
                box_size: args.min_box_size..args.max_box_size,
                seed: args.seed,
            },
            title: args.title,
            width: args.width,
            height: args.height,
            blend_step: args.blend_step.unwrap_or(ColorBlend::DEFAULT_STEP),
        };
        options.validate()?;
        Ok(options)
    }
}
