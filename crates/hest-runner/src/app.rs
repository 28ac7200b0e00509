use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;

use hest_engine::core::{App, AppControl, FrameCtx, LoadCtx, UpdateCtx};
use hest_engine::device::GpuInit;
use hest_engine::input::{InputState, Key};
use hest_engine::paint::Color;
use hest_engine::render::shader::{ShaderError, UniformBlock, UniformStorage};
use hest_engine::render::{
    BufferUsage, GpuBuffer, IndexBuffer, ShaderProgram, VertexArray, VertexBuffer,
    VertexPositionColor,
};

use crate::blend::ColorBlend;
use crate::camera::{Camera, Movement};
use crate::options::RunnerOptions;
use crate::scene::{RectScene, random_color};

pub const VIEWPORT_SIZE: &str = "viewport_size";
pub const COLOR_FACTOR: &str = "color_factor";
pub const OFFSET: &str = "offset";
pub const ZOOM: &str = "zoom";

/// Whether `block` declares the `offset` and `zoom` uniforms.
pub fn has_camera_uniforms(block: &UniformBlock) -> bool {
    [OFFSET, ZOOM].iter().all(|name| block.member(name).is_some())
}

/// Blend and camera state advanced once per update tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animation {
    pub blend: ColorBlend,
    pub camera: Camera,
}

impl Animation {
    pub fn new(blend_step: f32) -> Self {
        Self {
            blend: ColorBlend::new(blend_step),
            camera: Camera::default(),
        }
    }

    /// Advances one tick. Nothing moves and no key is read while unfocused.
    pub fn tick(&mut self, input: &InputState) -> AppControl {
        if !input.focused {
            return AppControl::Continue;
        }

        self.blend.step();

        if input.key_down(Key::Escape) {
            log::info!("escape");
            return AppControl::Exit;
        }

        for (key, movement) in Movement::BINDINGS {
            if input.key_down(key) {
                log::debug!("{key:?}");
                self.camera.apply(movement);
            }
        }

        AppControl::Continue
    }

    /// Writes `color_factor`, plus `offset` and `zoom` when the block declares them.
    pub fn write_uniforms(&self, uniforms: &mut UniformStorage) -> Result<(), ShaderError> {
        uniforms.set(COLOR_FACTOR, self.blend.factor())?;
        if has_camera_uniforms(uniforms.block()) {
            uniforms.set(OFFSET, self.camera.offset.to_array())?;
            uniforms.set(ZOOM, self.camera.zoom)?;
        }
        Ok(())
    }
}

/// GPU objects alive between `on_load` and `on_unload`.
struct Resources {
    program: ShaderProgram,
    vertex_array: VertexArray<VertexPositionColor>,
    index_buffer: IndexBuffer,
}

pub struct HestApp {
    options: RunnerOptions,
    rng: StdRng,
    clear: Color,
    animation: Animation,
    resources: Option<Resources>,
}

impl HestApp {
    pub fn new(options: RunnerOptions) -> Self {
        let rng = match options.scene.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            animation: Animation::new(options.blend_step),
            options,
            rng,
            clear: Color::BLACK,
            resources: None,
        }
    }

    /// Surface settings for the demo.
    ///
    /// Colors are written to the framebuffer as-is, without sRGB encoding, so
    /// the random colors and the complement blend show their raw values.
    pub fn gpu_init() -> GpuInit {
        GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        }
    }

    fn write_uniforms(&mut self) -> Result<()> {
        let Some(uniforms) = self
            .resources
            .as_mut()
            .and_then(|res| res.program.uniform_storage_mut())
        else {
            return Ok(());
        };

        self.animation.write_uniforms(uniforms)?;
        Ok(())
    }
}

impl App for HestApp {
    fn on_load(&mut self, ctx: &mut LoadCtx<'_>) -> Result<()> {
        let gfx = &ctx.gfx;
        let extent = ctx.window.logical_size();

        self.clear = random_color(&mut self.rng);

        let scene = RectScene::generate(&mut self.rng, extent, &self.options.scene);
        log::info!("box count: {}", scene.box_count());

        let mut vertex_buffer = VertexBuffer::new(gfx.device, scene.vertices.len(), BufferUsage::Static)
            .context("failed to create vertex buffer")?;
        vertex_buffer.set_data(gfx.queue, &scene.vertices, scene.vertices.len())?;

        let mut index_buffer = IndexBuffer::new(gfx.device, scene.indices.len(), BufferUsage::Static)
            .context("failed to create index buffer")?;
        index_buffer.set_data(gfx.queue, &scene.indices, scene.indices.len())?;

        let vertex_array = VertexArray::new(vertex_buffer)?;

        let mut program = ShaderProgram::from_files(
            gfx.device,
            &self.options.vertex_shader_path,
            &self.options.fragment_shader_path,
        )?;

        // Fixed at load; the scene stretches with the window.
        program.set_uniform(VIEWPORT_SIZE, extent.to_array())?;

        if let Some(uniforms) = program.uniform_storage_mut() {
            if !has_camera_uniforms(uniforms.block()) {
                log::warn!("shader has no `{OFFSET}`/`{ZOOM}` uniforms; camera keys are ignored");
            }
            self.animation.write_uniforms(uniforms)?;
        }

        program.ensure_pipeline(gfx, &vertex_array)?;
        program.upload(gfx.queue);

        self.resources = Some(Resources {
            program,
            vertex_array,
            index_buffer,
        });
        Ok(())
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        log::info!("new width: {width} - new height: {height}");
    }

    fn on_update(&mut self, ctx: &mut UpdateCtx<'_>) -> AppControl {
        if self.animation.tick(ctx.input) == AppControl::Exit {
            return AppControl::Exit;
        }

        if let Err(err) = self.write_uniforms() {
            log::error!("{err:#}");
            return AppControl::Exit;
        }

        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(res) = self.resources.as_mut() else {
            return AppControl::Continue;
        };

        ctx.render(self.clear, |gfx, target| {
            res.program.upload(gfx.queue);
            if let Err(err) = res.program.ensure_pipeline(gfx, &res.vertex_array) {
                log::error!("{err}");
                return;
            }

            let mut pass = target.begin_pass("hest boxes");
            if res.program.use_program(&mut pass)
                && res.vertex_array.bind(&mut pass)
                && res.index_buffer.bind(&mut pass)
            {
                pass.draw_indexed(0..res.index_buffer.len() as u32, 0, 0..1);
            }
        })
    }

    fn on_unload(&mut self) {
        self.resources = None;
        log::info!("unloaded");
    }
}
