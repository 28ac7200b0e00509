//! Hest runner: random colored boxes with an animated color blend.

mod app;
mod blend;
mod camera;
mod options;
mod scene;

use anyhow::Result;
use clap::Parser;
use winit::dpi::LogicalSize;

use hest_engine::logging::{LoggingConfig, init_logging};
use hest_engine::window::{Runtime, RuntimeConfig};

use app::HestApp;
use options::{Args, RunnerOptions};

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(match args.log.clone() {
        Some(filter) => LoggingConfig::with_filter(filter),
        None => LoggingConfig::default(),
    });

    let options = RunnerOptions::try_from(args)?;
    log::info!(
        "shaders: {} + {}",
        options.vertex_shader_path.display(),
        options.fragment_shader_path.display()
    );

    let config = RuntimeConfig {
        title: options.title.clone(),
        initial_size: LogicalSize::new(f64::from(options.width), f64::from(options.height)),
        resizable: true,
        start_visible: false,
        centered: true,
    };

    Runtime::run(config, HestApp::gpu_init(), HestApp::new(options))
}
