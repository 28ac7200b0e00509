use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, FrameCtx, LoadCtx, UpdateCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::render::RenderCtx;
use crate::time::{FrameClock, FrameTime};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub resizable: bool,
    /// When `false` the window stays hidden until `App::on_load` has succeeded.
    pub start_visible: bool,
    /// Centers the window on its monitor after creation.
    pub centered: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "hest".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            resizable: true,
            start_visible: false,
            centered: true,
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    /// Closes the window and stops the event loop.
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `app` until it closes.
    ///
    /// Returns the error that stopped the runtime early, if any (window or GPU
    /// creation, or `App::on_load`).
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    exit_requested: bool,
    failure: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            exit_requested: false,
            failure: None,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size)
            .with_resizable(self.config.resizable)
            .with_visible(self.config.start_visible);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        if self.config.centered {
            if let Some(monitor) = window.current_monitor() {
                let pos = centered_position(monitor.position(), monitor.size(), window.outer_size());
                window.set_outer_position(pos);
            }
        }

        let gpu_init = self.gpu_init.clone();

        let mut entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let app = &mut self.app;
        entry.with_mut(|fields| -> Result<()> {
            let mut ctx = LoadCtx {
                window: WindowCtx { window: fields.window },
                gfx: RenderCtx::new(
                    fields.gpu.device(),
                    fields.gpu.queue(),
                    fields.gpu.surface_format(),
                    WindowCtx { window: fields.window }.logical_size(),
                    fields.window.scale_factor() as f32,
                ),
            };
            app.on_load(&mut ctx).context("application failed to load")?;

            fields.window.set_visible(true);
            fields.input_state.focused = fields.window.has_focus();
            // Loading may take a while; the first frame should not see it as dt.
            fields.clock.reset();
            fields.window.request_redraw();
            Ok(())
        })?;

        self.entry = Some(entry);
        Ok(())
    }

    /// Unloads the app, then drops the GPU and the window.
    fn close(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            self.app.on_unload();
            self.entry = None;
        }
        self.exit_requested = true;
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let app = &mut self.app;
        let mut runtime_ctx = RuntimeCtx::default();
        let mut app_control = AppControl::Continue;

        entry.with_mut(|fields| {
            let ft: FrameTime = fields.clock.tick();

            {
                let mut ctx = UpdateCtx {
                    window: WindowCtx { window: fields.window },
                    input: fields.input_state,
                    input_frame: fields.input_frame,
                    time: ft,
                    runtime: &mut runtime_ctx,
                };
                app_control = app.on_update(&mut ctx);
            }

            if app_control == AppControl::Continue && !runtime_ctx.exit_requested() {
                let mut ctx = FrameCtx {
                    window: WindowCtx { window: fields.window },
                    gpu: fields.gpu,
                    time: ft,
                    runtime: &mut runtime_ctx,
                };
                app_control = app.on_frame(&mut ctx);
            }

            // Per-frame deltas are consumed by this frame only.
            fields.input_frame.clear();
        });

        if app_control == AppControl::Exit || runtime_ctx.exit_requested() {
            self.close(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("{e:#}");
            self.failure = Some(e);
            self.exit_requested = true;
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let (app, entry) = (&mut self.app, &mut self.entry);
        let Some(entry) = entry.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(fields.input_state, &event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        if app.on_window_event(&event) == AppControl::Exit {
            self.close(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.close(event_loop),

            WindowEvent::Resized(new_size) => self.resize(*new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_ref() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    self.resize(new_size);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        self.app.on_resize(new_size.width, new_size.height);
        entry.with_window(|w| w.request_redraw());
    }
}

/// Top-left position that centers a window of `window_size` on a monitor.
///
/// A window larger than the monitor is pinned to the monitor origin.
fn centered_position(
    monitor_pos: PhysicalPosition<i32>,
    monitor_size: PhysicalSize<u32>,
    window_size: PhysicalSize<u32>,
) -> PhysicalPosition<i32> {
    let offset = |monitor: u32, window: u32| (monitor.saturating_sub(window) / 2) as i32;
    PhysicalPosition::new(
        monitor_pos.x + offset(monitor_size.width, window_size.width),
        monitor_pos.y + offset(monitor_size.height, window_size.height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_on_primary_monitor() {
        let pos = centered_position(
            PhysicalPosition::new(0, 0),
            PhysicalSize::new(1920, 1080),
            PhysicalSize::new(1280, 756),
        );
        assert_eq!(pos, PhysicalPosition::new(320, 162));
    }

    #[test]
    fn centers_relative_to_monitor_origin() {
        let pos = centered_position(
            PhysicalPosition::new(-1920, 100),
            PhysicalSize::new(1920, 1080),
            PhysicalSize::new(1000, 500),
        );
        assert_eq!(pos, PhysicalPosition::new(-1460, 390));
    }

    #[test]
    fn oversized_window_pins_to_origin() {
        let pos = centered_position(
            PhysicalPosition::new(10, 20),
            PhysicalSize::new(800, 600),
            PhysicalSize::new(1280, 756),
        );
        assert_eq!(pos, PhysicalPosition::new(10, 20));
    }

    #[test]
    fn exit_is_recorded() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.exit_requested());
        ctx.exit();
        assert!(ctx.exit_requested());
    }

    #[test]
    fn default_config_starts_hidden_and_centered() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.title, "hest");
        assert_eq!(cfg.initial_size, LogicalSize::new(1280.0, 720.0));
        assert!(cfg.resizable);
        assert!(!cfg.start_visible);
        assert!(cfg.centered);
    }
}
