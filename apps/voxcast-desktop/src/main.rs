use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use tracing_subscriber::EnvFilter;
use voxcast_common::EngineConfig;
use voxcast_input::InputState;
use voxcast_present::FramePresenter;
use voxcast_render::{Engine, Ray, cast};
use voxcast_tools::{FrameTimer, SceneInspector};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "voxcast-desktop", about = "Fly through a random voxel scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML engine config; defaults are used for missing keys
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the scene seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial window scale relative to the frame size
    #[arg(long, default_value = "4")]
    scale: u32,
}

/// Fold a key transition into `input`. Returns false for unbound keys.
fn bind_key(input: &mut InputState, key: KeyCode, pressed: bool) -> bool {
    let flag = match key {
        KeyCode::KeyW => &mut input.forward,
        KeyCode::KeyS => &mut input.back,
        KeyCode::KeyA => &mut input.left,
        KeyCode::KeyD => &mut input.right,
        KeyCode::Space => &mut input.up,
        KeyCode::ShiftLeft => &mut input.down,
        KeyCode::ControlLeft => &mut input.fast,
        _ => return false,
    };
    *flag = pressed;
    true
}

/// Session state independent of the window and GPU.
struct AppState {
    engine: Engine,
    input: InputState,
    timer: FrameTimer,
    next_tick: Instant,
    show_stats: bool,
    cursor_grabbed: bool,
}

impl AppState {
    fn new(config: &EngineConfig) -> Self {
        Self {
            engine: Engine::new(config),
            input: InputState::new(),
            timer: FrameTimer::default(),
            next_tick: Instant::now(),
            show_stats: false,
            cursor_grabbed: false,
        }
    }

    /// Advance one tick if it is due.
    fn update(&mut self) {
        let now = Instant::now();
        if now < self.next_tick {
            return;
        }
        self.engine.tick(&self.input);
        self.input.end_tick();
        self.timer.record(now.elapsed());
        self.next_tick = Instant::now() + self.engine.frame_delay();
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_stats {
            return;
        }

        let scene = self.engine.scene();
        let summary = SceneInspector::summary(scene);
        let camera = &scene.camera;
        let reach = self.engine.renderer().shader().render_distance;
        let target = cast(scene.grid(), Ray::new(camera.position, camera.forward()), reach);

        egui::Window::new("voxcast")
            .default_pos([8.0, 8.0])
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Tick: {}  {:.1} ms ({:.0} fps)",
                    self.engine.ticks(),
                    self.timer.average().as_secs_f32() * 1000.0,
                    self.timer.fps()
                ));
                ui.label(format!(
                    "Frame: {}x{}",
                    self.engine.frame().width(),
                    self.engine.frame().height()
                ));
                ui.separator();
                ui.label(format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    camera.position.x, camera.position.y, camera.position.z
                ));
                ui.label(format!("Yaw: {:.3}  Pitch: {:.3}", summary.yaw, summary.pitch));
                match target {
                    Some(hit) => ui.label(format!(
                        "Looking at: ({}, {}, {}) at {:.2}",
                        hit.cell.x, hit.cell.y, hit.cell.z, hit.distance
                    )),
                    None => ui.label("Looking at: nothing"),
                };
                ui.separator();
                ui.label(format!(
                    "Voxels: {} solid of {}",
                    summary.solid_voxels, summary.volume
                ));
                ui.small("WASD: Move | Space/Shift: Up/Down | Ctrl: Fast | F1: Stats | Esc: Quit");
            });
    }
}

/// Everything that exists only once a window is open.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    presenter: FramePresenter,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(window: Arc<Window>, egui_ctx: &EguiContext, frame: (u32, u32)) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("voxcast_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let presenter = FramePresenter::new(
            &device,
            surface_format,
            frame.0,
            frame.1,
            config.width,
            config.height,
        );

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            presenter,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.presenter
            .resize(&self.queue, self.config.width, self.config.height);
    }

    /// Blit the frame and draw the overlay on top.
    fn redraw(&mut self, window: &Window, egui_ctx: &EguiContext, state: &AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Err(e) = self.presenter.upload(&self.queue, state.engine.frame()) {
            tracing::error!("frame upload failed: {e}");
        }
        self.presenter.render(&self.device, &self.queue, &view);

        let raw_input = self.egui_winit.take_egui_input(window);
        let full_output = egui_ctx.run(raw_input, |ctx| state.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct App {
    state: AppState,
    frame_size: (u32, u32),
    scale: u32,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(config: &EngineConfig, scale: u32) -> Self {
        Self {
            state: AppState::new(config),
            frame_size: (config.width, config.height),
            scale: scale.max(1),
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn set_cursor_grab(&mut self, grab: bool) {
        let Some(window) = &self.window else {
            return;
        };
        let result = if grab {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        match result {
            Ok(()) => {
                window.set_cursor_visible(!grab);
                self.state.cursor_grabbed = grab;
            }
            Err(e) => tracing::warn!("cursor grab failed: {e}"),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, pressed: bool) {
        if bind_key(&mut self.state.input, key, pressed) || !pressed {
            return;
        }
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::F1 => self.state.show_stats = !self.state.show_stats,
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("voxcast")
            .with_inner_size(PhysicalSize::new(
                self.frame_size.0 * self.scale,
                self.frame_size.1 * self.scale,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match Gpu::new(window.clone(), &self.egui_ctx, self.frame_size) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
                return;
            }
        }
        self.window = Some(window);
        self.set_cursor_grab(true);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };
        if gpu.egui_winit.on_window_event(window, &event).consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
            }
            WindowEvent::Focused(false) => {
                self.state.input.clear();
                self.set_cursor_grab(false);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } if !self.state.cursor_grabbed => {
                self.set_cursor_grab(true);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.handle_key(event_loop, key, key_state == ElementState::Pressed);
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                gpu.redraw(window, &self.egui_ctx, &self.state);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.cursor_grabbed {
                self.state
                    .input
                    .add_pointer_motion(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if Instant::now() >= self.state.next_tick {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.state.next_tick));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    tracing::info!(
        seed = config.seed,
        width = config.width,
        height = config.height,
        "voxcast-desktop starting"
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(&config, cli.scale);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_set_and_clear_flags() {
        let mut input = InputState::new();
        assert!(bind_key(&mut input, KeyCode::KeyW, true));
        assert!(bind_key(&mut input, KeyCode::Space, true));
        assert!(bind_key(&mut input, KeyCode::ControlLeft, true));
        assert!(input.forward && input.up && input.fast);

        assert!(bind_key(&mut input, KeyCode::KeyW, false));
        assert!(!input.forward);
        assert!(input.up);
    }

    #[test]
    fn shift_moves_down() {
        let mut input = InputState::new();
        bind_key(&mut input, KeyCode::ShiftLeft, true);
        assert!(input.down);
        assert!(!input.fast);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputState::new();
        assert!(!bind_key(&mut input, KeyCode::Escape, true));
        assert!(!bind_key(&mut input, KeyCode::F1, true));
        assert_eq!(input, InputState::new());
    }
}
