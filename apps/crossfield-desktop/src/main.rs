use anyhow::{Context as _, Result};
use clap::Parser;
use crossfield_assets::{EnvironmentLoader, EnvironmentMap};
use crossfield_input::{Action, PointerButton, PointerTracker};
use crossfield_pattern::{Pattern, Spacing};
use crossfield_render_wgpu::{OrbitControls, SceneRenderer};
use crossfield_scene::{EnvironmentInfo, Scene, SceneEvent};
use crossfield_tools::{ControlPanel, ParamChange, SceneInspector, apply_change};
use egui::Context as EguiContext;
use glam::Vec2;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

/// Pixels of trackpad scroll treated as one wheel line.
const PIXELS_PER_LINE: f32 = 50.0;

#[derive(Parser)]
#[command(name = "crossfield-desktop", about = "HDRI-lit cross of boxes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Equirectangular HDR image used for reflections
    #[arg(long, default_value = "./building.hdr")]
    hdri: PathBuf,

    /// Initial pattern spacing, clamped to [-1, 1]
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    spacing: f32,

    /// Requested MSAA sample count (falls back to 1 when unsupported)
    #[arg(long, default_value_t = 4)]
    msaa: u32,
}

/// Application state.
struct AppState {
    scene: Scene,
    pattern: Pattern,
    controls: OrbitControls,
    panel: ControlPanel,
    pointer: PointerTracker,
    loader: Option<EnvironmentLoader>,
    viewport_height: f32,
}

impl AppState {
    fn new(hdri: PathBuf, spacing: Spacing) -> Self {
        let mut scene = Scene::new();
        let pattern = Pattern::default();
        apply_change(&mut scene, &pattern, ParamChange::Spacing(spacing));

        let mut controls = OrbitControls::new();
        controls.save_state(scene.camera());
        let panel = ControlPanel::new(&scene, spacing);

        Self {
            scene,
            pattern,
            controls,
            panel,
            pointer: PointerTracker::new(),
            loader: Some(EnvironmentLoader::spawn(hdri)),
            viewport_height: 720.0,
        }
    }

    /// Hand back a freshly loaded environment map, once.
    fn poll_environment(&mut self) -> Option<EnvironmentMap> {
        let loader = self.loader.as_mut()?;
        let result = loader.try_take()?;
        let source = loader.path().display().to_string();
        self.loader = None;
        match result {
            Ok(map) => {
                self.scene.set_environment(EnvironmentInfo {
                    source,
                    width: map.width(),
                    height: map.height(),
                    mip_levels: map.mip_level_count(),
                });
                Some(map)
            }
            Err(e) => {
                tracing::warn!("environment map unavailable ({source}): {e}; rendering without reflections");
                None
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.scene.camera_mut().set_viewport(width, height);
        self.viewport_height = height.max(1) as f32;
    }

    fn handle_action(&mut self, action: Action) {
        self.controls
            .apply(action, self.scene.camera_mut(), self.viewport_height);
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            return;
        }
        match key {
            KeyCode::F1 => {
                self.panel.visible = !self.panel.visible;
            }
            KeyCode::KeyR => {
                self.handle_action(Action::Reset);
                tracing::info!("camera reset");
            }
            _ => {}
        }
    }

    fn update(&mut self) {
        self.controls.update(self.scene.camera_mut());
        self.flush_events();
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        let summary = SceneInspector::summary(&self.scene);
        let changes = self.panel.show(ctx, &summary);
        self.apply_changes(changes);
    }

    /// Apply panel edits, then consume the scene events they produced.
    fn apply_changes(&mut self, changes: Vec<ParamChange>) {
        for change in changes {
            apply_change(&mut self.scene, &self.pattern, change);
        }
        self.flush_events();
    }

    fn flush_events(&mut self) {
        let events = self.scene.drain_events();
        if events.is_empty() {
            return;
        }
        let (mut added, mut removed, mut other) = (0usize, 0usize, 0usize);
        for event in &events {
            match event {
                SceneEvent::NodeAdded { .. } => added += 1,
                SceneEvent::NodeRemoved { .. } => removed += 1,
                SceneEvent::MaterialChanged { param, new, .. } => {
                    tracing::debug!(%param, value = new, "material changed");
                    other += 1;
                }
                SceneEvent::EnvironmentApplied { source } => {
                    tracing::debug!(%source, "environment applied");
                    other += 1;
                }
            }
        }
        tracing::debug!(added, removed, other, "scene events");
    }

    /// Button releases always reach the tracker, even over the panel.
    fn pointer_button(&mut self, button: MouseButton, pressed: bool) {
        let button = match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            _ => return,
        };
        self.pointer.button(button, pressed);
    }
}

/// GPU and window resources, created on the first `resumed`.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: SceneRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    requested_msaa: u32,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState, requested_msaa: u32) -> Self {
        Self {
            state,
            requested_msaa,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("Crossfield")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("crossfield_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        // Full physical resolution; no pixel-ratio cap on high-DPI displays.
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if adapter
            .get_texture_format_features(surface_format)
            .flags
            .sample_count_supported(self.requested_msaa)
        {
            self.requested_msaa
        } else {
            tracing::warn!(
                requested = self.requested_msaa,
                "MSAA sample count unsupported, rendering without antialiasing"
            );
            1
        };

        self.state.resize(config.width, config.height);

        let renderer = SceneRenderer::new(
            &device,
            &queue,
            surface_format,
            sample_count,
            config.width,
            config.height,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            sample_count,
            "GPU initialized"
        );

        Ok(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if let Some(map) = self.state.poll_environment() {
            gpu.renderer.set_environment(&gpu.device, &gpu.queue, &map);
        }
        self.state.update();

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
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

        // UI first so slider edits land in this frame's scene.
        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        gpu.renderer.prepare(&gpu.device, &gpu.queue, &self.state.scene);
        gpu.renderer.render(&gpu.device, &gpu.queue, &view);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
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
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
        if response.consumed {
            if let WindowEvent::MouseInput {
                button,
                state: ElementState::Released,
                ..
            } = event
            {
                self.state.pointer_button(button, false);
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.config.width = new_size.width.max(1);
                gpu.config.height = new_size.height.max(1);
                gpu.surface.configure(&gpu.device, &gpu.config);
                gpu.renderer
                    .resize(&gpu.device, gpu.config.width, gpu.config.height);
                self.state.resize(gpu.config.width, gpu.config.height);
                tracing::debug!(
                    width = gpu.config.width,
                    height = gpu.config.height,
                    "surface resized"
                );
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
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                self.state
                    .pointer_button(button, btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pos = Vec2::new(position.x as f32, position.y as f32);
                if let Some(action) = self.state.pointer.moved(pos) {
                    self.state.handle_action(action);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.pointer.left();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                if let Some(action) = self.state.pointer.scrolled(lines) {
                    self.state.handle_action(action);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(hdri = %cli.hdri.display(), "crossfield-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let state = AppState::new(cli.hdri, Spacing::new(cli.spacing));
    let mut app = GpuApp::new(state, cli.msaa.max(1));
    event_loop.run_app(&mut app)?;

    Ok(())
}
