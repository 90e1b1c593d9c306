use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use skiff_assets::AssetStore;
use skiff_control::{DemoScene, FrameDriver, MotionConfig, Phase};
use skiff_input::{HeldKeys, Key};
use skiff_render_wgpu::SceneRenderer;

#[derive(Parser)]
#[command(name = "skiff-desktop", about = "Windowed skiff driving demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory containing manifest.json and the demo assets
    #[arg(long, default_value = "./assets")]
    assets_dir: String,

    /// Start with collider wireframes visible
    #[arg(long)]
    show_colliders: bool,

    /// Drive speed in units per second
    #[arg(long, default_value_t = 3.0)]
    movement_speed: f32,

    /// Turn rate in radians per second
    #[arg(long, default_value_t = 2.0)]
    rotation_speed: f32,
}

/// Simulation state. Everything the frame loop touches lives here so the
/// window plumbing below stays free of demo logic.
struct AppState {
    demo: DemoScene,
    driver: FrameDriver,
    held: HeldKeys,
    show_colliders: bool,
    last_frame: Instant,
}

impl AppState {
    fn new(demo: DemoScene, config: MotionConfig, show_colliders: bool) -> Self {
        let driver = FrameDriver::new(demo.player_body, demo.player_node, config);
        Self {
            demo,
            driver,
            held: HeldKeys::new(),
            show_colliders,
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        let Some(key) = map_key(code) else {
            return;
        };
        if pressed {
            self.held.press(key);
        } else {
            self.held.release(key);
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        match self.driver.phase() {
            Phase::Instructions => {
                egui::Window::new("How to drive")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.label("W / Up       drive forward");
                        ui.label("S / Down     drive backward");
                        ui.label("A / Left     turn left");
                        ui.label("D / Right    turn right");
                        ui.separator();
                        if ui.button("Start driving").clicked() {
                            self.driver.dismiss_instructions();
                        }
                    });
            }
            Phase::Active => {
                egui::Window::new("skiff")
                    .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
                    .show(ctx, |ui| {
                        ui.checkbox(&mut self.show_colliders, "Show colliders");
                        if let Some(pos) = self.demo.physics.position(self.demo.player_body) {
                            ui.label(format!(
                                "Position: ({:.1}, {:.1}, {:.1})",
                                pos.x, pos.y, pos.z
                            ));
                        }
                        let dir = self.driver.direction();
                        ui.label(format!("Heading: ({:.2}, {:.2})", dir.x, dir.z));
                    });
            }
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::KeyW),
        KeyCode::KeyA => Some(Key::KeyA),
        KeyCode::KeyS => Some(Key::KeyS),
        KeyCode::KeyD => Some(Key::KeyD),
        KeyCode::ArrowUp => Some(Key::ArrowUp),
        KeyCode::ArrowDown => Some(Key::ArrowDown),
        KeyCode::ArrowLeft => Some(Key::ArrowLeft),
        KeyCode::ArrowRight => Some(Key::ArrowRight),
        _ => None,
    }
}

struct GpuApp {
    state: AppState,
    store: AssetStore,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<SceneRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(state: AppState, store: AssetStore) -> Self {
        Self {
            state,
            store,
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("skiff")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .expect("create surface");

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("find adapter");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("skiff_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .expect("create device");

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

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

        self.state.demo.camera.set_aspect(size.width, size.height);

        let renderer = SceneRenderer::new(
            &device,
            &queue,
            surface_format,
            size.width,
            size.height,
            &self.store,
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

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(egui_winit) = &mut self.egui_winit {
            let response = egui_winit.on_window_event(self.window.as_ref().unwrap(), &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    self.state
                        .demo
                        .camera
                        .set_aspect(config.width, config.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::Focused(false) => {
                // Release events can be lost while unfocused.
                self.state.held.clear();
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
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                // The driver clamps runaway frame times itself.
                let dt = (now - self.state.last_frame).as_secs_f32();
                self.state.last_frame = now;

                let state = &mut self.state;
                if let Err(e) = state.driver.tick(
                    dt,
                    &state.held,
                    &mut state.demo.physics,
                    &mut state.demo.scene,
                    &mut state.demo.camera,
                    state.show_colliders,
                ) {
                    tracing::error!("frame failed: {e}");
                    event_loop.exit();
                    return;
                }

                let (Some(surface), Some(device), Some(queue)) =
                    (&self.surface, &self.device, &self.queue)
                else {
                    return;
                };

                let output = match surface.get_current_texture() {
                    Ok(t) => t,
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(config) = &self.config {
                            surface.configure(device, config);
                        }
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

                if let Some(renderer) = &self.renderer {
                    renderer.render(
                        device,
                        queue,
                        &view,
                        &self.state.demo.camera,
                        &self.state.demo.lighting,
                        &self.state.demo.scene,
                        &self.store,
                        self.state.demo.physics.debug_lines(),
                    );
                }

                let raw_input = self
                    .egui_winit
                    .as_mut()
                    .unwrap()
                    .take_egui_input(self.window.as_ref().unwrap());
                let full_output = self.egui_ctx.run(raw_input, |ctx| {
                    self.state.draw_ui(ctx);
                });

                self.egui_winit.as_mut().unwrap().handle_platform_output(
                    self.window.as_ref().unwrap(),
                    full_output.platform_output,
                );

                let paint_jobs = self
                    .egui_ctx
                    .tessellate(full_output.shapes, full_output.pixels_per_point);

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [
                        self.config.as_ref().unwrap().width,
                        self.config.as_ref().unwrap().height,
                    ],
                    pixels_per_point: full_output.pixels_per_point,
                };

                {
                    let egui_renderer = self.egui_renderer.as_mut().unwrap();
                    for (id, image_delta) in &full_output.textures_delta.set {
                        egui_renderer.update_texture(device, queue, *id, image_delta);
                    }
                    let mut encoder =
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("egui_encoder"),
                        });
                    egui_renderer.update_buffers(
                        device,
                        queue,
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
                        egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
                    }
                    queue.submit(std::iter::once(encoder.finish()));
                    for id in &full_output.textures_delta.free {
                        egui_renderer.free_texture(id);
                    }
                }

                output.present();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("skiff-desktop starting");

    let store = AssetStore::load_manifest(Path::new(&cli.assets_dir))
        .with_context(|| format!("loading assets from {}", cli.assets_dir))?;

    let demo = DemoScene::build();
    for (_, node) in demo.scene.nodes() {
        if let Some(mesh) = node.mesh.as_deref() {
            anyhow::ensure!(
                store.mesh_id(mesh).is_some(),
                "manifest has no mesh '{mesh}' for node '{}'",
                node.name
            );
        }
        if let Some(texture) = node.texture.as_deref() {
            anyhow::ensure!(
                store.texture_id(texture).is_some(),
                "manifest has no texture '{texture}' for node '{}'",
                node.name
            );
        }
    }

    let config = MotionConfig {
        movement_speed: cli.movement_speed,
        rotation_speed: cli.rotation_speed,
    };
    let state = AppState::new(demo, config, cli.show_colliders);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(state, store);
    event_loop.run_app(&mut app)?;

    Ok(())
}
