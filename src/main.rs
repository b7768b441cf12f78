use anyhow::Context as _;
use clap::Parser;
use log::{error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use virtual_lab::catalog::{Catalog, Experiment};
use virtual_lab::config::{Cli, LabConfig};
use virtual_lab::hud::{experiment_panel, game_hud, Banner, CatalogBrowser, HudAction};
use virtual_lab::progression::Session;
use virtual_lab::render::{GpuContext, GpuSurface, GpuViewport};
use virtual_lab::view::{FrameLoop, RoomView, TableView};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

type Picked = Rc<RefCell<Option<Experiment>>>;

enum Screen {
    Catalog,
    Game {
        frame_loop: FrameLoop<RoomView, GpuViewport>,
        banner: Banner,
    },
    Experiment {
        session: Session,
        frame_loop: FrameLoop<TableView, GpuViewport>,
    },
}

impl Screen {
    fn teardown(&mut self) {
        match self {
            Screen::Catalog => {}
            Screen::Game { frame_loop, .. } => frame_loop.teardown(),
            Screen::Experiment { frame_loop, .. } => frame_loop.teardown(),
        }
    }

    /// Returns `false` when no view is mounted.
    fn resize(&mut self, width: u32, height: u32) -> bool {
        match self {
            Screen::Catalog => return false,
            Screen::Game { frame_loop, .. } => frame_loop.resize(width, height),
            Screen::Experiment { frame_loop, .. } => frame_loop.resize(width, height),
        }
        true
    }

    fn key_down(&mut self, key: &str) {
        match self {
            Screen::Catalog => {}
            Screen::Game { frame_loop, .. } => frame_loop.key_down(key),
            Screen::Experiment { frame_loop, .. } => frame_loop.key_down(key),
        }
    }

    fn key_up(&mut self, key: &str) {
        match self {
            Screen::Catalog => {}
            Screen::Game { frame_loop, .. } => frame_loop.key_up(key),
            Screen::Experiment { frame_loop, .. } => frame_loop.key_up(key),
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32) {
        match self {
            Screen::Catalog => {}
            Screen::Game { frame_loop, .. } => frame_loop.pointer_down(x, y),
            Screen::Experiment { frame_loop, .. } => frame_loop.pointer_down(x, y),
        }
    }

    fn pointer_move(&mut self, x: f32, y: f32) {
        match self {
            Screen::Catalog => {}
            Screen::Game { frame_loop, .. } => frame_loop.pointer_move(x, y),
            Screen::Experiment { frame_loop, .. } => frame_loop.pointer_move(x, y),
        }
    }

    fn pointer_up(&mut self) {
        match self {
            Screen::Catalog => {}
            Screen::Game { frame_loop, .. } => frame_loop.pointer_up(),
            Screen::Experiment { frame_loop, .. } => frame_loop.pointer_up(),
        }
    }

    fn clear_input(&mut self) {
        match self {
            Screen::Catalog => {}
            Screen::Game { frame_loop, .. } => frame_loop.clear_input(),
            Screen::Experiment { frame_loop, .. } => frame_loop.clear_input(),
        }
    }

    /// Advances everything that runs on wall-clock time.
    fn update(&mut self, elapsed: std::time::Duration) {
        match self {
            Screen::Catalog => {}
            Screen::Game { banner, .. } => banner.tick(elapsed),
            Screen::Experiment { session, frame_loop } => {
                if session.advance(elapsed) {
                    info!("step {} of {:?} resolved", session.step_number(), session.experiment().id);
                }
                frame_loop.view_mut().sync(session.prop_key());
            }
        }
    }

    /// Renders the mounted view, if any. Returns `false` for the catalog,
    /// which has no 3D scene to draw.
    fn tick(&mut self) -> bool {
        match self {
            Screen::Catalog => false,
            Screen::Game { frame_loop, .. } => frame_loop.tick(),
            Screen::Experiment { frame_loop, .. } => frame_loop.tick(),
        }
    }

    fn hud(&self, ctx: &egui::Context, browser: &mut CatalogBrowser, catalog: &Catalog) -> Option<HudAction> {
        match self {
            Screen::Catalog => browser.show(ctx, catalog),
            Screen::Game { frame_loop, banner } => game_hud(ctx, frame_loop.view(), banner),
            Screen::Experiment { session, .. } => experiment_panel(ctx, session),
        }
    }
}

struct App {
    config: LabConfig,
    catalog: Catalog,
    browser: CatalogBrowser,
    window: Option<Arc<Window>>,
    surface: Option<Rc<RefCell<GpuSurface>>>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    screen: Screen,
    picked: Picked,
    mouse_pos: (f32, f32),
    last_frame: Instant,
    fatal: Option<anyhow::Error>,
}

impl App {
    fn new(config: LabConfig, catalog: Catalog) -> Self {
        Self {
            config,
            catalog,
            browser: CatalogBrowser::new(),
            window: None,
            surface: None,
            egui_state: None,
            egui_renderer: None,
            screen: Screen::Catalog,
            picked: Rc::new(RefCell::new(None)),
            mouse_pos: (0.0, 0.0),
            last_frame: Instant::now(),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Virtual Science Lab")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let context = pollster::block_on(GpuContext::new(window.clone()))?;

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx,
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&context.device, context.config.format, None, 1, false);

        self.window = Some(window);
        self.surface = Some(GpuSurface::new(context).shared());
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    /// Tears the current screen down, then mounts `next`'s view.
    fn switch_to(&mut self, next: impl FnOnce(&mut Self) -> Option<Screen>) {
        self.screen.teardown();
        self.screen = Screen::Catalog;
        if let Some(screen) = next(self) {
            self.screen = screen;
        }
    }

    fn enter_game(&mut self) {
        self.switch_to(|app| {
            let surface = app.surface.clone()?;
            let picked = app.picked.clone();
            let room = RoomView::new(
                app.catalog.experiments().to_vec(),
                app.config.room_options(),
                move |experiment| *picked.borrow_mut() = Some(experiment.clone()),
            );
            Some(Screen::Game {
                frame_loop: FrameLoop::mount(room, GpuViewport::new(surface)),
                banner: Banner::default(),
            })
        });
    }

    fn open_experiment(&mut self, experiment: Experiment) {
        info!("opening experiment {:?}", experiment.id);
        self.switch_to(|app| {
            let surface = app.surface.clone()?;
            let session = Session::new(experiment).with_default_duration(app.config.default_action_duration());
            let mut table = TableView::new();
            table.sync(session.prop_key());
            Some(Screen::Experiment {
                session,
                frame_loop: FrameLoop::mount(table, GpuViewport::new(surface)),
            })
        });
    }

    fn apply(&mut self, action: HudAction) {
        match action {
            HudAction::Open(id) => match self.catalog.get(&id).cloned() {
                Some(experiment) => self.open_experiment(experiment),
                None => warn!("no experiment with id {id:?}"),
            },
            HudAction::EnterGame => self.enter_game(),
            HudAction::ExitGame | HudAction::Back => self.switch_to(|_| None),
            HudAction::SelectPrev | HudAction::SelectNext => {
                if let Screen::Game { frame_loop, .. } = &mut self.screen {
                    if action == HudAction::SelectPrev {
                        frame_loop.view_mut().select_prev();
                    } else {
                        frame_loop.view_mut().select_next();
                    }
                }
            }
            HudAction::PerformAction | HudAction::NextStep | HudAction::PrevStep | HudAction::TryAgain => {
                if let Screen::Experiment { session, .. } = &mut self.screen {
                    match action {
                        HudAction::PerformAction => session.perform_action(),
                        HudAction::NextStep => session.next_step(),
                        HudAction::PrevStep => session.prev_step(),
                        _ => session.reset(),
                    }
                }
            }
        }
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(surface)) = (self.window.clone(), self.surface.clone()) else {
            return;
        };
        let (Some(egui_state), Some(egui_renderer)) = (self.egui_state.as_mut(), self.egui_renderer.as_mut()) else {
            return;
        };

        let now = Instant::now();
        self.screen.update(now - self.last_frame);
        self.last_frame = now;

        let raw_input = egui_state.take_egui_input(&window);
        let egui_ctx = egui_state.egui_ctx().clone();
        let mut action = None;
        let full_output = egui_ctx.run(raw_input, |ctx| {
            action = self.screen.hud(ctx, &mut self.browser, &self.catalog);
        });
        egui_state.handle_platform_output(&window, full_output.platform_output);
        let clipped_primitives = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        let acquired = surface.borrow().context.surface.get_current_texture();
        let output = match acquired {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                surface.borrow_mut().context.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("out of GPU memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => {
                warn!("skipping frame: {e}");
                return;
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        surface.borrow_mut().target = Some(view);
        let drew_scene = self.screen.tick();
        let target = surface.borrow_mut().target.take();
        let Some(view) = target else {
            return;
        };

        {
            let surface = surface.borrow();
            let context = &surface.context;
            for (id, delta) in &full_output.textures_delta.set {
                egui_renderer.update_texture(&context.device, &context.queue, *id, delta);
            }
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [context.config.width, context.config.height],
                pixels_per_point: full_output.pixels_per_point,
            };

            let mut encoder = context.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Egui Encoder"),
            });
            egui_renderer.update_buffers(
                &context.device,
                &context.queue,
                &mut encoder,
                &clipped_primitives,
                &screen_descriptor,
            );

            {
                let load = if drew_scene {
                    wgpu::LoadOp::Load
                } else {
                    wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.05,
                        g: 0.06,
                        b: 0.09,
                        a: 1.0,
                    })
                };
                let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                let mut render_pass = render_pass.forget_lifetime();
                egui_renderer.render(&mut render_pass, &clipped_primitives, &screen_descriptor);
            }

            context.queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        }

        output.present();

        if let Some(action) = action {
            self.apply(action);
        }
        let picked = self.picked.borrow_mut().take();
        if let Some(experiment) = picked {
            self.open_experiment(experiment);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!("startup failed: {e:#}");
            self.fatal = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(egui_state), Some(window)) = (&mut self.egui_state, &self.window) {
            let response = egui_state.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.screen.teardown();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if !self.screen.resize(size.width, size.height) {
                    if let Some(surface) = &self.surface {
                        surface.borrow_mut().context.resize(size);
                    }
                }
            }

            WindowEvent::Focused(false) => self.screen.clear_input(),

            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                match &event.logical_key {
                    Key::Named(NamedKey::Escape) if pressed => {
                        if matches!(self.screen, Screen::Catalog) {
                            event_loop.exit();
                        } else {
                            self.switch_to(|_| None);
                        }
                    }
                    Key::Character(text) => {
                        if pressed {
                            self.screen.key_down(text);
                        } else {
                            self.screen.key_up(text);
                        }
                    }
                    _ => {}
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                if state == ElementState::Pressed {
                    let (x, y) = self.mouse_pos;
                    self.screen.pointer_down(x, y);
                } else {
                    self.screen.pointer_up();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_pos = (position.x as f32, position.y as f32);
                self.screen.pointer_move(self.mouse_pos.0, self.mouse_pos.1);
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = LabConfig::resolve(&cli).context("failed to load configuration")?;
    let catalog = Catalog::builtin().context("failed to load experiment catalog")?;
    info!("loaded {} experiments", catalog.len());

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, catalog);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
