use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tileview_common::{PointerPosition, ViewportSize};
use tileview_render::Renderer;
use tileview_render_wgpu::{WgpuRenderer, WgpuRendererFactory};
use tileview_scene::DEFAULT_TILE_TEXTURE;
use tileview_viewport::{FrameHandle, FrameScheduler, SceneBuilder, ViewportController};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "tileview-desktop", about = "Pan around a grid of image tiles")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Image drawn on every tile
    #[arg(long, default_value = DEFAULT_TILE_TEXTURE)]
    texture: PathBuf,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

/// Frames are redraw requests. winit cannot retract one, so cancellation is
/// left to the controller, which ignores redraws it did not schedule.
struct RedrawScheduler {
    window: Arc<Window>,
    next_id: u64,
}

impl RedrawScheduler {
    fn new(window: Arc<Window>) -> Self {
        Self { window, next_id: 0 }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.window.request_redraw();
        FrameHandle(self.next_id)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        tracing::trace!(frame = handle.0, "frame cancelled");
    }
}

type Controller = ViewportController<WgpuRenderer, RedrawScheduler>;

fn logical_size(size: PhysicalSize<u32>, scale_factor: f64) -> ViewportSize {
    let logical = size.to_logical::<f64>(scale_factor);
    ViewportSize::new(logical.width.round() as u32, logical.height.round() as u32)
}

fn logical_pointer(position: PhysicalPosition<f64>, scale_factor: f64) -> PointerPosition {
    let logical = position.to_logical::<f64>(scale_factor);
    PointerPosition::new(logical.x as f32, logical.y as f32)
}

struct TileViewApp {
    builder: SceneBuilder,
    initial_size: LogicalSize<u32>,
    factory: WgpuRendererFactory,
    window: Option<Arc<Window>>,
    controller: Option<Controller>,
    cursor: PointerPosition,
}

impl TileViewApp {
    fn new(cli: &Cli) -> Self {
        Self {
            builder: SceneBuilder::new().with_texture(cli.texture.clone()),
            initial_size: LogicalSize::new(cli.width, cli.height),
            factory: WgpuRendererFactory::new(),
            window: None,
            controller: None,
            cursor: PointerPosition::default(),
        }
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }
}

impl ApplicationHandler for TileViewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Tile Viewport")
            .with_inner_size(self.initial_size);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let size = logical_size(window.inner_size(), scale_factor);
        let builder = self.builder.clone().with_pixel_ratio(scale_factor);
        let mut controller: Controller =
            ViewportController::with_builder(RedrawScheduler::new(window.clone()), builder);

        let target: wgpu::SurfaceTarget<'static> = window.clone().into();
        if let Err(e) = controller.create_scene(&self.factory, target, size) {
            tracing::error!("failed to create scene: {e}");
            event_loop.exit();
            return;
        }
        if let Err(e) = controller.animate() {
            tracing::error!("failed to start viewport: {e}");
        }

        self.window = Some(window);
        self.controller = Some(controller);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let scale_factor = self.scale_factor();
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                controller.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                controller.on_resize(logical_size(new_size, scale_factor));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                controller.on_pixel_ratio(scale_factor);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = logical_pointer(position, scale_factor);
                controller.on_pointer_move(self.cursor);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => match state {
                ElementState::Pressed => controller.on_pointer_down(self.cursor),
                ElementState::Released => controller.on_pointer_up(),
            },
            WindowEvent::RedrawRequested => {
                if let Err(e) = controller.on_frame() {
                    tracing::warn!("frame failed: {e}");
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // The first pass through here ends the startup batch of events.
        if let Some(controller) = self.controller.as_mut() {
            if !controller.is_host_ready() {
                controller.host_ready();
                if let Some(renderer) = controller.renderer() {
                    let size = renderer.size();
                    tracing::info!(width = size.width, height = size.height, "viewport ready");
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut controller) = self.controller.take() {
            controller.teardown();
        }
        self.window = None;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("tileview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = TileViewApp::new(&cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}
