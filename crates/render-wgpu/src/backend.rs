use crate::pipeline::TilePipeline;
use crate::texture::TextureCache;
use std::path::Path;
use tileview_common::ViewportSize;
use tileview_render::{RenderError, Renderer, RendererFactory, RendererOptions};
use tileview_scene::{OrthographicCamera, Scene, TextureHandle, TextureState};

const MSAA_SAMPLES: u32 = 4;

/// Opaque clear color used when the surface is not transparent.
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.15,
    a: 1.0,
};

/// Creates [`WgpuRenderer`]s for window surfaces.
pub struct WgpuRendererFactory {
    instance: wgpu::Instance,
}

impl WgpuRendererFactory {
    pub fn new() -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        Self { instance }
    }
}

impl Default for WgpuRendererFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererFactory for WgpuRendererFactory {
    type Surface = wgpu::SurfaceTarget<'static>;
    type Renderer = WgpuRenderer;

    fn create_renderer(
        &self,
        target: wgpu::SurfaceTarget<'static>,
        options: RendererOptions,
    ) -> Result<WgpuRenderer, RenderError> {
        let unavailable = |reason: String| RenderError::SurfaceUnavailable(reason);

        let surface = self
            .instance
            .create_surface(target)
            .map_err(|e| unavailable(e.to_string()))?;

        let adapter = pollster::block_on(self.instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| unavailable("no adapter can present to this surface".into()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("tileview_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| unavailable(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .ok_or_else(|| unavailable("surface reports no formats".into()))?;

        let alpha_mode = if options.alpha
            && caps
                .alpha_modes
                .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let sample_count = if options.antialias
            && adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        {
            MSAA_SAMPLES
        } else {
            1
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: 1,
            height: 1,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let pipeline = TilePipeline::new(&device, format, sample_count);
        let textures = TextureCache::new(&device, &queue, pipeline.texture_layout());

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?format,
            ?alpha_mode,
            sample_count,
            "GPU renderer attached"
        );

        Ok(WgpuRenderer {
            gpu: Some(Gpu {
                surface,
                device,
                queue,
                config,
                configured: false,
                sample_count,
                msaa_view: None,
                pipeline,
                textures,
            }),
            options,
            size: ViewportSize::new(0, 0),
        })
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    configured: bool,
    sample_count: u32,
    msaa_view: Option<wgpu::TextureView>,
    pipeline: TilePipeline,
    textures: TextureCache,
}

impl Gpu {
    fn reconfigure(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.configured = true;
        self.msaa_view = (self.sample_count > 1).then(|| {
            create_msaa_view(&self.device, self.config.format, width, height, self.sample_count)
        });
    }
}

/// wgpu-backed tile renderer bound to one surface.
pub struct WgpuRenderer {
    gpu: Option<Gpu>,
    options: RendererOptions,
    size: ViewportSize,
}

impl WgpuRenderer {
    pub fn options(&self) -> RendererOptions {
        self.options
    }

    pub fn is_disposed(&self) -> bool {
        self.gpu.is_none()
    }
}

impl Renderer for WgpuRenderer {
    fn set_size(&mut self, size: ViewportSize) {
        self.size = size;
        if let Some(gpu) = self.gpu.as_mut() {
            let (width, height) = size.to_physical(self.options.pixel_ratio);
            gpu.reconfigure(width, height);
        }
    }

    fn size(&self) -> ViewportSize {
        self.size
    }

    fn pixel_ratio(&self) -> f64 {
        self.options.pixel_ratio
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.options.pixel_ratio = ratio;
        if let Some(gpu) = self.gpu.as_mut().filter(|gpu| gpu.configured) {
            let (width, height) = self.size.to_physical(ratio);
            gpu.reconfigure(width, height);
        }
    }

    fn load_texture(&mut self, path: &Path) -> TextureHandle {
        match self.gpu.as_mut() {
            Some(gpu) => gpu.textures.load(path),
            None => {
                tracing::debug!(path = %path.display(), "texture requested after dispose");
                TextureHandle(u32::MAX)
            }
        }
    }

    fn texture_state(&self, handle: TextureHandle) -> TextureState {
        self.gpu
            .as_ref()
            .map(|gpu| gpu.textures.state(handle))
            .unwrap_or(TextureState::Failed)
    }

    fn render(&mut self, scene: &Scene, camera: &OrthographicCamera) -> Result<(), RenderError> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Err(RenderError::Disposed);
        };
        if !gpu.configured {
            return Ok(());
        }
        gpu.textures
            .poll(&gpu.device, &gpu.queue, gpu.pipeline.texture_layout());

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(e) => return Err(RenderError::Frame(e.to_string())),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let clear = if self.options.alpha {
            wgpu::Color::TRANSPARENT
        } else {
            BACKGROUND
        };

        gpu.pipeline.draw(
            &gpu.device,
            &gpu.queue,
            &view,
            gpu.msaa_view.as_ref(),
            clear,
            scene,
            camera,
            &gpu.textures,
        );
        output.present();
        Ok(())
    }

    fn dispose(&mut self) {
        if self.gpu.take().is_some() {
            tracing::info!("GPU renderer disposed");
        }
    }
}

fn create_msaa_view(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa_color_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}
