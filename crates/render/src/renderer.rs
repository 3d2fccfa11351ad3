use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tileview_common::ViewportSize;
use tileview_scene::{OrthographicCamera, Scene, TextureHandle, TextureState};

/// Errors reported by a rendering backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The backend could not attach to the drawing surface.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// A frame could not be acquired or submitted.
    #[error("frame failed: {0}")]
    Frame(String),
    #[error("renderer has been disposed")]
    Disposed,
}

/// Options fixed at renderer creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererOptions {
    /// Transparent clear and premultiplied composition.
    pub alpha: bool,
    /// Multisampled edges where the backend supports it.
    pub antialias: bool,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f64,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
            pixel_ratio: 1.0,
        }
    }
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// The renderer reads a scene and camera and presents them on its surface.
pub trait Renderer {
    /// Resize the drawing surface. `size` is in logical pixels.
    fn set_size(&mut self, size: ViewportSize);

    /// Current logical size of the drawing surface.
    fn size(&self) -> ViewportSize;

    /// Device pixels per logical pixel.
    fn pixel_ratio(&self) -> f64;

    /// Change the device pixel ratio. The logical size is kept and the
    /// surface is resized to match.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Request a texture. Returns at once; the image may arrive later.
    fn load_texture(&mut self, path: &Path) -> TextureHandle;

    fn texture_state(&self, handle: TextureHandle) -> TextureState;

    /// Draw one frame.
    fn render(&mut self, scene: &Scene, camera: &OrthographicCamera) -> Result<(), RenderError>;

    /// Release GPU and surface resources. Safe to call more than once.
    fn dispose(&mut self);
}

/// Creates renderers bound to a host surface.
pub trait RendererFactory {
    type Surface;
    type Renderer: Renderer;

    fn create_renderer(
        &self,
        surface: Self::Surface,
        options: RendererOptions,
    ) -> Result<Self::Renderer, RenderError>;
}

/// Stand-in surface for headless rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlessSurface {
    Attached,
    /// A surface the backend cannot draw on.
    Detached,
}

/// Factory for [`DebugTextRenderer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugRendererFactory;

impl RendererFactory for DebugRendererFactory {
    type Surface = HeadlessSurface;
    type Renderer = DebugTextRenderer;

    fn create_renderer(
        &self,
        surface: HeadlessSurface,
        options: RendererOptions,
    ) -> Result<DebugTextRenderer, RenderError> {
        match surface {
            HeadlessSurface::Attached => Ok(DebugTextRenderer::with_options(options)),
            HeadlessSurface::Detached => Err(RenderError::SurfaceUnavailable(
                "headless surface is detached".into(),
            )),
        }
    }
}

/// Debug text renderer.
///
/// Produces a human-readable description of each frame instead of pixels.
/// Textures resolve immediately. Useful for CLI output, logging, and testing
/// the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    options: RendererOptions,
    size: ViewportSize,
    textures: BTreeMap<PathBuf, TextureHandle>,
    frames: u64,
    last_frame: String,
    disposed: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RendererOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> RendererOptions {
        self.options
    }

    /// Number of frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text of the most recent frame.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }

    /// Distinct textures requested so far.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Renderer for DebugTextRenderer {
    fn set_size(&mut self, size: ViewportSize) {
        self.size = size;
    }

    fn size(&self) -> ViewportSize {
        self.size
    }

    fn pixel_ratio(&self) -> f64 {
        self.options.pixel_ratio
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.options.pixel_ratio = ratio;
    }

    fn load_texture(&mut self, path: &Path) -> TextureHandle {
        let next = TextureHandle(self.textures.len() as u32);
        *self.textures.entry(path.to_path_buf()).or_insert(next)
    }

    fn texture_state(&self, handle: TextureHandle) -> TextureState {
        if self.textures.values().any(|h| *h == handle) {
            TextureState::Ready
        } else {
            TextureState::Failed
        }
    }

    fn render(&mut self, scene: &Scene, camera: &OrthographicCamera) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        self.frames += 1;

        let p = camera.position();
        let b = camera.bounds();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{}) ===",
            self.frames, self.size.width, self.size.height
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) bounds=[{:.1}, {:.1}, {:.1}, {:.1}]",
            p.x, p.y, p.z, b.left, b.right, b.top, b.bottom
        );
        let _ = writeln!(out, "Lights: {}", scene.lights().len());

        let left = p.x + b.left;
        let right = p.x + b.right;
        let bottom = p.y + b.bottom;
        let top = p.y + b.top;
        let visible = scene
            .tiles()
            .iter()
            .filter(|t| {
                let c = t.position();
                let h = t.size / 2.0;
                c.x + h > left && c.x - h < right && c.y + h > bottom && c.y - h < top
            })
            .count();
        let _ = writeln!(
            out,
            "Tiles: {} visible={} textures={}",
            scene.tile_count(),
            visible,
            self.textures.len()
        );

        tracing::trace!(frame = self.frames, "debug frame rendered");
        self.last_frame = out;
        Ok(())
    }

    fn dispose(&mut self) {
        if !self.disposed {
            tracing::debug!(frames = self.frames, "debug renderer disposed");
        }
        self.disposed = true;
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileview_scene::{AmbientLight, GridSpec, Tile};

    fn small_scene(size: ViewportSize) -> Scene {
        let mut scene = Scene::new(OrthographicCamera::for_viewport(size));
        scene.add_light(AmbientLight::default());
        let spec = GridSpec {
            rows: 3,
            cols: 3,
            ..GridSpec::DEFAULT
        };
        for placement in spec.layout() {
            scene.add_tile(Tile {
                placement,
                size: spec.tile_size,
                texture: TextureHandle(0),
            });
        }
        scene
    }

    #[test]
    fn debug_renderer_describes_frame() {
        let size = ViewportSize::new(200, 200);
        let scene = small_scene(size);
        let mut renderer = DebugTextRenderer::new();
        renderer.set_size(size);
        renderer.render(&scene, scene.camera()).unwrap();

        let output = renderer.last_frame();
        assert!(output.contains("Frame 1 (200x200)"));
        assert!(output.contains("Lights: 1"));
        // Viewport spans [-100, 100]; the outer ring starts at +/-52.
        assert!(output.contains("Tiles: 9 visible=9"));
    }

    #[test]
    fn textures_dedupe_by_path() {
        let mut renderer = DebugTextRenderer::new();
        let a = renderer.load_texture(Path::new("assets/soil.png"));
        let b = renderer.load_texture(Path::new("assets/soil.png"));
        let c = renderer.load_texture(Path::new("assets/sand.png"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(renderer.texture_count(), 2);
        assert_eq!(renderer.texture_state(a), TextureState::Ready);
    }

    #[test]
    fn render_after_dispose_fails() {
        let scene = small_scene(ViewportSize::default());
        let mut renderer = DebugTextRenderer::new();
        renderer.dispose();
        renderer.dispose();
        assert!(matches!(
            renderer.render(&scene, scene.camera()),
            Err(RenderError::Disposed)
        ));
    }

    #[test]
    fn detached_surface_is_unavailable() {
        let factory = DebugRendererFactory;
        let err = factory
            .create_renderer(HeadlessSurface::Detached, RendererOptions::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::SurfaceUnavailable(_)));
        assert!(
            factory
                .create_renderer(HeadlessSurface::Attached, RendererOptions::default())
                .is_ok()
        );
    }

    #[test]
    fn default_options() {
        let opts = RendererOptions::default();
        assert!(opts.alpha);
        assert!(opts.antialias);
        assert_eq!(opts.pixel_ratio, 1.0);
    }

    #[test]
    fn pixel_ratio_keeps_logical_size() {
        let mut renderer = DebugTextRenderer::new();
        renderer.set_size(ViewportSize::new(640, 480));
        renderer.set_pixel_ratio(2.0);
        assert_eq!(renderer.pixel_ratio(), 2.0);
        assert_eq!(renderer.size(), ViewportSize::new(640, 480));
        assert_eq!(renderer.options().pixel_ratio, 2.0);
    }
}
