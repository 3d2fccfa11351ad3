use std::path::{Path, PathBuf};
use tileview_common::ViewportSize;
use tileview_render::{Renderer, RendererFactory, RendererOptions};
use tileview_scene::{
    AmbientLight, DEFAULT_TILE_TEXTURE, GridSpec, OrthographicCamera, Scene, Tile,
};

use crate::error::ViewportError;

/// A renderer attached to its surface, plus the scene it draws.
pub struct BuiltScene<R> {
    pub renderer: R,
    pub scene: Scene,
}

/// Builds the tile scene: camera, ambient light and the fixed grid.
///
/// The tile texture is requested once and the handle shared by every tile.
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    grid: GridSpec,
    texture: PathBuf,
    options: RendererOptions,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            grid: GridSpec::DEFAULT,
            texture: PathBuf::from(DEFAULT_TILE_TEXTURE),
            options: RendererOptions::default(),
        }
    }

    /// Use a different image for the tiles.
    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture = path.into();
        self
    }

    /// Device pixels per logical pixel of the target surface.
    pub fn with_pixel_ratio(mut self, pixel_ratio: f64) -> Self {
        self.options.pixel_ratio = pixel_ratio;
        self
    }

    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    pub fn texture(&self) -> &Path {
        &self.texture
    }

    pub fn options(&self) -> RendererOptions {
        self.options
    }

    /// Attach a renderer to `surface` and populate a scene framing `size`.
    ///
    /// Fails with [`ViewportError::SurfaceUnavailable`] when the backend cannot
    /// attach; nothing is built in that case.
    pub fn build<F: RendererFactory>(
        &self,
        factory: &F,
        surface: F::Surface,
        size: ViewportSize,
    ) -> Result<BuiltScene<F::Renderer>, ViewportError> {
        let mut renderer = factory.create_renderer(surface, self.options)?;
        renderer.set_size(size);

        let mut scene = Scene::new(OrthographicCamera::for_viewport(size));
        scene.add_light(AmbientLight::default());

        let texture = renderer.load_texture(&self.texture);
        for placement in self.grid.layout() {
            scene.add_tile(Tile {
                placement,
                size: self.grid.tile_size,
                texture,
            });
        }

        tracing::info!(
            tiles = scene.tile_count(),
            width = size.width,
            height = size.height,
            texture = %self.texture.display(),
            "scene built"
        );

        Ok(BuiltScene { renderer, scene })
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::collections::HashSet;
    use tileview_render::{DebugRendererFactory, HeadlessSurface};

    #[test]
    fn builds_full_grid_with_shared_texture() {
        let built = SceneBuilder::new()
            .build(&DebugRendererFactory, HeadlessSurface::Attached, ViewportSize::new(800, 600))
            .unwrap();

        let scene = &built.scene;
        assert_eq!(scene.tile_count(), 400);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(built.renderer.texture_count(), 1);

        let textures: HashSet<_> = scene.tiles().iter().map(|t| t.texture).collect();
        assert_eq!(textures.len(), 1);

        let cells: HashSet<_> = scene
            .tiles()
            .iter()
            .map(|t| (t.placement.row, t.placement.col))
            .collect();
        assert_eq!(cells.len(), 400);
        assert!(scene.tiles().iter().all(|t| t.size == 100.0 && t.position().z == 0.0));
    }

    #[test]
    fn camera_matches_viewport() {
        let built = SceneBuilder::new()
            .build(&DebugRendererFactory, HeadlessSurface::Attached, ViewportSize::new(800, 600))
            .unwrap();
        let cam = built.scene.camera();
        assert_eq!(cam.bounds().left, -400.0);
        assert_eq!(cam.bounds().top, 300.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(built.renderer.size(), ViewportSize::new(800, 600));
    }

    #[test]
    fn options_reach_the_renderer() {
        let built = SceneBuilder::new()
            .with_pixel_ratio(2.0)
            .build(&DebugRendererFactory, HeadlessSurface::Attached, ViewportSize::default())
            .unwrap();
        let opts = built.renderer.options();
        assert!(opts.alpha && opts.antialias);
        assert_eq!(opts.pixel_ratio, 2.0);
    }

    #[test]
    fn detached_surface_builds_nothing() {
        let result = SceneBuilder::new().build(
            &DebugRendererFactory,
            HeadlessSurface::Detached,
            ViewportSize::default(),
        );
        assert!(matches!(result, Err(ViewportError::SurfaceUnavailable(_))));
    }
}
