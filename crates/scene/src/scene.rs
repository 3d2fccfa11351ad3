use crate::camera::OrthographicCamera;
use crate::grid::Tile;
use crate::light::AmbientLight;

/// The scene graph: one camera, its lights and the tile grid.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: OrthographicCamera,
    lights: Vec<AmbientLight>,
    tiles: Vec<Tile>,
}

impl Scene {
    pub fn new(camera: OrthographicCamera) -> Self {
        Self {
            camera,
            lights: Vec::new(),
            tiles: Vec::new(),
        }
    }

    pub fn add_light(&mut self, light: AmbientLight) {
        self.lights.push(light);
    }

    pub fn add_tile(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    pub fn camera(&self) -> &OrthographicCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrthographicCamera {
        &mut self.camera
    }

    pub fn lights(&self) -> &[AmbientLight] {
        &self.lights
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSpec;
    use crate::texture::TextureHandle;
    use tileview_common::ViewportSize;

    #[test]
    fn scene_collects_nodes() {
        let mut scene = Scene::new(OrthographicCamera::for_viewport(ViewportSize::default()));
        scene.add_light(AmbientLight::default());
        for placement in GridSpec::DEFAULT.layout().take(3) {
            scene.add_tile(Tile {
                placement,
                size: 100.0,
                texture: TextureHandle(0),
            });
        }
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.tile_count(), 3);
        assert_eq!(scene.tiles()[2].placement.col, 2);
    }
}
