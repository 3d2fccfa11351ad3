use glam::{Mat4, Vec2, Vec3};
use tileview_common::ViewportSize;

/// Near clip plane distance.
pub const CAMERA_NEAR: f32 = 1.0;
/// Far clip plane distance.
pub const CAMERA_FAR: f32 = 1000.0;
/// Fixed camera height above the tile plane.
pub const CAMERA_Z: f32 = 5.0;

/// Orthographic frustum side planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl OrthoBounds {
    /// Bounds that map one world unit to one device-independent pixel,
    /// centered on the origin.
    pub fn from_viewport(size: ViewportSize) -> Self {
        let half = size.half_extents();
        Self {
            left: -half.x,
            right: half.x,
            top: half.y,
            bottom: -half.y,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// Orthographic camera looking down onto the tile plane.
///
/// Orientation is fixed by [`look_at`](Self::look_at); panning translates the
/// camera in X/Y without turning it. The projection matrix is cached and only
/// rebuilt by [`update_projection_matrix`](Self::update_projection_matrix).
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicCamera {
    bounds: OrthoBounds,
    near: f32,
    far: f32,
    position: Vec3,
    forward: Vec3,
    projection: Mat4,
}

impl OrthographicCamera {
    pub fn new(bounds: OrthoBounds, near: f32, far: f32) -> Self {
        let mut camera = Self {
            bounds,
            near,
            far,
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Camera framing `size`, placed at `(0, 0, CAMERA_Z)` looking at the origin.
    pub fn for_viewport(size: ViewportSize) -> Self {
        let mut camera = Self::new(OrthoBounds::from_viewport(size), CAMERA_NEAR, CAMERA_FAR);
        camera.position = Vec3::new(0.0, 0.0, CAMERA_Z);
        camera.look_at(Vec3::ZERO);
        camera
    }

    pub fn bounds(&self) -> OrthoBounds {
        self.bounds
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current look-at point. Moves with the camera when panning.
    pub fn target(&self) -> Vec3 {
        self.position + self.forward
    }

    /// Point the camera at `target`. A target equal to the position keeps
    /// the current orientation.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(dir) = (target - self.position).try_normalize() {
            self.forward = dir;
        }
    }

    /// Move the camera in the X/Y plane. Z never changes.
    pub fn translate(&mut self, delta: Vec2) {
        self.position.x += delta.x;
        self.position.y += delta.y;
    }

    /// Reframe for a new viewport size and rebuild the projection.
    pub fn set_viewport(&mut self, size: ViewportSize) {
        self.bounds = OrthoBounds::from_viewport(size);
        self.update_projection_matrix();
    }

    /// Rebuild the cached projection from the current bounds.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::orthographic_rh(
            self.bounds.left,
            self.bounds.right,
            self.bounds.bottom,
            self.bounds.top,
            self.near,
            self.far,
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target(), Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_camera_frames_window() {
        let cam = OrthographicCamera::for_viewport(ViewportSize::new(800, 600));
        let b = cam.bounds();
        assert_eq!(b.left, -400.0);
        assert_eq!(b.right, 400.0);
        assert_eq!(b.top, 300.0);
        assert_eq!(b.bottom, -300.0);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(cam.target(), Vec3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn set_viewport_rebuilds_projection() {
        let mut cam = OrthographicCamera::for_viewport(ViewportSize::new(800, 600));
        let before = cam.projection_matrix();
        cam.set_viewport(ViewportSize::new(1024, 768));
        assert_eq!(cam.bounds(), OrthoBounds::from_viewport(ViewportSize::new(1024, 768)));
        assert_ne!(cam.projection_matrix(), before);
    }

    #[test]
    fn translate_keeps_depth_and_orientation() {
        let mut cam = OrthographicCamera::for_viewport(ViewportSize::new(800, 600));
        cam.translate(Vec2::new(-3.0, 2.0));
        assert_eq!(cam.position(), Vec3::new(-3.0, 2.0, 5.0));
        assert_eq!(cam.target() - cam.position(), Vec3::NEG_Z);
    }

    #[test]
    fn origin_projects_to_clip_center() {
        let cam = OrthographicCamera::for_viewport(ViewportSize::new(800, 600));
        let clip = cam.view_projection().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-6);
        assert!(clip.y.abs() < 1e-6);
        // Visible in wgpu's [0, 1] depth range.
        assert!((0.0..=1.0).contains(&clip.z));
    }

    #[test]
    fn right_edge_projects_to_clip_edge() {
        let cam = OrthographicCamera::for_viewport(ViewportSize::new(800, 600));
        let clip = cam.view_projection().project_point3(Vec3::new(400.0, 300.0, 0.0));
        assert!((clip.x - 1.0).abs() < 1e-5);
        assert!((clip.y - 1.0).abs() < 1e-5);
    }
}
