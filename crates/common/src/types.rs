use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Viewport dimensions in device-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Half extents as floats, the orthographic bounds of a centered view.
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Scale to device pixels, never collapsing below one pixel per axis.
    pub fn to_physical(&self, pixel_ratio: f64) -> (u32, u32) {
        let w = (self.width as f64 * pixel_ratio).round() as u32;
        let h = (self.height as f64 * pixel_ratio).round() as u32;
        (w.max(1), h.max(1))
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Pointer location in client (screen) space. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset from `origin` to `self`, in client space.
    pub fn delta_from(&self, origin: PointerPosition) -> Vec2 {
        Vec2::new(self.x - origin.x, self.y - origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_extents_of_odd_size() {
        let size = ViewportSize::new(801, 600);
        assert_eq!(size.half_extents(), Vec2::new(400.5, 300.0));
    }

    #[test]
    fn physical_size_applies_ratio() {
        let size = ViewportSize::new(640, 480);
        assert_eq!(size.to_physical(2.0), (1280, 960));
        assert_eq!(ViewportSize::new(0, 0).to_physical(1.0), (1, 1));
    }

    #[test]
    fn pointer_delta() {
        let from = PointerPosition::new(100.0, 100.0);
        let to = PointerPosition::new(130.0, 80.0);
        assert_eq!(to.delta_from(from), Vec2::new(30.0, -20.0));
    }
}
