use glam::Vec3;

/// Uniform ambient light. Unlit tile materials ignore it; it is part of the
/// scene so lit backends can use it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    /// Packed `0xRRGGBB` color.
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
}

impl AmbientLight {
    pub fn new(color: u32) -> Self {
        Self {
            color,
            intensity: 1.0,
            position: Vec3::ZERO,
        }
    }

    /// Linear RGB scaled by intensity.
    pub fn rgb(&self) -> [f32; 3] {
        let channel = |shift: u32| ((self.color >> shift) & 0xff) as f32 / 255.0 * self.intensity;
        [channel(16), channel(8), channel(0)]
    }
}

impl Default for AmbientLight {
    /// Soft white light above the tile plane.
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            ..Self::new(0x404040)
        }
    }
}
