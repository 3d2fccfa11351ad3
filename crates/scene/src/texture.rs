use serde::{Deserialize, Serialize};

/// Image shared by every tile unless the host overrides it.
pub const DEFAULT_TILE_TEXTURE: &str = "assets/soil.png";

/// Opaque reference to a texture owned by the rendering backend.
///
/// Handles are cheap to copy; many materials may point at one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// Load progress of a texture. A pending or failed texture is not an error:
/// the backend substitutes a placeholder until (unless) the image arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextureState {
    Pending,
    Ready,
    Failed,
}

impl TextureState {
    pub fn is_ready(&self) -> bool {
        matches!(self, TextureState::Ready)
    }
}
