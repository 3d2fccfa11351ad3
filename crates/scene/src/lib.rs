//! Scene model: the camera, the light and the tile grid.
//!
//! # Invariants
//! - Camera bounds always derive from the current viewport size and are
//!   symmetric about the origin.
//! - The tile grid is centered on the world origin for any row/column count.
//! - Tiles are placed once and never move.

pub mod camera;
pub mod grid;
pub mod light;
pub mod scene;
pub mod texture;

pub use camera::{OrthoBounds, OrthographicCamera};
pub use grid::{GridSpec, Tile, TilePlacement};
pub use light::AmbientLight;
pub use scene::Scene;
pub use texture::{DEFAULT_TILE_TEXTURE, TextureHandle, TextureState};
