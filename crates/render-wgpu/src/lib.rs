//! wgpu render backend for the tile viewport.
//!
//! Draws every tile as an instanced, unlit textured quad, batched by texture.
//! Textures decode on worker threads; tiles show a placeholder until then.
//!
//! # Invariants
//! - Renderer never mutates the scene or camera.
//! - A failed texture decode is logged, never fatal.

mod backend;
mod pipeline;
mod shaders;
mod texture;

pub use backend::{WgpuRenderer, WgpuRendererFactory};
