//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene and camera; they never mutate them.
//! - A renderer is attached to exactly one surface for its whole life.
//!
//! The trait is the seam between the viewport controller and a concrete
//! backend. [`DebugTextRenderer`] is a headless implementation used by the CLI
//! and tests; the GPU backend lives in `tileview-render-wgpu`.

mod renderer;

pub use renderer::{
    DebugRendererFactory, DebugTextRenderer, HeadlessSurface, RenderError, Renderer,
    RendererFactory, RendererOptions,
};
