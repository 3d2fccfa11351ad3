//! Viewport core: builds the tile scene and drives it.
//!
//! # Invariants
//! - The camera is mutated by exactly two handlers: resize (bounds) and
//!   pointer drag (position). The render loop only reads it.
//! - Each frame callback schedules its successor before submitting work.
//! - After teardown no frame callback is pending and the renderer is released.
//!
//! Everything here runs on one thread. Hosts with real parallelism must funnel
//! input, resize and frame callbacks through a single owner.

mod builder;
mod controller;
mod error;
mod frame;
mod ready;

pub use builder::{BuiltScene, SceneBuilder};
pub use controller::ViewportController;
pub use error::ViewportError;
pub use frame::{FrameHandle, FrameScheduler, ManualScheduler};
pub use ready::ReadinessLatch;
