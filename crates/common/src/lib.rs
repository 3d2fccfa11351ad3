//! Shared value types used across the tile viewport crates.

mod types;

pub use types::{PointerPosition, ViewportSize};
