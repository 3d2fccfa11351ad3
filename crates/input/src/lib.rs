//! Pointer input mapped to camera actions.
//!
//! # Invariants
//! - Drag state is an owned value: handlers take it and hand back the next one.
//! - Pointer motion while no button is held never produces an action.

pub mod action;
pub mod drag;

pub use action::Action;
pub use drag::{DragState, PAN_SENSITIVITY};

use tileview_common::PointerPosition;

/// Raw pointer input as delivered by the host, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PointerPosition),
    Move(PointerPosition),
    Up,
}
