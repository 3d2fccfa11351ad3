use crate::PointerEvent;
use crate::action::Action;
use tileview_common::PointerPosition;

/// World units of camera travel per client pixel of drag.
pub const PAN_SENSITIVITY: f32 = 0.1;

/// Pan gesture tracking.
///
/// `Idle` until a button goes down, then `Dragging` with the last seen pointer
/// position as reference. Release always returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { last: PointerPosition },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    /// Advance the machine by one event, returning the next state and the
    /// resulting action.
    pub fn handle(self, event: PointerEvent, sensitivity: f32) -> (DragState, Action) {
        match (self, event) {
            (_, PointerEvent::Down(pos)) => {
                tracing::debug!(x = pos.x, y = pos.y, "drag started");
                (DragState::Dragging { last: pos }, Action::Noop)
            }
            (DragState::Dragging { last }, PointerEvent::Move(pos)) => {
                let delta = pos.delta_from(last);
                (
                    DragState::Dragging { last: pos },
                    Action::pan_from_drag(delta, sensitivity),
                )
            }
            (DragState::Idle, PointerEvent::Move(_)) => (DragState::Idle, Action::Noop),
            (state, PointerEvent::Up) => {
                if state.is_dragging() {
                    tracing::debug!("drag ended");
                }
                (DragState::Idle, Action::Noop)
            }
        }
    }
}
