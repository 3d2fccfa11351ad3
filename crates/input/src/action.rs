use glam::Vec2;

/// What the viewport should do in response to input.
///
/// The controller consumes actions, never raw pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Translate the camera by a world-space offset.
    Pan(Vec2),
    /// Nothing to do.
    Noop,
}

impl Action {
    /// World-space camera offset for a client-space pointer delta.
    ///
    /// Dragging right moves the camera left so the content follows the
    /// pointer. Client Y grows downward while world Y grows upward, so the
    /// vertical term keeps the delta's sign.
    pub fn pan_from_drag(delta: Vec2, sensitivity: f32) -> Self {
        Action::Pan(Vec2::new(-delta.x * sensitivity, delta.y * sensitivity))
    }
}
