use tileview_render::RenderError;

/// Errors from the viewport controller.
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    /// The renderer could not attach to the surface. No scene was built.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("scene already created")]
    SceneAlreadyCreated,
    #[error("scene not created")]
    SceneNotCreated,
    #[error("render error: {0}")]
    Render(RenderError),
}

impl From<RenderError> for ViewportError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::SurfaceUnavailable(reason) => ViewportError::SurfaceUnavailable(reason),
            other => ViewportError::Render(other),
        }
    }
}
