use tileview_common::{PointerPosition, ViewportSize};
use tileview_input::{Action, DragState, PAN_SENSITIVITY, PointerEvent};
use tileview_render::{Renderer, RendererFactory};
use tileview_scene::{OrthographicCamera, Scene};

use crate::builder::{BuiltScene, SceneBuilder};
use crate::error::ViewportError;
use crate::frame::{FrameHandle, FrameScheduler};
use crate::ready::ReadinessLatch;

/// Work held back until the host reports it is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Start the render loop and begin accepting pointer input.
    Attach,
}

/// Drives the render loop, keeps the projection in sync with the viewport and
/// turns pointer drags into camera pans.
///
/// Lifecycle: [`create_scene`](Self::create_scene) once, then
/// [`animate`](Self::animate). The host forwards frame, resize and pointer
/// callbacks, and reports readiness through [`host_ready`](Self::host_ready).
/// [`teardown`](Self::teardown) (also run on drop) cancels the pending frame
/// and releases the renderer.
pub struct ViewportController<R: Renderer, S: FrameScheduler> {
    scheduler: S,
    builder: SceneBuilder,
    session: Option<BuiltScene<R>>,
    drag: DragState,
    sensitivity: f32,
    pending_frame: Option<FrameHandle>,
    startup: ReadinessLatch<Deferred>,
    animating: bool,
    input_attached: bool,
}

impl<R: Renderer, S: FrameScheduler> ViewportController<R, S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_builder(scheduler, SceneBuilder::new())
    }

    pub fn with_builder(scheduler: S, builder: SceneBuilder) -> Self {
        Self {
            scheduler,
            builder,
            session: None,
            drag: DragState::Idle,
            sensitivity: PAN_SENSITIVITY,
            pending_frame: None,
            startup: ReadinessLatch::new(),
            animating: false,
            input_attached: false,
        }
    }

    /// Build the scene on `surface`. Must be called exactly once before
    /// [`animate`](Self::animate).
    pub fn create_scene<F>(
        &mut self,
        factory: &F,
        surface: F::Surface,
        size: ViewportSize,
    ) -> Result<(), ViewportError>
    where
        F: RendererFactory<Renderer = R>,
    {
        if self.session.is_some() {
            return Err(ViewportError::SceneAlreadyCreated);
        }
        self.session = Some(self.builder.build(factory, surface, size)?);
        Ok(())
    }

    /// Start rendering and accept input once the host is ready.
    ///
    /// Before [`host_ready`](Self::host_ready) the attachment is queued and
    /// runs on the ready transition; afterwards it runs immediately. Repeated
    /// calls are ignored.
    pub fn animate(&mut self) -> Result<(), ViewportError> {
        if self.session.is_none() {
            return Err(ViewportError::SceneNotCreated);
        }
        if self.animating {
            tracing::debug!("animate called again; ignoring");
            return Ok(());
        }
        self.animating = true;

        match self.startup.run_or_defer(Deferred::Attach) {
            Some(action) => self.run_deferred(action),
            None => tracing::debug!("host not ready; attach deferred"),
        }
        Ok(())
    }

    /// The host finished its initial load. Runs deferred work exactly once.
    pub fn host_ready(&mut self) {
        for action in self.startup.open() {
            self.run_deferred(action);
        }
    }

    pub fn is_host_ready(&self) -> bool {
        self.startup.is_ready()
    }

    fn run_deferred(&mut self, action: Deferred) {
        match action {
            Deferred::Attach => {
                self.input_attached = true;
                self.start();
            }
        }
    }

    /// Begin the frame loop. No-op while a frame is already pending or when
    /// there is nothing to draw.
    pub fn start(&mut self) {
        if self.pending_frame.is_some() {
            return;
        }
        if self.session.is_none() {
            tracing::warn!("render loop not started: no scene");
            return;
        }
        self.pending_frame = Some(self.scheduler.request_frame());
        tracing::info!("render loop started");
    }

    /// Frame callback. Schedules the next frame, then submits this one.
    ///
    /// A callback with no frame pending (cancelled or never requested) does
    /// nothing. A submission error is returned after the next frame has
    /// already been scheduled, so the loop keeps running.
    pub fn on_frame(&mut self) -> Result<(), ViewportError> {
        if self.pending_frame.take().is_none() {
            return Ok(());
        }
        let Some(BuiltScene { renderer, scene }) = self.session.as_mut() else {
            return Ok(());
        };

        self.pending_frame = Some(self.scheduler.request_frame());
        renderer.render(scene, scene.camera())?;
        Ok(())
    }

    /// Cancel the pending frame and release the renderer. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(mut session) = self.session.take() {
            session.renderer.dispose();
            tracing::info!("render loop stopped; renderer released");
        }
    }

    /// Teardown hook. Safe before `create_scene` and safe to repeat.
    ///
    /// Startup work still waiting on [`host_ready`](Self::host_ready) is
    /// dropped along with the session.
    pub fn teardown(&mut self) {
        self.stop();
        let dropped = self.startup.discard_pending();
        if dropped > 0 {
            tracing::debug!(dropped, "deferred startup discarded");
        }
        self.drag = DragState::Idle;
        self.animating = false;
        self.input_attached = false;
    }

    /// Reframe the camera and resize the surface. Unchanged sizes are ignored.
    pub fn on_resize(&mut self, size: ViewportSize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.renderer.size() == size {
            return;
        }
        session.scene.camera_mut().set_viewport(size);
        session.renderer.set_size(size);
        tracing::debug!(width = size.width, height = size.height, "viewport resized");
    }

    /// The host moved to a display with a different pixel density. The
    /// logical size and camera stay as they are; only the surface is resized.
    pub fn on_pixel_ratio(&mut self, ratio: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.renderer.pixel_ratio() == ratio {
            return;
        }
        session.renderer.set_pixel_ratio(ratio);
        tracing::debug!(ratio, "pixel ratio changed");
    }

    /// Feed one pointer event through the drag machine. Ignored until input
    /// is attached by [`animate`](Self::animate).
    pub fn on_pointer(&mut self, event: PointerEvent) {
        if !self.input_attached {
            return;
        }
        let (next, action) = self.drag.handle(event, self.sensitivity);
        self.drag = next;
        self.apply(action);
    }

    pub fn on_pointer_down(&mut self, position: PointerPosition) {
        self.on_pointer(PointerEvent::Down(position));
    }

    pub fn on_pointer_move(&mut self, position: PointerPosition) {
        self.on_pointer(PointerEvent::Move(position));
    }

    pub fn on_pointer_up(&mut self) {
        self.on_pointer(PointerEvent::Up);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Pan(offset) => {
                if let Some(session) = self.session.as_mut() {
                    session.scene.camera_mut().translate(offset);
                }
            }
            Action::Noop => {}
        }
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.session.as_ref().map(|s| &s.scene)
    }

    pub fn camera(&self) -> Option<&OrthographicCamera> {
        self.scene().map(Scene::camera)
    }

    pub fn renderer(&self) -> Option<&R> {
        self.session.as_ref().map(|s| &s.renderer)
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Whether a frame callback is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<R: Renderer, S: FrameScheduler> Drop for ViewportController<R, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
