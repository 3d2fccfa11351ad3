use tileview_common::{PointerPosition, ViewportSize};
use tileview_render::{DebugRendererFactory, DebugTextRenderer, HeadlessSurface};
use tileview_viewport::{ManualScheduler, ViewportController, ViewportError};

fn session(size: ViewportSize) -> ViewportController<DebugTextRenderer, ManualScheduler> {
    let mut ctl = ViewportController::new(ManualScheduler::new());
    ctl.create_scene(&DebugRendererFactory, HeadlessSurface::Attached, size)
        .expect("headless surface attaches");
    ctl
}

#[test]
fn headless_session_renders_frames() {
    let mut ctl = session(ViewportSize::new(800, 600));
    ctl.animate().unwrap();
    assert!(!ctl.scheduler().is_pending());

    ctl.host_ready();
    assert!(ctl.scheduler().is_pending());

    for _ in 0..3 {
        ctl.on_frame().unwrap();
    }
    let renderer = ctl.renderer().unwrap();
    assert_eq!(renderer.frames(), 3);
    assert!(renderer.last_frame().contains("Tiles: 400"));
    assert_eq!(ctl.scheduler().requested(), 4);
}

#[test]
fn drag_then_resize_then_render() {
    let mut ctl = session(ViewportSize::new(800, 600));
    ctl.host_ready();
    ctl.animate().unwrap();

    ctl.on_pointer_down(PointerPosition::new(100.0, 100.0));
    ctl.on_pointer_move(PointerPosition::new(130.0, 80.0));
    ctl.on_pointer_up();
    ctl.on_resize(ViewportSize::new(400, 300));
    ctl.on_frame().unwrap();

    let frame = ctl.renderer().unwrap().last_frame().to_owned();
    assert!(frame.contains("(400x300)"), "{frame}");
    assert!(frame.contains("pos=(-3.0, -2.0, 5.0)"), "{frame}");
    assert!(frame.contains("bounds=[-200.0, 200.0, 150.0, -150.0]"), "{frame}");
}

#[test]
fn teardown_cancels_pending_frame() {
    let mut ctl = session(ViewportSize::default());
    ctl.host_ready();
    ctl.animate().unwrap();
    assert!(ctl.is_running());

    ctl.teardown();
    assert!(!ctl.is_running());
    assert!(!ctl.scheduler().is_pending());
    assert_eq!(ctl.scheduler().cancelled(), 1);
    assert!(ctl.renderer().is_none());

    ctl.teardown();
    assert!(matches!(ctl.animate(), Err(ViewportError::SceneNotCreated)));
}
