/// Identifies one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host primitive for next-frame callbacks.
///
/// A requested frame is delivered by the host calling
/// [`ViewportController::on_frame`](crate::ViewportController::on_frame).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a requested frame. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Scheduler for hosts that pump frames themselves (CLI, tests).
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a requested frame is waiting to be delivered.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total frames requested so far.
    pub fn requested(&self) -> u64 {
        self.next_id
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_tracks_pending() {
        let mut s = ManualScheduler::new();
        assert!(!s.is_pending());
        let a = s.request_frame();
        let b = s.request_frame();
        assert_ne!(a, b);
        assert_eq!(s.requested(), 2);

        s.cancel_frame(a);
        assert!(s.is_pending());
        assert_eq!(s.cancelled(), 0);

        s.cancel_frame(b);
        assert!(!s.is_pending());
        s.cancel_frame(b);
        assert_eq!(s.cancelled(), 1);
    }
}
