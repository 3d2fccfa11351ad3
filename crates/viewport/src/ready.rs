/// One-time readiness gate.
///
/// While pending, actions are queued. Opening the latch hands the queue back
/// exactly once; from then on actions run immediately.
#[derive(Debug)]
pub enum ReadinessLatch<T> {
    Pending(Vec<T>),
    Ready,
}

impl<T> ReadinessLatch<T> {
    pub fn new() -> Self {
        ReadinessLatch::Pending(Vec::new())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ReadinessLatch::Ready)
    }

    /// Hand `action` back if it may run now, otherwise queue it.
    pub fn run_or_defer(&mut self, action: T) -> Option<T> {
        match self {
            ReadinessLatch::Ready => Some(action),
            ReadinessLatch::Pending(queue) => {
                queue.push(action);
                None
            }
        }
    }

    /// Mark ready and take the queued actions. Later calls return nothing.
    pub fn open(&mut self) -> Vec<T> {
        match std::mem::replace(self, ReadinessLatch::Ready) {
            ReadinessLatch::Pending(queue) => queue,
            ReadinessLatch::Ready => Vec::new(),
        }
    }
}

impl<T> ReadinessLatch<T> {
    /// Drop queued actions without running them. Readiness itself is kept.
    pub fn discard_pending(&mut self) -> usize {
        match self {
            ReadinessLatch::Pending(queue) => {
                let dropped = queue.len();
                queue.clear();
                dropped
            }
            ReadinessLatch::Ready => 0,
        }
    }
}

impl<T> Default for ReadinessLatch<T> {
    fn default() -> Self {
        Self::new()
    }
}
