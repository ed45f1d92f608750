//! Platform abstraction layer
//!
//! The host owns the per-frame callback primitive (requestAnimationFrame in a
//! browser, a vsync'd event loop natively). The fixed-step loop only needs to
//! ask for the next frame and to cancel a pending request.

/// Handle for a requested frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host-side per-frame scheduling primitive
pub trait FrameScheduler {
    /// Ask for one callback on the next frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a callback that has not fired yet
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Frame scheduler for headless hosts and tests.
///
/// Frames fire only when the host calls `FixedLoop::frame`; this just tracks
/// which request is outstanding.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    pending: Option<FrameHandle>,
    cancelled: u64,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Number of requests cancelled so far
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrames {
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
