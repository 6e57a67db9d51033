use crate::frame_scheduler::interface::{FrameCallback, FrameRequestId, FrameScheduler};
use std::sync::Mutex;

#[derive(Default)]
struct FakeState {
    requested: Vec<FrameRequestId>,
    cancelled: Vec<FrameRequestId>,
    pending: Vec<(FrameRequestId, FrameCallback)>,
}

/// Records frame requests; frames fire only when a test calls `fire_pending`.
#[derive(Default)]
pub struct FrameSchedulerFake {
    state: Mutex<FakeState>,
}

impl FrameSchedulerFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> Vec<FrameRequestId> {
        self.state.lock().unwrap().requested.clone()
    }

    pub fn cancelled(&self) -> Vec<FrameRequestId> {
        self.state.lock().unwrap().cancelled.clone()
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    /// Fires every pending request, returning how many fired.
    pub fn fire_pending(&self) -> usize {
        let pending: Vec<_> = self.state.lock().unwrap().pending.drain(..).collect();
        let count = pending.len();
        for (_, on_frame) in pending {
            on_frame();
        }
        count
    }
}

impl FrameScheduler for FrameSchedulerFake {
    fn request_frame(&self, frame: FrameRequestId, on_frame: FrameCallback) {
        let mut state = self.state.lock().unwrap();
        state.requested.push(frame);
        state.pending.push((frame, on_frame));
    }

    fn cancel_frame(&self, frame: FrameRequestId) {
        let mut state = self.state.lock().unwrap();
        state.cancelled.push(frame);
        state.pending.retain(|(pending, _)| *pending != frame);
    }
}
