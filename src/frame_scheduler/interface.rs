#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(pub u64);

pub type FrameCallback = Box<dyn FnOnce() + Send>;

/// The host's per-frame callback mechanism. A request fires at most once;
/// a cancelled request never fires.
pub trait FrameScheduler {
    fn request_frame(&self, frame: FrameRequestId, on_frame: FrameCallback);
    fn cancel_frame(&self, frame: FrameRequestId);
}
