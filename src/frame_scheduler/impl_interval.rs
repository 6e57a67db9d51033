use crate::frame_scheduler::interface::{FrameCallback, FrameRequestId, FrameScheduler};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Mutex;
use std::time::{Duration, Instant};

enum Request {
    Frame {
        frame: FrameRequestId,
        on_frame: FrameCallback,
    },
    Cancel {
        frame: FrameRequestId,
    },
}

struct Pending {
    frame: FrameRequestId,
    due: Instant,
    on_frame: FrameCallback,
}

/// Fires each requested frame `interval` after it was requested, from a
/// single timer thread. The thread exits once the scheduler is dropped.
pub struct FrameSchedulerInterval {
    request_sender: Mutex<Sender<Request>>,
}

impl FrameSchedulerInterval {
    pub fn new(interval: Duration) -> Self {
        let (request_sender, request_receiver) = channel::<Request>();

        std::thread::spawn(move || {
            let mut pending: Vec<Pending> = Vec::new();

            loop {
                let next_due = pending.iter().map(|p| p.due).min();
                let request = match next_due {
                    None => request_receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    Some(due) => {
                        request_receiver.recv_timeout(due.saturating_duration_since(Instant::now()))
                    }
                };

                match request {
                    Ok(Request::Frame { frame, on_frame }) => pending.push(Pending {
                        frame,
                        due: Instant::now() + interval,
                        on_frame,
                    }),
                    Ok(Request::Cancel { frame }) => pending.retain(|p| p.frame != frame),
                    Err(RecvTimeoutError::Timeout) => {
                        let now = Instant::now();
                        let (due, waiting): (Vec<Pending>, Vec<Pending>) =
                            pending.drain(..).partition(|p| p.due <= now);
                        pending = waiting;
                        for p in due {
                            (p.on_frame)();
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        Self {
            request_sender: Mutex::new(request_sender),
        }
    }

    fn send(&self, request: Request) {
        let sender = self
            .request_sender
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let _ = sender.send(request);
    }
}

impl FrameScheduler for FrameSchedulerInterval {
    fn request_frame(&self, frame: FrameRequestId, on_frame: FrameCallback) {
        self.send(Request::Frame { frame, on_frame });
    }

    fn cancel_frame(&self, frame: FrameRequestId) {
        self.send(Request::Cancel { frame });
    }
}
