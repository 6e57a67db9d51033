use crate::device_display::interface::{Notification, SessionStatus};
use crate::frame_scheduler::interface::FrameRequestId;
use crate::image_classifier::interface::Classification;
use crate::session::error::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    pub max_predictions: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    Loading {
        session: SessionId,
    },
    Active {
        session: SessionId,
        max_predictions: usize,
        /// `Some` while waiting for a frame, `None` while a tick runs.
        pending_frame: Option<FrameRequestId>,
    },
    Stopped {
        session: SessionId,
    },
}

impl State {
    pub fn status(&self) -> SessionStatus {
        match self {
            State::Idle => SessionStatus::Idle,
            State::Loading { .. } => SessionStatus::Loading,
            State::Active { .. } => SessionStatus::Active,
            State::Stopped { .. } => SessionStatus::Stopped,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Model {
    pub state: State,
    pub session_count: u64,
    pub frame_count: u64,
}

impl Model {
    fn next_session(&mut self) -> SessionId {
        self.session_count += 1;
        SessionId(self.session_count)
    }

    fn next_frame(&mut self) -> FrameRequestId {
        self.frame_count += 1;
        FrameRequestId(self.frame_count)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Start,
    Stop,
    /// The window is going away: stop and let the runtime exit.
    Teardown,
    SessionStartDone {
        session: SessionId,
        result: Result<SessionInfo, SessionError>,
    },
    FrameDue {
        frame: FrameRequestId,
    },
    TickDone {
        session: SessionId,
        result: Result<Vec<Classification>, SessionError>,
    },
}

impl Msg {
    pub fn to_display_string(&self) -> String {
        match self {
            Msg::TickDone {
                session,
                result: Ok(prediction),
            } => format!("TickDone {{ session: {:?}, classes: {} }}", session, prediction.len()),
            msg => format!("{:?}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartSession { session: SessionId },
    ReleaseSession { session: SessionId },
    PrepareSlots { count: usize },
    RequestFrame { frame: FrameRequestId },
    CancelFrame { frame: FrameRequestId },
    RunTick { session: SessionId },
    RenderPrediction { rows: Vec<String> },
    Notify(Notification),
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::RenderPrediction { rows } => format!("RenderPrediction {{ rows: {} }}", rows.len()),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn format_prediction_row(classification: &Classification) -> String {
    format!(
        "{}: {:.2}%",
        classification.class_name,
        classification.probability * 100.0
    )
}

pub fn load_failure_notification(error: &SessionError) -> Notification {
    let reason = match error {
        SessionError::LoadFailure(reason) | SessionError::TickFailure(reason) => reason,
    };
    Notification {
        title: "Error".to_string(),
        description: format!(
            "Failed to initialize camera: {}. Please ensure camera permissions are granted and try again.",
            reason
        ),
    }
}

pub fn tick_failure_notification() -> Notification {
    Notification {
        title: "Processing Error".to_string(),
        description: "An error occurred while processing the video feed. Trying to recover..."
            .to_string(),
    }
}

pub fn init() -> (Model, Vec<Effect>) {
    (Model::default(), vec![])
}

pub fn transition(mut model: Model, msg: Msg) -> (Model, Vec<Effect>) {
    match (model.state.clone(), msg) {
        // Starting
        (State::Idle | State::Stopped { .. }, Msg::Start) => {
            let session = model.next_session();
            model.state = State::Loading { session };
            (model, vec![Effect::StartSession { session }])
        }
        (State::Loading { .. } | State::Active { .. }, Msg::Start) => (model, vec![]),

        (
            State::Loading { session },
            Msg::SessionStartDone {
                session: done,
                result,
            },
        ) if session == done => match result {
            Ok(info) => {
                let frame = model.next_frame();
                model.state = State::Active {
                    session,
                    max_predictions: info.max_predictions,
                    pending_frame: Some(frame),
                };
                (
                    model,
                    vec![
                        Effect::PrepareSlots {
                            count: info.max_predictions,
                        },
                        Effect::RequestFrame { frame },
                    ],
                )
            }
            Err(error) => {
                model.state = State::Idle;
                (model, vec![Effect::Notify(load_failure_notification(&error))])
            }
        },
        // A start that finished after its session was abandoned.
        (_, Msg::SessionStartDone { session, result }) => match result {
            Ok(_) => (model, vec![Effect::ReleaseSession { session }]),
            Err(_) => (model, vec![]),
        },

        // Main loop
        (
            State::Active {
                session,
                max_predictions,
                pending_frame: Some(pending),
            },
            Msg::FrameDue { frame },
        ) if pending == frame => {
            model.state = State::Active {
                session,
                max_predictions,
                pending_frame: None,
            };
            (model, vec![Effect::RunTick { session }])
        }
        (_, Msg::FrameDue { .. }) => (model, vec![]),

        (
            State::Active {
                session,
                max_predictions,
                pending_frame: None,
            },
            Msg::TickDone {
                session: done,
                result,
            },
        ) if session == done => {
            let frame = model.next_frame();
            model.state = State::Active {
                session,
                max_predictions,
                pending_frame: Some(frame),
            };
            let first = match result {
                Ok(prediction) => Effect::RenderPrediction {
                    rows: prediction
                        .iter()
                        .take(max_predictions)
                        .map(format_prediction_row)
                        .collect(),
                },
                Err(_) => Effect::Notify(tick_failure_notification()),
            };
            (model, vec![first, Effect::RequestFrame { frame }])
        }
        (_, Msg::TickDone { .. }) => (model, vec![]),

        // Stopping
        (
            State::Active {
                session,
                pending_frame,
                ..
            },
            Msg::Stop | Msg::Teardown,
        ) => {
            model.state = State::Stopped { session };
            let mut effects = vec![];
            if let Some(frame) = pending_frame {
                effects.push(Effect::CancelFrame { frame });
            }
            effects.push(Effect::ReleaseSession { session });
            (model, effects)
        }
        (State::Loading { session }, Msg::Stop | Msg::Teardown) => {
            model.state = State::Stopped { session };
            (model, vec![])
        }
        (State::Idle | State::Stopped { .. }, Msg::Stop | Msg::Teardown) => (model, vec![]),
    }
}
