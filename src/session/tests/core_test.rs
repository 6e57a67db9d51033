#[cfg(test)]
mod tests {
    use crate::frame_scheduler::interface::FrameRequestId;
    use crate::session::core::{
        format_prediction_row, init, transition, Effect, Model, Msg, SessionId, SessionInfo, State,
    };
    use crate::session::error::SessionError;
    use crate::session::tests::fixture::classification;

    fn active(session: u64, frame: Option<u64>) -> Model {
        Model {
            state: State::Active {
                session: SessionId(session),
                max_predictions: 3,
                pending_frame: frame.map(FrameRequestId),
            },
            session_count: session,
            frame_count: frame.unwrap_or(1),
        }
    }

    #[test]
    fn test_init() {
        let (model, effects) = init();

        assert_eq!(model.state, State::Idle);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_start_from_idle_begins_loading() {
        let (model, effects) = transition(Model::default(), Msg::Start);

        assert_eq!(
            model.state,
            State::Loading {
                session: SessionId(1)
            }
        );
        assert_eq!(
            effects,
            vec![Effect::StartSession {
                session: SessionId(1)
            }]
        );
    }

    #[test]
    fn test_start_while_loading_or_active_is_noop() {
        let (loading, _) = transition(Model::default(), Msg::Start);
        let (again, effects) = transition(loading.clone(), Msg::Start);
        assert_eq!(again, loading);
        assert!(effects.is_empty());

        let model = active(1, Some(1));
        let (again, effects) = transition(model.clone(), Msg::Start);
        assert_eq!(again, model);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_start_done_activates_and_requests_first_frame() {
        let (loading, _) = transition(Model::default(), Msg::Start);

        let (model, effects) = transition(
            loading,
            Msg::SessionStartDone {
                session: SessionId(1),
                result: Ok(SessionInfo { max_predictions: 3 }),
            },
        );

        assert_eq!(
            model.state,
            State::Active {
                session: SessionId(1),
                max_predictions: 3,
                pending_frame: Some(FrameRequestId(1)),
            }
        );
        assert_eq!(
            effects,
            vec![
                Effect::PrepareSlots { count: 3 },
                Effect::RequestFrame {
                    frame: FrameRequestId(1)
                },
            ]
        );
    }

    #[test]
    fn test_load_failure_returns_to_idle_with_notification() {
        let (loading, _) = transition(Model::default(), Msg::Start);

        let (model, effects) = transition(
            loading,
            Msg::SessionStartDone {
                session: SessionId(1),
                result: Err(SessionError::LoadFailure("Permission denied".to_string())),
            },
        );

        assert_eq!(model.state, State::Idle);
        match effects.as_slice() {
            [Effect::Notify(notification)] => {
                assert_eq!(notification.title, "Error");
                assert!(notification
                    .description
                    .contains("Failed to initialize camera: Permission denied"));
            }
            _ => panic!("Unexpected effects {:?}", effects),
        }
    }

    #[test]
    fn test_frame_due_runs_tick_only_for_pending_frame() {
        let (model, effects) = transition(
            active(1, Some(1)),
            Msg::FrameDue {
                frame: FrameRequestId(7),
            },
        );
        assert_eq!(model, active(1, Some(1)));
        assert!(effects.is_empty());

        let (model, effects) = transition(
            active(1, Some(1)),
            Msg::FrameDue {
                frame: FrameRequestId(1),
            },
        );
        assert!(matches!(
            model.state,
            State::Active {
                pending_frame: None,
                ..
            }
        ));
        assert_eq!(
            effects,
            vec![Effect::RunTick {
                session: SessionId(1)
            }]
        );
    }

    #[test]
    fn test_tick_done_renders_rows_and_reschedules() {
        let (model, effects) = transition(
            active(1, None),
            Msg::TickDone {
                session: SessionId(1),
                result: Ok(vec![
                    classification("A", 0.9231),
                    classification("B", 0.05),
                    classification("C", 0.0269),
                ]),
            },
        );

        assert_eq!(
            model.state,
            State::Active {
                session: SessionId(1),
                max_predictions: 3,
                pending_frame: Some(FrameRequestId(2)),
            }
        );
        assert_eq!(
            effects,
            vec![
                Effect::RenderPrediction {
                    rows: vec![
                        "A: 92.31%".to_string(),
                        "B: 5.00%".to_string(),
                        "C: 2.69%".to_string(),
                    ]
                },
                Effect::RequestFrame {
                    frame: FrameRequestId(2)
                },
            ]
        );
    }

    #[test]
    fn test_rows_never_exceed_max_predictions() {
        let (_, effects) = transition(
            active(1, None),
            Msg::TickDone {
                session: SessionId(1),
                result: Ok(vec![
                    classification("A", 0.4),
                    classification("B", 0.3),
                    classification("C", 0.2),
                    classification("D", 0.1),
                ]),
            },
        );

        match &effects[0] {
            Effect::RenderPrediction { rows } => assert_eq!(rows.len(), 3),
            effect => panic!("Unexpected effect {:?}", effect),
        }
    }

    #[test]
    fn test_tick_failure_notifies_and_keeps_looping() {
        let (model, effects) = transition(
            active(1, None),
            Msg::TickDone {
                session: SessionId(1),
                result: Err(SessionError::TickFailure("boom".to_string())),
            },
        );

        assert!(matches!(
            model.state,
            State::Active {
                pending_frame: Some(_),
                ..
            }
        ));
        assert!(matches!(&effects[0], Effect::Notify(n) if n.title == "Processing Error"));
        assert!(matches!(effects[1], Effect::RequestFrame { .. }));
    }

    #[test]
    fn test_stop_cancels_pending_frame_and_releases() {
        let (model, effects) = transition(active(1, Some(4)), Msg::Stop);

        assert_eq!(
            model.state,
            State::Stopped {
                session: SessionId(1)
            }
        );
        assert_eq!(
            effects,
            vec![
                Effect::CancelFrame {
                    frame: FrameRequestId(4)
                },
                Effect::ReleaseSession {
                    session: SessionId(1)
                },
            ]
        );
    }

    #[test]
    fn test_results_after_stop_are_discarded() {
        let (stopped, _) = transition(active(1, None), Msg::Stop);

        let (model, effects) = transition(
            stopped.clone(),
            Msg::TickDone {
                session: SessionId(1),
                result: Ok(vec![classification("A", 1.0)]),
            },
        );
        assert_eq!(model, stopped);
        assert!(effects.is_empty());

        let (model, effects) = transition(
            stopped.clone(),
            Msg::FrameDue {
                frame: FrameRequestId(1),
            },
        );
        assert_eq!(model, stopped);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_start_finishing_after_teardown_is_released() {
        let (loading, _) = transition(Model::default(), Msg::Start);
        let (stopped, effects) = transition(loading, Msg::Teardown);
        assert!(effects.is_empty());

        let (model, effects) = transition(
            stopped,
            Msg::SessionStartDone {
                session: SessionId(1),
                result: Ok(SessionInfo { max_predictions: 3 }),
            },
        );

        assert_eq!(
            model.state,
            State::Stopped {
                session: SessionId(1)
            }
        );
        assert_eq!(
            effects,
            vec![Effect::ReleaseSession {
                session: SessionId(1)
            }]
        );
    }

    #[test]
    fn test_restart_after_stop_uses_a_new_session() {
        let (stopped, _) = transition(active(1, Some(1)), Msg::Stop);

        let (model, effects) = transition(stopped, Msg::Start);

        assert_eq!(
            model.state,
            State::Loading {
                session: SessionId(2)
            }
        );
        assert_eq!(
            effects,
            vec![Effect::StartSession {
                session: SessionId(2)
            }]
        );
    }

    #[test]
    fn test_stale_tick_from_previous_session_is_ignored() {
        let (model, effects) = transition(
            active(2, None),
            Msg::TickDone {
                session: SessionId(1),
                result: Ok(vec![classification("A", 1.0)]),
            },
        );

        assert_eq!(model, active(2, None));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_format_prediction_row() {
        assert_eq!(
            format_prediction_row(&classification("Aspirin", 1.0)),
            "Aspirin: 100.00%"
        );
        assert_eq!(format_prediction_row(&classification("Other", 0.0)), "Other: 0.00%");
    }
}
