use super::main::{Session, SessionResources};
use crate::device_camera::interface::{CameraConstraints, DeviceCamera};
use crate::image_classifier::interface::Classification;
use crate::session::core::{Effect, Msg, SessionId, SessionInfo};
use crate::session::error::SessionError;
use image::{imageops, RgbaImage};
use std::sync::PoisonError;

fn start_camera(
    camera: &mut dyn DeviceCamera,
    constraints: &CameraConstraints,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    camera.setup(constraints)?;
    camera.play()?;
    Ok(())
}

impl Session {
    pub fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StartSession { session } => {
                let result = self.start_session(session);
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Initialization error: {}", e));
                }
                self.send(Msg::SessionStartDone { session, result });
            }
            Effect::ReleaseSession { session } => {
                if self.resources.as_ref().map(|r| r.session) == Some(session) {
                    self.release_session();
                }
            }
            Effect::PrepareSlots { count } => {
                self.device_display
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .prepare_slots(count);
            }
            Effect::RequestFrame { frame } => {
                let sender = self.sender();
                self.frame_scheduler.request_frame(
                    frame,
                    Box::new(move || {
                        let _ = sender.send(Msg::FrameDue { frame });
                    }),
                );
            }
            Effect::CancelFrame { frame } => {
                self.frame_scheduler.cancel_frame(frame);
            }
            Effect::RunTick { session } => {
                let result = self.run_tick(session);
                if let Err(e) = &result {
                    let _ = self.logger.error(&format!("Loop error: {}", e));
                }
                self.send(Msg::TickDone { session, result });
            }
            Effect::RenderPrediction { rows } => {
                self.render_prediction(&rows);
            }
            Effect::Notify(notification) => {
                self.device_display
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .notify(&notification);
            }
        }
    }

    /// Loads the model, then opens, sets up and plays the camera. On any
    /// failure nothing is left held.
    fn start_session(&mut self, session: SessionId) -> Result<SessionInfo, SessionError> {
        self.release_session();

        let _ = self.logger.info("Loading model...");
        let classifier = self
            .classifier_loader
            .load(&self.config.model_url, &self.config.metadata_url)
            .map_err(SessionError::load)?;
        let max_predictions = classifier.total_classes();
        let _ = self.logger.info("Model loaded successfully");

        let mut camera = self
            .camera_provider
            .open(
                self.config.frame_width,
                self.config.frame_height,
                self.config.flip,
            )
            .map_err(SessionError::load)?;

        if let Err(e) = start_camera(camera.as_mut(), &self.config.camera_constraints) {
            if let Err(stop_error) = camera.stop() {
                let _ = self
                    .logger
                    .error(&format!("Failed to stop camera: {}", stop_error));
            }
            return Err(SessionError::load(e));
        }
        let _ = self.logger.info("Webcam playing");

        self.resources = Some(SessionResources {
            session,
            classifier,
            camera,
            scratch: RgbaImage::new(self.config.frame_width, self.config.frame_height),
            filter: self.config.brightness,
        });

        Ok(SessionInfo { max_predictions })
    }

    /// One capture, filter and predict cycle on the live session.
    fn run_tick(&mut self, session: SessionId) -> Result<Vec<Classification>, SessionError> {
        let resources = match self.resources.as_mut() {
            Some(resources) if resources.session == session => resources,
            _ => return Err(SessionError::tick("no live session")),
        };

        resources.camera.update().map_err(SessionError::tick)?;

        let canvas = resources.camera.canvas();
        self.device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .show_preview(canvas);

        imageops::replace(&mut resources.scratch, canvas, 0, 0);
        resources.filter.apply(&mut resources.scratch);

        resources
            .classifier
            .predict(&resources.scratch)
            .map_err(SessionError::tick)
    }

    /// Stops the camera and drops the session's handles, if any.
    pub fn release_session(&mut self) {
        if let Some(mut resources) = self.resources.take() {
            if let Err(e) = resources.camera.stop() {
                let _ = self.logger.error(&format!("Failed to stop camera: {}", e));
            }
            let _ = self
                .logger
                .info(&format!("Released session {:?}", resources.session));
        }
    }
}
