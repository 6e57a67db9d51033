use crate::brightness_filter::BrightnessFilter;
use crate::config::Config;
use crate::device_camera::interface::{DeviceCamera, DeviceCameraProvider};
use crate::device_display::interface::DeviceDisplay;
use crate::frame_scheduler::interface::FrameScheduler;
use crate::image_classifier::interface::{ImageClassifier, ImageClassifierLoader};
use crate::library::logger::interface::Logger;
use crate::session::core::{init, transition, Effect, Model, Msg, SessionId};
use image::RgbaImage;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Everything one started session holds. Dropped as a unit on release.
pub struct SessionResources {
    pub session: SessionId,
    pub classifier: Box<dyn ImageClassifier + Send>,
    pub camera: Box<dyn DeviceCamera + Send>,
    pub scratch: RgbaImage,
    pub filter: BrightnessFilter,
}

pub struct Session {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub camera_provider: Arc<dyn DeviceCameraProvider + Send + Sync>,
    pub classifier_loader: Arc<dyn ImageClassifierLoader + Send + Sync>,
    pub device_display: Arc<Mutex<dyn DeviceDisplay + Send>>,
    pub frame_scheduler: Arc<dyn FrameScheduler + Send + Sync>,
    pub msg_sender: Sender<Msg>,
    msg_receiver: Receiver<Msg>,
    pub model: Model,
    pub resources: Option<SessionResources>,
}

impl Session {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        camera_provider: Arc<dyn DeviceCameraProvider + Send + Sync>,
        classifier_loader: Arc<dyn ImageClassifierLoader + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send>>,
        frame_scheduler: Arc<dyn FrameScheduler + Send + Sync>,
    ) -> Self {
        let (msg_sender, msg_receiver) = channel();
        let (model, _) = init();

        Self {
            config,
            logger: logger.with_namespace("session"),
            camera_provider,
            classifier_loader,
            device_display,
            frame_scheduler,
            msg_sender,
            msg_receiver,
            model,
            resources: None,
        }
    }

    pub fn sender(&self) -> Sender<Msg> {
        self.msg_sender.clone()
    }

    /// Processes messages until `Msg::Teardown`, then releases whatever the
    /// session still holds.
    pub fn run(&mut self) {
        let (_, effects) = init();
        self.render();
        self.run_effects(effects);

        while let Ok(msg) = self.msg_receiver.recv() {
            let teardown = matches!(msg, Msg::Teardown);
            self.update(msg);
            if teardown {
                break;
            }
        }

        self.release_session();
    }

    /// Processes queued messages, including the ones produced while doing
    /// so, until the queue is empty.
    #[cfg(test)]
    pub fn run_until_idle(&mut self) {
        while let Ok(msg) = self.msg_receiver.try_recv() {
            self.update(msg);
        }
    }

    pub fn send(&self, msg: Msg) {
        let _ = self.msg_sender.send(msg);
    }

    fn update(&mut self, msg: Msg) {
        let _ = self.logger.info(&format!(
            "old state: {:?} msg: {}",
            self.model.state,
            msg.to_display_string()
        ));

        let (model, effects) = transition(self.model.clone(), msg);

        let _ = self.logger.info(&format!(
            "new state: {:?} effects: [{}]",
            model.state,
            effects
                .iter()
                .map(Effect::to_display_string)
                .collect::<Vec<_>>()
                .join(", ")
        ));

        self.model = model;
        self.render();
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.run_effect(effect);
        }
    }
}
