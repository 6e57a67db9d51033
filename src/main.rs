use config::{CameraSource, ClassifierBackend, Config, DisplayBackend};
use device_camera::impl_fake::DeviceCameraFakeProvider;
use device_camera::impl_image_file::DeviceCameraImageFileProvider;
#[cfg(feature = "camera-v4l2")]
use device_camera::impl_v4l2::DeviceCameraV4l2Provider;
use device_camera::interface::DeviceCameraProvider;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::DeviceDisplayGui;
use device_display::interface::DeviceDisplay;
use frame_scheduler::impl_interval::FrameSchedulerInterval;
use image_classifier::impl_fake::ImageClassifierFakeLoader;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnxLoader;
use image_classifier::interface::ImageClassifierLoader;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use session::core::Msg;
use session::main::Session;
use std::sync::{Arc, Mutex};

mod brightness_filter;
mod config;
mod device_camera;
mod device_display;
mod frame_scheduler;
mod image_classifier;
mod library;
mod session;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let camera_provider: Arc<dyn DeviceCameraProvider + Send + Sync> = match &config.camera_source {
        #[cfg(feature = "camera-v4l2")]
        CameraSource::Device(path) => {
            Arc::new(DeviceCameraV4l2Provider::new(logger.clone(), path.clone()))
        }
        #[cfg(not(feature = "camera-v4l2"))]
        CameraSource::Device(path) => {
            return Err(format!(
                "Camera {} needs a build with the camera-v4l2 feature",
                path.display()
            )
            .into())
        }
        CameraSource::TestPattern => Arc::new(DeviceCameraFakeProvider::new(logger.clone())),
        CameraSource::ImageDirectory(directory) => Arc::new(DeviceCameraImageFileProvider::new(
            logger.clone(),
            directory.clone(),
        )),
    };

    let classifier_loader: Arc<dyn ImageClassifierLoader + Send + Sync> =
        match &config.classifier_backend {
            ClassifierBackend::Fake { labels } => Arc::new(ImageClassifierFakeLoader::new(
                logger.clone(),
                labels.clone(),
            )),
            ClassifierBackend::TractOnnx(model_config) => Arc::new(
                ImageClassifierTractOnnxLoader::new(logger.clone(), *model_config),
            ),
        };

    let frame_scheduler = Arc::new(FrameSchedulerInterval::new(config.frame_interval));

    let gui = DeviceDisplayGui::new();
    let device_display: Arc<Mutex<dyn DeviceDisplay + Send>> = match config.display_backend {
        DisplayBackend::Window => Arc::new(Mutex::new(gui.clone())),
        DisplayBackend::Console => Arc::new(Mutex::new(DeviceDisplayConsole::new())),
    };

    let mut session = Session::new(
        config.clone(),
        logger.clone(),
        camera_provider,
        classifier_loader,
        device_display,
        frame_scheduler,
    );

    let start_sender = session.sender();
    let stop_sender = session.sender();
    let teardown_sender = session.sender();

    let session_thread = std::thread::spawn(move || session.run());

    let surface_result: Result<(), Box<dyn std::error::Error + Send + Sync>> = match config.display_backend {
        DisplayBackend::Window => gui
            .run_window(
                &config.window_title,
                config.window_size,
                Box::new(move || {
                    let _ = start_sender.send(Msg::Start);
                }),
                Box::new(move || {
                    let _ = stop_sender.send(Msg::Stop);
                }),
            )
            .map_err(|e| e.to_string().into()),
        DisplayBackend::Console => {
            logger.info("Press Enter to stop")?;
            let _ = start_sender.send(Msg::Start);
            let mut line = String::new();
            let read = std::io::stdin().read_line(&mut line);
            let _ = stop_sender.send(Msg::Stop);
            read.map(|_| ()).map_err(|e| e.into())
        }
    };

    logger.info("Cleaning up")?;
    let _ = teardown_sender.send(Msg::Teardown);
    if session_thread.join().is_err() {
        logger.error("Session thread panicked")?;
    }

    surface_result
}
