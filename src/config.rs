use crate::brightness_filter::BrightnessFilter;
use crate::device_camera::interface::{CameraConstraints, FacingMode};
use crate::image_classifier::models::model_config::{ModelConfig, PixelNormalization, TensorLayout};
use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum CameraSource {
    /// A V4L2 capture device such as `/dev/video0`.
    Device(PathBuf),
    /// Synthetic moving gradient.
    TestPattern,
    /// Replays the png/jpeg files of a directory.
    ImageDirectory(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    Fake { labels: Vec<String> },
    TractOnnx(ModelConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayBackend {
    Window,
    /// Headless: starts immediately and prints rows until Enter is pressed.
    Console,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model_url: String,
    pub metadata_url: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub flip: bool,
    pub camera_constraints: CameraConstraints,
    pub brightness: BrightnessFilter,
    pub frame_interval: Duration,
    pub camera_source: CameraSource,
    pub classifier_backend: ClassifierBackend,
    pub display_backend: DisplayBackend,
    pub window_title: String,
    pub window_size: [f32; 2],
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_url: "./model/model.onnx".to_string(),
            metadata_url: "./model/metadata.json".to_string(),
            frame_width: 400,
            frame_height: 400,
            flip: true,
            camera_constraints: CameraConstraints {
                ideal_width: 400,
                ideal_height: 400,
                ..CameraConstraints::default()
            },
            brightness: BrightnessFilter::STRONG,
            frame_interval: Duration::from_millis(16),
            camera_source: default_camera_source(),
            classifier_backend: ClassifierBackend::TractOnnx(ModelConfig::default()),
            display_backend: DisplayBackend::Window,
            window_title: "Medication Identifier".to_string(),
            window_size: [960.0, 540.0],
            logger_timezone: utc(),
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}

#[cfg(feature = "camera-v4l2")]
fn default_camera_source() -> CameraSource {
    CameraSource::Device(PathBuf::from("/dev/video0"))
}

#[cfg(not(feature = "camera-v4l2"))]
fn default_camera_source() -> CameraSource {
    CameraSource::TestPattern
}

impl Config {
    /// Defaults overridden by `MEDICATION_IDENTIFIER_*` environment variables.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut config = Config::default();

        if let Some(model_dir) = lookup("MEDICATION_IDENTIFIER_MODEL_DIR") {
            let model_dir = PathBuf::from(model_dir);
            config.model_url = model_dir.join("model.onnx").to_string_lossy().into_owned();
            config.metadata_url = model_dir
                .join("metadata.json")
                .to_string_lossy()
                .into_owned();
        }

        if let Some(device) = lookup("MEDICATION_IDENTIFIER_CAMERA_DEVICE") {
            config.camera_source = CameraSource::Device(PathBuf::from(device));
        }
        if let Some(camera_dir) = lookup("MEDICATION_IDENTIFIER_CAMERA_DIR") {
            config.camera_source = CameraSource::ImageDirectory(PathBuf::from(camera_dir));
        }
        if lookup("MEDICATION_IDENTIFIER_TEST_PATTERN").is_some_and(|v| v == "1" || v == "true") {
            config.camera_source = CameraSource::TestPattern;
        }
        if let Some(facing_mode) = lookup("MEDICATION_IDENTIFIER_FACING_MODE") {
            config.camera_constraints.facing_mode = FacingMode::parse(&facing_mode)?;
        }

        if let Some(brightness) = lookup("MEDICATION_IDENTIFIER_BRIGHTNESS") {
            config.brightness = BrightnessFilter::parse(&brightness)?;
        }

        let mut model_config = ModelConfig::default();
        if let Some(layout) = lookup("MEDICATION_IDENTIFIER_TENSOR_LAYOUT") {
            model_config.layout = TensorLayout::parse(&layout)?;
        }
        if let Some(range) = lookup("MEDICATION_IDENTIFIER_PIXEL_RANGE") {
            model_config.normalization = PixelNormalization::parse(&range)?;
        }
        config.classifier_backend = ClassifierBackend::TractOnnx(model_config);

        if let Some(labels) = lookup("MEDICATION_IDENTIFIER_FAKE_LABELS") {
            let labels: Vec<String> = labels
                .split(',')
                .map(|label| label.trim().to_string())
                .filter(|label| !label.is_empty())
                .collect();
            config.classifier_backend = ClassifierBackend::Fake { labels };
        }
        if lookup("MEDICATION_IDENTIFIER_HEADLESS").is_some_and(|v| v == "1" || v == "true") {
            config.display_backend = DisplayBackend::Console;
        }

        Ok(config)
    }
}
