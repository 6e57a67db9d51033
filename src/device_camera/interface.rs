use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    User,
    #[default]
    Environment,
}

impl FacingMode {
    pub fn parse(value: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" | "front" => Ok(FacingMode::User),
            "environment" | "back" => Ok(FacingMode::Environment),
            other => Err(format!("Unknown facing mode '{}'", other).into()),
        }
    }
}

/// Capture hints handed to the camera on setup. Devices apply what they can.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing_mode: FacingMode,
    pub exposure_compensation: Option<f32>,
    pub min_brightness: Option<u32>,
    pub ideal_brightness: Option<u32>,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 400,
            ideal_height: 400,
            facing_mode: FacingMode::Environment,
            exposure_compensation: Some(2.0),
            min_brightness: Some(100),
            ideal_brightness: Some(200),
        }
    }
}

/// A live camera stream. `update` pulls the newest frame into the canvas.
pub trait DeviceCamera {
    fn setup(
        &mut self,
        constraints: &CameraConstraints,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn play(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn update(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn canvas(&self) -> &RgbaImage;
    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

pub trait DeviceCameraProvider {
    fn open(
        &self,
        width: u32,
        height: u32,
        flip: bool,
    ) -> Result<Box<dyn DeviceCamera + Send>, Box<dyn std::error::Error + Send + Sync>>;
}
