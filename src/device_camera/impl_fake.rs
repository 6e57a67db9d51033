use crate::device_camera::interface::{CameraConstraints, DeviceCamera, DeviceCameraProvider};
use crate::library::logger::interface::Logger;
use image::{imageops, Rgba, RgbaImage};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Ready,
    Playing,
    Stopped,
}

/// Synthetic camera drawing a moving gradient test pattern.
pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    canvas: RgbaImage,
    flip: bool,
    phase: Phase,
    frame_count: u32,
}

impl DeviceCameraFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, width: u32, height: u32, flip: bool) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            canvas: RgbaImage::new(width, height),
            flip,
            phase: Phase::Created,
            frame_count: 0,
        }
    }

    fn draw_test_pattern(&mut self) {
        let shift = self.frame_count;
        let (width, height) = self.canvas.dimensions();
        let (width, height) = (width.max(1), height.max(1));
        for (x, y, pixel) in self.canvas.enumerate_pixels_mut() {
            let r = (x.wrapping_add(shift) % width * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            let b = (shift % 256) as u8;
            *pixel = Rgba([r, g, b, 255]);
        }
        if self.flip {
            imageops::flip_horizontal_in_place(&mut self.canvas);
        }
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn setup(
        &mut self,
        constraints: &CameraConstraints,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if constraints.ideal_width == 0 || constraints.ideal_height == 0 {
            return Err("Camera constraints require a non-zero resolution".into());
        }
        self.logger.info(&format!(
            "Setting up camera {}x{} facing {:?}",
            constraints.ideal_width, constraints.ideal_height, constraints.facing_mode
        ))?;
        self.phase = Phase::Ready;
        Ok(())
    }

    fn play(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.phase != Phase::Ready {
            return Err("Camera must be set up before playing".into());
        }
        self.phase = Phase::Playing;
        self.logger.info("Camera playing")?;
        Ok(())
    }

    fn update(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.phase != Phase::Playing {
            return Err("Camera is not playing".into());
        }
        self.frame_count = self.frame_count.wrapping_add(1);
        self.draw_test_pattern();
        Ok(())
    }

    fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.phase != Phase::Stopped {
            self.phase = Phase::Stopped;
            self.logger.info("Camera stopped")?;
        }
        Ok(())
    }
}

pub struct DeviceCameraFakeProvider {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFakeProvider {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self { logger }
    }
}

impl DeviceCameraProvider for DeviceCameraFakeProvider {
    fn open(
        &self,
        width: u32,
        height: u32,
        flip: bool,
    ) -> Result<Box<dyn DeviceCamera + Send>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Box::new(DeviceCameraFake::new(
            self.logger.clone(),
            width,
            height,
            flip,
        )))
    }
}
