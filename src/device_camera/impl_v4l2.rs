use crate::device_camera::interface::{CameraConstraints, DeviceCamera, DeviceCameraProvider};
use crate::device_camera::v4l2_frame::{
    brightness_value, decode_frame, exposure_bias_value, fit_canvas, FrameLayout, PixelFormat,
    RawFrame, CID_AUTO_EXPOSURE_BIAS, CID_BRIGHTNESS,
};
use crate::library::logger::interface::Logger;
use image::RgbaImage;
use std::path::PathBuf;
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use v4l::buffer::Type;
use v4l::control::{Control, Value};
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

const BUFFER_COUNT: u32 = 4;
const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

type FrameResult = Result<RawFrame, String>;

/// A V4L2 webcam. Frames are captured on a background thread and `update`
/// takes the newest one.
pub struct DeviceCameraV4l2 {
    logger: Arc<dyn Logger + Send + Sync>,
    path: PathBuf,
    canvas: RgbaImage,
    flip: bool,
    device: Option<Device>,
    layout: Option<FrameLayout>,
    receiver: Option<Receiver<FrameResult>>,
    capture_thread: Option<JoinHandle<()>>,
}

impl DeviceCameraV4l2 {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        path: PathBuf,
        width: u32,
        height: u32,
        flip: bool,
    ) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("v4l2"),
            path,
            canvas: RgbaImage::new(width, height),
            flip,
            device: None,
            layout: None,
            receiver: None,
            capture_thread: None,
        }
    }

    fn apply_controls(&self, device: &Device, constraints: &CameraConstraints) {
        let descriptions = match device.query_controls() {
            Ok(descriptions) => descriptions,
            Err(e) => {
                let _ = self.logger.error(&format!("Failed to query controls: {}", e));
                return;
            }
        };

        for description in &descriptions {
            let value = match description.id {
                CID_BRIGHTNESS => {
                    brightness_value(constraints, description.minimum, description.maximum)
                }
                CID_AUTO_EXPOSURE_BIAS => {
                    exposure_bias_value(constraints, description.minimum, description.maximum)
                }
                _ => None,
            };
            let Some(value) = value else {
                continue;
            };

            let control = Control {
                id: description.id,
                value: Value::Integer(value),
            };
            match device.set_control(control) {
                Ok(()) => {
                    let _ = self
                        .logger
                        .info(&format!("Set {} to {}", description.name, value));
                }
                Err(e) => {
                    let _ = self
                        .logger
                        .error(&format!("Failed to set {}: {}", description.name, e));
                }
            }
        }
    }
}

fn capture_loop(device: Device, layout: FrameLayout, sender: std::sync::mpsc::SyncSender<FrameResult>) {
    let mut stream = match MmapStream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = sender.send(Err(format!("Failed to start stream: {}", e)));
            return;
        }
    };

    loop {
        let frame = match CaptureStream::next(&mut stream) {
            Ok((data, metadata)) => {
                let used = match metadata.bytesused as usize {
                    0 => data.len(),
                    used => used.min(data.len()),
                };
                Ok(RawFrame {
                    layout,
                    data: data[..used].to_vec(),
                })
            }
            Err(e) => Err(format!("Capture failed: {}", e)),
        };

        let failed = frame.is_err();
        if sender.send(frame).is_err() || failed {
            break;
        }
    }
}

impl DeviceCamera for DeviceCameraV4l2 {
    fn setup(
        &mut self,
        constraints: &CameraConstraints,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let device = Device::with_path(&self.path)
            .map_err(|e| format!("Failed to open {}: {}", self.path.display(), e))?;

        let mut format = device.format()?;
        format.width = constraints.ideal_width;
        format.height = constraints.ideal_height;
        format.fourcc = FourCC::new(b"YUYV");
        let format = device.set_format(&format)?;

        let pixel_format = PixelFormat::from_fourcc(&format.fourcc.repr)
            .ok_or_else(|| format!("Unsupported pixel format {}", format.fourcc))?;
        let layout = FrameLayout {
            format: pixel_format,
            width: format.width,
            height: format.height,
            stride: format.stride,
        };

        // V4L2 exposes no facing direction; the device path decides.
        self.logger.info(&format!(
            "Opened {} at {}x{} {:?} (facing {:?})",
            self.path.display(),
            layout.width,
            layout.height,
            layout.format,
            constraints.facing_mode
        ))?;
        self.apply_controls(&device, constraints);

        self.device = Some(device);
        self.layout = Some(layout);
        Ok(())
    }

    fn play(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let layout = self
            .layout
            .ok_or("Camera must be set up before playing")?;
        let device = self
            .device
            .take()
            .ok_or("Camera must be set up before playing")?;

        let (sender, receiver) = sync_channel(1);
        let handle = std::thread::spawn(move || capture_loop(device, layout, sender));

        self.receiver = Some(receiver);
        self.capture_thread = Some(handle);
        Ok(())
    }

    fn update(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let receiver = self.receiver.as_ref().ok_or("Camera is not playing")?;

        let mut frame = match receiver.recv_timeout(FRAME_TIMEOUT) {
            Ok(frame) => frame,
            Err(RecvTimeoutError::Timeout) => return Err("Timed out waiting for a frame".into()),
            Err(RecvTimeoutError::Disconnected) => return Err("Capture thread stopped".into()),
        };
        while let Ok(newer) = receiver.try_recv() {
            frame = newer;
        }

        let image = decode_frame(&frame?)?;
        let (width, height) = self.canvas.dimensions();
        self.canvas = fit_canvas(image, width, height, self.flip);
        Ok(())
    }

    fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.receiver = None;
        self.device = None;
        if let Some(handle) = self.capture_thread.take() {
            handle.join().map_err(|_| "Capture thread panicked")?;
            self.logger.info("Stopped")?;
        }
        Ok(())
    }
}

impl Drop for DeviceCameraV4l2 {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

pub struct DeviceCameraV4l2Provider {
    logger: Arc<dyn Logger + Send + Sync>,
    path: PathBuf,
}

impl DeviceCameraV4l2Provider {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, path: PathBuf) -> Self {
        Self { logger, path }
    }
}

impl DeviceCameraProvider for DeviceCameraV4l2Provider {
    fn open(
        &self,
        width: u32,
        height: u32,
        flip: bool,
    ) -> Result<Box<dyn DeviceCamera + Send>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Box::new(DeviceCameraV4l2::new(
            self.logger.clone(),
            self.path.clone(),
            width,
            height,
            flip,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_console::LoggerConsole;

    #[test]
    fn test_setup_fails_for_missing_device() {
        let logger = Arc::new(LoggerConsole::new(
            chrono::FixedOffset::east_opt(0).unwrap(),
        ));
        let provider =
            DeviceCameraV4l2Provider::new(logger, PathBuf::from("/dev/medication-identifier-none"));

        let mut camera = provider.open(400, 400, true).unwrap();

        assert!(camera.setup(&CameraConstraints::default()).is_err());
        assert!(camera.play().is_err());
        assert!(camera.update().is_err());
        assert!(camera.stop().is_ok());
    }
}
