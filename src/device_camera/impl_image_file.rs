use crate::device_camera::interface::{CameraConstraints, DeviceCamera, DeviceCameraProvider};
use crate::library::logger::interface::Logger;
use image::{imageops, RgbaImage};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Replays still images from a directory as a looping camera feed.
pub struct DeviceCameraImageFile {
    logger: Arc<dyn Logger + Send + Sync>,
    directory: PathBuf,
    canvas: RgbaImage,
    flip: bool,
    frames: Vec<RgbaImage>,
    next_frame: usize,
    playing: bool,
}

impl DeviceCameraImageFile {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        directory: PathBuf,
        width: u32,
        height: u32,
        flip: bool,
    ) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("image_file"),
            directory,
            canvas: RgbaImage::new(width, height),
            flip,
            frames: Vec::new(),
            next_frame: 0,
            playing: false,
        }
    }

    fn load_frame(&self, path: &Path) -> Result<RgbaImage, Box<dyn std::error::Error + Send + Sync>> {
        let (width, height) = self.canvas.dimensions();
        let image = image::open(path)?.to_rgba8();
        let mut frame = imageops::resize(&image, width, height, imageops::FilterType::Triangle);
        if self.flip {
            imageops::flip_horizontal_in_place(&mut frame);
        }
        Ok(frame)
    }
}

fn list_frame_paths(directory: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error + Send + Sync>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        let supported = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| extension.eq_ignore_ascii_case(supported))
            })
            .unwrap_or(false);
        if path.is_file() && supported {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

impl DeviceCamera for DeviceCameraImageFile {
    fn setup(
        &mut self,
        _constraints: &CameraConstraints,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let paths = list_frame_paths(&self.directory)?;
        if paths.is_empty() {
            return Err(format!("No images found in {}", self.directory.display()).into());
        }

        let mut frames = Vec::with_capacity(paths.len());
        for path in &paths {
            frames.push(self.load_frame(path)?);
        }

        self.logger.info(&format!(
            "Loaded {} frames from {}",
            frames.len(),
            self.directory.display()
        ))?;
        self.frames = frames;
        self.next_frame = 0;
        Ok(())
    }

    fn play(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.frames.is_empty() {
            return Err("Camera must be set up before playing".into());
        }
        self.playing = true;
        Ok(())
    }

    fn update(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.playing {
            return Err("Camera is not playing".into());
        }
        let frame = &self.frames[self.next_frame % self.frames.len()];
        self.canvas.copy_from_slice(frame.as_raw());
        self.next_frame = (self.next_frame + 1) % self.frames.len();
        Ok(())
    }

    fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.playing = false;
        self.frames.clear();
        Ok(())
    }
}

pub struct DeviceCameraImageFileProvider {
    logger: Arc<dyn Logger + Send + Sync>,
    directory: PathBuf,
}

impl DeviceCameraImageFileProvider {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, directory: PathBuf) -> Self {
        Self { logger, directory }
    }
}

impl DeviceCameraProvider for DeviceCameraImageFileProvider {
    fn open(
        &self,
        width: u32,
        height: u32,
        flip: bool,
    ) -> Result<Box<dyn DeviceCamera + Send>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Box::new(DeviceCameraImageFile::new(
            self.logger.clone(),
            self.directory.clone(),
            width,
            height,
            flip,
        )))
    }
}
