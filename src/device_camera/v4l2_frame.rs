use crate::device_camera::interface::CameraConstraints;
use image::{imageops, ImageFormat, Rgba, RgbaImage};

pub const CID_BRIGHTNESS: u32 = 0x0098_0900;
pub const CID_AUTO_EXPOSURE_BIAS: u32 = 0x009a_0913;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb24,
    Yuyv,
    Mjpeg,
}

impl PixelFormat {
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<Self> {
        match fourcc {
            b"RGB3" => Some(PixelFormat::Rgb24),
            b"YUYV" => Some(PixelFormat::Yuyv),
            b"MJPG" => Some(PixelFormat::Mjpeg),
            _ => None,
        }
    }
}

/// Geometry the driver settled on. `stride` is bytes per row, 0 if unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
}

pub struct RawFrame {
    pub layout: FrameLayout,
    pub data: Vec<u8>,
}

fn packed_stride(layout: &FrameLayout, bytes_per_pixel: u32) -> usize {
    if layout.stride == 0 {
        (layout.width * bytes_per_pixel) as usize
    } else {
        layout.stride as usize
    }
}

fn check_len(
    frame: &RawFrame,
    stride: usize,
    row_bytes: usize,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let height = frame.layout.height as usize;
    let needed = if height == 0 {
        0
    } else {
        (height - 1) * stride + row_bytes
    };
    if frame.data.len() < needed {
        return Err(format!(
            "Short frame: {} bytes, expected {}",
            frame.data.len(),
            needed
        )
        .into());
    }
    Ok(())
}

fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// BT.601 limited range.
fn yuv_to_rgba(y: u8, u: u8, v: u8) -> Rgba<u8> {
    let c = y as i32 - 16;
    let d = u as i32 - 128;
    let e = v as i32 - 128;
    Rgba([
        clamp_channel((298 * c + 409 * e + 128) >> 8),
        clamp_channel((298 * c - 100 * d - 208 * e + 128) >> 8),
        clamp_channel((298 * c + 516 * d + 128) >> 8),
        255,
    ])
}

pub fn decode_frame(frame: &RawFrame) -> Result<RgbaImage, Box<dyn std::error::Error + Send + Sync>> {
    let FrameLayout { width, height, .. } = frame.layout;

    match frame.layout.format {
        PixelFormat::Rgb24 => {
            let stride = packed_stride(&frame.layout, 3);
            check_len(frame, stride, width as usize * 3)?;
            Ok(RgbaImage::from_fn(width, height, |x, y| {
                let i = y as usize * stride + x as usize * 3;
                Rgba([frame.data[i], frame.data[i + 1], frame.data[i + 2], 255])
            }))
        }
        PixelFormat::Yuyv => {
            let stride = packed_stride(&frame.layout, 2);
            check_len(frame, stride, width as usize * 2)?;
            Ok(RgbaImage::from_fn(width, height, |x, y| {
                // Y0 U Y1 V covers two pixels.
                let pair = y as usize * stride + (x as usize / 2) * 4;
                let luma = frame.data[pair + (x as usize % 2) * 2];
                let (u, v) = if pair + 3 < frame.data.len() {
                    (frame.data[pair + 1], frame.data[pair + 3])
                } else {
                    (128, 128)
                };
                yuv_to_rgba(luma, u, v)
            }))
        }
        PixelFormat::Mjpeg => {
            Ok(image::load_from_memory_with_format(&frame.data, ImageFormat::Jpeg)?.to_rgba8())
        }
    }
}

/// Scales to the canvas size and mirrors when asked.
pub fn fit_canvas(image: RgbaImage, width: u32, height: u32, flip: bool) -> RgbaImage {
    let mut image = if image.dimensions() == (width, height) {
        image
    } else {
        imageops::resize(&image, width, height, imageops::FilterType::Triangle)
    };
    if flip {
        imageops::flip_horizontal_in_place(&mut image);
    }
    image
}

/// Maps the 0-255 brightness hints onto a control's `[minimum, maximum]`.
pub fn brightness_value(constraints: &CameraConstraints, minimum: i64, maximum: i64) -> Option<i64> {
    let target = constraints
        .ideal_brightness
        .or(constraints.min_brightness)?;
    let target = match constraints.min_brightness {
        Some(min) => target.max(min),
        None => target,
    };
    let target = target.min(255) as i64;
    Some(minimum + (maximum - minimum) * target / 255)
}

/// Exposure compensation in EV to the control's milli-EV steps.
pub fn exposure_bias_value(constraints: &CameraConstraints, minimum: i64, maximum: i64) -> Option<i64> {
    let ev = constraints.exposure_compensation?;
    if !ev.is_finite() {
        return None;
    }
    Some(((ev * 1000.0).round() as i64).clamp(minimum, maximum))
}
