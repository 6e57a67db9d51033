use crate::image_classifier::models::model_config::{ModelConfig, PixelNormalization, TensorLayout};
use image::{imageops, RgbaImage};
use tract_onnx::prelude::*;

/// Crops the largest centered square and scales it to `size`x`size`.
pub fn crop_and_resize(image: &RgbaImage, size: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    let x_offset = (width - side) / 2;
    let y_offset = (height - side) / 2;

    let cropped = imageops::crop_imm(image, x_offset, y_offset, side, side).to_image();
    if side == size {
        cropped
    } else {
        imageops::resize(&cropped, size, size, imageops::FilterType::Triangle)
    }
}

fn normalize(value: u8, normalization: PixelNormalization) -> f32 {
    match normalization {
        PixelNormalization::MinusOneToOne => value as f32 / 127.5 - 1.0,
        PixelNormalization::ZeroToOne => value as f32 / 255.0,
    }
}

fn image_to_tensor(image: &RgbaImage, config: &ModelConfig) -> Tensor {
    let (width, height) = (image.width() as usize, image.height() as usize);

    match config.layout {
        TensorLayout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
                normalize(image.get_pixel(x as u32, y as u32)[c], config.normalization)
            })
            .into_tensor()
        }
        TensorLayout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, 3, height, width), |(_, c, y, x)| {
                normalize(image.get_pixel(x as u32, y as u32)[c], config.normalization)
            })
            .into_tensor()
        }
    }
}

pub fn input_shape(size: u32, config: &ModelConfig) -> [usize; 4] {
    let size = size as usize;
    match config.layout {
        TensorLayout::Nhwc => [1, size, size, 3],
        TensorLayout::Nchw => [1, 3, size, size],
    }
}

pub fn frame_to_tensor(image: &RgbaImage, size: u32, config: &ModelConfig) -> Tensor {
    let resized = crop_and_resize(image, size);
    image_to_tensor(&resized, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_frame_to_tensor_nhwc_shape_and_range() {
        let image = RgbaImage::from_pixel(400, 400, Rgba([255, 0, 128, 255]));

        let tensor = frame_to_tensor(&image, 224, &ModelConfig::default());
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);

        let slice = tensor.as_slice::<f32>().unwrap();
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[1], -1.0);
        assert!((slice[2] - (128.0 / 127.5 - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_frame_to_tensor_nchw_zero_to_one() {
        let image = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]));
        let config = ModelConfig {
            layout: TensorLayout::Nchw,
            normalization: PixelNormalization::ZeroToOne,
        };

        let tensor = frame_to_tensor(&image, 64, &config);
        assert_eq!(tensor.shape(), &input_shape(64, &config));

        let slice = tensor.as_slice::<f32>().unwrap();
        // Red plane then green plane.
        assert_eq!(slice[0], 1.0);
        assert_eq!(slice[64 * 64], 0.0);
    }

    #[test]
    fn test_crop_keeps_the_center_of_wide_frames() {
        // Left and right thirds are black, the middle is white.
        let image = RgbaImage::from_fn(300, 100, |x, _| {
            if (100..200).contains(&x) {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });

        let cropped = crop_and_resize(&image, 100);

        assert_eq!(cropped.dimensions(), (100, 100));
        assert_eq!(cropped.get_pixel(0, 50), &Rgba([255, 255, 255, 255]));
        assert_eq!(cropped.get_pixel(99, 50), &Rgba([255, 255, 255, 255]));
    }
}
