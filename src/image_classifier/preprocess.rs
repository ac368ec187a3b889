use crate::image_classifier::interface::InputTensor;
use image::{imageops, DynamicImage, RgbImage};

pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Square input size from a declared NHWC shape, 224 when unknown.
pub fn target_size(input_shape: Option<&[Option<usize>]>) -> u32 {
    let declared = match input_shape {
        Some(shape) if shape.len() >= 3 => shape[1],
        _ => None,
    };

    declared
        .filter(|size| *size > 0)
        .and_then(|size| u32::try_from(size).ok())
        .unwrap_or(DEFAULT_INPUT_SIZE)
}

pub fn resize_image(image: &DynamicImage, size: u32) -> RgbImage {
    imageops::resize(
        &image.to_rgb8(),
        size,
        size,
        imageops::FilterType::Nearest,
    )
}

fn image_to_tensor(image: &RgbImage) -> InputTensor {
    let (width, height) = image.dimensions();
    let data = image
        .pixels()
        .flat_map(|pixel| pixel.0)
        .map(|channel| channel as f32 / 255.0)
        .collect();

    InputTensor {
        shape: [1, height as usize, width as usize, 3],
        data,
    }
}

pub fn resize_image_to_tensor(image: &DynamicImage, size: u32) -> InputTensor {
    let resized = resize_image(image, size);
    image_to_tensor(&resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        let mut img = ImageBuffer::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgb(color);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_target_size_from_declared_shape() {
        let shape = [None, Some(192), Some(192), Some(3)];
        assert_eq!(target_size(Some(&shape[..])), 192);
    }

    #[test]
    fn test_target_size_defaults() {
        assert_eq!(target_size(None), 224);
        assert_eq!(target_size(Some(&[Some(1), Some(1000)][..])), 224);
        assert_eq!(target_size(Some(&[None, None, None, Some(3)][..])), 224);
        assert_eq!(target_size(Some(&[Some(1), Some(0), Some(0), Some(3)][..])), 224);
    }

    #[test]
    fn test_image_to_tensor_square() {
        let image = solid(100, 100, [255, 0, 0]);

        let tensor = resize_image_to_tensor(&image, 224);

        assert_eq!(tensor.shape, [1, 224, 224, 3]);
        assert_eq!(tensor.data.len(), 224 * 224 * 3);
        // channel-last: r, g, b of the first pixel
        assert_eq!(tensor.data[0], 1.0);
        assert_eq!(tensor.data[1], 0.0);
        assert_eq!(tensor.data[2], 0.0);
    }

    #[test]
    fn test_image_to_tensor_rectangle_is_stretched() {
        let mut img = ImageBuffer::new(200, 100);
        for (x, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = if x < 100 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) };
        }
        let image = DynamicImage::ImageRgb8(img);

        let tensor = resize_image_to_tensor(&image, 10);

        assert_eq!(tensor.shape, [1, 10, 10, 3]);
        let first = &tensor.data[0..3];
        let last_in_row = &tensor.data[9 * 3..9 * 3 + 3];
        assert_eq!(first, &[1.0, 0.0, 0.0]);
        assert_eq!(last_in_row, &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_image_to_tensor_normalization() {
        let image = solid(100, 100, [128, 128, 128]);

        let tensor = resize_image_to_tensor(&image, 32);

        let expected = 128.0 / 255.0;
        assert!((tensor.data[0] - expected).abs() < 0.0001);
        assert!((tensor.data[1] - expected).abs() < 0.0001);
        assert!((tensor.data[2] - expected).abs() < 0.0001);
    }

    #[test]
    fn test_alpha_channel_is_dropped() {
        let mut img = ImageBuffer::new(4, 4);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([0, 255, 0, 10]);
        }
        let image = DynamicImage::ImageRgba8(img);

        let tensor = resize_image_to_tensor(&image, 4);

        assert_eq!(tensor.data.len(), 4 * 4 * 3);
        assert_eq!(&tensor.data[0..3], &[0.0, 1.0, 0.0]);
    }
}
