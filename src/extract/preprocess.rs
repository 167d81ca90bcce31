use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, GrayImage, ImageOutputFormat};
use thiserror::Error;

/// Images wider than this are downscaled before OCR.
pub const MAX_OCR_WIDTH: u32 = 2000;
/// A 1x1 PNG is 67 bytes; anything smaller cannot decode.
pub const MIN_IMAGE_BYTES: usize = 67;
/// Matches the upload size cap; oversized input is never decoded.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

// Mild sharpen; engines lose accuracy on soft phone-camera scans.
const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("image data too small ({0} bytes)")]
    TooSmall(usize),
    #[error("image data too large ({0} bytes)")]
    TooLarge(usize),
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Prepare a scanned document for OCR: bound the width, convert to
/// grayscale, stretch the contrast, sharpen, and re-encode as PNG.
pub fn prepare_for_ocr(bytes: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(PreprocessError::TooSmall(bytes.len()));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(PreprocessError::TooLarge(bytes.len()));
    }
    let img = image::load_from_memory(bytes)?;

    let (width, height) = img.dimensions();
    let img = if width > MAX_OCR_WIDTH {
        let scaled_height = ((height as f64 * MAX_OCR_WIDTH as f64) / width as f64).round() as u32;
        img.resize(MAX_OCR_WIDTH, scaled_height.max(1), FilterType::Lanczos3)
    } else {
        img
    };

    let mut gray = img.to_luma8();
    stretch_contrast(&mut gray);
    let sharpened = imageops::filter3x3(&gray, &SHARPEN_KERNEL);

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(sharpened).write_to(&mut out, ImageOutputFormat::Png)?;
    Ok(out.into_inner())
}

/// Linear min-max stretch. A flat image is left untouched.
fn stretch_contrast(image: &mut GrayImage) {
    let mut lo = u8::MAX;
    let mut hi = u8::MIN;
    for pixel in image.pixels() {
        lo = lo.min(pixel.0[0]);
        hi = hi.max(pixel.0[0]);
    }
    if hi <= lo {
        return;
    }
    let range = (hi - lo) as u32;
    for pixel in image.pixels_mut() {
        pixel.0[0] = (((pixel.0[0] - lo) as u32 * 255) / range) as u8;
    }
}
