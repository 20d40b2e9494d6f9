//! Fixed-geometry cropping of extracted frames.

use crate::compression::compress_jpeg;
use framegrab_core::{constants::OUTPUT_JPEG_QUALITY, AppError, FrameSize};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use thiserror::Error;

/// Landscape frames are first fitted inside this box...
const LANDSCAPE_FIT: (u32, u32) = (1200, 675);
/// ...then cut starting this many pixels from the top.
const LANDSCAPE_TOP_OFFSET: u32 = 24;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to decode frame: {0}")]
    Decode(String),

    #[error("Failed to encode frame: {0}")]
    Encode(String),
}

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        AppError::ImageProcessing(err.to_string())
    }
}

/// Crops raw frames to the fixed output sizes and encodes them as JPEG.
#[derive(Debug, Clone, Copy)]
pub struct ImageCropper {
    quality: u8,
}

impl Default for ImageCropper {
    fn default() -> Self {
        Self {
            quality: OUTPUT_JPEG_QUALITY,
        }
    }
}

impl ImageCropper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Crop one encoded frame to `size`.
    pub fn crop(&self, data: &[u8], size: FrameSize) -> Result<Vec<u8>, ImageError> {
        let img = decode(data)?;
        self.encode(&Self::apply(&img, size))
    }

    /// Crop one encoded frame to several sizes, decoding it once.
    pub fn crop_many(&self, data: &[u8], sizes: &[FrameSize]) -> Result<Vec<Vec<u8>>, ImageError> {
        let img = decode(data)?;
        sizes
            .iter()
            .map(|size| self.encode(&Self::apply(&img, *size)))
            .collect()
    }

    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, ImageError> {
        compress_jpeg(img, self.quality).map_err(|e| ImageError::Encode(e.to_string()))
    }

    fn apply(img: &DynamicImage, size: FrameSize) -> DynamicImage {
        let (width, height) = size.dimensions();
        match size {
            FrameSize::Portrait | FrameSize::PortraitFeed => cover_fit(img, width, height),
            FrameSize::Landscape => fit_then_cut(img, width, height),
        }
    }
}

fn decode(data: &[u8]) -> Result<DynamicImage, ImageError> {
    image::load_from_memory(data).map_err(|e| ImageError::Decode(e.to_string()))
}

/// Scale to cover the box, then center-crop.
fn cover_fit(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    img.resize_to_fill(width, height, FilterType::Lanczos3)
}

/// Fit inside [`LANDSCAPE_FIT`], then take a `width`×`height` window
/// [`LANDSCAPE_TOP_OFFSET`] pixels from the top. Sources whose fitted image is
/// too small for that window are cover-fitted instead.
fn fit_then_cut(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let fitted = img.resize(LANDSCAPE_FIT.0, LANDSCAPE_FIT.1, FilterType::Lanczos3);
    let (fw, fh) = fitted.dimensions();

    if fw >= width && fh >= LANDSCAPE_TOP_OFFSET + height {
        fitted.crop_imm(0, LANDSCAPE_TOP_OFFSET, width, height)
    } else {
        cover_fit(img, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn frame(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Jpeg)
            .unwrap();
        buf
    }

    fn dims(jpeg: &[u8]) -> (u32, u32) {
        image::load_from_memory(jpeg).unwrap().dimensions()
    }

    #[test]
    fn test_portrait_from_landscape_source() {
        let out = ImageCropper::new().crop(&frame(1920, 1080), FrameSize::Portrait).unwrap();
        assert_eq!(dims(&out), (1080, 1920));
    }

    #[test]
    fn test_portrait_feed() {
        let out = ImageCropper::new()
            .crop(&frame(1280, 720), FrameSize::PortraitFeed)
            .unwrap();
        assert_eq!(dims(&out), (1080, 1350));
    }

    #[test]
    fn test_landscape_from_16x9() {
        let out = ImageCropper::new().crop(&frame(1920, 1080), FrameSize::Landscape).unwrap();
        assert_eq!(dims(&out), (1200, 628));
    }

    #[test]
    fn test_landscape_fit_then_cut_window() {
        // Every row distinct, so the window's vertical position is observable.
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(1920, 1080, |_, y| {
            Rgb([(y % 256) as u8, (y / 256) as u8 * 60, 0])
        }));
        let fitted = img.resize(LANDSCAPE_FIT.0, LANDSCAPE_FIT.1, FilterType::Lanczos3);
        assert_eq!(fitted.dimensions(), (1200, 675));

        let cut = fit_then_cut(&img, 1200, 628);
        assert_eq!(cut.dimensions(), (1200, 628));

        for x in [0, 599, 1199] {
            assert_eq!(cut.get_pixel(x, 0), fitted.get_pixel(x, LANDSCAPE_TOP_OFFSET));
            assert_eq!(cut.get_pixel(x, 627), fitted.get_pixel(x, LANDSCAPE_TOP_OFFSET + 627));
            assert_ne!(cut.get_pixel(x, 0), fitted.get_pixel(x, 0));
        }
    }

    #[test]
    fn test_landscape_from_narrow_source_falls_back() {
        // 4:3 fits inside as 900x675, too narrow for the fixed window.
        let out = ImageCropper::new().crop(&frame(640, 480), FrameSize::Landscape).unwrap();
        assert_eq!(dims(&out), (1200, 628));
    }

    #[test]
    fn test_crop_many_sizes() {
        let outputs = ImageCropper::new()
            .crop_many(
                &frame(1920, 1080),
                &[FrameSize::PortraitFeed, FrameSize::Landscape],
            )
            .unwrap();
        assert_eq!(dims(&outputs[0]), (1080, 1350));
        assert_eq!(dims(&outputs[1]), (1200, 628));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = ImageCropper::new()
            .crop(b"not an image", FrameSize::Portrait)
            .unwrap_err();
        assert!(matches!(err, ImageError::Decode(_)));
    }
}
