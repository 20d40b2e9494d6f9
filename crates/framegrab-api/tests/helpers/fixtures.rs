//! Image fixtures and decoding helpers.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// A 1920x1080 JPEG with a left/right split so crops are not uniform.
pub fn landscape_jpeg() -> Vec<u8> {
    let img = RgbImage::from_fn(1920, 1080, |x, _| {
        if x < 960 {
            Rgb([200, 40, 40])
        } else {
            Rgb([40, 40, 200])
        }
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .expect("Failed to encode fixture JPEG");
    buf
}

pub fn jpeg_dimensions(bytes: &[u8]) -> (u32, u32) {
    image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)
        .expect("Response is not a JPEG")
        .dimensions()
}

/// Decode a `data:image/jpeg;base64,` string and return the image size.
pub fn data_uri_dimensions(uri: &str) -> (u32, u32) {
    let payload = uri
        .strip_prefix("data:image/jpeg;base64,")
        .expect("Image is not a JPEG data URI");
    let bytes = STANDARD.decode(payload).expect("Invalid base64");
    jpeg_dimensions(&bytes)
}

pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))
}
