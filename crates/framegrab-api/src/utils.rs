//! Base64 data URI helpers for frames carried in JSON bodies.

use base64::{engine::general_purpose::STANDARD, Engine};
use framegrab_core::{constants::JPEG_DATA_URI_PREFIX, AppError};

/// `data:image/jpeg;base64,...`
pub fn to_data_uri(jpeg: &[u8]) -> String {
    format!("{}{}", JPEG_DATA_URI_PREFIX, STANDARD.encode(jpeg))
}

/// Decode a frame sent back by a client.
///
/// Accepts plain base64 or a `data:<mime>;base64,` URI.
pub fn decode_image_payload(input: &str) -> Result<Vec<u8>, AppError> {
    let input = input.trim();
    let payload = match input.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(";base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| AppError::BadRequest("Image is not a base64 data URI".to_string()))?,
        None => input,
    };

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 image data: {}", e)))?;

    if bytes.is_empty() {
        return Err(AppError::BadRequest("Image data is empty".to_string()));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_data_uri() {
        assert_eq!(to_data_uri(&[0xFF, 0xD8, 0xFF]), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_decode_accepts_data_uri_and_plain() {
        assert_eq!(
            decode_image_payload("data:image/jpeg;base64,/9j/").unwrap(),
            vec![0xFF, 0xD8, 0xFF]
        );
        assert_eq!(decode_image_payload(" /9j/ ").unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        for input in ["not base64!!", "", "data:image/jpeg,/9j/", "data:image/jpeg;base64,"] {
            let err = decode_image_payload(input).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "{}", input);
        }
    }
}
