use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, codecs::jpeg::JpegEncoder};

use crate::error::{DetectorError, Result};

pub const JPEG_QUALITY: u8 = 95;
pub const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Encode as JPEG; alpha is dropped since JPEG has none
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    DynamicImage::ImageRgb8(image.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(DetectorError::Encode)?;
    Ok(buffer)
}

/// JPEG preview as a `data:` URI
pub fn to_data_uri(image: &DynamicImage) -> Result<String> {
    let jpeg = encode_jpeg(image)?;
    Ok(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(jpeg)))
}
