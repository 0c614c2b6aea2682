// -- external imports
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::Path;

use crate::error::{AppError, Result};

/// Decode an image file into canonical RGB8 pixels (0-255 per channel).
///
/// The EXIF orientation stored in the file is applied before the pixels are
/// returned, and animated sources (e.g. GIF, animated WebP) resolve to their
/// first frame.
///
/// # Errors
///
/// Returns `AppError::Io` when the file cannot be read and
/// `AppError::ImageDecode` when its contents cannot be decoded.
pub fn decode_rgb(path: &Path) -> Result<RgbImage> {
    let mut decoder = ImageReader::open(path)?.with_guessed_format()?.into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    Ok(image.into_rgb8())
}

/// Encode RGB8 pixels as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| AppError::ImageEncode(e.to_string()))?;
    Ok(bytes)
}

// -- tests
