use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use super::FetchError;

/// Shrinks a downloaded poster to fit into `max_width` x `max_height`.
///
/// The aspect ratio is kept and images that already fit are returned
/// unchanged. A shrunk image is encoded in the format its `extension` names,
/// falling back to the format the bytes were decoded from.
///
/// # Errors
///
/// Returns [`FetchError::Malformed`] if the bytes are not an image this crate
/// can decode, or if the shrunk image cannot be encoded again.
pub fn shrink_to_fit(
    bytes: &[u8],
    extension: &str,
    max_width: u32,
    max_height: u32,
) -> Result<Vec<u8>, FetchError> {
    let format = image::guess_format(bytes)
        .map_err(|e| FetchError::Malformed(format!("not an image: {e}")))?;
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| FetchError::Malformed(format!("cannot decode {format:?} image: {e}")))?;

    if img.width() <= max_width && img.height() <= max_height {
        return Ok(bytes.to_vec());
    }

    let target = ImageFormat::from_extension(extension).unwrap_or(format);
    let mut small = img.thumbnail(max_width, max_height);
    if target == ImageFormat::Jpeg {
        // no alpha channel in JPEG
        small = DynamicImage::ImageRgb8(small.to_rgb8());
    }

    let mut out = Cursor::new(Vec::new());
    small
        .write_to(&mut out, target)
        .map_err(|e| FetchError::Malformed(format!("cannot encode {target:?} image: {e}")))?;
    Ok(out.into_inner())
}
