use image::RgbImage;

/// Decode uploaded bytes into an RGB pixel buffer.
///
/// The format is sniffed from the content, not the filename or content type.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let format = image::guess_format(bytes).map_err(DecodeError::UnknownFormat)?;
    let image = image::load_from_memory_with_format(bytes, format).map_err(DecodeError::Image)?;

    tracing::debug!(
        ?format,
        width = image.width(),
        height = image.height(),
        "Decoded uploaded image"
    );

    Ok(image.to_rgb8())
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Unrecognised image format: {0}")]
    UnknownFormat(#[source] image::ImageError),

    #[error("Image data is corrupt or unsupported: {0}")]
    Image(#[source] image::ImageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn encode(format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_png_decodes() {
        let img = decode_image(&encode(ImageFormat::Png)).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(0, 0), &Rgb([10, 20, 30]));
    }

    #[test]
    fn test_bmp_decodes() {
        let img = decode_image(&encode(ImageFormat::Bmp)).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(decode_image(b""), Err(DecodeError::Empty)));
    }

    #[test]
    fn test_text_rejected() {
        assert!(matches!(
            decode_image(b"this is not an image"),
            Err(DecodeError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_truncated_png_rejected() {
        let png = encode(ImageFormat::Png);
        assert!(matches!(
            decode_image(&png[..png.len() / 2]),
            Err(DecodeError::Image(_))
        ));
    }
}
