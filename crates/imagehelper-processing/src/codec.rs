//! Decoding and encoding
//!
//! Decoding guesses the container from the content. Encoding goes through a
//! single encoder lookup keyed by `ImageFormat`, after the pixel buffer has
//! been converted to a layout the target encoder accepts.

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageReader};
use imagehelper_core::{ImageFormat, ImagingError, DEFAULT_JPEG_QUALITY};
use std::io::Cursor;

/// Encoder settings that do not vary per call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub jpeg_quality: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Decode any container the `image` crate recognises
pub fn decode(data: &[u8]) -> Result<DynamicImage, ImagingError> {
    if data.is_empty() {
        return Err(ImagingError::Decode("image data is empty".to_string()));
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ImagingError::Decode(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ImagingError::Decode(
            "unrecognised image format".to_string(),
        ));
    }

    reader
        .decode()
        .map_err(|e| ImagingError::Decode(e.to_string()))
}

/// Encode `img` into `format`
pub fn encode(
    img: &DynamicImage,
    format: ImageFormat,
    options: EncodeOptions,
) -> Result<Vec<u8>, ImagingError> {
    let prepared = prepare_for(img, format);
    let target = prepared.as_ref().unwrap_or(img);

    let estimated_size = (target.width() as usize) * (target.height() as usize) * 3;
    let mut buffer = Vec::with_capacity(estimated_size);

    let result = match format {
        ImageFormat::Png => target.write_with_encoder(PngEncoder::new(&mut buffer)),
        ImageFormat::Jpeg => target.write_with_encoder(JpegEncoder::new_with_quality(
            &mut buffer,
            options.jpeg_quality,
        )),
        ImageFormat::Bmp => target.write_with_encoder(BmpEncoder::new(&mut buffer)),
    };
    result.map_err(|e| ImagingError::Encode(format!("{} encoder: {}", format, e)))?;

    Ok(buffer)
}

/// Convert to a color layout the encoder supports, or `None` if `img` already fits
fn prepare_for(img: &DynamicImage, format: ImageFormat) -> Option<DynamicImage> {
    let color = img.color();
    match format {
        // JPEG has no alpha channel and no 16-bit support
        ImageFormat::Jpeg => match color {
            ColorType::L8 | ColorType::Rgb8 => None,
            ColorType::La8 | ColorType::L16 | ColorType::La16 => {
                Some(DynamicImage::ImageLuma8(img.to_luma8()))
            }
            _ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        },
        ImageFormat::Bmp => match color {
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => None,
            ColorType::L16 => Some(DynamicImage::ImageLuma8(img.to_luma8())),
            ColorType::La16 => Some(DynamicImage::ImageLumaA8(img.to_luma_alpha8())),
            _ if color.has_alpha() => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
            _ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        },
        ImageFormat::Png => match color {
            ColorType::Rgb32F => Some(DynamicImage::ImageRgb16(img.to_rgb16())),
            ColorType::Rgba32F => Some(DynamicImage::ImageRgba16(img.to_rgba16())),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayAlphaImage, LumaA, Rgba, RgbaImage};

    fn container(format: ImageFormat) -> image::ImageFormat {
        match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([200, 40, 40, 128]),
        ))
    }

    #[test]
    fn test_encode_then_decode_keeps_dimensions() {
        let img = create_test_image(37, 21);
        for format in ImageFormat::ALL {
            let encoded = encode(&img, format, EncodeOptions::default()).unwrap();
            let decoded = decode(&encoded).unwrap();
            assert_eq!(decoded.dimensions(), (37, 21), "format {}", format);

            let guessed = image::guess_format(&encoded).unwrap();
            assert_eq!(guessed, container(format));
        }
    }

    #[test]
    fn test_default_quality_matches_config() {
        assert_eq!(
            EncodeOptions::default().jpeg_quality,
            imagehelper_core::ImagingConfig::default().jpeg_quality
        );
    }

    #[test]
    fn test_jpeg_flattens_alpha() {
        let img = DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(8, 8, LumaA([90, 10])));
        let encoded = encode(&img, ImageFormat::Jpeg, EncodeOptions { jpeg_quality: 90 }).unwrap();
        assert_eq!(decode(&encoded).unwrap().dimensions(), (8, 8));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode(b"not an image"),
            Err(ImagingError::Decode(_))
        ));
        assert!(matches!(decode(&[]), Err(ImagingError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_truncated_png() {
        let encoded = encode(&create_test_image(16, 16), ImageFormat::Png, EncodeOptions::default())
            .unwrap();
        let truncated = &encoded[..encoded.len() / 2];
        assert!(matches!(decode(truncated), Err(ImagingError::Decode(_))));
    }
}
