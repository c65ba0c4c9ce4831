use ab_glyph::{Font, PxScale};
use image::{DynamicImage, Rgba};
use imagehelper_core::ImagingError;
use imageproc::drawing::draw_text_mut;

/// Offset of the watermark text from the top-left corner, in pixels
pub const WATERMARK_OFFSET: (i32, i32) = (10, 10);

/// Text watermark configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TextWatermark {
    pub text: String,
    /// Glyph height in pixels
    pub font_size: u32,
    pub position: (i32, i32),
    pub color: Rgba<u8>,
}

impl TextWatermark {
    /// White text at the standard offset
    pub fn new(text: impl Into<String>, font_size: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            position: WATERMARK_OFFSET,
            color: Rgba([255, 255, 255, 255]),
        }
    }
}

pub struct Watermark;

impl Watermark {
    /// Draw the watermark text onto the image
    pub fn apply(
        img: DynamicImage,
        watermark: &TextWatermark,
        font: &impl Font,
    ) -> Result<DynamicImage, ImagingError> {
        if watermark.font_size == 0 {
            return Err(ImagingError::invalid_parameter(
                "watermark font size must be positive",
            ));
        }

        tracing::debug!(
            font_size = watermark.font_size,
            x = watermark.position.0,
            y = watermark.position.1,
            "Applying text watermark"
        );

        let mut img_rgba = img.to_rgba8();
        let (x, y) = watermark.position;
        draw_text_mut(
            &mut img_rgba,
            watermark.color,
            x,
            y,
            PxScale::from(watermark.font_size as f32),
            font,
            &watermark.text,
        );

        Ok(DynamicImage::ImageRgba8(img_rgba))
    }
}
