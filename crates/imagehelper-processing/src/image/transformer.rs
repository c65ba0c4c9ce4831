//! Image transformer - applies exactly one operation to a decoded image
//!
//! `ImageTransformer::apply` is the single dispatch point from `Operation`
//! to the per-kind implementations in the sibling modules.

use image::DynamicImage;
use imagehelper_core::{ImagingConfig, ImagingError, Operation};

use crate::image::crop::{CropRect, ImageCrop};
use crate::image::filters::ImageFilters;
use crate::image::fonts::FontResolver;
use crate::image::orientation::ImageOrientation;
use crate::image::qr::QrGenerator;
use crate::image::resize::ImageResize;
use crate::image::watermark::{TextWatermark, Watermark};

/// Collaborators and defaults needed by some operations
pub struct TransformContext<'a> {
    pub config: &'a ImagingConfig,
    pub fonts: &'a dyn FontResolver,
}

pub struct ImageTransformer;

impl ImageTransformer {
    /// Apply `operation` to `img`
    pub fn apply(
        img: DynamicImage,
        operation: &Operation,
        ctx: &TransformContext<'_>,
    ) -> Result<DynamicImage, ImagingError> {
        let max_pixels = ctx.config.max_output_pixels;
        match operation {
            Operation::Resize { width, height } => {
                ImageResize::resize_exact(&img, *width, *height, max_pixels)
            }
            Operation::ResizeByPercentage { percentage } => {
                ImageResize::resize_by_percentage(&img, *percentage, max_pixels)
            }
            Operation::ChangeFormat => Ok(img),
            Operation::Crop {
                x,
                y,
                width,
                height,
            } => ImageCrop::crop(
                &img,
                CropRect {
                    x: *x,
                    y: *y,
                    width: *width,
                    height: *height,
                },
            ),
            Operation::Rotate { degrees } => ImageOrientation::rotate(img, *degrees, max_pixels),
            Operation::Watermark {
                text,
                font_name,
                font_size,
            } => {
                let family = font_name
                    .as_deref()
                    .unwrap_or(ctx.config.watermark_font.as_str());
                let size = font_size.unwrap_or(ctx.config.watermark_font_size);
                let font = ctx.fonts.resolve(family)?;
                Watermark::apply(img, &TextWatermark::new(text.clone(), size), &font)
            }
            Operation::Grayscale => Ok(ImageFilters::grayscale(&img)),
            Operation::Flip { axis } => Ok(ImageOrientation::flip(img, *axis)),
            Operation::Sharpen { amount } => ImageFilters::sharpen(&img, *amount),
            Operation::Thumbnail { max_dimension } => {
                ImageResize::thumbnail(&img, *max_dimension, max_pixels)
            }
            Operation::QrCode { .. } => Err(ImagingError::invalid_parameter(
                "QR codes are generated, not applied to an existing image",
            )),
        }
    }

    /// Produce an image for operations that have no source image
    pub fn synthesize(
        operation: &Operation,
        ctx: &TransformContext<'_>,
    ) -> Result<DynamicImage, ImagingError> {
        match operation {
            Operation::QrCode { text, size } => {
                QrGenerator::generate(text, *size, ctx.config.max_output_pixels)
            }
            other => Err(ImagingError::invalid_parameter(format!(
                "{} requires a source image",
                other.name()
            ))),
        }
    }
}
