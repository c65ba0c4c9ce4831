//! Transformation operations
//!
//! One variant per transformation kind. The pipeline applies exactly one
//! operation per call; parameters that can be checked without looking at the
//! decoded image are validated here.

use serde::{Deserialize, Serialize};

use crate::config::check_output_size;
use crate::error::ImagingError;

/// Mirror axis for flip operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    /// Mirror left to right
    Horizontal,
    /// Mirror top to bottom
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Scale to exact dimensions, aspect ratio not preserved
    Resize { width: u32, height: u32 },
    /// Scale both sides by `percentage` (0.5 = half size), truncating to whole pixels
    ResizeByPercentage { percentage: f32 },
    /// Re-encode only
    ChangeFormat,
    /// Extract a rectangle; it must lie entirely inside the source image
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Rotate clockwise by an arbitrary angle in degrees
    Rotate { degrees: f32 },
    /// Draw white text at the top-left corner using a named system font.
    /// Missing font settings fall back to the configured defaults.
    Watermark {
        text: String,
        #[serde(default)]
        font_name: Option<String>,
        #[serde(default)]
        font_size: Option<u32>,
    },
    Grayscale,
    Flip { axis: FlipAxis },
    /// Gaussian unsharp mask; `amount` is the blur sigma
    Sharpen { amount: f32 },
    /// Fit within a `max_dimension` square, aspect ratio preserved
    Thumbnail { max_dimension: u32 },
    /// Synthesize a `size`x`size` QR symbol for `text`; needs no source image
    QrCode { text: String, size: u32 },
}

impl Operation {
    pub fn watermark(text: impl Into<String>) -> Self {
        Operation::Watermark {
            text: text.into(),
            font_name: None,
            font_size: None,
        }
    }

    /// Stable snake_case name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Resize { .. } => "resize",
            Operation::ResizeByPercentage { .. } => "resize_by_percentage",
            Operation::ChangeFormat => "change_format",
            Operation::Crop { .. } => "crop",
            Operation::Rotate { .. } => "rotate",
            Operation::Watermark { .. } => "watermark",
            Operation::Grayscale => "grayscale",
            Operation::Flip { .. } => "flip",
            Operation::Sharpen { .. } => "sharpen",
            Operation::Thumbnail { .. } => "thumbnail",
            Operation::QrCode { .. } => "qr_code",
        }
    }

    /// Whether the operation starts from a fetched or supplied image
    pub fn requires_source(&self) -> bool {
        !matches!(self, Operation::QrCode { .. })
    }

    /// Check parameters that do not depend on the source image
    pub fn validate(&self) -> Result<(), ImagingError> {
        match self {
            Operation::Resize { width, height } => {
                if *width == 0 || *height == 0 {
                    return Err(ImagingError::invalid_parameter(format!(
                        "resize dimensions must be positive, got {}x{}",
                        width, height
                    )));
                }
            }
            Operation::ResizeByPercentage { percentage } => {
                if !percentage.is_finite() || *percentage <= 0.0 {
                    return Err(ImagingError::invalid_parameter(format!(
                        "percentage must be a positive number, got {}",
                        percentage
                    )));
                }
            }
            Operation::Crop { width, height, .. } => {
                if *width == 0 || *height == 0 {
                    return Err(ImagingError::invalid_parameter(format!(
                        "crop rectangle must have a positive area, got {}x{}",
                        width, height
                    )));
                }
            }
            Operation::Rotate { degrees } => {
                if !degrees.is_finite() {
                    return Err(ImagingError::invalid_parameter(format!(
                        "rotation angle must be finite, got {}",
                        degrees
                    )));
                }
            }
            Operation::Watermark { font_size, .. } => {
                if *font_size == Some(0) {
                    return Err(ImagingError::invalid_parameter(
                        "watermark font size must be positive",
                    ));
                }
            }
            Operation::Sharpen { amount } => {
                if !amount.is_finite() || *amount <= 0.0 {
                    return Err(ImagingError::invalid_parameter(format!(
                        "sharpen amount must be a positive number, got {}",
                        amount
                    )));
                }
            }
            Operation::Thumbnail { max_dimension } => {
                if *max_dimension == 0 {
                    return Err(ImagingError::invalid_parameter(
                        "thumbnail size must be positive",
                    ));
                }
            }
            Operation::QrCode { text, size } => {
                if text.is_empty() {
                    return Err(ImagingError::invalid_parameter("QR code text is empty"));
                }
                if *size == 0 {
                    return Err(ImagingError::invalid_parameter(
                        "QR code size must be positive",
                    ));
                }
            }
            Operation::ChangeFormat | Operation::Grayscale | Operation::Flip { .. } => {}
        }
        Ok(())
    }

    /// Reject operations whose output size is known up front and exceeds `max_pixels`.
    /// Sizes that depend on the source image are checked once it is decoded.
    pub fn check_output_limit(&self, max_pixels: u64) -> Result<(), ImagingError> {
        match self {
            Operation::Resize { width, height } => check_output_size(*width, *height, max_pixels),
            Operation::QrCode { size, .. } => check_output_size(*size, *size, max_pixels),
            _ => Ok(()),
        }
    }
}
