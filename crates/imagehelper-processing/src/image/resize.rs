use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use imagehelper_core::{check_output_size, ImagingError};

pub struct ImageResize;

impl ImageResize {
    /// Pick a resampling filter for the scale factor.
    /// Heavy downscales use a cheaper filter; everything else Lanczos3.
    pub fn select_filter(src_width: u32, src_height: u32, dst_width: u32, dst_height: u32) -> FilterType {
        let src_pixels = u64::from(src_width) * u64::from(src_height);
        let dst_pixels = u64::from(dst_width) * u64::from(dst_height);

        if dst_pixels.saturating_mul(16) < src_pixels {
            FilterType::Triangle
        } else {
            FilterType::Lanczos3
        }
    }

    /// Exact-fill resize; aspect ratio is not preserved
    pub fn resize_exact(
        img: &DynamicImage,
        width: u32,
        height: u32,
        max_pixels: u64,
    ) -> Result<DynamicImage, ImagingError> {
        if width == 0 || height == 0 {
            return Err(ImagingError::invalid_parameter(format!(
                "resize dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        check_output_size(width, height, max_pixels)?;

        let (src_width, src_height) = img.dimensions();
        let filter = Self::select_filter(src_width, src_height, width, height);
        tracing::debug!(src_width, src_height, width, height, filter = ?filter, "Resizing image");

        Ok(img.resize_exact(width, height, filter))
    }

    /// Target size for a percentage resize: `floor(side * percentage)`
    pub fn percentage_dimensions(
        width: u32,
        height: u32,
        percentage: f32,
    ) -> Result<(u32, u32), ImagingError> {
        if !percentage.is_finite() || percentage <= 0.0 {
            return Err(ImagingError::invalid_parameter(format!(
                "percentage must be a positive number, got {}",
                percentage
            )));
        }

        let scale = f64::from(percentage);
        let new_width = (f64::from(width) * scale).floor();
        let new_height = (f64::from(height) * scale).floor();

        if new_width < 1.0 || new_height < 1.0 {
            return Err(ImagingError::invalid_parameter(format!(
                "scaling {}x{} by {} leaves no pixels",
                width, height, percentage
            )));
        }
        if new_width > f64::from(u32::MAX) || new_height > f64::from(u32::MAX) {
            return Err(ImagingError::invalid_parameter(format!(
                "scaling {}x{} by {} is too large",
                width, height, percentage
            )));
        }

        Ok((new_width as u32, new_height as u32))
    }

    pub fn resize_by_percentage(
        img: &DynamicImage,
        percentage: f32,
        max_pixels: u64,
    ) -> Result<DynamicImage, ImagingError> {
        let (width, height) = img.dimensions();
        let (new_width, new_height) = Self::percentage_dimensions(width, height, percentage)?;
        Self::resize_exact(img, new_width, new_height, max_pixels)
    }

    /// Largest size with the source aspect ratio that fits a `max_dimension` square
    pub fn thumbnail_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
        let bound = f64::from(max_dimension);
        let ratio = (bound / f64::from(width)).min(bound / f64::from(height));
        let fit = |side: u32| (f64::from(side) * ratio).round().clamp(1.0, bound) as u32;
        (fit(width), fit(height))
    }

    /// Fit-within-box resize: the longer side becomes `max_dimension`
    pub fn thumbnail(
        img: &DynamicImage,
        max_dimension: u32,
        max_pixels: u64,
    ) -> Result<DynamicImage, ImagingError> {
        if max_dimension == 0 {
            return Err(ImagingError::invalid_parameter("thumbnail size must be positive"));
        }

        let (src_width, src_height) = img.dimensions();
        let (width, height) = Self::thumbnail_dimensions(src_width, src_height, max_dimension);
        Self::resize_exact(img, width, height, max_pixels)
    }
}
