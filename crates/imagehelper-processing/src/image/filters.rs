use image::DynamicImage;
use imagehelper_core::ImagingError;

pub struct ImageFilters;

impl ImageFilters {
    /// Desaturate every pixel. Alpha, if present, is kept.
    pub fn grayscale(img: &DynamicImage) -> DynamicImage {
        tracing::debug!("Applying grayscale");
        img.grayscale()
    }

    /// Gaussian unsharp mask with `amount` as the blur sigma
    pub fn sharpen(img: &DynamicImage, amount: f32) -> Result<DynamicImage, ImagingError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ImagingError::invalid_parameter(format!(
                "sharpen amount must be a positive number, got {}",
                amount
            )));
        }

        tracing::debug!(amount, "Applying gaussian sharpen");
        Ok(img.unsharpen(amount, 0))
    }
}
