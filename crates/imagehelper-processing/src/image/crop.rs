use image::{DynamicImage, GenericImageView};
use imagehelper_core::ImagingError;

/// Rectangular region in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Reject empty rectangles and rectangles reaching outside `width`x`height`.
    /// Never clamps.
    pub fn check_within(&self, width: u32, height: u32) -> Result<(), ImagingError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImagingError::invalid_parameter(format!(
                "crop rectangle must have a positive area, got {}x{}",
                self.width, self.height
            )));
        }

        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        if right > u64::from(width) || bottom > u64::from(height) {
            return Err(ImagingError::invalid_parameter(format!(
                "crop rectangle {}x{} at ({}, {}) exceeds image bounds {}x{}",
                self.width, self.height, self.x, self.y, width, height
            )));
        }

        Ok(())
    }
}

pub struct ImageCrop;

impl ImageCrop {
    pub fn crop(img: &DynamicImage, rect: CropRect) -> Result<DynamicImage, ImagingError> {
        let (width, height) = img.dimensions();
        rect.check_within(width, height)?;

        tracing::debug!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Applying crop"
        );

        Ok(img.crop_imm(rect.x, rect.y, rect.width, rect.height))
    }
}
