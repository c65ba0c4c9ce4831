//! Image processing module
//!
//! This module provides the single-step image operations:
//! - Geometry (resize, crop, orientation)
//! - Pixel filters (grayscale, sharpen)
//! - Text watermarks and font lookup
//! - QR code synthesis

pub mod crop;
pub mod filters;
pub mod fonts;
pub mod orientation;
pub mod qr;
pub mod resize;
pub mod transformer;
pub mod watermark;

pub use transformer::{ImageTransformer, TransformContext};

// Re-export commonly used types
pub use crop::{CropRect, ImageCrop};
pub use filters::ImageFilters;
pub use fonts::{FontResolver, SystemFontResolver};
pub use orientation::ImageOrientation;
pub use qr::QrGenerator;
pub use resize::ImageResize;
pub use watermark::{TextWatermark, Watermark};
