use image::{imageops, DynamicImage, Rgba, RgbaImage};
use imagehelper_core::{check_output_size, FlipAxis, ImagingError};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

/// Image orientation operations (rotation and flipping)
pub struct ImageOrientation;

impl ImageOrientation {
    /// Rotate clockwise by `degrees`.
    ///
    /// Quarter turns are lossless. Any other angle grows the canvas to the
    /// rotated bounding box and leaves the uncovered corners transparent;
    /// that canvas may hold at most `max_pixels` pixels.
    pub fn rotate(
        img: DynamicImage,
        degrees: f32,
        max_pixels: u64,
    ) -> Result<DynamicImage, ImagingError> {
        if !degrees.is_finite() {
            return Err(ImagingError::invalid_parameter(format!(
                "rotation angle must be finite, got {}",
                degrees
            )));
        }

        let normalized = degrees.rem_euclid(360.0);
        tracing::debug!(degrees, normalized, "Applying rotation");

        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        if normalized == 0.0 || normalized == 360.0 {
            return Ok(img);
        }
        if normalized == 90.0 {
            return Ok(img.rotate90());
        }
        if normalized == 180.0 {
            return Ok(img.rotate180());
        }
        if normalized == 270.0 {
            return Ok(img.rotate270());
        }

        let (canvas_width, canvas_height) =
            Self::rotated_bounds(img.width(), img.height(), normalized);
        check_output_size(canvas_width, canvas_height, max_pixels)?;

        Ok(DynamicImage::ImageRgba8(Self::rotate_expanded(
            &img.to_rgba8(),
            normalized,
        )))
    }

    /// Canvas size needed to hold a `width`x`height` image rotated by `degrees`
    pub fn rotated_bounds(width: u32, height: u32, degrees: f32) -> (u32, u32) {
        let theta = f64::from(degrees).to_radians();
        let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
        let (w, h) = (f64::from(width), f64::from(height));

        // Trim float noise so e.g. 100.0000001 does not become 101
        let fit = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
        (fit(w * cos + h * sin), fit(w * sin + h * cos))
    }

    fn rotate_expanded(src: &RgbaImage, degrees: f32) -> RgbaImage {
        let (width, height) = src.dimensions();
        let (canvas_width, canvas_height) = Self::rotated_bounds(width, height, degrees);

        let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, Rgba([0, 0, 0, 0]));
        let offset_x = (i64::from(canvas_width) - i64::from(width)) / 2;
        let offset_y = (i64::from(canvas_height) - i64::from(height)) / 2;
        imageops::replace(&mut canvas, src, offset_x, offset_y);

        rotate_about_center(
            &canvas,
            degrees.to_radians(),
            Interpolation::Bilinear,
            Rgba([0, 0, 0, 0]),
        )
    }

    pub fn flip(img: DynamicImage, axis: FlipAxis) -> DynamicImage {
        match axis {
            FlipAxis::Horizontal => Self::apply_flip_horizontal(img),
            FlipAxis::Vertical => Self::apply_flip_vertical(img),
        }
    }

    /// Apply horizontal flip (mirror)
    pub fn apply_flip_horizontal(img: DynamicImage) -> DynamicImage {
        tracing::debug!("Applying horizontal flip (mirror)");
        img.fliph()
    }

    /// Apply vertical flip
    pub fn apply_flip_vertical(img: DynamicImage) -> DynamicImage {
        tracing::debug!("Applying vertical flip");
        img.flipv()
    }
}
