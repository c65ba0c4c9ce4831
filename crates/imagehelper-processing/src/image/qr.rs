//! QR code synthesis
//!
//! The symbol is drawn with a 4-module quiet zone at the largest whole-pixel
//! module size that fits, then centred on a white square of the requested size.

use image::{imageops, DynamicImage, GrayImage, Luma};
use imagehelper_core::{check_output_size, ImagingError};
use qrcode::{Color, QrCode};

/// Light modules required around the symbol
pub const QUIET_ZONE_MODULES: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

pub struct QrGenerator;

impl QrGenerator {
    /// Render `text` as a `size`x`size` grayscale image of at most `max_pixels` pixels
    pub fn generate(text: &str, size: u32, max_pixels: u64) -> Result<DynamicImage, ImagingError> {
        if text.is_empty() {
            return Err(ImagingError::invalid_parameter("QR code text is empty"));
        }
        check_output_size(size, size, max_pixels)?;

        let code = QrCode::new(text.as_bytes()).map_err(|e| {
            ImagingError::invalid_parameter(format!("text cannot be encoded as a QR code: {}", e))
        })?;

        let modules = code.width() as u32;
        let total_modules = modules + 2 * QUIET_ZONE_MODULES;
        let module_px = size / total_modules;
        if module_px == 0 {
            return Err(ImagingError::invalid_parameter(format!(
                "QR code needs at least {}x{} pixels, got {}x{}",
                total_modules, total_modules, size, size
            )));
        }

        tracing::debug!(size, modules, module_px, "Rendering QR code");

        let symbol_px = total_modules * module_px;
        let mut symbol = GrayImage::from_pixel(symbol_px, symbol_px, LIGHT);
        for (index, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let module_x = index as u32 % modules + QUIET_ZONE_MODULES;
            let module_y = index as u32 / modules + QUIET_ZONE_MODULES;
            for dy in 0..module_px {
                for dx in 0..module_px {
                    symbol.put_pixel(module_x * module_px + dx, module_y * module_px + dy, DARK);
                }
            }
        }

        let mut canvas = GrayImage::from_pixel(size, size, LIGHT);
        let offset = i64::from((size - symbol_px) / 2);
        imageops::replace(&mut canvas, &symbol, offset, offset);

        Ok(DynamicImage::ImageLuma8(canvas))
    }
}
