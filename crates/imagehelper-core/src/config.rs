//! Configuration module
//!
//! Documented defaults for everything the pipeline does not take per call.
//! `ImagingConfig::default()` needs no environment; `from_env` layers
//! `IMAGEHELPER_*` variables (and a `.env` file, if present) on top.

use std::env;
use std::time::Duration;

use crate::error::ImagingError;
use crate::format::ImageFormat;

/// JPEG encoder quality used when nothing else is configured
pub const DEFAULT_JPEG_QUALITY: u8 = 75;
/// Largest output image, in pixels, an operation may produce (50 MP)
pub const DEFAULT_MAX_OUTPUT_PIXELS: u64 = 50_000_000;
const WATERMARK_FONT: &str = "Arial";
const WATERMARK_FONT_SIZE: u32 = 24;
const USER_AGENT: &str = concat!("imagehelper/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, PartialEq)]
pub struct ImagingConfig {
    /// Output format when a request does not name one (PNG)
    pub default_format: ImageFormat,
    /// JPEG encoder quality, 1-100 (75)
    pub jpeg_quality: u8,
    /// Upper bound on `width * height` of any produced image (50 000 000).
    /// Requests that would exceed it fail with `InvalidParameter`.
    pub max_output_pixels: u64,
    /// Whole-request timeout for downloads. `None` leaves it to the transport.
    pub http_timeout: Option<Duration>,
    pub user_agent: String,
    /// Font family used by watermarks that do not name one (Arial)
    pub watermark_font: String,
    /// Watermark text size in pixels when not given (24)
    pub watermark_font_size: u32,
}

impl Default for ImagingConfig {
    fn default() -> Self {
        Self {
            default_format: ImageFormat::Png,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_output_pixels: DEFAULT_MAX_OUTPUT_PIXELS,
            http_timeout: None,
            user_agent: USER_AGENT.to_string(),
            watermark_font: WATERMARK_FONT.to_string(),
            watermark_font_size: WATERMARK_FONT_SIZE,
        }
    }
}

impl ImagingConfig {
    pub fn from_env() -> Result<Self, ImagingError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ImagingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_format = match lookup("IMAGEHELPER_DEFAULT_FORMAT") {
            Some(value) => ImageFormat::parse(&value)?,
            None => defaults.default_format,
        };

        let jpeg_quality = match lookup("IMAGEHELPER_JPEG_QUALITY") {
            Some(value) => value.trim().parse::<u8>().map_err(|_| {
                ImagingError::Config(format!(
                    "IMAGEHELPER_JPEG_QUALITY must be a number between 1 and 100, got {}",
                    value
                ))
            })?,
            None => defaults.jpeg_quality,
        };

        let max_output_pixels = match lookup("IMAGEHELPER_MAX_OUTPUT_PIXELS") {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                ImagingError::Config(format!(
                    "IMAGEHELPER_MAX_OUTPUT_PIXELS must be a whole number, got {}",
                    value
                ))
            })?,
            None => defaults.max_output_pixels,
        };

        let http_timeout = match lookup("IMAGEHELPER_HTTP_TIMEOUT_SECS") {
            Some(value) if !value.trim().is_empty() => {
                let secs = value.trim().parse::<u64>().map_err(|_| {
                    ImagingError::Config(format!(
                        "IMAGEHELPER_HTTP_TIMEOUT_SECS must be a whole number of seconds, got {}",
                        value
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            _ => defaults.http_timeout,
        };

        let watermark_font_size = match lookup("IMAGEHELPER_WATERMARK_FONT_SIZE") {
            Some(value) => value.trim().parse::<u32>().map_err(|_| {
                ImagingError::Config(format!(
                    "IMAGEHELPER_WATERMARK_FONT_SIZE must be a number, got {}",
                    value
                ))
            })?,
            None => defaults.watermark_font_size,
        };

        let config = Self {
            default_format,
            jpeg_quality,
            max_output_pixels,
            http_timeout,
            user_agent: lookup("IMAGEHELPER_USER_AGENT").unwrap_or(defaults.user_agent),
            watermark_font: lookup("IMAGEHELPER_WATERMARK_FONT")
                .unwrap_or(defaults.watermark_font),
            watermark_font_size,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ImagingError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ImagingError::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.max_output_pixels == 0 {
            return Err(ImagingError::Config(
                "maximum output pixels must be positive".to_string(),
            ));
        }
        if self.http_timeout == Some(Duration::ZERO) {
            return Err(ImagingError::Config(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }
        if self.watermark_font.trim().is_empty() {
            return Err(ImagingError::Config(
                "watermark font name must not be empty".to_string(),
            ));
        }
        if self.watermark_font_size == 0 {
            return Err(ImagingError::Config(
                "watermark font size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reject a `width`x`height` output larger than `max_pixels`
pub fn check_output_size(width: u32, height: u32, max_pixels: u64) -> Result<(), ImagingError> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels > max_pixels {
        return Err(ImagingError::invalid_parameter(format!(
            "output of {}x{} exceeds the limit of {} pixels",
            width, height, max_pixels
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ImagingConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ImagingConfig::default());
        assert_eq!(config.default_format, ImageFormat::Png);
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.max_output_pixels, 50_000_000);
        assert_eq!(config.http_timeout, None);
        assert_eq!(config.watermark_font, "Arial");
        assert_eq!(config.watermark_font_size, 24);
    }

    #[test]
    fn test_overrides() {
        let config = ImagingConfig::from_lookup(lookup_from(&[
            ("IMAGEHELPER_DEFAULT_FORMAT", "jpg"),
            ("IMAGEHELPER_JPEG_QUALITY", "90"),
            ("IMAGEHELPER_HTTP_TIMEOUT_SECS", "15"),
            ("IMAGEHELPER_WATERMARK_FONT", "DejaVu Sans"),
            ("IMAGEHELPER_WATERMARK_FONT_SIZE", "32"),
            ("IMAGEHELPER_MAX_OUTPUT_PIXELS", "1000000"),
        ]))
        .unwrap();

        assert_eq!(config.default_format, ImageFormat::Jpeg);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.http_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.watermark_font, "DejaVu Sans");
        assert_eq!(config.watermark_font_size, 32);
        assert_eq!(config.max_output_pixels, 1_000_000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ImagingConfig::from_lookup(lookup_from(&[("IMAGEHELPER_JPEG_QUALITY", "0")]))
            .unwrap_err();
        assert!(matches!(err, ImagingError::Config(_)));

        let err =
            ImagingConfig::from_lookup(lookup_from(&[("IMAGEHELPER_HTTP_TIMEOUT_SECS", "soon")]))
                .unwrap_err();
        assert!(matches!(err, ImagingError::Config(_)));

        let err =
            ImagingConfig::from_lookup(lookup_from(&[("IMAGEHELPER_MAX_OUTPUT_PIXELS", "0")]))
                .unwrap_err();
        assert!(matches!(err, ImagingError::Config(_)));

        let err = ImagingConfig::from_lookup(lookup_from(&[("IMAGEHELPER_DEFAULT_FORMAT", "gif")]))
            .unwrap_err();
        assert!(matches!(err, ImagingError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_check_output_size() {
        assert!(check_output_size(100, 100, 10_000).is_ok());
        assert!(matches!(
            check_output_size(100, 101, 10_000),
            Err(ImagingError::InvalidParameter(_))
        ));
        assert!(check_output_size(u32::MAX, u32::MAX, DEFAULT_MAX_OUTPUT_PIXELS).is_err());
    }
}
