use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ImagingError;

/// Output container format for encoded images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Bmp];

    pub fn parse(s: &str) -> Result<Self, ImagingError> {
        match s.trim().to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "bmp" => Ok(ImageFormat::Bmp),
            _ => Err(ImagingError::UnsupportedFormat(s.to_string())),
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// File extension without the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Bmp => "bmp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = ImagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFormat::parse(s)
    }
}

impl TryFrom<String> for ImageFormat {
    type Error = ImagingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ImageFormat::parse(&value)
    }
}

impl From<ImageFormat> for String {
    fn from(format: ImageFormat) -> Self {
        format.extension().to_string()
    }
}
