use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::operation::Operation;
use crate::error::ImagingError;
use crate::format::ImageFormat;

/// Where the source image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Url(String),
    Bytes(Bytes),
}

impl From<&str> for ImageSource {
    fn from(url: &str) -> Self {
        ImageSource::Url(url.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(url: String) -> Self {
        ImageSource::Url(url)
    }
}

impl From<Bytes> for ImageSource {
    fn from(data: Bytes) -> Self {
        ImageSource::Bytes(data)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(data: Vec<u8>) -> Self {
        ImageSource::Bytes(Bytes::from(data))
    }
}

/// Output settings shared by every operation.
///
/// `format: None` means the configured default (PNG unless overridden);
/// `file_name: None` or a blank name means a freshly generated UUID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputOptions {
    #[serde(default)]
    pub format: Option<ImageFormat>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl OutputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

/// A single transformation call: built per call, consumed once by the pipeline
#[derive(Debug, Clone)]
pub struct TransformRequest {
    source: Option<ImageSource>,
    operation: Operation,
    output: OutputOptions,
}

impl TransformRequest {
    pub fn new(source: impl Into<ImageSource>, operation: Operation) -> Self {
        Self {
            source: Some(source.into()),
            operation,
            output: OutputOptions::default(),
        }
    }

    pub fn qr_code(text: impl Into<String>, size: u32) -> Self {
        Self {
            source: None,
            operation: Operation::QrCode {
                text: text.into(),
                size,
            },
            output: OutputOptions::default(),
        }
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.output.format = Some(format);
        self
    }

    /// Select the output format by name (`"png"`, `"jpg"`, ...).
    /// Fails with `UnsupportedFormat` for anything outside PNG/JPEG/BMP.
    pub fn with_format_name(self, name: &str) -> Result<Self, ImagingError> {
        let format = ImageFormat::parse(name)?;
        Ok(self.with_format(format))
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.output.file_name = Some(name.into());
        self
    }

    pub fn source(&self) -> Option<&ImageSource> {
        self.source.as_ref()
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn output(&self) -> &OutputOptions {
        &self.output
    }

    pub fn into_parts(self) -> (Option<ImageSource>, Operation, OutputOptions) {
        (self.source, self.operation, self.output)
    }
}
