//! ImageHelper Core Library
//!
//! Shared types for the imaging pipeline: output formats, operation requests,
//! results, error types and configuration.

pub mod config;
pub mod error;
pub mod format;
pub mod models;

// Re-export commonly used types
pub use config::{
    check_output_size, ImagingConfig, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_OUTPUT_PIXELS,
};
pub use error::{ErrorMetadata, ImagingError, LogLevel};
pub use format::ImageFormat;
pub use models::{
    unique_file_name, FlipAxis, ImageSource, Operation, OperationResult, OutputOptions,
    TransformRequest, UploadFile,
};
