//! ImageHelper processing
//!
//! Downloads images, applies a single transformation and re-encodes the
//! result. Start with [`ImagePipeline`].

pub mod codec;
pub mod fetch;
pub mod image;
pub mod pipeline;

pub use codec::EncodeOptions;
pub use fetch::{Fetcher, HttpFetcher};
pub use pipeline::ImagePipeline;

pub use crate::image::{FontResolver, ImageTransformer, SystemFontResolver, TransformContext};

// Re-export the request/result types so callers need a single dependency
pub use imagehelper_core::{
    ErrorMetadata, FlipAxis, ImageFormat, ImageSource, ImagingConfig, ImagingError, Operation,
    OperationResult, OutputOptions, TransformRequest, UploadFile,
};
