//! Download → decode → transform → encode pipeline
//!
//! Every operation goes through `ImagePipeline::run`. The fetch is awaited on
//! the calling task; decoding, the mutation and encoding run on the blocking
//! pool. Either a complete `OperationResult` comes back or an error does.

use bytes::Bytes;
use imagehelper_core::{
    unique_file_name, ErrorMetadata, FlipAxis, ImageSource, ImagingConfig, ImagingError, LogLevel,
    Operation, OperationResult, OutputOptions, TransformRequest,
};
use std::sync::Arc;

use crate::codec::{self, EncodeOptions};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::image::{FontResolver, ImageTransformer, SystemFontResolver, TransformContext};

/// Shared entry point for all image operations. Cheap to clone; holds no
/// per-call state, so concurrent calls are independent.
#[derive(Clone)]
pub struct ImagePipeline {
    fetcher: Arc<dyn Fetcher>,
    fonts: Arc<dyn FontResolver>,
    config: Arc<ImagingConfig>,
}

impl ImagePipeline {
    pub fn new(config: ImagingConfig) -> Result<Self, ImagingError> {
        config.validate()?;
        let fetcher = HttpFetcher::new(&config)?;

        Ok(Self {
            fetcher: Arc::new(fetcher),
            fonts: Arc::new(SystemFontResolver::new()),
            config: Arc::new(config),
        })
    }

    pub fn from_env() -> Result<Self, ImagingError> {
        Self::new(ImagingConfig::from_env()?)
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_font_resolver(mut self, fonts: Arc<dyn FontResolver>) -> Self {
        self.fonts = fonts;
        self
    }

    pub fn config(&self) -> &ImagingConfig {
        &self.config
    }

    /// Run one transformation request to completion
    #[tracing::instrument(skip(self, request), fields(operation = request.operation().name()))]
    pub async fn run(&self, request: TransformRequest) -> Result<OperationResult, ImagingError> {
        let operation = request.operation().name();
        let result = self.execute(request).await;
        if let Err(ref err) = result {
            log_failure(operation, err);
        }
        result
    }

    async fn execute(&self, request: TransformRequest) -> Result<OperationResult, ImagingError> {
        let (source, operation, output) = request.into_parts();
        operation.validate()?;
        operation.check_output_limit(self.config.max_output_pixels)?;

        let format = output.format.unwrap_or(self.config.default_format);
        let file_name = unique_file_name(output.file_name.as_deref(), format);

        let source_data = if operation.requires_source() {
            let source = source.ok_or_else(|| {
                ImagingError::invalid_parameter(format!(
                    "{} requires a source image",
                    operation.name()
                ))
            })?;
            Some(self.acquire(source).await?)
        } else {
            None
        };

        let fonts = Arc::clone(&self.fonts);
        let config = Arc::clone(&self.config);
        let encoded = tokio::task::spawn_blocking(move || {
            let ctx = TransformContext {
                config: config.as_ref(),
                fonts: fonts.as_ref(),
            };
            let img = match source_data {
                Some(data) => {
                    let img = codec::decode(&data)?;
                    tracing::debug!(
                        width = img.width(),
                        height = img.height(),
                        "Decoded source image"
                    );
                    ImageTransformer::apply(img, &operation, &ctx)?
                }
                None => ImageTransformer::synthesize(&operation, &ctx)?,
            };

            codec::encode(
                &img,
                format,
                EncodeOptions {
                    jpeg_quality: config.jpeg_quality,
                },
            )
        })
        .await
        .map_err(|e| ImagingError::Internal(format!("image worker failed: {}", e)))??;

        tracing::info!(
            file_name = %file_name,
            format = %format,
            size_bytes = encoded.len(),
            "Image operation completed"
        );

        Ok(OperationResult::new(encoded, file_name, format))
    }

    async fn acquire(&self, source: ImageSource) -> Result<Bytes, ImagingError> {
        match source {
            ImageSource::Url(url) => self.fetcher.fetch(&url).await,
            ImageSource::Bytes(data) => Ok(data),
        }
    }

    pub async fn resize(
        &self,
        source: impl Into<ImageSource>,
        width: u32,
        height: u32,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(TransformRequest::new(source, Operation::Resize { width, height }).with_output(output))
            .await
    }

    pub async fn resize_by_percentage(
        &self,
        source: impl Into<ImageSource>,
        percentage: f32,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(
            TransformRequest::new(source, Operation::ResizeByPercentage { percentage })
                .with_output(output),
        )
        .await
    }

    pub async fn change_format(
        &self,
        source: impl Into<ImageSource>,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(TransformRequest::new(source, Operation::ChangeFormat).with_output(output))
            .await
    }

    pub async fn crop(
        &self,
        source: impl Into<ImageSource>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        let operation = Operation::Crop {
            x,
            y,
            width,
            height,
        };
        self.run(TransformRequest::new(source, operation).with_output(output))
            .await
    }

    pub async fn rotate(
        &self,
        source: impl Into<ImageSource>,
        degrees: f32,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(TransformRequest::new(source, Operation::Rotate { degrees }).with_output(output))
            .await
    }

    /// `font_name` and `font_size` fall back to the configured watermark defaults
    pub async fn add_watermark(
        &self,
        source: impl Into<ImageSource>,
        text: &str,
        font_name: Option<&str>,
        font_size: Option<u32>,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        let operation = Operation::Watermark {
            text: text.to_string(),
            font_name: font_name.map(str::to_string),
            font_size,
        };
        self.run(TransformRequest::new(source, operation).with_output(output))
            .await
    }

    pub async fn convert_to_grayscale(
        &self,
        source: impl Into<ImageSource>,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(TransformRequest::new(source, Operation::Grayscale).with_output(output))
            .await
    }

    pub async fn flip(
        &self,
        source: impl Into<ImageSource>,
        axis: FlipAxis,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(TransformRequest::new(source, Operation::Flip { axis }).with_output(output))
            .await
    }

    pub async fn sharpen(
        &self,
        source: impl Into<ImageSource>,
        amount: f32,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(TransformRequest::new(source, Operation::Sharpen { amount }).with_output(output))
            .await
    }

    pub async fn generate_thumbnail(
        &self,
        source: impl Into<ImageSource>,
        max_dimension: u32,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(
            TransformRequest::new(source, Operation::Thumbnail { max_dimension })
                .with_output(output),
        )
        .await
    }

    pub async fn generate_qr_code(
        &self,
        text: &str,
        size: u32,
        output: OutputOptions,
    ) -> Result<OperationResult, ImagingError> {
        self.run(TransformRequest::qr_code(text, size).with_output(output))
            .await
    }
}

fn log_failure(operation: &str, err: &ImagingError) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(operation, error_code = code, error = %err, "Image operation failed"),
        LogLevel::Warn => tracing::warn!(operation, error_code = code, error = %err, "Image operation failed"),
        LogLevel::Error => tracing::error!(operation, error_code = code, error = %err, "Image operation failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
    use imagehelper_core::ImageFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves one fixed body and counts calls
    struct StaticFetcher {
        body: Bytes,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes, ImagingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.body.clone())
        }
    }

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255])));
        Bytes::from(codec::encode(&img, ImageFormat::Png, EncodeOptions::default()).unwrap())
    }

    fn pipeline_with(fetcher: Arc<StaticFetcher>) -> ImagePipeline {
        ImagePipeline::new(ImagingConfig::default())
            .unwrap()
            .with_fetcher(fetcher)
    }

    #[tokio::test]
    async fn test_url_source_goes_through_fetcher() {
        let fetcher = Arc::new(StaticFetcher {
            body: png_bytes(40, 20),
            calls: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(fetcher.clone());

        let result = pipeline
            .rotate("https://images.test/a.png", 90.0, OutputOptions::new())
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        let decoded = codec::decode(result.bytes()).unwrap();
        assert_eq!(decoded.dimensions(), (20, 40));
    }

    #[tokio::test]
    async fn test_byte_source_skips_fetcher() {
        let fetcher = Arc::new(StaticFetcher {
            body: Bytes::new(),
            calls: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(fetcher.clone());

        let result = pipeline
            .change_format(png_bytes(8, 8), OutputOptions::new().format(ImageFormat::Bmp))
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.format(), ImageFormat::Bmp);
        assert!(result.file_name().ends_with(".bmp"));
    }

    #[tokio::test]
    async fn test_qr_code_never_fetches() {
        let fetcher = Arc::new(StaticFetcher {
            body: Bytes::new(),
            calls: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(fetcher.clone());

        let result = pipeline
            .generate_qr_code("hello", 120, OutputOptions::new().file_name("qr"))
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.file_name(), "qr.png");
        assert_eq!(codec::decode(result.bytes()).unwrap().dimensions(), (120, 120));
    }

    #[tokio::test]
    async fn test_default_format_comes_from_config() {
        let config = ImagingConfig {
            default_format: ImageFormat::Jpeg,
            ..ImagingConfig::default()
        };
        let pipeline = ImagePipeline::new(config).unwrap();

        let result = pipeline
            .convert_to_grayscale(png_bytes(4, 4), OutputOptions::new())
            .await
            .unwrap();

        assert_eq!(result.format(), ImageFormat::Jpeg);
        assert_eq!(result.file().content_type(), "image/jpeg");
        assert_eq!(
            image::guess_format(result.bytes()).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[tokio::test]
    async fn test_empty_bytes_fail_to_decode() {
        let pipeline = ImagePipeline::new(ImagingConfig::default()).unwrap();
        let err = pipeline
            .crop(Bytes::from_static(b""), 0, 0, 1, 1, OutputOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ImagingError::Decode(_)));
    }

    #[tokio::test]
    async fn test_parameters_checked_before_fetch() {
        let fetcher = Arc::new(StaticFetcher {
            body: png_bytes(4, 4),
            calls: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(fetcher.clone());

        let err = pipeline
            .resize("https://images.test/a.png", 0, 10, OutputOptions::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ImagingError::InvalidParameter(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_outputs_fail_before_fetch() {
        let fetcher = Arc::new(StaticFetcher {
            body: png_bytes(4, 4),
            calls: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(fetcher.clone());

        let err = pipeline
            .generate_qr_code("hello", u32::MAX, OutputOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ImagingError::InvalidParameter(_)));

        let err = pipeline
            .resize(
                "https://images.test/a.png",
                u32::MAX,
                u32::MAX,
                OutputOptions::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ImagingError::InvalidParameter(_)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_outputs_from_source_size_fail_cleanly() {
        let fetcher = Arc::new(StaticFetcher {
            body: png_bytes(4, 4),
            calls: AtomicUsize::new(0),
        });
        let pipeline = pipeline_with(fetcher);

        let err = pipeline
            .resize_by_percentage("https://images.test/a.png", 1e6, OutputOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ImagingError::InvalidParameter(_)));

        let err = pipeline
            .generate_thumbnail("https://images.test/a.png", u32::MAX, OutputOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ImagingError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = ImagingConfig {
            jpeg_quality: 0,
            ..ImagingConfig::default()
        };
        assert!(matches!(
            ImagePipeline::new(config),
            Err(ImagingError::Config(_))
        ));
    }
}
