//! Error types module
//!
//! Every stage of the imaging pipeline fails fast with an `ImagingError`.
//! Callers either receive a fully populated result or one of these variants;
//! nothing is retried or substituted internally.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for caller mistakes like bad parameters
    Debug,
    /// Warning level - for problems with remote or supplied data
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be reported.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "REMOTE_FETCH_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same call may succeed
    fn is_recoverable(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("Failed to download image from URL {url}: {message}")]
    RemoteFetch {
        url: String,
        /// HTTP status when the server answered, `None` for transport failures
        status: Option<u16>,
        message: String,
    },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Font not available: {0}")]
    FontResolution(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ImagingError {
    pub fn remote_fetch(url: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        ImagingError::RemoteFetch {
            url: url.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        ImagingError::InvalidParameter(message.into())
    }

    /// HTTP status returned by the remote server, if the failure was a status error
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            ImagingError::RemoteFetch { status, .. } => *status,
            _ => None,
        }
    }
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
fn imaging_error_static_metadata(err: &ImagingError) -> (&'static str, bool, LogLevel) {
    match err {
        ImagingError::RemoteFetch { .. } => ("REMOTE_FETCH_ERROR", true, LogLevel::Warn),
        ImagingError::Decode(_) => ("DECODE_ERROR", false, LogLevel::Warn),
        ImagingError::UnsupportedFormat(_) => ("UNSUPPORTED_FORMAT", false, LogLevel::Debug),
        ImagingError::FontResolution(_) => ("FONT_RESOLUTION_ERROR", false, LogLevel::Warn),
        ImagingError::InvalidParameter(_) => ("INVALID_PARAMETER", false, LogLevel::Debug),
        ImagingError::Encode(_) => ("ENCODE_ERROR", false, LogLevel::Error),
        ImagingError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
        ImagingError::Internal(_) => ("INTERNAL_ERROR", false, LogLevel::Error),
    }
}

impl ErrorMetadata for ImagingError {
    fn error_code(&self) -> &'static str {
        imaging_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        imaging_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        imaging_error_static_metadata(self).2
    }
}
