//! Operation results
//!
//! `OperationResult` exposes one encoded buffer three ways: the raw bytes,
//! their base64 text, and an upload-ready file wrapper. All three are built
//! from the same `Bytes` at construction and the value is never mutated.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use std::io::Cursor;
use uuid::Uuid;

use crate::format::ImageFormat;

/// Form field name used for uploaded images
pub const UPLOAD_FIELD_NAME: &str = "image";

/// Build `<name>.<extension>`, generating a UUID when the name is absent or blank.
/// A non-blank name is kept exactly as given.
pub fn unique_file_name(name: Option<&str>, format: ImageFormat) -> String {
    let base = match name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    format!("{}.{}", base, format.extension())
}

/// Upload-ready file: content, file name and declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    field_name: &'static str,
    file_name: String,
    content_type: &'static str,
    content: Bytes,
}

impl UploadFile {
    pub fn field_name(&self) -> &str {
        self.field_name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        self.content_type
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Fresh reader positioned at the start of the content
    pub fn reader(&self) -> Cursor<Bytes> {
        Cursor::new(self.content.clone())
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    bytes: Bytes,
    base64: String,
    file: UploadFile,
    format: ImageFormat,
}

impl OperationResult {
    pub fn new(bytes: impl Into<Bytes>, file_name: impl Into<String>, format: ImageFormat) -> Self {
        let bytes = bytes.into();
        let base64 = STANDARD.encode(&bytes);
        let file = UploadFile {
            field_name: UPLOAD_FIELD_NAME,
            file_name: file_name.into(),
            content_type: format.to_mime_type(),
            content: bytes.clone(),
        };

        Self {
            bytes,
            base64,
            file,
            format,
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn base64(&self) -> &str {
        &self.base64
    }

    pub fn file(&self) -> &UploadFile {
        &self.file
    }

    pub fn file_name(&self) -> &str {
        self.file.file_name()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
