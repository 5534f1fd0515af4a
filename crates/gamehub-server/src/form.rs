//! Multipart submission parsing
//!
//! The whole body is read into memory up front. A part is a file only when
//! it carries a non-empty filename, which is how browsers submit an empty
//! file input; such inputs therefore count as absent. The first occurrence
//! of a key wins.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use gamehub_core::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

pub const NAME_FIELD: &str = "name";
pub const DESCRIPTION_FIELD: &str = "description";
pub const DOWNLOAD_PATH_FIELD: &str = "download_path";
pub const IMAGE_FIELD: &str = "image";

/// Screenshot slots are `screenshot1` through `screenshot6`
pub const SCREENSHOT_SLOTS: usize = 6;

pub(crate) const PARSE_FORM_ERROR: &str = "Unable to parse form";

pub fn screenshot_field(slot: usize) -> String {
    format!("screenshot{}", slot)
}

/// Parsed form: scalar values and file parts by key
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    values: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.entry(key.into()).or_insert_with(|| value.into());
        self
    }

    pub fn with_file(mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.entry(key.into()).or_insert_with(|| bytes.into());
        self
    }

    /// Scalar value for `key`; missing keys read as empty
    pub fn value(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    /// File bytes for `key`, if a file part was submitted under it
    pub fn file(&self, key: &str) -> Option<&[u8]> {
        self.files.get(key).map(Vec::as_slice)
    }

    /// Read every part of a multipart body.
    ///
    /// Malformed encoding and bodies over the configured limit both fail
    /// with `BadRequest`.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::new();

        while let Some(field) = multipart.next_field().await.map_err(parse_error)? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field
                .file_name()
                .filter(|file_name| !file_name.is_empty())
                .map(str::to_string);

            match file_name {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(parse_error)?;
                    debug!(field = %name, file = %file_name, size = bytes.len(), "received file part");
                    form = form.with_file(name, bytes.to_vec());
                }
                None => {
                    let text = field.text().await.map_err(parse_error)?;
                    form = form.with_value(name, text);
                }
            }
        }

        Ok(form)
    }
}

fn parse_error(err: MultipartError) -> Error {
    debug!(error = %err, status = %err.status(), "rejecting multipart body");
    Error::bad_request(PARSE_FORM_ERROR)
}
