//! Asset retrieval: renderable projections and downloads.
//!
//! Download paths are whatever the uploader typed into the form. Without a
//! configured download root the decoded path is opened as-is, anywhere on
//! the local filesystem. With a root, the path must be relative and free of
//! `..`, `.` and prefix components, and is resolved beneath the root.

use crate::error::store_error;
use gamehub_core::{EntryDetails, Error, RenderableEntry, RenderableSummary, Result};
use gamehub_storage::Storage;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

const GAME_NOT_FOUND: &str = "Game not found";
const FILE_NOT_FOUND: &str = "File not found";
const INVALID_DOWNLOAD_PATH: &str = "Invalid download path";

#[derive(Clone)]
pub struct RetrievalPipeline {
    storage: Storage,
    download_root: Option<PathBuf>,
}

/// A resolved download, checked to be a regular file
#[derive(Debug)]
pub struct Download {
    /// Last segment of the decoded path
    pub file_name: String,
    pub path: PathBuf,
    pub len: u64,
}

impl Download {
    /// `Content-Disposition` value suggesting the original filename
    pub fn content_disposition(&self) -> String {
        content_disposition(&self.file_name)
    }
}

impl RetrievalPipeline {
    pub fn new(storage: Storage, download_root: Option<PathBuf>) -> Self {
        Self {
            storage,
            download_root,
        }
    }

    /// Entry with its cover and screenshots transport-encoded.
    ///
    /// A store failure in either lookup fails the whole call.
    pub async fn renderable_entry(&self, id: &str) -> Result<RenderableEntry> {
        let entry = self
            .storage
            .get_entry(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| Error::not_found(GAME_NOT_FOUND))?;

        let screenshots = self
            .storage
            .list_screenshots(id)
            .await
            .map_err(store_error)?;

        Ok(RenderableEntry::from_parts(entry, &screenshots))
    }

    pub async fn renderable_list(&self) -> Result<Vec<RenderableSummary>> {
        let entries = self.storage.list_entries().await.map_err(store_error)?;
        Ok(entries.into_iter().map(RenderableSummary::from).collect())
    }

    /// Scalar fields for the edit form
    pub async fn entry_details(&self, id: &str) -> Result<EntryDetails> {
        self.storage
            .get_entry_details(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| Error::not_found(GAME_NOT_FOUND))
    }

    /// Resolve an entry's stored download path and check it names a file
    pub async fn download(&self, id: &str) -> Result<Download> {
        let details = self.entry_details(id).await?;

        let decoded = decode_download_path(&details.download_path)?;
        let file_name =
            download_file_name(&decoded).ok_or_else(|| Error::not_found(FILE_NOT_FOUND))?;
        let path = match &self.download_root {
            Some(root) => confine_to_root(root, &decoded)?,
            None => PathBuf::from(&decoded),
        };

        let metadata = tokio::fs::metadata(&path).await.map_err(|e| {
            debug!(id, path = %path.display(), error = %e, "download stat failed");
            Error::not_found(FILE_NOT_FOUND)
        })?;
        if !metadata.is_file() {
            return Err(Error::not_found(FILE_NOT_FOUND));
        }

        info!(id, name = %details.name, path = %path.display(), size = metadata.len(), "serving download");
        Ok(Download {
            file_name,
            path,
            len: metadata.len(),
        })
    }
}

/// Query-unescape a stored path: `+` is a space, `%XX` must be two hex
/// digits, and the result must be UTF-8
pub fn decode_download_path(raw: &str) -> Result<String> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(Error::bad_request(INVALID_DOWNLOAD_PATH));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| Error::bad_request(INVALID_DOWNLOAD_PATH))
}

/// Final path segment, used as the suggested filename
pub fn download_file_name(decoded: &str) -> Option<String> {
    Path::new(decoded)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn confine_to_root(root: &Path, decoded: &str) -> Result<PathBuf> {
    let relative = Path::new(decoded);
    let safe = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));

    if !safe || decoded.is_empty() {
        return Err(Error::bad_request(INVALID_DOWNLOAD_PATH));
    }

    Ok(root.join(relative))
}

/// Quoted-string filename. Control characters become spaces so the value
/// is always a valid header.
fn content_disposition(file_name: &str) -> String {
    let mut quoted = String::with_capacity(file_name.len());
    for c in file_name.chars() {
        match c {
            '\\' | '"' => {
                quoted.push('\\');
                quoted.push(c);
            }
            c if c.is_control() => quoted.push(' '),
            c => quoted.push(c),
        }
    }
    format!("attachment; filename=\"{}\"", quoted)
}
