//! Catalog entry domain model

use crate::codec::encode_image;

/// One catalog item as persisted in the `games` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub cover_image: Option<Vec<u8>>,
    /// Opaque filesystem path, percent-encoded by convention
    pub download_path: String,
}

/// Lightweight listing projection (no description, path or screenshots)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub id: i64,
    pub name: String,
    pub cover_image: Option<Vec<u8>>,
}

/// Scalar fields only, used to pre-fill the edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDetails {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub download_path: String,
}

/// Fields for a new entry. Blank names and descriptions are accepted.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub name: String,
    pub description: String,
    pub cover_image: Option<Vec<u8>>,
    pub download_path: String,
}

/// Full overwrite of an entry's fields.
///
/// The cover is replaced only when `cover_image` holds a non-empty blob.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdate {
    pub name: String,
    pub description: String,
    pub cover_image: Option<Vec<u8>>,
    pub download_path: String,
}

impl EntryUpdate {
    /// The replacement cover, if this update carries one
    pub fn replacement_cover(&self) -> Option<&[u8]> {
        self.cover_image.as_deref().filter(|bytes| !bytes.is_empty())
    }
}

/// Detail-page projection with transport-encoded images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableEntry {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub download_path: String,
    pub cover: Option<String>,
    pub screenshots: Vec<String>,
}

impl RenderableEntry {
    /// Encode an entry and its screenshots, keeping screenshot order
    pub fn from_parts(entry: Entry, screenshots: &[Vec<u8>]) -> Self {
        Self {
            cover: encode_image(entry.cover_image.as_deref()),
            screenshots: screenshots
                .iter()
                .filter_map(|blob| encode_image(Some(blob)))
                .collect(),
            id: entry.id,
            name: entry.name,
            description: entry.description,
            download_path: entry.download_path,
        }
    }
}

/// Listing projection with the cover transport-encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableSummary {
    pub id: i64,
    pub name: String,
    pub cover: Option<String>,
}

impl From<EntrySummary> for RenderableSummary {
    fn from(summary: EntrySummary) -> Self {
        Self {
            cover: encode_image(summary.cover_image.as_deref()),
            id: summary.id,
            name: summary.name,
        }
    }
}
