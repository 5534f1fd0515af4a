use gamehub_core::{Entry, EntryDetails, EntrySummary};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub(crate) struct EntryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub download_path: Option<String>,
}

impl From<EntryRow> for Entry {
    fn from(row: EntryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            cover_image: row.image_data,
            download_path: row.download_path.unwrap_or_default(),
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SummaryRow {
    pub id: i64,
    pub name: String,
    pub image_data: Option<Vec<u8>>,
}

impl From<SummaryRow> for EntrySummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            cover_image: row.image_data,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct DetailsRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub download_path: Option<String>,
}

impl From<DetailsRow> for EntryDetails {
    fn from(row: DetailsRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description.unwrap_or_default(),
            download_path: row.download_path.unwrap_or_default(),
        }
    }
}
