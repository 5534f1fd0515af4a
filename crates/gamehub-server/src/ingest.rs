//! Asset ingestion: one multipart submission becomes one entry plus up to
//! six screenshots.
//!
//! Screenshot slots are best-effort. A missing slot or a store failure on
//! one slot is skipped and never fails the submission, so callers cannot
//! tell how many slots persisted. Writes are independent statements; a
//! failure part way leaves the entry with fewer screenshots.

use crate::error::store_error;
use crate::form::{
    DESCRIPTION_FIELD, DOWNLOAD_PATH_FIELD, IMAGE_FIELD, NAME_FIELD, SCREENSHOT_SLOTS,
    UploadForm, screenshot_field,
};
use gamehub_core::{EntryUpdate, Error, NewEntry, Result};
use gamehub_storage::Storage;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotWrite {
    /// New entries append
    Append,
    /// Updates go through insert-or-replace, which still appends
    ReplaceOrAdd,
}

#[derive(Clone)]
pub struct IngestPipeline {
    storage: Storage,
}

impl IngestPipeline {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Create an entry from a submission and return its id.
    ///
    /// The `image` file is required; scalar fields are taken as-is.
    pub async fn ingest(&self, form: &UploadForm) -> Result<i64> {
        let image = form
            .file(IMAGE_FIELD)
            .ok_or_else(|| Error::bad_request("Unable to get image"))?;

        let entry = NewEntry {
            name: form.value(NAME_FIELD).to_string(),
            description: form.value(DESCRIPTION_FIELD).to_string(),
            cover_image: Some(image.to_vec()),
            download_path: form.value(DOWNLOAD_PATH_FIELD).to_string(),
        };

        let id = self.storage.create_entry(&entry).await.map_err(store_error)?;
        let screenshots = self
            .store_screenshots(&id.to_string(), form, SlotWrite::Append)
            .await;

        info!(id, name = %entry.name, screenshots, "ingested entry");
        Ok(id)
    }

    /// Overwrite an existing entry from a submission.
    ///
    /// The cover changes only when a new `image` is supplied. An unknown id
    /// updates nothing and is not reported as an error.
    pub async fn reingest(&self, id: &str, form: &UploadForm) -> Result<()> {
        let update = EntryUpdate {
            name: form.value(NAME_FIELD).to_string(),
            description: form.value(DESCRIPTION_FIELD).to_string(),
            cover_image: form.file(IMAGE_FIELD).map(<[u8]>::to_vec),
            download_path: form.value(DOWNLOAD_PATH_FIELD).to_string(),
        };

        let affected = self
            .storage
            .update_entry(id, &update)
            .await
            .map_err(store_error)?;
        if affected == 0 {
            warn!(id, "update matched no entry");
        }

        let screenshots = self
            .store_screenshots(id, form, SlotWrite::ReplaceOrAdd)
            .await;

        info!(
            id,
            cover_replaced = update.replacement_cover().is_some(),
            screenshots,
            "updated entry"
        );
        Ok(())
    }

    /// Persist each readable slot; returns how many were stored
    async fn store_screenshots(&self, entry_id: &str, form: &UploadForm, mode: SlotWrite) -> usize {
        let mut stored = 0;

        for slot in 1..=SCREENSHOT_SLOTS {
            let key = screenshot_field(slot);
            let Some(bytes) = form.file(&key) else {
                debug!(entry_id, slot, "screenshot slot empty");
                continue;
            };

            let result = match mode {
                SlotWrite::Append => self.storage.add_screenshot(entry_id, bytes).await,
                SlotWrite::ReplaceOrAdd => {
                    self.storage.replace_or_add_screenshot(entry_id, bytes).await
                }
            };

            match result {
                Ok(_) => stored += 1,
                Err(e) => warn!(entry_id, slot, error = %e, "skipping screenshot slot"),
            }
        }

        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_pipeline() -> (IngestPipeline, Storage) {
        let storage = Storage::in_memory().await.unwrap();
        (IngestPipeline::new(storage.clone()), storage)
    }

    fn pong_form() -> UploadForm {
        UploadForm::new()
            .with_value(NAME_FIELD, "Pong")
            .with_value(DESCRIPTION_FIELD, "")
            .with_value(DOWNLOAD_PATH_FIELD, "pong.zip")
            .with_file(IMAGE_FIELD, b"0123456789".to_vec())
    }

    #[tokio::test]
    async fn test_ingest_first_entry() {
        let (pipeline, storage) = create_pipeline().await;

        let id = pipeline.ingest(&pong_form()).await.unwrap();
        assert_eq!(id, 1);

        let entry = storage.get_entry("1").await.unwrap().unwrap();
        assert_eq!(entry.name, "Pong");
        assert_eq!(entry.description, "");
        assert_eq!(entry.download_path, "pong.zip");
        assert_eq!(entry.cover_image.as_deref(), Some(&b"0123456789"[..]));
        assert!(storage.list_screenshots("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_ids_strictly_increase() {
        let (pipeline, _storage) = create_pipeline().await;

        let first = pipeline.ingest(&pong_form()).await.unwrap();
        let second = pipeline.ingest(&pong_form()).await.unwrap();
        let third = pipeline.ingest(&pong_form()).await.unwrap();

        assert!(first < second && second < third);
    }

    #[tokio::test]
    async fn test_ingest_requires_image() {
        let (pipeline, storage) = create_pipeline().await;
        let form = UploadForm::new().with_value(NAME_FIELD, "No cover");

        let err = pipeline.ingest(&form).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
        assert!(storage.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_counts_only_present_slots() {
        let (pipeline, storage) = create_pipeline().await;
        let form = pong_form()
            .with_file(screenshot_field(1), b"s1".to_vec())
            .with_file(screenshot_field(4), b"s4".to_vec())
            .with_file(screenshot_field(6), b"s6".to_vec())
            .with_value(screenshot_field(2), "not a file")
            .with_file("screenshot7", b"ignored".to_vec());

        let id = pipeline.ingest(&form).await.unwrap().to_string();

        let shots = storage.list_screenshots(&id).await.unwrap();
        assert_eq!(shots, vec![b"s1".to_vec(), b"s4".to_vec(), b"s6".to_vec()]);
    }

    #[tokio::test]
    async fn test_ingest_all_six_slots() {
        let (pipeline, storage) = create_pipeline().await;
        let mut form = pong_form();
        for slot in 1..=SCREENSHOT_SLOTS {
            form = form.with_file(screenshot_field(slot), vec![slot as u8]);
        }

        let id = pipeline.ingest(&form).await.unwrap().to_string();
        assert_eq!(storage.list_screenshots(&id).await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_reingest_without_image_keeps_cover() {
        let (pipeline, storage) = create_pipeline().await;
        let id = pipeline.ingest(&pong_form()).await.unwrap().to_string();

        let form = UploadForm::new()
            .with_value(NAME_FIELD, "Pong Deluxe")
            .with_value(DESCRIPTION_FIELD, "now in colour")
            .with_value(DOWNLOAD_PATH_FIELD, "deluxe.zip");
        pipeline.reingest(&id, &form).await.unwrap();

        let entry = storage.get_entry(&id).await.unwrap().unwrap();
        assert_eq!(entry.name, "Pong Deluxe");
        assert_eq!(entry.description, "now in colour");
        assert_eq!(entry.download_path, "deluxe.zip");
        assert_eq!(entry.cover_image.as_deref(), Some(&b"0123456789"[..]));
    }

    #[tokio::test]
    async fn test_reingest_with_image_replaces_cover() {
        let (pipeline, storage) = create_pipeline().await;
        let id = pipeline.ingest(&pong_form()).await.unwrap().to_string();

        let form = UploadForm::new()
            .with_value(NAME_FIELD, "Pong")
            .with_file(IMAGE_FIELD, b"new cover".to_vec());
        pipeline.reingest(&id, &form).await.unwrap();

        let entry = storage.get_entry(&id).await.unwrap().unwrap();
        assert_eq!(entry.cover_image.as_deref(), Some(&b"new cover"[..]));
    }

    #[tokio::test]
    async fn test_reingest_screenshots_accumulate() {
        let (pipeline, storage) = create_pipeline().await;
        let form = pong_form().with_file(screenshot_field(1), b"v1".to_vec());
        let id = pipeline.ingest(&form).await.unwrap().to_string();

        let update = UploadForm::new().with_file(screenshot_field(1), b"v2".to_vec());
        pipeline.reingest(&id, &update).await.unwrap();

        let shots = storage.list_screenshots(&id).await.unwrap();
        assert_eq!(shots, vec![b"v1".to_vec(), b"v2".to_vec()]);
    }

    #[tokio::test]
    async fn test_reingest_unknown_id_succeeds() {
        let (pipeline, storage) = create_pipeline().await;

        pipeline
            .reingest("99", &UploadForm::new().with_value(NAME_FIELD, "Ghost"))
            .await
            .unwrap();

        assert!(storage.get_entry("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ingest_survives_screenshot_store_failure() {
        let (pipeline, storage) = create_pipeline().await;
        sqlx::query("DROP TABLE screenshots")
            .execute(storage.pool())
            .await
            .unwrap();

        let form = pong_form()
            .with_file(screenshot_field(1), b"shot-1".to_vec())
            .with_file(screenshot_field(3), b"shot-3".to_vec());
        let id = pipeline.ingest(&form).await.unwrap();

        let entry = storage.get_entry(&id.to_string()).await.unwrap().unwrap();
        assert_eq!(entry.name, "Pong");
    }
}
