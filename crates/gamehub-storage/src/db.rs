//! Database operations
//!
//! Identifiers arriving from the transport layer are bound as text. The
//! `id`/`game_id` columns have integer affinity, so numeric strings match
//! their row and anything else matches nothing.

use crate::models::{DetailsRow, EntryRow, SummaryRow};
use crate::Result;
use gamehub_core::{Entry, EntryDetails, EntrySummary, EntryUpdate, NewEntry};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const CREATE_GAMES: &str = r#"
CREATE TABLE IF NOT EXISTS games (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    image_data BLOB,
    download_path TEXT
)"#;

const CREATE_SCREENSHOTS: &str = r#"
CREATE TABLE IF NOT EXISTS screenshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_id INTEGER,
    image_data BLOB,
    FOREIGN KEY (game_id) REFERENCES games(id)
)"#;

/// Catalog store over a SQLite pool. Cheap to clone.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the database file and bootstrap the schema.
    ///
    /// `None` uses `gamehub.db` in the platform data directory.
    pub async fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(path) => path,
            None => default_db_path(),
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            // Screenshot rows carry no referential guarantee.
            .foreign_keys(false)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        debug!(path = %path.display(), "opened catalog database");

        Self::with_pool(pool).await
    }

    /// Private in-memory database, mainly for tests.
    pub async fn in_memory() -> Result<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(false);

        // Every connection to :memory: is a separate database, so pin one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        Self::with_pool(pool).await
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let storage = Self { pool };
        storage.migrate().await?;
        Ok(storage)
    }

    /// Create the tables if absent. Idempotent.
    async fn migrate(&self) -> Result<()> {
        sqlx::query(CREATE_GAMES).execute(&self.pool).await?;
        sqlx::query(CREATE_SCREENSHOTS).execute(&self.pool).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Insert a new entry and return its store-assigned id
    pub async fn create_entry(&self, entry: &NewEntry) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO games (name, description, image_data, download_path) VALUES (?, ?, ?, ?)",
        )
        .bind(&entry.name)
        .bind(&entry.description)
        .bind(entry.cover_image.as_deref())
        .bind(&entry.download_path)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn get_entry(&self, id: &str) -> Result<Option<Entry>> {
        let row: Option<EntryRow> = sqlx::query_as(
            "SELECT id, name, description, image_data, download_path FROM games WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Entry::from))
    }

    /// Scalar fields only; never loads the cover blob
    pub async fn get_entry_details(&self, id: &str) -> Result<Option<EntryDetails>> {
        let row: Option<DetailsRow> = sqlx::query_as(
            "SELECT id, name, description, download_path FROM games WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EntryDetails::from))
    }

    /// All entries in insertion order
    pub async fn list_entries(&self) -> Result<Vec<EntrySummary>> {
        let rows: Vec<SummaryRow> =
            sqlx::query_as("SELECT id, name, image_data FROM games ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(EntrySummary::from).collect())
    }

    /// Overwrite an entry's fields. The stored cover is kept unless the
    /// update carries a non-empty replacement.
    ///
    /// Returns the number of affected rows; an unknown id affects zero.
    pub async fn update_entry(&self, id: &str, update: &EntryUpdate) -> Result<u64> {
        let result = match update.replacement_cover() {
            Some(cover) => {
                sqlx::query(
                    "UPDATE games SET name = ?, description = ?, image_data = ?, download_path = ? WHERE id = ?",
                )
                .bind(&update.name)
                .bind(&update.description)
                .bind(cover)
                .bind(&update.download_path)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "UPDATE games SET name = ?, description = ?, download_path = ? WHERE id = ?",
                )
                .bind(&update.name)
                .bind(&update.description)
                .bind(&update.download_path)
                .bind(id)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected())
    }

    /// Delete an entry's screenshots, then the entry itself.
    ///
    /// The two statements are independent; if the first fails the entry row
    /// is left in place. Deleting an unknown id succeeds with zero rows.
    pub async fn delete_entry(&self, id: &str) -> Result<u64> {
        sqlx::query("DELETE FROM screenshots WHERE game_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM games WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ------------------------------------------------------------------
    // Screenshots
    // ------------------------------------------------------------------

    /// Append a screenshot row. No upper bound is enforced here.
    pub async fn add_screenshot(&self, entry_id: &str, image_data: &[u8]) -> Result<i64> {
        let result = sqlx::query("INSERT INTO screenshots (game_id, image_data) VALUES (?, ?)")
            .bind(entry_id)
            .bind(image_data)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert-or-replace for the update path.
    ///
    /// The table has no slot column, so there is nothing to conflict on and
    /// every call adds a row. Repeated updates accumulate screenshots.
    pub async fn replace_or_add_screenshot(&self, entry_id: &str, image_data: &[u8]) -> Result<i64> {
        let result =
            sqlx::query("INSERT OR REPLACE INTO screenshots (game_id, image_data) VALUES (?, ?)")
                .bind(entry_id)
                .bind(image_data)
                .execute(&self.pool)
                .await?;

        Ok(result.last_insert_rowid())
    }

    /// Screenshot blobs owned by an entry, in insertion order
    pub async fn list_screenshots(&self, entry_id: &str) -> Result<Vec<Vec<u8>>> {
        let rows: Vec<(Option<Vec<u8>>,)> =
            sqlx::query_as("SELECT image_data FROM screenshots WHERE game_id = ? ORDER BY id")
                .bind(entry_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().filter_map(|(blob,)| blob).collect())
    }
}

fn default_db_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("com", "gamehub", "gamehub") {
        dirs.data_dir().join("gamehub.db")
    } else {
        PathBuf::from("gamehub.db")
    }
}
