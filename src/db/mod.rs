//! Collection store access
//!
//! The collection is a SQLite file owned by the host flashcard application;
//! this tool opens it in place and updates field values. Alongside the
//! database sits a shared media directory where generated assets land.

pub mod records;

use crate::error::Result;
use sqlx::SqlitePool;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An open collection: database pool plus resolved media directory.
pub struct Collection {
    pool: SqlitePool,
    media_dir: PathBuf,
}

impl Collection {
    /// Open the collection database and resolve the media directory.
    ///
    /// The database file is created if missing (mode=rwc), as is the media
    /// directory. Without an override the media directory is the host
    /// convention: a `<collection-stem>.media` directory beside the
    /// database file.
    pub async fn open(db_path: &Path, media_dir_override: Option<PathBuf>) -> Result<Self> {
        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        debug!("Connecting to collection: {}", db_url);

        let pool = SqlitePool::connect(&db_url).await?;
        init_tables(&pool).await?;

        let media_dir = media_dir_override.unwrap_or_else(|| default_media_dir(db_path));
        tokio::fs::create_dir_all(&media_dir).await?;
        info!("Media directory: {}", media_dir.display());

        Ok(Self { pool, media_dir })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }
}

/// Create the collection tables if they don't exist. Field order is part of
/// the schema: audio-field discovery walks fields in declared order.
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            id INTEGER PRIMARY KEY AUTOINCREMENT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fields (
            record_id INTEGER NOT NULL REFERENCES records(id),
            ord INTEGER NOT NULL,
            name TEXT NOT NULL,
            value TEXT NOT NULL DEFAULT '',
            PRIMARY KEY (record_id, ord)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Host convention: `collection.db` keeps its media in `collection.media`.
fn default_media_dir(db_path: &Path) -> PathBuf {
    let mut name = db_path
        .file_stem()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("collection"));
    name.push(".media");
    db_path.with_file_name(name)
}
