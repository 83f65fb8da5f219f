//! Database module for the release catalog and discovered links.
//!
//! Uses SQLx with SQLite for lightweight, embedded storage. Provides async
//! operations for:
//! - Release and track ingestion
//! - Provider link upserts (one row per release/provider pair)
//! - Loading a release's existing links to skip on rediscovery
//!
//! # Example
//!
//! ```ignore
//! use linkscout::db::{init_db, get_release_tracks};
//!
//! let pool = init_db("sqlite:linkscout.db").await?;
//! let tracks = get_release_tracks(&pool, 1).await?;
//! ```

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::discovery::provider::Provider;
use crate::discovery::service::{ReleaseRepository, RepositoryError};
use crate::model::{ProviderLinkRecord, Release, ReleaseTrack};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "linkscout.db";

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Insert a release, returning its ID.
pub async fn insert_release(
    pool: &SqlitePool,
    title: &str,
    artist_name: Option<&str>,
) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO releases (title, artist_name) VALUES (?, ?)")
        .bind(title)
        .bind(artist_name)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Insert a track for a release, returning its ID.
pub async fn insert_track(
    pool: &SqlitePool,
    release_id: i64,
    position: i64,
    title: &str,
    isrc: Option<&str>,
    duration_secs: Option<i64>,
) -> sqlx::Result<i64> {
    let result = sqlx::query(
        "INSERT INTO tracks (release_id, position, title, isrc, duration_secs) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(release_id)
    .bind(position)
    .bind(title)
    .bind(isrc)
    .bind(duration_secs)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Get a release by its database ID.
pub async fn get_release_by_id(pool: &SqlitePool, release_id: i64) -> sqlx::Result<Option<Release>> {
    sqlx::query_as::<_, Release>("SELECT id, title, artist_name FROM releases WHERE id = ?")
        .bind(release_id)
        .fetch_optional(pool)
        .await
}

/// Get all releases, ordered by ID.
pub async fn get_all_releases(pool: &SqlitePool) -> sqlx::Result<Vec<Release>> {
    sqlx::query_as::<_, Release>("SELECT id, title, artist_name FROM releases ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Get a release's tracks in release order.
pub async fn get_release_tracks(
    pool: &SqlitePool,
    release_id: i64,
) -> sqlx::Result<Vec<ReleaseTrack>> {
    sqlx::query_as::<_, ReleaseTrack>(
        "SELECT id, release_id, position, title, isrc, duration_secs
         FROM tracks WHERE release_id = ? ORDER BY position",
    )
    .bind(release_id)
    .fetch_all(pool)
    .await
}

/// Insert or update a provider link.
///
/// Uses SQLite's UPSERT so rediscovery replaces the stored link for the
/// (release, provider) pair instead of accumulating duplicates.
pub async fn upsert_provider_link(
    pool: &SqlitePool,
    link: &ProviderLinkRecord,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO provider_links (release_id, provider, url, provider_id, quality, discovered_from)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(release_id, provider) DO UPDATE SET
            url = excluded.url,
            provider_id = excluded.provider_id,
            quality = excluded.quality,
            discovered_from = excluded.discovered_from,
            discovered_at = datetime('now')
        "#,
    )
    .bind(link.release_id)
    .bind(&link.provider)
    .bind(&link.url)
    .bind(&link.provider_id)
    .bind(&link.quality)
    .bind(&link.discovered_from)
    .execute(pool)
    .await?;
    Ok(())
}

/// Get all stored links for a release.
pub async fn get_provider_links(
    pool: &SqlitePool,
    release_id: i64,
) -> sqlx::Result<Vec<ProviderLinkRecord>> {
    sqlx::query_as::<_, ProviderLinkRecord>(
        "SELECT release_id, provider, url, provider_id, quality, discovered_from
         FROM provider_links WHERE release_id = ? ORDER BY provider",
    )
    .bind(release_id)
    .fetch_all(pool)
    .await
}

/// Providers a release already has links for.
///
/// Rows whose provider key no longer parses are skipped.
pub async fn existing_providers(
    pool: &SqlitePool,
    release_id: i64,
) -> sqlx::Result<BTreeSet<Provider>> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT provider FROM provider_links WHERE release_id = ?")
            .bind(release_id)
            .fetch_all(pool)
            .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(key,)| Provider::from_key(&key))
        .collect())
}

/// [`ReleaseRepository`] backed by the SQLite pool.
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReleaseRepository for SqliteRepository {
    async fn tracks_for_release(
        &self,
        release_id: i64,
    ) -> Result<Vec<ReleaseTrack>, RepositoryError> {
        get_release_tracks(&self.pool, release_id)
            .await
            .map_err(|e| RepositoryError(e.to_string()))
    }

    async fn release_by_id(&self, release_id: i64) -> Result<Option<Release>, RepositoryError> {
        get_release_by_id(&self.pool, release_id)
            .await
            .map_err(|e| RepositoryError(e.to_string()))
    }

    async fn upsert_provider_link(&self, link: &ProviderLinkRecord) -> Result<(), RepositoryError> {
        upsert_provider_link(&self.pool, link)
            .await
            .map_err(|e| RepositoryError(e.to_string()))
    }
}
