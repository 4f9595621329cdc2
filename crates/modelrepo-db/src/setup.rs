//! Database setup and initialization.
//!
//! This module provides the `setup_database()` function for opening the
//! `SQLite` store with its full schema. The facade calls it with the
//! configured connection URL.

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Opens the `SQLite` database at `url` and ensures the schema exists.
///
/// The database file is created if it doesn't exist. In-memory URLs get a
/// single long-lived connection, since every `SQLite` connection to
/// `:memory:` is a separate database.
///
/// # Example
///
/// ```rust,no_run
/// use modelrepo_db::setup_database;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database("sqlite://modelrepo.db").await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid SQLite URL '{url}'"))?
        .create_if_missing(true);

    let pool = if is_in_memory(url) {
        single_connection_pool()
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?
    } else {
        SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open SQLite database at '{url}'"))?
    };

    create_schema(&pool).await?;
    Ok(pool)
}

/// Sets up an in-memory `SQLite` database for testing.
///
/// Creates a fresh in-memory database with the full production schema.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    let pool = single_connection_pool()
        .connect_with(SqliteConnectOptions::from_str("sqlite::memory:")?)
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn single_connection_pool() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}

/// Creates the complete database schema.
///
/// Safe to call multiple times as all operations use IF NOT EXISTS.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    // Location is flattened into nullable columns; has_location separates
    // "no location" from "location with every field unset".
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS systems (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            organization TEXT,
            has_location INTEGER NOT NULL DEFAULT 0,
            location_name TEXT,
            location_address TEXT,
            latitude REAL,
            longitude REAL,
            location_virtual TEXT,
            created_at TEXT NOT NULL,
            modified_at TEXT NOT NULL,
            CHECK ((latitude IS NULL) = (longitude IS NULL)),
            CHECK (latitude IS NULL OR location_virtual IS NULL),
            CHECK (has_location = 1 OR (location_name IS NULL AND location_address IS NULL AND latitude IS NULL AND location_virtual IS NULL))
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create systems table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_systems_created_at ON systems(created_at)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_systems_modified_at ON systems(modified_at)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let pool = setup_test_database().await.unwrap();
        create_schema(&pool).await.unwrap();

        let row = sqlx::query("SELECT COUNT(*) AS n FROM sqlite_master WHERE name = 'systems'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(row.get::<i64, _>("n"), 1);
    }

    #[tokio::test]
    async fn test_half_coordinates_violate_check() {
        let pool = setup_test_database().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO systems (id, name, has_location, latitude, created_at, modified_at)
             VALUES ('a', 'b', 1, 10.0, 'x', 'x')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_coordinates_and_virtual_location_violate_check() {
        let pool = setup_test_database().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO systems (id, name, has_location, latitude, longitude, location_virtual, created_at, modified_at)
             VALUES ('a', 'b', 1, 10.0, 20.0, 'eu-west-1', 'x', 'x')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo.db");
        let url = format!("sqlite://{}", path.display());

        let pool = setup_database(&url).await.unwrap();
        pool.close().await;

        assert!(path.exists());
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:repo?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://modelrepo.db"));
    }
}
