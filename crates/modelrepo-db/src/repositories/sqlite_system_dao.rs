//! `SQLite` implementation of the `SystemDao` trait.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use modelrepo_core::ports::{stamp_after, stamp_now};
use modelrepo_core::{
    Clock, NewSystem, Page, PageRequest, RepositoryError, Sort, SortDirection, SortField, System,
    SystemClock, SystemDao, SystemUpdate,
};

use super::row_mappers::{LocationColumns, SYSTEM_SELECT_COLUMNS, format_timestamp, row_to_system};
use super::{UniqueKey, already_exists, not_found_id, not_found_name};

/// `SQLite` implementation of the `SystemDao` trait.
///
/// Location is stored flattened into nullable columns of the `systems`
/// table; see `setup::create_schema`.
pub struct SqliteSystemDao {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl SqliteSystemDao {
    /// Create a new `SQLite` system DAO stamping with the system clock.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    /// Create a DAO that stamps timestamps from `clock`.
    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Get a reference to the underlying pool (for testing only).
    #[cfg(test)]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn storage(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(err.to_string())
}

/// Map a failed INSERT/UPDATE of the system `id` named `name`.
fn write_error(err: sqlx::Error, id: Uuid, name: &str) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let key = if db.message().contains("systems.name") {
                UniqueKey::Name
            } else {
                UniqueKey::Id
            };
            return already_exists(key, id, name);
        }
        if db.is_check_violation() {
            return RepositoryError::Constraint(db.message().to_string());
        }
    }
    storage(err)
}

const fn column_for(field: SortField) -> &'static str {
    match field {
        SortField::Id => "id",
        SortField::Name => "name",
        SortField::CreatedAt => "created_at",
        SortField::ModifiedAt => "modified_at",
    }
}

const fn sql_direction(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}

/// ORDER BY clause: `id ASC` by default, `id ASC` tie-break otherwise.
fn order_by(sort: Option<Sort>) -> String {
    match sort {
        None => "id ASC".to_string(),
        Some(Sort {
            field: SortField::Id,
            direction,
        }) => format!("id {}", sql_direction(direction)),
        Some(Sort { field, direction }) => {
            format!("{} {}, id ASC", column_for(field), sql_direction(direction))
        }
    }
}

#[async_trait]
impl SystemDao for SqliteSystemDao {
    async fn create(&self, system: &NewSystem) -> Result<System, RepositoryError> {
        let id = system.id.unwrap_or_else(Uuid::new_v4);
        let now = stamp_now(self.clock.as_ref());
        let location = LocationColumns::from_location(system.location.as_ref());

        sqlx::query(
            r"INSERT INTO systems (
                id, name, description, organization, has_location, location_name,
                location_address, latitude, longitude, location_virtual, created_at, modified_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&system.name)
        .bind(&system.description)
        .bind(&system.organization)
        .bind(location.has_location)
        .bind(&location.name)
        .bind(&location.address)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.virtual_location)
        .bind(format_timestamp(now))
        .bind(format_timestamp(now))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, id, &system.name))?;

        Ok(System {
            id,
            name: system.name.clone(),
            description: system.description.clone(),
            organization: system.organization.clone(),
            location: system.location.clone(),
            created_at: now,
            modified_at: now,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<System, RepositoryError> {
        let query = format!("SELECT {SYSTEM_SELECT_COLUMNS} FROM systems WHERE id = ?");

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found_id(id))?;

        row_to_system(&row)
    }

    async fn find_by_name(&self, name: &str) -> Result<System, RepositoryError> {
        let query = format!("SELECT {SYSTEM_SELECT_COLUMNS} FROM systems WHERE name = ?");

        let row = sqlx::query(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found_name(name))?;

        row_to_system(&row)
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<System>, RepositoryError> {
        let offset = i64::try_from(request.offset())
            .map_err(|_| RepositoryError::Storage("Page offset out of range".to_string()))?;
        let query = format!(
            "SELECT {SYSTEM_SELECT_COLUMNS} FROM systems ORDER BY {} LIMIT ? OFFSET ?",
            order_by(request.sort)
        );
        debug!(%query, offset, "Listing systems");

        let rows = sqlx::query(&query)
            .bind(i64::from(request.size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM systems")
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;

        Ok(Page {
            items: rows.iter().map(row_to_system).collect::<Result<_, _>>()?,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn update(&self, id: Uuid, update: &SystemUpdate) -> Result<System, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let query = format!("SELECT {SYSTEM_SELECT_COLUMNS} FROM systems WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found_id(id))?;
        let current = row_to_system(&row)?;

        let modified_at = stamp_after(self.clock.as_ref(), current.modified_at);
        let location = LocationColumns::from_location(update.location.as_ref());

        sqlx::query(
            r"UPDATE systems SET
                name = ?, description = ?, organization = ?, has_location = ?,
                location_name = ?, location_address = ?, latitude = ?, longitude = ?,
                location_virtual = ?, modified_at = ?
            WHERE id = ?",
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.organization)
        .bind(location.has_location)
        .bind(&location.name)
        .bind(&location.address)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.virtual_location)
        .bind(format_timestamp(modified_at))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, id, &update.name))?;

        tx.commit().await.map_err(storage)?;

        Ok(System {
            id,
            name: update.name.clone(),
            description: update.description.clone(),
            organization: update.organization.clone(),
            location: update.location.clone(),
            created_at: current.created_at,
            modified_at,
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM systems WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(not_found_id(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM systems")
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(result.rows_affected())
    }
}
