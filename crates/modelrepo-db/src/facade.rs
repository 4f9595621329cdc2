//! Backend selection for the composition root.
//!
//! `PersistenceFacade` is built once from a `PersistenceConfig`, opens the
//! configured backend, and from then on delegates every `SystemDao` call to
//! it. There is no per-call switching.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use modelrepo_core::{
    BackendKind, NewSystem, Page, PageRequest, PersistenceConfig, RepositoryError, System,
    SystemDao, SystemService, SystemUpdate,
};

use crate::repositories::{MongoSystemDao, SqliteSystemDao};
use crate::setup::setup_database;

/// The active backend behind the `SystemDao` contract.
///
/// Composition utilities only, no domain logic.
pub struct PersistenceFacade {
    backend: BackendKind,
    dao: Arc<dyn SystemDao>,
}

impl PersistenceFacade {
    /// Open the backend selected by `config`, running schema or index
    /// setup.
    pub async fn connect(config: &PersistenceConfig) -> anyhow::Result<Self> {
        let dao: Arc<dyn SystemDao> = match config.backend {
            BackendKind::Relational => {
                let pool = setup_database(&config.sqlite.url).await?;
                Arc::new(SqliteSystemDao::new(pool))
            }
            BackendKind::Document => Arc::new(MongoSystemDao::connect(&config.mongo).await?),
        };
        info!(backend = %config.backend, "Persistence backend ready");
        Ok(Self::from_dao(config.backend, dao))
    }

    /// Wrap an already constructed DAO.
    pub fn from_dao(backend: BackendKind, dao: Arc<dyn SystemDao>) -> Self {
        Self { backend, dao }
    }

    pub const fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Build a `SystemService` over this facade.
    pub fn into_service(self) -> SystemService {
        SystemService::new(Arc::new(self))
    }
}

#[async_trait]
impl SystemDao for PersistenceFacade {
    async fn create(&self, system: &NewSystem) -> Result<System, RepositoryError> {
        debug!(backend = %self.backend, "create");
        self.dao.create(system).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<System, RepositoryError> {
        debug!(backend = %self.backend, %id, "find_by_id");
        self.dao.find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<System, RepositoryError> {
        debug!(backend = %self.backend, name, "find_by_name");
        self.dao.find_by_name(name).await
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<System>, RepositoryError> {
        debug!(backend = %self.backend, page = request.page, size = request.size, "find_all");
        self.dao.find_all(request).await
    }

    async fn update(&self, id: Uuid, update: &SystemUpdate) -> Result<System, RepositoryError> {
        debug!(backend = %self.backend, %id, "update");
        self.dao.update(id, update).await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        debug!(backend = %self.backend, %id, "delete_by_id");
        self.dao.delete_by_id(id).await
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        debug!(backend = %self.backend, "delete_all");
        self.dao.delete_all().await
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema
/// already applied.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: sqlx::SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Create a system DAO using this test database.
    pub fn system_dao(&self) -> SqliteSystemDao {
        SqliteSystemDao::new(self.pool.clone())
    }

    /// Create a system DAO stamping from `clock`.
    pub fn system_dao_with_clock(
        &self,
        clock: Arc<dyn modelrepo_core::Clock>,
    ) -> SqliteSystemDao {
        SqliteSystemDao::with_clock(self.pool.clone(), clock)
    }

    /// Facade over this test database.
    pub fn facade(&self) -> PersistenceFacade {
        PersistenceFacade::from_dao(BackendKind::Relational, Arc::new(self.system_dao()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_relational_in_memory() {
        let facade = PersistenceFacade::connect(&PersistenceConfig::sqlite("sqlite::memory:"))
            .await
            .unwrap();
        assert_eq!(facade.backend(), BackendKind::Relational);

        let created = facade.create(&NewSystem::new("Gateway")).await.unwrap();
        assert_eq!(facade.find_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_connect_reports_bad_sqlite_url() {
        let result =
            PersistenceFacade::connect(&PersistenceConfig::sqlite("postgres://nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_facade_delegates_errors_unchanged() {
        let db = TestDb::new().await.unwrap();
        let facade = db.facade();

        let err = facade.delete_by_id(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
