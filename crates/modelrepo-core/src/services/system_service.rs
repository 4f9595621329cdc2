//! System service - orchestrates system CRUD and listing.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::contracts::{
    Envelope, Pagination, SystemPatchDto, SystemRequestDto, SystemResponseDto,
};
use crate::domain::{Location, NewSystem, PageRequest, Sort, SystemUpdate};
use crate::ports::{CoreError, SystemDao};
use crate::validation::{
    FieldViolation, Validate, ValidationError, ViolationReason, parse_identifier, validate_update,
};

/// Page size used when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Clamp caller paging input: `page >= 0`, `1 <= size <= MAX_PAGE_SIZE`.
pub fn clamp_page(page: i64, size: i64) -> (u32, u32) {
    let page = u32::try_from(page.max(0)).unwrap_or(u32::MAX);
    let size = u32::try_from(size.clamp(1, i64::from(MAX_PAGE_SIZE))).unwrap_or(MAX_PAGE_SIZE);
    (page, size)
}

/// Service for system operations.
///
/// Every public operation answers with an `Envelope`; errors never escape.
/// The injected `SystemDao` is the only way to reach storage.
pub struct SystemService {
    dao: Arc<dyn SystemDao>,
}

impl SystemService {
    /// Create a new system service over the given DAO.
    pub fn new(dao: Arc<dyn SystemDao>) -> Self {
        Self { dao }
    }

    /// Validate and persist a new system.
    pub async fn create(&self, request: SystemRequestDto) -> Envelope<SystemResponseDto> {
        match self.try_create(request).await {
            Ok(system) => {
                info!(id = %system.id, name = %system.name, "System created");
                Envelope::success(system, "System created")
            }
            Err(e) => failure("create", &e),
        }
    }

    async fn try_create(&self, request: SystemRequestDto) -> Result<SystemResponseDto, CoreError> {
        request.validate()?;
        let new = NewSystem::from(request);
        let created = self.dao.create(&new).await?;
        Ok(created.into())
    }

    /// Look up a system by identifier.
    pub async fn find_by_id(&self, id: &str) -> Envelope<SystemResponseDto> {
        match self.try_find_by_id(id).await {
            Ok(system) => Envelope::success(system, "System found"),
            Err(e) => failure("find_by_id", &e),
        }
    }

    async fn try_find_by_id(&self, id: &str) -> Result<SystemResponseDto, CoreError> {
        let id = parse_path_id(id)?;
        debug!(%id, "Finding system by id");
        Ok(self.dao.find_by_id(id).await?.into())
    }

    /// Look up a system by its unique name.
    pub async fn find_by_name(&self, name: &str) -> Envelope<SystemResponseDto> {
        match self.try_find_by_name(name).await {
            Ok(system) => Envelope::success(system, "System found"),
            Err(e) => failure("find_by_name", &e),
        }
    }

    async fn try_find_by_name(&self, name: &str) -> Result<SystemResponseDto, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::new(vec![FieldViolation::new(
                "name",
                ViolationReason::Required,
            )])
            .into());
        }
        debug!(name, "Finding system by name");
        Ok(self.dao.find_by_name(name).await?.into())
    }

    /// List one page of systems.
    ///
    /// `page` and `size` are clamped first. An empty repository and a page
    /// past the end of a non-empty one are both reported as not found.
    pub async fn find_all(
        &self,
        page: i64,
        size: i64,
        sort: Option<Sort>,
    ) -> Envelope<Vec<SystemResponseDto>> {
        let (page, size) = clamp_page(page, size);
        match self.try_find_all(page, size, sort).await {
            Ok((items, pagination)) => {
                let message = format!("Found {} systems", items.len());
                Envelope::paginated(items, pagination, message)
            }
            Err(e) => failure("find_all", &e),
        }
    }

    async fn try_find_all(
        &self,
        page: u32,
        size: u32,
        sort: Option<Sort>,
    ) -> Result<(Vec<SystemResponseDto>, Pagination), CoreError> {
        let mut request = PageRequest::new(page, size);
        request.sort = sort;
        debug!(page, size, sort = ?sort, "Listing systems");

        let result = self.dao.find_all(&request).await?;
        if result.total == 0 {
            return Err(CoreError::NotFound("No systems found".to_string()));
        }
        let total_pages = result.total_pages(size);
        if u64::from(page) >= total_pages {
            return Err(CoreError::PageOutOfRange { page, total_pages });
        }

        let pagination = Pagination {
            page,
            size,
            total_items: result.total,
            total_pages,
        };
        let items = result.items.into_iter().map(SystemResponseDto::from).collect();
        Ok((items, pagination))
    }

    /// Replace every mutable field of an existing system.
    pub async fn update(&self, id: &str, request: SystemRequestDto) -> Envelope<SystemResponseDto> {
        match self.try_update(id, request).await {
            Ok(system) => {
                info!(id = %system.id, "System updated");
                Envelope::success(system, "System updated")
            }
            Err(e) => failure("update", &e),
        }
    }

    async fn try_update(
        &self,
        id: &str,
        request: SystemRequestDto,
    ) -> Result<SystemResponseDto, CoreError> {
        let id = parse_path_id(id)?;
        validate_update(&request, id)?;
        let update = SystemUpdate::from(request);
        Ok(self.dao.update(id, &update).await?.into())
    }

    /// Apply a partial update.
    ///
    /// Absent fields keep their stored values, an explicit `null` clears an
    /// optional field and a supplied location replaces the stored one as a
    /// whole.
    pub async fn patch(&self, id: &str, request: SystemPatchDto) -> Envelope<SystemResponseDto> {
        match self.try_patch(id, request).await {
            Ok(system) => {
                info!(id = %system.id, "System patched");
                Envelope::success(system, "System updated")
            }
            Err(e) => failure("patch", &e),
        }
    }

    async fn try_patch(
        &self,
        id: &str,
        request: SystemPatchDto,
    ) -> Result<SystemResponseDto, CoreError> {
        let id = parse_path_id(id)?;
        request.validate()?;

        let current = self.dao.find_by_id(id).await?;
        let mut update = SystemUpdate::from(&current);
        if let Some(name) = request.name {
            update.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            update.description = description;
        }
        if let Some(organization) = request.organization {
            update.organization = organization;
        }
        if let Some(location) = request.location {
            update.location = location.map(Location::from);
        }

        Ok(self.dao.update(id, &update).await?.into())
    }

    /// Delete a system by identifier.
    pub async fn delete_by_id(&self, id: &str) -> Envelope<()> {
        match self.try_delete_by_id(id).await {
            Ok(id) => {
                info!(%id, "System deleted");
                Envelope::success_empty("System deleted")
            }
            Err(e) => failure("delete_by_id", &e),
        }
    }

    async fn try_delete_by_id(&self, id: &str) -> Result<Uuid, CoreError> {
        let id = parse_path_id(id)?;
        self.dao.delete_by_id(id).await?;
        Ok(id)
    }

    /// Delete every system, reporting how many were removed.
    pub async fn delete_all(&self) -> Envelope<u64> {
        match self.dao.delete_all().await {
            Ok(count) => {
                info!(count, "All systems deleted");
                Envelope::success(count, format!("Deleted {count} systems"))
            }
            Err(e) => failure("delete_all", &CoreError::from(e)),
        }
    }
}

fn parse_path_id(raw: &str) -> Result<Uuid, CoreError> {
    parse_identifier(raw).ok_or_else(|| CoreError::MalformedIdentifier(raw.to_string()))
}

/// Log `err` by severity and wrap it in a failure envelope.
fn failure<T>(operation: &str, err: &CoreError) -> Envelope<T> {
    match err {
        CoreError::Internal(_) => error!(operation, error = %err, "System operation failed"),
        _ => warn!(operation, code = %err.code(), error = %err, "System request rejected"),
    }
    Envelope::failure(err)
}
