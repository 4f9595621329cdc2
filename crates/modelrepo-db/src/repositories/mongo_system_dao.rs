//! `MongoDB` implementation of the `SystemDao` trait.
//!
//! One self-contained document per system in the `systems` collection. The
//! identifier is stored as its hyphenated string in `_id` so document order
//! matches the relational backend's text order.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{self, Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use modelrepo_core::ports::{stamp_after, stamp_now};
use modelrepo_core::{
    Clock, GeoPoint, Location, MongoConfig, NewSystem, Page, PageRequest, RepositoryError, Sort,
    SortDirection, SortField, System, SystemClock, SystemDao, SystemUpdate,
};

use super::{UniqueKey, already_exists, not_found_id, not_found_name};

/// Collection holding system documents.
pub const SYSTEMS_COLLECTION: &str = "systems";

const NAME_INDEX: &str = "name_unique";
const DUPLICATE_KEY: i32 = 11000;

// ─────────────────────────────────────────────────────────────────────────────
// Documents
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct GeoDocument {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LocationDocument {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    geo: Option<GeoDocument>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    virtual_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SystemDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    location: Option<LocationDocument>,
    created_at: bson::DateTime,
    modified_at: bson::DateTime,
}

impl From<&Location> for LocationDocument {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            address: location.address.clone(),
            geo: location.geo.map(|g| GeoDocument {
                latitude: g.latitude,
                longitude: g.longitude,
            }),
            virtual_location: location.virtual_location.clone(),
        }
    }
}

impl From<LocationDocument> for Location {
    fn from(document: LocationDocument) -> Self {
        Self {
            name: document.name,
            address: document.address,
            geo: document
                .geo
                .map(|g| GeoPoint::new(g.latitude, g.longitude)),
            virtual_location: document.virtual_location,
        }
    }
}

impl SystemDocument {
    fn from_system(system: &System) -> Self {
        Self {
            id: system.id.to_string(),
            name: system.name.clone(),
            description: system.description.clone(),
            organization: system.organization.clone(),
            location: system.location.as_ref().map(LocationDocument::from),
            created_at: bson::DateTime::from_millis(system.created_at.timestamp_millis()),
            modified_at: bson::DateTime::from_millis(system.modified_at.timestamp_millis()),
        }
    }

    fn into_system(self) -> Result<System, RepositoryError> {
        let id = Uuid::try_parse(&self.id).map_err(|e| {
            RepositoryError::Serialization(format!("Invalid _id '{}': {e}", self.id))
        })?;
        Ok(System {
            id,
            name: self.name,
            description: self.description,
            organization: self.organization,
            location: self.location.map(Location::from),
            created_at: to_chrono(self.created_at)?,
            modified_at: to_chrono(self.modified_at)?,
        })
    }
}

fn to_chrono(at: bson::DateTime) -> Result<chrono::DateTime<chrono::Utc>, RepositoryError> {
    chrono::DateTime::from_timestamp_millis(at.timestamp_millis()).ok_or_else(|| {
        RepositoryError::Serialization(format!("Timestamp out of range: {at}"))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// DAO
// ─────────────────────────────────────────────────────────────────────────────

/// `MongoDB` implementation of the `SystemDao` trait.
pub struct MongoSystemDao {
    collection: Collection<SystemDocument>,
    clock: Arc<dyn Clock>,
}

impl MongoSystemDao {
    /// Connect to the configured server and prepare the collection.
    pub async fn connect(config: &MongoConfig) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .with_context(|| format!("Invalid MongoDB URI '{}'", config.uri))?;
        let dao = Self::new(&client.database(&config.database));
        dao.ensure_indexes()
            .await
            .with_context(|| format!("Failed to prepare database '{}'", config.database))?;
        info!(database = %config.database, "Connected to MongoDB");
        Ok(dao)
    }

    /// Create a DAO over `database` stamping with the system clock.
    ///
    /// Does not create indexes; call `ensure_indexes` once per database.
    pub fn new(database: &Database) -> Self {
        Self::with_clock(database, Arc::new(SystemClock))
    }

    /// Create a DAO that stamps timestamps from `clock`.
    pub fn with_clock(database: &Database, clock: Arc<dyn Clock>) -> Self {
        Self {
            collection: database.collection(SYSTEMS_COLLECTION),
            clock,
        }
    }

    /// Create the unique index on `name`. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<(), RepositoryError> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name(NAME_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.collection
            .create_index(index)
            .await
            .map_err(storage)?;
        Ok(())
    }
}

fn storage(err: MongoError) -> RepositoryError {
    RepositoryError::Storage(err.to_string())
}

fn duplicate_key_message(err: &MongoError) -> Option<&str> {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY => {
            Some(&e.message)
        }
        ErrorKind::Command(e) if e.code == DUPLICATE_KEY => Some(&e.message),
        _ => None,
    }
}

/// Map a failed insert/replace of the system `id` named `name`.
fn write_error(err: MongoError, id: Uuid, name: &str) -> RepositoryError {
    match duplicate_key_message(&err) {
        Some(message) if message.contains(NAME_INDEX) => already_exists(UniqueKey::Name, id, name),
        Some(_) => already_exists(UniqueKey::Id, id, name),
        None => storage(err),
    }
}

const fn field_for(field: SortField) -> &'static str {
    match field {
        SortField::Id => "_id",
        SortField::Name => "name",
        SortField::CreatedAt => "createdAt",
        SortField::ModifiedAt => "modifiedAt",
    }
}

const fn bson_direction(direction: SortDirection) -> i32 {
    match direction {
        SortDirection::Asc => 1,
        SortDirection::Desc => -1,
    }
}

/// Sort document: `_id` ascending by default, `_id` tie-break otherwise.
fn sort_document(sort: Option<Sort>) -> Document {
    match sort {
        None => doc! { "_id": 1 },
        Some(Sort {
            field: SortField::Id,
            direction,
        }) => doc! { "_id": bson_direction(direction) },
        Some(Sort { field, direction }) => {
            let mut document = Document::new();
            document.insert(field_for(field), bson_direction(direction));
            document.insert("_id", 1);
            document
        }
    }
}

#[async_trait]
impl SystemDao for MongoSystemDao {
    async fn create(&self, system: &NewSystem) -> Result<System, RepositoryError> {
        let now = stamp_now(self.clock.as_ref());
        let created = System {
            id: system.id.unwrap_or_else(Uuid::new_v4),
            name: system.name.clone(),
            description: system.description.clone(),
            organization: system.organization.clone(),
            location: system.location.clone(),
            created_at: now,
            modified_at: now,
        };

        self.collection
            .insert_one(SystemDocument::from_system(&created))
            .await
            .map_err(|e| write_error(e, created.id, &created.name))?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<System, RepositoryError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found_id(id))?
            .into_system()
    }

    async fn find_by_name(&self, name: &str) -> Result<System, RepositoryError> {
        self.collection
            .find_one(doc! { "name": name })
            .await
            .map_err(storage)?
            .ok_or_else(|| not_found_name(name))?
            .into_system()
    }

    async fn find_all(&self, request: &PageRequest) -> Result<Page<System>, RepositoryError> {
        let sort = sort_document(request.sort);
        debug!(%sort, offset = request.offset(), "Listing systems");

        let documents: Vec<SystemDocument> = self
            .collection
            .find(doc! {})
            .sort(sort)
            .skip(request.offset())
            .limit(i64::from(request.size))
            .await
            .map_err(storage)?
            .try_collect()
            .await
            .map_err(storage)?;

        let total = self
            .collection
            .count_documents(doc! {})
            .await
            .map_err(storage)?;

        Ok(Page {
            items: documents
                .into_iter()
                .map(SystemDocument::into_system)
                .collect::<Result<_, _>>()?,
            total,
        })
    }

    async fn update(&self, id: Uuid, update: &SystemUpdate) -> Result<System, RepositoryError> {
        let current = self.find_by_id(id).await?;
        let updated = System {
            id,
            name: update.name.clone(),
            description: update.description.clone(),
            organization: update.organization.clone(),
            location: update.location.clone(),
            created_at: current.created_at,
            modified_at: stamp_after(self.clock.as_ref(), current.modified_at),
        };

        let result = self
            .collection
            .replace_one(
                doc! { "_id": id.to_string() },
                SystemDocument::from_system(&updated),
            )
            .await
            .map_err(|e| write_error(e, id, &update.name))?;

        if result.matched_count == 0 {
            return Err(not_found_id(id));
        }
        Ok(updated)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .await
            .map_err(storage)?;

        if result.deleted_count == 0 {
            return Err(not_found_id(id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(storage)?;

        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{SubsecRound, TimeZone, Utc};

    fn system() -> System {
        let at = Utc
            .timestamp_opt(1_700_000_000, 987_654_321)
            .unwrap()
            .trunc_subsecs(3);
        System {
            id: Uuid::new_v4(),
            name: "Weather Station A".into(),
            description: None,
            organization: Some("Hellenic Met Service".into()),
            location: Some(Location::named("Athens HQ").with_geo(GeoPoint::new(37.98, 23.72))),
            created_at: at,
            modified_at: at,
        }
    }

    #[test]
    fn test_document_round_trip() {
        let original = system();
        let restored = SystemDocument::from_system(&original).into_system().unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_document_omits_unset_fields() {
        let original = system();
        let document = bson::to_document(&SystemDocument::from_system(&original)).unwrap();

        assert_eq!(document.get_str("_id").unwrap(), original.id.to_string());
        assert!(!document.contains_key("description"));
        let location = document.get_document("location").unwrap();
        assert!(!location.contains_key("address"));
        assert!(!location.contains_key("virtualLocation"));
        assert_eq!(
            document.get_str("organization").unwrap(),
            "Hellenic Met Service"
        );
        assert!(document.get_datetime("createdAt").is_ok());
    }

    #[test]
    fn test_virtual_location_is_camel_cased() {
        let mut original = system();
        original.organization = None;
        original.location = Some(Location::named("Edge").with_virtual_location("eu-west-1"));
        let document = bson::to_document(&SystemDocument::from_system(&original)).unwrap();

        assert!(!document.contains_key("organization"));
        let location = document.get_document("location").unwrap();
        assert_eq!(location.get_str("virtualLocation").unwrap(), "eu-west-1");
        assert!(!location.contains_key("geo"));

        let restored = SystemDocument::from_system(&original).into_system().unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_empty_location_survives() {
        let mut original = system();
        original.location = Some(Location::default());
        let restored = SystemDocument::from_system(&original).into_system().unwrap();
        assert_eq!(restored.location, Some(Location::default()));
    }

    #[test]
    fn test_sort_document_tie_breaks_on_id() {
        assert_eq!(sort_document(None), doc! { "_id": 1 });
        assert_eq!(
            sort_document(Some(Sort::desc(SortField::Id))),
            doc! { "_id": -1 }
        );
        let sorted = sort_document(Some(Sort::desc(SortField::ModifiedAt)));
        let keys: Vec<&String> = sorted.keys().collect();
        assert_eq!(keys, ["modifiedAt", "_id"]);
    }
}
