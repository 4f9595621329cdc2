//! Persistence configuration.
//!
//! Plain data read once at start-up and handed to the persistence facade.
//! No infrastructure dependencies live here; the composition root fills
//! these structs from flags and environment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default `SQLite` connection URL.
pub const DEFAULT_SQLITE_URL: &str = "sqlite://modelrepo.db";

/// Default `MongoDB` connection string.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

/// Default `MongoDB` database name.
pub const DEFAULT_MONGO_DATABASE: &str = "model_repository";

/// Which storage backend the process runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `MongoDB` document store.
    Document,
    /// `SQLite` relational store.
    #[default]
    Relational,
}

impl BackendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Relational => "relational",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "mongo" | "mongodb" => Ok(Self::Document),
            "relational" | "sqlite" => Ok(Self::Relational),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Unknown backend '{0}' (expected 'document' or 'relational')")]
    UnknownBackend(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteConfig {
    pub url: String,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SQLITE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_MONGO_DATABASE.to_string(),
        }
    }
}

/// Everything needed to open the active backend.
///
/// Settings for the inactive backend are carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    pub backend: BackendKind,
    pub sqlite: SqliteConfig,
    pub mongo: MongoConfig,
}

impl PersistenceConfig {
    /// Relational backend at `url`.
    pub fn sqlite(url: impl Into<String>) -> Self {
        Self {
            backend: BackendKind::Relational,
            sqlite: SqliteConfig { url: url.into() },
            mongo: MongoConfig::default(),
        }
    }

    /// Document backend at `uri`, using `database`.
    pub fn mongo(uri: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            backend: BackendKind::Document,
            sqlite: SqliteConfig::default(),
            mongo: MongoConfig {
                uri: uri.into(),
                database: database.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_aliases_parse() {
        assert_eq!("document".parse(), Ok(BackendKind::Document));
        assert_eq!("Mongo".parse(), Ok(BackendKind::Document));
        assert_eq!("relational".parse(), Ok(BackendKind::Relational));
        assert_eq!(" sqlite ".parse(), Ok(BackendKind::Relational));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let err = "postgres".parse::<BackendKind>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownBackend("postgres".into()));
    }

    #[test]
    fn test_display_round_trips() {
        for kind in [BackendKind::Document, BackendKind::Relational] {
            assert_eq!(kind.to_string().parse::<BackendKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_defaults() {
        let config = PersistenceConfig::default();
        assert_eq!(config.backend, BackendKind::Relational);
        assert_eq!(config.sqlite.url, DEFAULT_SQLITE_URL);
        assert_eq!(config.mongo.uri, DEFAULT_MONGO_URI);
        assert_eq!(config.mongo.database, DEFAULT_MONGO_DATABASE);
    }

    #[test]
    fn test_constructors_select_backend() {
        assert_eq!(
            PersistenceConfig::mongo("mongodb://db:27017", "meta").backend,
            BackendKind::Document
        );
        assert_eq!(
            PersistenceConfig::sqlite("sqlite::memory:").sqlite.url,
            "sqlite::memory:"
        );
    }
}
