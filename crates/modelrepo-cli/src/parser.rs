//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options. Every
//! persistence option can also come from the environment (or a `.env` file
//! loaded before parsing).

use clap::Parser;

use modelrepo_core::config::{DEFAULT_MONGO_DATABASE, DEFAULT_MONGO_URI, DEFAULT_SQLITE_URL};
use modelrepo_core::{BackendKind, MongoConfig, PersistenceConfig, SqliteConfig};

use crate::commands::Commands;

/// Command-line interface for the system metadata repository.
///
/// Every command prints its response envelope as JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "modelrepo")]
#[command(about = "Store and query system metadata in MongoDB or SQLite")]
#[command(version)]
pub struct Cli {
    /// Storage backend: document (MongoDB) or relational (SQLite)
    #[arg(
        long,
        env = "MODELREPO_BACKEND",
        default_value = "relational",
        global = true
    )]
    pub backend: BackendKind,

    /// SQLite connection URL
    #[arg(
        long = "sqlite-url",
        env = "MODELREPO_SQLITE_URL",
        default_value = DEFAULT_SQLITE_URL,
        global = true
    )]
    pub sqlite_url: String,

    /// MongoDB connection string
    #[arg(
        long = "mongo-uri",
        env = "MODELREPO_MONGO_URI",
        default_value = DEFAULT_MONGO_URI,
        global = true
    )]
    pub mongo_uri: String,

    /// MongoDB database name
    #[arg(
        long = "mongo-database",
        env = "MODELREPO_MONGO_DATABASE",
        default_value = DEFAULT_MONGO_DATABASE,
        global = true
    )]
    pub mongo_database: String,

    /// Enable verbose/debug output on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Persistence settings resolved from flags and environment.
    pub fn persistence_config(&self) -> PersistenceConfig {
        PersistenceConfig {
            backend: self.backend,
            sqlite: SqliteConfig {
                url: self.sqlite_url.clone(),
            },
            mongo: MongoConfig {
                uri: self.mongo_uri.clone(),
                database: self.mongo_database.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use modelrepo_core::services::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
    use modelrepo_core::{Sort, SortField};

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "modelrepo",
            "--backend",
            "mongo",
            "--mongo-uri",
            "mongodb://db:27017",
            "get",
            "abc",
            "--verbose",
        ]);
        assert!(cli.verbose);

        let config = cli.persistence_config();
        assert_eq!(config.backend, BackendKind::Document);
        assert_eq!(config.mongo.uri, "mongodb://db:27017");
        assert_eq!(config.mongo.database, DEFAULT_MONGO_DATABASE);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = Cli::try_parse_from(["modelrepo", "--backend", "postgres", "delete-all"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::parse_from([
            "modelrepo", "list", "--page", "2", "--size", "5", "--sort", "name:desc",
        ]);
        match cli.command {
            Commands::List { page, size, sort } => {
                assert_eq!(page, 2);
                assert_eq!(size, 5);
                assert_eq!(sort, Some(Sort::desc(SortField::Name)));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::parse_from(["modelrepo", "list"]);
        match cli.command {
            Commands::List { page, size, sort } => {
                assert_eq!(page, 0);
                assert_eq!(size, i64::from(DEFAULT_PAGE_SIZE));
                assert_eq!(sort, None);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_list_size_help_names_the_limit() {
        let command = Cli::command();
        let list = command.find_subcommand("list").unwrap();
        let size = list
            .get_arguments()
            .find(|arg| arg.get_id() == "size")
            .unwrap();
        let help = size.get_help().unwrap().to_string();
        assert!(help.contains(&format!("1..={MAX_PAGE_SIZE}")), "{help}");
    }

    #[test]
    fn test_body_sources_are_exclusive() {
        let result = Cli::try_parse_from([
            "modelrepo",
            "create",
            r#"{"name":"x"}"#,
            "--file",
            "body.json",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["modelrepo", "create"]);
        assert!(result.is_err());
    }
}
