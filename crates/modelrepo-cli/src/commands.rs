//! Subcommands, one per service operation.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use modelrepo_core::Sort;
use modelrepo_core::services::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Where a JSON request body comes from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct BodyArgs {
    /// Request body as inline JSON, or `-` to read it from stdin
    pub body: Option<String>,

    /// Read the request body from a JSON file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a system from a JSON body
    Create {
        #[command(flatten)]
        body: BodyArgs,
    },

    /// Show a system by its identifier
    Get {
        /// System UUID
        id: String,
    },

    /// Show a system by its unique name
    GetByName {
        /// Exact system name
        name: String,
    },

    /// List systems one page at a time
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        page: i64,

        #[arg(
            long,
            default_value_t = i64::from(DEFAULT_PAGE_SIZE),
            allow_negative_numbers = true,
            help = format!("Items per page (clamped to 1..={MAX_PAGE_SIZE})")
        )]
        size: i64,

        /// Ordering as `field[:asc|desc]`; field is id, name, createdAt or modifiedAt
        #[arg(long)]
        sort: Option<Sort>,
    },

    /// Replace every mutable field of a system
    Update {
        /// System UUID
        id: String,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Change only the fields present in the JSON body
    Patch {
        /// System UUID
        id: String,

        #[command(flatten)]
        body: BodyArgs,
    },

    /// Delete a system by its identifier
    Delete {
        /// System UUID
        id: String,
    },

    /// Delete every system
    DeleteAll,
}
