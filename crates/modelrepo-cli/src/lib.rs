//! Command-line adapter for modelrepo.
//!
//! `main.rs` is the composition root; everything it wires together lives
//! here so it can be tested without spawning the binary.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap};
pub use commands::{BodyArgs, Commands};
pub use error::CliError;
pub use handlers::CommandOutput;
pub use parser::Cli;
