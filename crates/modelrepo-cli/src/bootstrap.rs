//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. The configured backend is opened once through
//! `PersistenceFacade` and handed to `SystemService`.

use modelrepo_core::{BackendKind, PersistenceConfig, SystemService};
use modelrepo_db::PersistenceFacade;

use crate::error::CliError;

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub service: SystemService,
    pub backend: BackendKind,
}

/// Open the configured backend and build the service over it.
pub async fn bootstrap(config: &PersistenceConfig) -> Result<CliContext, CliError> {
    let facade = PersistenceFacade::connect(config)
        .await
        .map_err(|e| CliError::Config(format!("{e:#}")))?;
    let backend = facade.backend();

    Ok(CliContext {
        service: facade.into_service(),
        backend,
    })
}
