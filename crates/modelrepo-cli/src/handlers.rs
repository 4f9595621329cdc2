//! Command handlers that delegate to `SystemService`.
//!
//! Handlers are thin: read the request body, call the service, render the
//! envelope. They never touch storage directly.

use std::io::Read;

use serde::Serialize;
use serde::de::DeserializeOwned;

use modelrepo_core::{CoreError, Envelope, SystemPatchDto, SystemRequestDto};

use crate::bootstrap::CliContext;
use crate::commands::{BodyArgs, Commands};
use crate::error::CliError;

/// Rendered result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Pretty-printed envelope.
    pub json: String,
    /// Whether the envelope reports success.
    pub success: bool,
}

impl CommandOutput {
    fn from_envelope<T: Serialize>(envelope: &Envelope<T>) -> Result<Self, CliError> {
        let json = serde_json::to_string_pretty(envelope)
            .map_err(|e| CliError::Io(format!("Failed to render response: {e}")))?;
        Ok(Self {
            json,
            success: envelope.is_success(),
        })
    }

    pub const fn exit_code(&self) -> i32 {
        if self.success { 0 } else { 1 }
    }
}

/// Execute `command` against the composed context.
pub async fn execute(ctx: &CliContext, command: Commands) -> Result<CommandOutput, CliError> {
    let service = &ctx.service;
    match command {
        Commands::Create { body } => match parse_body::<SystemRequestDto>(&body)? {
            Ok(request) => CommandOutput::from_envelope(&service.create(request).await),
            Err(rejected) => CommandOutput::from_envelope(&rejected),
        },
        Commands::Get { id } => CommandOutput::from_envelope(&service.find_by_id(&id).await),
        Commands::GetByName { name } => {
            CommandOutput::from_envelope(&service.find_by_name(&name).await)
        }
        Commands::List { page, size, sort } => {
            CommandOutput::from_envelope(&service.find_all(page, size, sort).await)
        }
        Commands::Update { id, body } => match parse_body::<SystemRequestDto>(&body)? {
            Ok(request) => CommandOutput::from_envelope(&service.update(&id, request).await),
            Err(rejected) => CommandOutput::from_envelope(&rejected),
        },
        Commands::Patch { id, body } => match parse_body::<SystemPatchDto>(&body)? {
            Ok(request) => CommandOutput::from_envelope(&service.patch(&id, request).await),
            Err(rejected) => CommandOutput::from_envelope(&rejected),
        },
        Commands::Delete { id } => CommandOutput::from_envelope(&service.delete_by_id(&id).await),
        Commands::DeleteAll => CommandOutput::from_envelope(&service.delete_all().await),
    }
}

/// Read the body text from wherever `args` points.
fn read_body(args: &BodyArgs) -> Result<String, CliError> {
    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("Failed to read {}: {e}", path.display())));
    }
    match args.body.as_deref() {
        Some("-") => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
        Some(inline) => Ok(inline.to_string()),
        None => Ok(String::new()),
    }
}

/// Parse the request body. Unparseable JSON becomes a `BAD_REQUEST`
/// envelope rather than an error.
fn parse_body<T: DeserializeOwned>(
    args: &BodyArgs,
) -> Result<Result<T, Envelope<()>>, CliError> {
    let text = read_body(args)?;
    Ok(serde_json::from_str(&text).map_err(|e| {
        tracing::warn!(error = %e, "Rejected malformed request body");
        Envelope::failure(&CoreError::MalformedRequest(e.to_string()))
    }))
}
