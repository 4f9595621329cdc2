//! Core services - the request orchestration layer.
//!
//! Services sit between callers and the `SystemDao` port. They own the
//! validate → convert → persist → convert → wrap pipeline and know nothing
//! about the backend behind the port.

mod system_service;

pub use system_service::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SystemService, clamp_page};
