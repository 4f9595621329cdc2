//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, wire format, etc.).
//!
//! # Structure
//!
//! - `location` - the embedded `Location` value and its `GeoPoint`
//! - `system` - System types (`System`, `NewSystem`, `SystemUpdate`)
//! - `page` - pagination and ordering types shared by every backend

mod location;
mod page;
mod system;

pub use location::{GeoPoint, Location};
pub use page::{Page, PageRequest, ParseSortError, Sort, SortDirection, SortField};
pub use system::{NewSystem, System, SystemUpdate};
