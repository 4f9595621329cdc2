//! Pagination and ordering types.
//!
//! Every backend must honour the same ordering rules so that page
//! boundaries are identical whichever store is active: the default order is
//! `id` ascending, and any explicit sort falls back to `id` ascending to
//! break ties.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Field a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    Name,
    CreatedAt,
    ModifiedAt,
}

impl SortField {
    /// Canonical wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::CreatedAt => "createdAt",
            Self::ModifiedAt => "modifiedAt",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// An explicit ordering for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// Ascending order on `field`.
    pub const fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    /// Descending order on `field`.
    pub const fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{direction}", self.field.as_str())
    }
}

/// Error returned when a sort expression cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid sort expression '{0}' (expected <id|name|createdAt|modifiedAt>[:asc|:desc])")]
pub struct ParseSortError(pub String);

impl FromStr for Sort {
    type Err = ParseSortError;

    /// Parses `field` or `field:direction`, e.g. `name:desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s.split_once(':').unwrap_or((s, "asc"));

        let field = match field.trim() {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "createdAt" | "created_at" => SortField::CreatedAt,
            "modifiedAt" | "modified_at" => SortField::ModifiedAt,
            _ => return Err(ParseSortError(s.to_string())),
        };

        let direction = match direction.trim().to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(ParseSortError(s.to_string())),
        };

        Ok(Self { field, direction })
    }
}

/// A request for one page of a listing.
///
/// `page` is zero-based. Callers are expected to clamp `size` to at least 1
/// before building a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// Request `page` of `size` items in default order.
    pub const fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: None,
        }
    }

    /// Apply an explicit ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Number of items preceding this page.
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

/// One page of items together with the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages at query time.
    pub total: u64,
}

impl<T> Page<T> {
    /// Number of pages of `size` items needed to hold `total` items.
    pub const fn total_pages(&self, size: u32) -> u64 {
        if size == 0 {
            return 0;
        }
        self.total.div_ceil(size as u64)
    }

    /// Transform every item, keeping the total.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 75);
        assert_eq!(
            PageRequest::new(u32::MAX, u32::MAX).offset(),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Page<()> = Page {
            items: vec![],
            total: 21,
        };
        assert_eq!(page.total_pages(10), 3);
        assert_eq!(page.total_pages(21), 1);
        assert_eq!(page.total_pages(0), 0);

        let empty: Page<()> = Page {
            items: vec![],
            total: 0,
        };
        assert_eq!(empty.total_pages(10), 0);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("name".parse::<Sort>().unwrap(), Sort::asc(SortField::Name));
        assert_eq!(
            "createdAt:DESC".parse::<Sort>().unwrap(),
            Sort::desc(SortField::CreatedAt)
        );
        assert_eq!(
            "modified_at:asc".parse::<Sort>().unwrap(),
            Sort::asc(SortField::ModifiedAt)
        );
        assert!("colour".parse::<Sort>().is_err());
        assert!("name:sideways".parse::<Sort>().is_err());
    }

    #[test]
    fn test_sort_display_round_trips() {
        let sort = Sort::desc(SortField::ModifiedAt);
        assert_eq!(sort.to_string(), "modifiedAt:desc");
        assert_eq!(sort.to_string().parse::<Sort>().unwrap(), sort);
    }
}
