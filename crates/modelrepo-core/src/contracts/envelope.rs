//! Uniform response envelope.
//!
//! Every service operation answers with an `Envelope<T>`, whether it
//! succeeded or not. `T` is a single response DTO, a `Vec` of them for
//! listings, or a plain count.

use serde::{Deserialize, Serialize};

use crate::ports::CoreError;
use crate::validation::FieldViolation;

/// Coarse outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    Failure,
}

/// Machine-readable result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseCode {
    Success,
    ValidationError,
    NotFound,
    Conflict,
    BadRequest,
    InternalError,
}

impl ResponseCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::BadRequest => "BAD_REQUEST",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paging metadata attached to listing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Response wrapper shared by every operation.
///
/// `data` is always serialized (as `null` when absent) so clients can rely on
/// the key. Failure envelopes never carry data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub outcome: Outcome,
    pub code: ResponseCode,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub violations: Vec<FieldViolation>,
}

impl<T> Envelope<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            code: ResponseCode::Success,
            message: message.into(),
            data: Some(data),
            pagination: None,
            violations: Vec::new(),
        }
    }

    /// Success without a payload (e.g. a delete).
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Success,
            code: ResponseCode::Success,
            message: message.into(),
            data: None,
            pagination: None,
            violations: Vec::new(),
        }
    }

    pub fn paginated(data: T, pagination: Pagination, message: impl Into<String>) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::success(data, message)
        }
    }

    /// Failure envelope for `err`, carrying its violations if it is a
    /// validation failure.
    pub fn failure(err: &CoreError) -> Self {
        let violations = match err {
            CoreError::Validation(validation) => validation.violations.clone(),
            _ => Vec::new(),
        };
        Self {
            outcome: Outcome::Failure,
            code: err.code(),
            message: err.to_string(),
            data: None,
            pagination: None,
            violations,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }
}
