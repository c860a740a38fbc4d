//! Response side of the JSON protocol.

use crate::diff::DiffResult;
use crate::model::{LineRangeMapping, MovedText};
use serde::{Deserialize, Serialize};

/// The single JSON object written for every request.
///
/// Either a complete result or an error message, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiffResponse {
    Success(SuccessResponse),
    Failure(FailureResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessResponse {
    success: bool,
    pub changes: Vec<LineRangeMapping>,
    pub moves: Vec<MovedText>,
    pub hit_timeout: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    success: bool,
    pub error: String,
}

impl DiffResponse {
    /// Wrap a computed result.
    #[must_use]
    pub fn success(result: DiffResult) -> Self {
        Self::Success(SuccessResponse {
            success: true,
            changes: result.changes,
            moves: result.moves,
            hit_timeout: result.hit_timeout,
        })
    }

    /// Report a failed request.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure(FailureResponse {
            success: false,
            error: error.into(),
        })
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether the response reports any change or move.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        match self {
            Self::Success(s) => !s.changes.is_empty() || !s.moves.is_empty(),
            Self::Failure(_) => false,
        }
    }

    /// The result carried by a success response.
    #[must_use]
    pub fn into_result(self) -> Option<DiffResult> {
        match self {
            Self::Success(s) => Some(DiffResult {
                changes: s.changes,
                moves: s.moves,
                hit_timeout: s.hit_timeout,
            }),
            Self::Failure(_) => None,
        }
    }

    /// Serialize as one line of JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
