use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;

pub(crate) const AMOUNT_REQUIRED: &str = "Amount is required";
pub(crate) const AMOUNT_NOT_A_NUMBER: &str = "Amount must be a number";

#[derive(Debug, Error)]
pub(crate) enum LedgerError {
    /// Malformed request. Nothing was read or written.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Department not found: {0}")]
    DepartmentNotFound(String),

    #[error("Department already exists: {0}")]
    DepartmentExists(String),

    /// The atomic update did not commit. Safe to retry.
    #[error("Storage failure: {0}")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DepartmentExists(d) => Self::DepartmentExists(d),
            other => Self::Storage(other),
        }
    }
}

/// Body of every error response: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) error: String,
}

impl LedgerError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP-equivalent status for the caller.
    pub(crate) fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::DepartmentNotFound(_) => 404,
            Self::DepartmentExists(_) => 409,
            Self::Storage(_) => 500,
        }
    }

    /// Storage details stay in the logs; callers get a generic message.
    pub(crate) fn body(&self) -> ErrorBody {
        let error = match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::DepartmentNotFound(_) => "Department not found".to_string(),
            Self::DepartmentExists(_) => "Department already exists".to_string(),
            Self::Storage(_) => "Storage failure".to_string(),
        };
        ErrorBody { error }
    }
}
