// Handler error taxonomy
use std::num::ParseIntError;

use thiserror::Error;

use crate::api::Outcome;
use crate::database::DatabaseError;
use crate::filter::FilterError;
use crate::transform::TransformError;

/// Everything a module endpoint can fail with.
///
/// `Validation` and `NotFound` are expected negatives reported as FAILURE;
/// every other variant is an unexpected fault reported as ERROR with its
/// message verbatim. None of them changes the HTTP status.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("required parameter '{0}' is missing")]
    MissingParameter(&'static str),

    #[error("invalid node \"{token}\": {source}")]
    InvalidNode {
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid sort property: {0}")]
    InvalidSort(String),

    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] DatabaseError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl ModuleError {
    pub fn validation(message: impl Into<String>) -> Self {
        ModuleError::Validation(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ModuleError::BadRequest(message.into())
    }

    /// True for unexpected faults, which are logged with their full chain
    pub fn is_fault(&self) -> bool {
        !matches!(self, ModuleError::Validation(_) | ModuleError::NotFound(_))
    }
}

impl<T> From<ModuleError> for Outcome<T> {
    fn from(err: ModuleError) -> Self {
        match err {
            ModuleError::Validation(msg) => Outcome::failure(msg),
            ModuleError::NotFound(_) => Outcome::not_found(),
            fault => Outcome::error(fault.to_string()),
        }
    }
}
