//! Unified error handling for the admin stores.

use jobboard_core::{RecordId, ValidationError};
use thiserror::Error;

use crate::remote::RemoteError;

/// Why a store mutation did not happen.
///
/// Every variant leaves the collection exactly as it was before the call.
#[derive(Debug, Error)]
pub enum MutationError {
    /// Input failed validation; no network call was attempted.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The backend call failed.
    #[error("Remote call failed: {0}")]
    Remote(#[from] RemoteError),

    /// The id is not in the local collection.
    #[error("Record not found: {0}")]
    NotFound(RecordId),
}

impl MutationError {
    /// Human-readable message for the notification surface.
    ///
    /// Validation messages are shown verbatim; backend internals are not.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Remote(err) => err.user_message(),
            Self::NotFound(_) => "The record no longer exists".to_string(),
        }
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = MutationError::from(ValidationError::MissingName);
        assert!(err.is_validation());
        assert_eq!(err.user_message(), "Name is required");
    }

    #[test]
    fn test_remote_message_hides_details() {
        let err = MutationError::from(RemoteError::Request("dns error: no such host".to_string()));
        assert!(!err.is_validation());
        assert_eq!(err.user_message(), "Could not reach the server");
    }
}
