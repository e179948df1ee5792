//! # Error Types
//!
//! Validation and canonicalization errors raised while constructing
//! domain values. All errors use `thiserror`.
//!
//! A [`ValidationError`] is always local to construction: the value being
//! built never exists in a partially-valid state.

use thiserror::Error;

/// A malformed input rejected at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The string is not a Business Partner Number.
    #[error("invalid BPN: {0:?}")]
    InvalidBpn(String),

    /// The string is neither a `did:web` DID nor a bare BPN.
    #[error("invalid identifier {0:?}: expected did:web:<host>:<BPN> or a BPN")]
    InvalidIdentifier(String),

    /// The string is not a `did:web:<host>:<BPN>#<uuid>` credential id.
    #[error("invalid credential id: {0:?}")]
    InvalidCredentialId(String),

    /// A label outside a closed vocabulary.
    #[error("unknown {vocabulary} value: {label:?}")]
    UnknownLabel {
        /// Name of the vocabulary the lookup ran against.
        vocabulary: &'static str,
        /// The label that was not recognised.
        label: String,
    },

    /// A required builder field was never set.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A field was set to a value outside its allowed range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidField`].
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_label_names_vocabulary_and_label() {
        let err = ValidationError::UnknownLabel {
            vocabulary: "sort column",
            label: "foo".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sort column"));
        assert!(msg.contains("foo"));
    }

    #[test]
    fn missing_field_display() {
        assert_eq!(
            ValidationError::MissingField("callerBpn").to_string(),
            "callerBpn is required"
        );
    }

    #[test]
    fn invalid_field_helper() {
        let err = ValidationError::invalid_field("pageSize", "must be >= 0");
        assert_eq!(err.to_string(), "invalid pageSize: must be >= 0");
    }
}
