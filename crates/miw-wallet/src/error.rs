//! # Wallet Error Types
//!
//! [`WalletError`] is what every workflow returns. Each variant maps to a
//! distinct [`ErrorKind`] so a boundary layer can pick a status without
//! inspecting messages.

use miw_core::ValidationError;
use miw_crypto::CryptoError;
use miw_vc::VcError;
use thiserror::Error;

/// Errors from wallet workflows.
#[derive(Error, Debug)]
pub enum WalletError {
    /// Malformed input: identifier, label, missing field.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Request data that is well formed but unusable, e.g. a credential
    /// without types.
    #[error("bad data: {0}")]
    BadData(String),

    /// The caller may not perform this action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The action collides with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// No wallet or credential for the given identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// Key generation, key encoding or key-material encryption failed.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Credential, presentation or DID document assembly failed.
    #[error("credential error: {0}")]
    Vc(#[from] VcError),

    /// Persistence failure other than a uniqueness conflict.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Classification of a [`WalletError`] for the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Client input error.
    Validation,
    /// Authorization error.
    Forbidden,
    /// Duplicate resource.
    Conflict,
    /// Missing resource.
    NotFound,
    /// Unrecoverable infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// Machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl WalletError {
    /// The error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::BadData(_) => ErrorKind::Validation,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Crypto(_) | Self::Vc(_) | Self::Storage(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for `self.kind().code()`.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
