//! Errors from credential, presentation, DID document and JWT handling.

use thiserror::Error;

/// Errors from VC/VP signing, verification and parsing.
#[derive(Error, Debug)]
pub enum VcError {
    /// Canonicalization of a signed document failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] miw_core::CanonicalizationError),

    /// A key operation failed.
    #[error(transparent)]
    Crypto(#[from] miw_crypto::CryptoError),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document carries no proof.
    #[error("document has no proof")]
    MissingProof,

    /// The proof type is not one this crate verifies.
    #[error("unsupported proof type: {0}")]
    UnsupportedProofType(String),

    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// A compact JWT could not be parsed or signed.
    #[error("invalid JWT: {0}")]
    Jwt(String),

    /// A DID document is malformed or could not be assembled.
    #[error("invalid DID document: {0}")]
    InvalidDidDocument(String),

    /// No verification method with the requested id.
    #[error("verification method not found: {0}")]
    VerificationMethodNotFound(String),
}
