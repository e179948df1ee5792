//! # Cryptographic Error Types
//!
//! Structured errors for key generation, encoding, signing and key-material
//! encryption.

use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The random source failed while generating a key.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// The requested key algorithm is not supported.
    #[error("unsupported key algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Ed25519 signature verification failed.
    #[error("Ed25519 verification failed: {0}")]
    VerificationFailed(String),

    /// Invalid Ed25519 signature length.
    #[error("invalid Ed25519 signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// Invalid Ed25519 public key.
    #[error("invalid Ed25519 public key: {0}")]
    InvalidPublicKey(String),

    /// PEM or DER encoding of a key failed.
    #[error("PEM encoding error: {0}")]
    Pem(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// The configured encryption key is unusable.
    #[error("invalid encryption key: {0}")]
    InvalidEncryptionKey(String),

    /// Encrypting key material failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decrypting key material failed.
    #[error("decryption failed: {0}")]
    Decryption(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_signature_length_display() {
        let msg = CryptoError::InvalidSignatureLength(32).to_string();
        assert!(msg.contains("64 bytes"));
        assert!(msg.contains("32"));
    }

    #[test]
    fn key_generation_display() {
        let err = CryptoError::KeyGeneration("entropy unavailable".to_string());
        assert!(err.to_string().contains("entropy unavailable"));
    }
}
