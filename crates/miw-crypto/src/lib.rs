//! # miw-crypto — Cryptographic Capabilities
//!
//! Thin, typed wrappers over audited primitives. Nothing here implements a
//! cipher or a curve:
//!
//! - **Ed25519** key generation for a named [`KeyAlgorithm`], PKCS#8 / SPKI
//!   PEM encoding, signing and verification (`ed25519-dalek`).
//! - **Key-material encryption** behind the [`Encryptor`] trait, with an
//!   AES-256-GCM implementation (`aes-gcm`).
//!
//! Private keys never implement `Serialize` and their `Debug` output is
//! redacted.

pub mod ed25519;
pub mod encryption;
pub mod error;

pub use ed25519::{generate_keypair, Ed25519Signature, KeyAlgorithm, SigningKey, VerifyingKey};
pub use encryption::{AesGcmEncryptor, EncryptionKey, Encryptor};
pub use error::CryptoError;
