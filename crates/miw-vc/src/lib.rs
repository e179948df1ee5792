//! # miw-vc — Credentials, Presentations and DID Documents
//!
//! - [`VerifiableCredential`] and [`VerifiablePresentation`] follow the W3C
//!   VC Data Model 1.1 JSON shape. Proofs are `Ed25519Signature2020` over
//!   the JCS-canonicalized document with `proof` removed.
//! - [`DidDocument`] models the `did:web` document a wallet publishes: one
//!   `JsonWebKey2020` verification method per key.
//! - [`Jwt`] is a compact EdDSA-signed presentation token.
//!
//! Signing input always flows through [`miw_core::CanonicalBytes`].

pub mod credential;
pub mod did_document;
pub mod error;
pub mod jwt;
pub mod presentation;
pub mod proof;

pub use credential::{
    ContextValue, CredentialTypeValue, VerifiableCredential, W3C_CREDENTIALS_CONTEXT,
};
pub use did_document::{DidDocument, PublicKeyJwk, VerificationMethod};
pub use error::VcError;
pub use jwt::{Jwt, PresentationClaims, JWT_VALIDITY_SECS};
pub use presentation::VerifiablePresentation;
pub use proof::{Proof, ProofPurpose, ProofType};
