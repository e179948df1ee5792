//! # Data-Integrity Proofs
//!
//! The proof object attached to credentials and presentations. The signed
//! input is the JCS-canonicalized document with its `proof` member removed;
//! `proofValue` is the hex-encoded Ed25519 signature.

use chrono::{DateTime, SubsecRound, Utc};
use miw_core::CanonicalBytes;
use miw_crypto::{Ed25519Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::VcError;

/// The signature suite of a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProofType {
    /// Ed25519 signature per the W3C data-integrity suite.
    Ed25519Signature2020,
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProofType::Ed25519Signature2020 => write!(f, "Ed25519Signature2020"),
        }
    }
}

/// Why the proof was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProofPurpose {
    /// An issuer asserting a credential's claims.
    AssertionMethod,
    /// A holder authenticating a presentation.
    Authentication,
}

/// A proof on a credential or presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Signature suite.
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    /// Creation time, truncated to seconds.
    pub created: DateTime<Utc>,

    /// DID URL of the signing key, `<did>#<key id>`.
    pub verification_method: String,

    /// Purpose of the proof.
    pub proof_purpose: ProofPurpose,

    /// Hex-encoded 64-byte Ed25519 signature.
    pub proof_value: String,
}

impl Proof {
    /// Sign `input` and wrap the signature in a proof object.
    pub fn sign(
        input: &CanonicalBytes,
        key: &SigningKey,
        verification_method: impl Into<String>,
        purpose: ProofPurpose,
    ) -> Self {
        Self {
            proof_type: ProofType::Ed25519Signature2020,
            created: Utc::now().trunc_subsecs(0),
            verification_method: verification_method.into(),
            proof_purpose: purpose,
            proof_value: key.sign(input).to_hex(),
        }
    }

    /// Check the signature over `input` with `key`.
    pub fn verify(&self, input: &CanonicalBytes, key: &VerifyingKey) -> Result<(), VcError> {
        let sig = Ed25519Signature::from_hex(&self.proof_value)?;
        key.verify(input, &sig)
            .map_err(|e| VcError::VerificationFailed(e.to_string()))
    }

    /// The DID part of the verification method.
    pub fn signer_did(&self) -> &str {
        self.verification_method
            .split_once('#')
            .map(|(did, _)| did)
            .unwrap_or(&self.verification_method)
    }
}

/// Canonical bytes of `doc` with its top-level `proof` member removed.
pub(crate) fn signing_input<T: Serialize>(doc: &T) -> Result<CanonicalBytes, VcError> {
    let mut value = serde_json::to_value(doc)?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("proof");
    }
    Ok(CanonicalBytes::from_value(value)?)
}
