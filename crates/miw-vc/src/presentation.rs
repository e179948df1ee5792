//! # Verifiable Presentations
//!
//! A holder-signed bundle of credentials. In JSON form the holder attaches
//! an `authentication` proof; in JWT form the presentation travels unsigned
//! inside the token's `vp` claim and the JWS signature covers it.

use miw_crypto::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credential::{VerifiableCredential, W3C_CREDENTIALS_CONTEXT};
use crate::error::VcError;
use crate::proof::{signing_input, Proof, ProofPurpose};

/// The presentation type marker.
pub const PRESENTATION_TYPE: &str = "VerifiablePresentation";

/// A W3C Verifiable Presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiablePresentation {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// Presentation id, `<holder DID>#<uuid>`.
    pub id: String,

    /// Always contains `VerifiablePresentation`.
    #[serde(rename = "type")]
    pub presentation_type: Vec<String>,

    /// Holder DID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder: Option<String>,

    /// The presented credentials.
    #[serde(default)]
    pub verifiable_credential: Vec<VerifiableCredential>,

    /// Holder proof (JSON form only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,
}

impl VerifiablePresentation {
    /// An unsigned presentation of `credentials` by `holder_did`.
    pub fn new(holder_did: impl Into<String>, credentials: Vec<VerifiableCredential>) -> Self {
        let holder = holder_did.into();
        Self {
            context: vec![W3C_CREDENTIALS_CONTEXT.to_string()],
            id: format!("{holder}#{}", Uuid::new_v4()),
            presentation_type: vec![PRESENTATION_TYPE.to_string()],
            holder: Some(holder),
            verifiable_credential: credentials,
            proof: None,
        }
    }

    /// Sign as holder, replacing any existing proof.
    pub fn sign(
        &mut self,
        key: &SigningKey,
        verification_method: impl Into<String>,
    ) -> Result<(), VcError> {
        self.proof = None;
        let input = signing_input(self)?;
        self.proof = Some(Proof::sign(
            &input,
            key,
            verification_method,
            ProofPurpose::Authentication,
        ));
        Ok(())
    }

    /// Verify the holder proof with `key`.
    pub fn verify(&self, key: &VerifyingKey) -> Result<(), VcError> {
        let proof = self.proof.as_ref().ok_or(VcError::MissingProof)?;
        let input = signing_input(self)?;
        proof.verify(&input, key)
    }

    /// The DID whose key should have signed this presentation: the proof's
    /// verification method, falling back to `holder`.
    pub fn signer_did(&self) -> Option<&str> {
        self.proof
            .as_ref()
            .map(Proof::signer_did)
            .or(self.holder.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn credential() -> VerifiableCredential {
        VerifiableCredential::new(
            "did:web:h:BPNL000000000000#5a1f9d3e-3b0c-4a7e-8c59-2f0d7d1b9e44",
            &[],
            &["MembershipCredential"],
            "did:web:h:BPNL000000000000",
            json!({"id": "did:web:h:BPNL000000000099"}),
            None,
        )
    }

    #[test]
    fn holder_signs_and_verifies() {
        let key = SigningKey::from_bytes(&[4u8; 32]);
        let mut vp = VerifiablePresentation::new("did:web:h:BPNL000000000099", vec![credential()]);
        vp.sign(&key, "did:web:h:BPNL000000000099#k").unwrap();
        vp.verify(&key.verifying_key()).unwrap();
        assert_eq!(vp.signer_did(), Some("did:web:h:BPNL000000000099"));
    }

    #[test]
    fn removing_a_credential_breaks_the_proof() {
        let key = SigningKey::from_bytes(&[4u8; 32]);
        let mut vp = VerifiablePresentation::new("did:web:h:BPNL000000000099", vec![credential()]);
        vp.sign(&key, "vm").unwrap();
        vp.verifiable_credential.clear();
        assert!(vp.verify(&key.verifying_key()).is_err());
    }

    #[test]
    fn serializes_w3c_member_names() {
        let vp = VerifiablePresentation::new("did:web:h:BPNL000000000099", vec![credential()]);
        let v = serde_json::to_value(&vp).unwrap();
        assert_eq!(v["type"][0], PRESENTATION_TYPE);
        assert_eq!(v["verifiableCredential"].as_array().unwrap().len(), 1);
        assert!(v["id"].as_str().unwrap().starts_with("did:web:h:BPNL000000000099#"));
    }
}
