//! # Verifiable Credentials
//!
//! The [`VerifiableCredential`] envelope is typed; `credentialSubject` and
//! any members this crate does not model are kept as JSON so a stored
//! third-party credential re-serializes to the same signing input.
//!
//! Signing canonicalizes the credential without `proof` via
//! [`CanonicalBytes`](miw_core::CanonicalBytes) and attaches an
//! `Ed25519Signature2020` proof. Verification recomputes the same input.

use chrono::{DateTime, SubsecRound, Utc};
use miw_core::BASE_CREDENTIAL_TYPE;
use miw_crypto::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::VcError;
use crate::proof::{signing_input, Proof, ProofPurpose};

/// The W3C credentials v1 JSON-LD context.
pub const W3C_CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// A W3C Verifiable Credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifiableCredential {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: ContextValue,

    /// Credential id, `<issuer DID>#<uuid>` for credentials minted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Credential types. Includes `VerifiableCredential`.
    #[serde(rename = "type")]
    pub credential_type: CredentialTypeValue,

    /// Issuer DID.
    pub issuer: String,

    /// Issuance time (UTC).
    #[serde(rename = "issuanceDate")]
    pub issuance_date: DateTime<Utc>,

    /// Optional expiry (UTC).
    #[serde(
        rename = "expirationDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration_date: Option<DateTime<Utc>>,

    /// The claims. Extensible per the data model.
    #[serde(rename = "credentialSubject")]
    pub credential_subject: Value,

    /// Issuer proof.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Proof>,

    /// Members not modelled above (`credentialStatus`, `evidence`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// JSON-LD `@context`: a single URI or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// Single context URI string.
    Single(String),
    /// Array of context URI strings or inline objects.
    Array(Vec<Value>),
}

impl ContextValue {
    /// An array context from parsed URLs, in order.
    pub fn from_urls(urls: &[Url]) -> Self {
        Self::Array(urls.iter().map(|u| Value::String(u.to_string())).collect())
    }

    /// `true` if the string URI `uri` is present.
    pub fn contains(&self, uri: &str) -> bool {
        match self {
            ContextValue::Single(s) => s == uri,
            ContextValue::Array(items) => items.iter().any(|v| v.as_str() == Some(uri)),
        }
    }
}

impl Default for ContextValue {
    fn default() -> Self {
        Self::Array(vec![Value::String(W3C_CREDENTIALS_CONTEXT.to_string())])
    }
}

/// Credential `type`: a single string or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CredentialTypeValue {
    /// Single type string.
    Single(String),
    /// Array of type strings.
    Array(Vec<String>),
}

impl CredentialTypeValue {
    /// All declared types.
    pub fn types(&self) -> Vec<&str> {
        match self {
            CredentialTypeValue::Single(s) => vec![s.as_str()],
            CredentialTypeValue::Array(arr) => arr.iter().map(String::as_str).collect(),
        }
    }

    /// `true` if `ty` is declared.
    pub fn contains(&self, ty: &str) -> bool {
        self.types().contains(&ty)
    }

    /// Declared types with `VerifiableCredential` removed, in order.
    pub fn without_base(&self) -> Vec<&str> {
        self.types()
            .into_iter()
            .filter(|t| *t != BASE_CREDENTIAL_TYPE)
            .collect()
    }
}

impl VerifiableCredential {
    /// An unsigned credential issued now.
    ///
    /// `types` lists the specific types; `VerifiableCredential` is always
    /// placed first.
    pub fn new(
        id: impl Into<String>,
        contexts: &[Url],
        types: &[&str],
        issuer: impl Into<String>,
        credential_subject: Value,
        expiration_date: Option<DateTime<Utc>>,
    ) -> Self {
        let mut all_types = vec![BASE_CREDENTIAL_TYPE.to_string()];
        all_types.extend(
            types
                .iter()
                .filter(|t| **t != BASE_CREDENTIAL_TYPE)
                .map(|t| t.to_string()),
        );
        let context = if contexts.is_empty() {
            ContextValue::default()
        } else {
            ContextValue::from_urls(contexts)
        };
        Self {
            context,
            id: Some(id.into()),
            credential_type: CredentialTypeValue::Array(all_types),
            issuer: issuer.into(),
            issuance_date: Utc::now().trunc_subsecs(0),
            expiration_date,
            credential_subject,
            proof: None,
            extra: Map::new(),
        }
    }

    /// Canonical signing input: this credential without `proof`.
    pub fn signing_input(&self) -> Result<miw_core::CanonicalBytes, VcError> {
        signing_input(self)
    }

    /// Sign as issuer, replacing any existing proof.
    pub fn sign(
        &mut self,
        key: &SigningKey,
        verification_method: impl Into<String>,
    ) -> Result<(), VcError> {
        self.proof = None;
        let input = self.signing_input()?;
        self.proof = Some(Proof::sign(
            &input,
            key,
            verification_method,
            ProofPurpose::AssertionMethod,
        ));
        Ok(())
    }

    /// Verify the issuer proof with `key`. Expiry is not checked here.
    pub fn verify(&self, key: &VerifyingKey) -> Result<(), VcError> {
        let proof = self.proof.as_ref().ok_or(VcError::MissingProof)?;
        let input = self.signing_input()?;
        proof.verify(&input, key)
    }

    /// The proof's verification method, if signed.
    pub fn verification_method(&self) -> Option<&str> {
        self.proof.as_ref().map(|p| p.verification_method.as_str())
    }

    /// `true` if an expiration date is set and lies before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|exp| exp < now)
    }

    /// `credentialSubject.id`, when the subject is a single object.
    pub fn subject_id(&self) -> Option<&str> {
        self.credential_subject.get("id").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn sample() -> VerifiableCredential {
        VerifiableCredential::new(
            "did:web:localhost:BPNL000000000000#0d9c5e53-7f55-4d8f-93a4-7f3c0f6e4a11",
            &[],
            &["BpnCredential"],
            "did:web:localhost:BPNL000000000000",
            json!({"id": "did:web:localhost:BPNL000000000099", "bpn": "BPNL000000000099"}),
            None,
        )
    }

    #[test]
    fn new_places_base_type_first() {
        let vc = sample();
        assert_eq!(vc.credential_type.types(), vec!["VerifiableCredential", "BpnCredential"]);
        assert_eq!(vc.credential_type.without_base(), vec!["BpnCredential"]);
        assert!(vc.context.contains(W3C_CREDENTIALS_CONTEXT));
    }

    #[test]
    fn sign_then_verify() {
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let mut vc = sample();
        vc.sign(&key, "did:web:localhost:BPNL000000000000#k1").unwrap();
        vc.verify(&key.verifying_key()).unwrap();
        assert_eq!(vc.verification_method(), Some("did:web:localhost:BPNL000000000000#k1"));
    }

    #[test]
    fn tampered_subject_fails() {
        let key = SigningKey::from_bytes(&[1u8; 32]);
        let mut vc = sample();
        vc.sign(&key, "vm").unwrap();
        vc.credential_subject["bpn"] = json!("BPNL000000000098");
        assert!(matches!(
            vc.verify(&key.verifying_key()),
            Err(VcError::VerificationFailed(_))
        ));
    }

    #[test]
    fn unsigned_credential_has_no_proof() {
        let key = SigningKey::from_bytes(&[1u8; 32]);
        assert!(matches!(sample().verify(&key.verifying_key()), Err(VcError::MissingProof)));
    }

    #[test]
    fn json_round_trip_keeps_signature_valid() {
        let key = SigningKey::from_bytes(&[2u8; 32]);
        let mut vc = sample();
        vc.extra.insert("credentialStatus".into(), json!({"id": "urn:status:1"}));
        vc.sign(&key, "vm").unwrap();
        let json = serde_json::to_string(&vc).unwrap();
        let back: VerifiableCredential = serde_json::from_str(&json).unwrap();
        assert_eq!(back.extra["credentialStatus"]["id"], "urn:status:1");
        back.verify(&key.verifying_key()).unwrap();
    }

    #[test]
    fn expiry() {
        let mut vc = sample();
        let now = Utc::now();
        assert!(!vc.is_expired_at(now));
        vc.expiration_date = Some(now - Duration::days(1));
        assert!(vc.is_expired_at(now));
    }

    #[test]
    fn single_type_string_parses() {
        let raw = json!({
            "@context": W3C_CREDENTIALS_CONTEXT,
            "type": "VerifiableCredential",
            "issuer": "did:web:a:BPNL000000000000",
            "issuanceDate": "2024-01-01T00:00:00Z",
            "credentialSubject": {"id": "x"}
        });
        let vc: VerifiableCredential = serde_json::from_value(raw).unwrap();
        assert!(vc.credential_type.without_base().is_empty());
        assert_eq!(vc.subject_id(), Some("x"));
    }
}
