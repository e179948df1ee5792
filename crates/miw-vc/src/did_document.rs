//! # DID Documents
//!
//! The `did:web` document a wallet publishes. Each key appears as a
//! `JsonWebKey2020` verification method carrying an Ed25519 OKP JWK, and is
//! referenced from `authentication` and `assertionMethod`.
//!
//! The `@context` list is the DID-core defaults followed by caller-supplied
//! URLs, first-seen order, duplicates dropped.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use miw_crypto::VerifyingKey;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::VcError;

/// DID-core v1 context.
pub const DID_V1_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// JsonWebKey2020 suite context.
pub const JWS_2020_CONTEXT: &str = "https://w3id.org/security/suites/jws-2020/v1";

/// Verification method type used for wallet keys.
pub const JSON_WEB_KEY_2020: &str = "JsonWebKey2020";

/// An Ed25519 public key as an OKP JWK (RFC 8037).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyJwk {
    /// Key type, `OKP`.
    pub kty: String,
    /// Curve, `Ed25519`.
    pub crv: String,
    /// Base64url (unpadded) public key bytes.
    pub x: String,
}

impl PublicKeyJwk {
    /// Encode an Ed25519 public key.
    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        Self {
            kty: "OKP".to_string(),
            crv: "Ed25519".to_string(),
            x: URL_SAFE_NO_PAD.encode(key.as_bytes()),
        }
    }

    /// Decode back to an Ed25519 public key.
    pub fn to_verifying_key(&self) -> Result<VerifyingKey, VcError> {
        if self.kty != "OKP" || self.crv != "Ed25519" {
            return Err(VcError::InvalidDidDocument(format!(
                "unsupported JWK {}/{}",
                self.kty, self.crv
            )));
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(&self.x)
            .map_err(|e| VcError::InvalidDidDocument(format!("JWK x: {e}")))?;
        Ok(VerifyingKey::from_slice(&bytes)?)
    }
}

/// A verification method (public key) in a DID document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// `<did>#<key id>`.
    pub id: String,
    /// Method type, `JsonWebKey2020`.
    #[serde(rename = "type")]
    pub method_type: String,
    /// Controller DID.
    pub controller: String,
    /// The public key.
    pub public_key_jwk: PublicKeyJwk,
}

impl VerificationMethod {
    /// A `JsonWebKey2020` method for `key` under `<did>#<key_id>`.
    pub fn json_web_key(did: &str, key_id: &str, key: &VerifyingKey) -> Self {
        Self {
            id: format!("{did}#{key_id}"),
            method_type: JSON_WEB_KEY_2020.to_string(),
            controller: did.to_string(),
            public_key_jwk: PublicKeyJwk::from_verifying_key(key),
        }
    }
}

/// A DID document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    /// JSON-LD contexts.
    #[serde(rename = "@context")]
    pub context: Vec<Url>,
    /// The DID.
    pub id: String,
    /// Public keys.
    pub verification_method: Vec<VerificationMethod>,
    /// Method ids usable for authentication.
    #[serde(default)]
    pub authentication: Vec<String>,
    /// Method ids usable for assertions.
    #[serde(default)]
    pub assertion_method: Vec<String>,
}

impl DidDocument {
    /// Assemble a document for `did` with the given methods.
    ///
    /// # Errors
    ///
    /// Returns [`VcError::InvalidDidDocument`] if `methods` is empty.
    pub fn build(
        did: &str,
        extra_contexts: &[Url],
        methods: Vec<VerificationMethod>,
    ) -> Result<Self, VcError> {
        if methods.is_empty() {
            return Err(VcError::InvalidDidDocument(
                "at least one verification method is required".to_string(),
            ));
        }
        let refs: Vec<String> = methods.iter().map(|m| m.id.clone()).collect();
        Ok(Self {
            context: merge_contexts(&default_contexts()?, extra_contexts),
            id: did.to_string(),
            verification_method: methods,
            authentication: refs.clone(),
            assertion_method: refs,
        })
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, VcError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self, VcError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a verification method by its full id.
    pub fn verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.verification_method.iter().find(|m| m.id == id)
    }

    /// The public key for `method_id`, or the first method's key when no
    /// id is given.
    pub fn verifying_key(&self, method_id: Option<&str>) -> Result<VerifyingKey, VcError> {
        let method = match method_id {
            Some(id) => self.verification_method(id),
            None => self.verification_method.first(),
        };
        let method = method.ok_or_else(|| {
            VcError::VerificationMethodNotFound(method_id.unwrap_or(&self.id).to_string())
        })?;
        method.public_key_jwk.to_verifying_key()
    }
}

/// The DID-core default contexts, in order.
pub fn default_contexts() -> Result<Vec<Url>, VcError> {
    [DID_V1_CONTEXT, JWS_2020_CONTEXT]
        .iter()
        .map(|u| Url::parse(u).map_err(|e| VcError::InvalidDidDocument(e.to_string())))
        .collect()
}

/// `base` followed by the members of `extra` not already present.
pub fn merge_contexts(base: &[Url], extra: &[Url]) -> Vec<Url> {
    let mut merged: Vec<Url> = Vec::with_capacity(base.len() + extra.len());
    for url in base.iter().chain(extra) {
        if !merged.contains(url) {
            merged.push(url.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use miw_crypto::SigningKey;

    const DID: &str = "did:web:localhost:BPNL000000000000";

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn doc(extra: &[Url]) -> DidDocument {
        let key = SigningKey::from_bytes(&[8u8; 32]).verifying_key();
        let vm = VerificationMethod::json_web_key(DID, "key-1", &key);
        DidDocument::build(DID, extra, vec![vm]).unwrap()
    }

    #[test]
    fn defaults_come_first() {
        let d = doc(&[url("https://example.com/ctx")]);
        let ctx: Vec<&str> = d.context.iter().map(Url::as_str).collect();
        assert_eq!(ctx, vec![DID_V1_CONTEXT, JWS_2020_CONTEXT, "https://example.com/ctx"]);
    }

    #[test]
    fn duplicate_contexts_suppressed() {
        let d = doc(&[
            url(DID_V1_CONTEXT),
            url("https://example.com/a"),
            url("https://example.com/a"),
        ]);
        assert_eq!(d.context.len(), 3);
    }

    #[test]
    fn json_round_trip() {
        let d = doc(&[]);
        let json = d.to_json().unwrap();
        assert!(json.contains("\"@context\""));
        assert!(json.contains("\"verificationMethod\""));
        assert!(json.contains("\"publicKeyJwk\""));
        assert_eq!(DidDocument::from_json(&json).unwrap(), d);
    }

    #[test]
    fn key_lookup() {
        let d = doc(&[]);
        let expected = SigningKey::from_bytes(&[8u8; 32]).verifying_key();
        assert_eq!(d.verifying_key(Some(&format!("{DID}#key-1"))).unwrap(), expected);
        assert_eq!(d.verifying_key(None).unwrap(), expected);
        assert!(matches!(
            d.verifying_key(Some("did:web:x#nope")),
            Err(VcError::VerificationMethodNotFound(_))
        ));
    }

    #[test]
    fn build_requires_a_method() {
        assert!(matches!(
            DidDocument::build(DID, &[], vec![]),
            Err(VcError::InvalidDidDocument(_))
        ));
    }

    #[test]
    fn jwk_rejects_other_curves() {
        let jwk = PublicKeyJwk {
            kty: "OKP".into(),
            crv: "X25519".into(),
            x: String::new(),
        };
        assert!(jwk.to_verifying_key().is_err());
    }
}
