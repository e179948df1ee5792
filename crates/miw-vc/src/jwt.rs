//! # Presentation JWTs
//!
//! A presentation may travel as a compact EdDSA JWS whose claims carry the
//! unsigned presentation in `vp`. [`Jwt::parse`] decodes the structure
//! without checking the signature so the issuer DID can be resolved first;
//! [`Jwt::verify`] then checks the signature against the resolved key.
//!
//! Expiry and audience are read from the claims by the caller and reported
//! as data, so `jsonwebtoken`'s own `exp`/`aud` validation is disabled.

use std::collections::HashSet;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use miw_crypto::{SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VcError;
use crate::presentation::VerifiablePresentation;

/// Lifetime of a presentation token, in seconds.
pub const JWT_VALIDITY_SECS: i64 = 3600;

/// Claims of a presentation token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationClaims {
    /// Holder DID.
    pub iss: String,
    /// Holder DID.
    pub sub: String,
    /// Intended verifier, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
    /// Token id.
    pub jti: String,
    /// The presentation.
    pub vp: VerifiablePresentation,
}

impl PresentationClaims {
    /// Claims for `vp` presented by `holder_did`, valid for
    /// [`JWT_VALIDITY_SECS`] from `now`.
    pub fn new(
        holder_did: &str,
        audience: Option<String>,
        vp: VerifiablePresentation,
        now: DateTime<Utc>,
    ) -> Self {
        let iat = now.timestamp();
        Self {
            iss: holder_did.to_string(),
            sub: holder_did.to_string(),
            aud: audience,
            iat,
            exp: iat + JWT_VALIDITY_SECS,
            jti: Uuid::new_v4().to_string(),
            vp,
        }
    }
}

/// A parsed compact presentation token.
#[derive(Debug, Clone, PartialEq)]
pub struct Jwt {
    raw: String,
    header: Header,
    claims: PresentationClaims,
}

impl Jwt {
    /// Parse a compact token without checking its signature.
    ///
    /// # Errors
    ///
    /// Returns [`VcError::Jwt`] for a malformed token, a non-EdDSA
    /// algorithm, or claims that are not a presentation.
    pub fn parse(token: &str) -> Result<Self, VcError> {
        let token = token.trim();
        let mut validation = lenient_validation();
        validation.insecure_disable_signature_validation();
        let data = decode::<PresentationClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| VcError::Jwt(e.to_string()))?;
        if data.header.alg != Algorithm::EdDSA {
            return Err(VcError::Jwt(format!(
                "unsupported algorithm {:?}",
                data.header.alg
            )));
        }
        Ok(Self {
            raw: token.to_string(),
            header: data.header,
            claims: data.claims,
        })
    }

    /// Sign `claims` with `key`. `kid` is placed in the header.
    pub fn sign(
        claims: PresentationClaims,
        key: &SigningKey,
        kid: Option<String>,
    ) -> Result<Self, VcError> {
        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = kid;
        let der = key.to_pkcs8_v1_der()?;
        let raw = encode(&header, &claims, &EncodingKey::from_ed_der(&der))
            .map_err(|e| VcError::Jwt(e.to_string()))?;
        Ok(Self { raw, header, claims })
    }

    /// Check the token signature with `key`.
    pub fn verify(&self, key: &VerifyingKey) -> Result<(), VcError> {
        let decoding = DecodingKey::from_ed_components(&URL_SAFE_NO_PAD.encode(key.as_bytes()))
            .map_err(|e| VcError::Jwt(e.to_string()))?;
        decode::<PresentationClaims>(&self.raw, &decoding, &lenient_validation())
            .map(|_| ())
            .map_err(|e| VcError::VerificationFailed(e.to_string()))
    }

    /// The compact serialization.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The JOSE header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// The decoded claims.
    pub fn claims(&self) -> &PresentationClaims {
        &self.claims
    }

    /// `kid` from the header.
    pub fn key_id(&self) -> Option<&str> {
        self.header.kid.as_deref()
    }

    /// `true` if `exp` lies before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.claims.exp < now.timestamp()
    }

    /// `true` if the token names `audience` as its `aud`.
    pub fn audience_matches(&self, audience: &str) -> bool {
        self.claims.aud.as_deref() == Some(audience)
    }
}

impl std::fmt::Display for Jwt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for Jwt {
    type Err = VcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Jwt {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Jwt {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// EdDSA only; `exp`, `aud` and required-claim checks left to the caller.
fn lenient_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();
    validation
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const HOLDER: &str = "did:web:localhost:BPNL000000000099";

    fn signed(aud: Option<&str>, now: DateTime<Utc>) -> (Jwt, SigningKey) {
        let key = SigningKey::from_bytes(&[11u8; 32]);
        let vp = VerifiablePresentation::new(HOLDER, vec![]);
        let claims = PresentationClaims::new(HOLDER, aud.map(str::to_string), vp, now);
        let jwt = Jwt::sign(claims, &key, Some(format!("{HOLDER}#k"))).unwrap();
        (jwt, key)
    }

    #[test]
    fn sign_parse_verify() {
        let (jwt, key) = signed(Some("verifier"), Utc::now());
        let parsed = Jwt::parse(jwt.as_str()).unwrap();
        assert_eq!(parsed.claims().iss, HOLDER);
        assert_eq!(parsed.claims().sub, HOLDER);
        assert_eq!(parsed.key_id(), Some("did:web:localhost:BPNL000000000099#k"));
        assert!(parsed.audience_matches("verifier"));
        assert!(!parsed.audience_matches("someone-else"));
        parsed.verify(&key.verifying_key()).unwrap();
    }

    #[test]
    fn absent_audience_is_omitted() {
        let (jwt, _) = signed(None, Utc::now());
        let payload = jwt.as_str().split('.').nth(1).unwrap();
        let json = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();
        assert!(!json.contains("\"aud\""));
    }

    #[test]
    fn wrong_key_fails() {
        let (jwt, _) = signed(None, Utc::now());
        let other = SigningKey::from_bytes(&[12u8; 32]);
        assert!(matches!(
            jwt.verify(&other.verifying_key()),
            Err(VcError::VerificationFailed(_))
        ));
    }

    #[test]
    fn expiry_is_data_not_a_parse_error() {
        let (jwt, key) = signed(None, Utc::now() - Duration::hours(2));
        let parsed = Jwt::parse(jwt.as_str()).unwrap();
        assert!(parsed.is_expired_at(Utc::now()));
        parsed.verify(&key.verifying_key()).unwrap();
    }

    #[test]
    fn malformed_tokens_rejected() {
        for bad in ["", "abc", "a.b", "a.b.c"] {
            assert!(matches!(Jwt::parse(bad), Err(VcError::Jwt(_))), "{bad:?}");
        }
    }

    #[test]
    fn serde_as_string() {
        let (jwt, _) = signed(None, Utc::now());
        let json = serde_json::to_string(&jwt).unwrap();
        let back: Jwt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, jwt);
    }
}
