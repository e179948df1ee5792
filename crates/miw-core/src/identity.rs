//! # Identity Value Objects
//!
//! Validated identifiers for wallets and credentials. Each type checks its
//! full input against a fixed grammar at construction time and is immutable
//! afterwards.
//!
//! ## Grammars
//!
//! - BPN: `BPN[ALS][0-9a-f]{12}`
//! - DID: `did:web:<host>[%3A<port>]:<BPN>` where host is lowercase
//!   `[a-z0-9.-]+` and port is 2 to 5 digits
//! - Credential id: `<DID>#<UUID>`
//!
//! The DID and BPN checks are two independent patterns evaluated in that
//! order. They are not derived from a shared grammar.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static BPN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BPN[ALS][0-9a-f]{12}$").unwrap());

static DID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^did:web:[a-z0-9.\-]+(%3A\d{2,5})?:BPN[ALS][0-9a-f]{12}$").unwrap()
});

static CREDENTIAL_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^did:web:[a-z0-9.\-]+(%3A\d{2,5})?:BPN[ALS][0-9a-f]{12}#[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
    )
    .unwrap()
});

/// Routes deserialization through the type's validating constructor so
/// invalid values are rejected at the serde boundary too.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Shared string accessors for the validated newtypes.
macro_rules! impl_str_newtype {
    ($ty:ident) => {
        impl $ty {
            /// The validated string, unchanged from construction input.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// BPN
// ---------------------------------------------------------------------------

/// Business Partner Number identifying an organization.
///
/// ```
/// use miw_core::Bpn;
///
/// let bpn = Bpn::new("BPNL000000000099").unwrap();
/// assert_eq!(bpn.as_str(), "BPNL000000000099");
/// assert!(Bpn::new("BPNX000000000099").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Bpn(String);

impl_validating_deserialize!(Bpn);
impl_str_newtype!(Bpn);

impl Bpn {
    /// Create a BPN, validating the full string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidBpn`] if the input does not match
    /// `BPN[ALS][0-9a-f]{12}`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if BPN_REGEX.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(ValidationError::InvalidBpn(s))
        }
    }

    /// Returns `true` if the string is a well-formed BPN.
    pub fn is_valid(s: &str) -> bool {
        BPN_REGEX.is_match(s)
    }
}

// ---------------------------------------------------------------------------
// Identifier
// ---------------------------------------------------------------------------

/// A wallet reference supplied by a caller: either a `did:web` DID or a
/// bare BPN. The classification is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    value: String,
    is_did: bool,
}

impl Identifier {
    /// Create an identifier, classifying it as DID or BPN.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidIdentifier`] if neither pattern
    /// matches the full string.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if DID_REGEX.is_match(&value) {
            return Ok(Self {
                value,
                is_did: true,
            });
        }
        if BPN_REGEX.is_match(&value) {
            return Ok(Self {
                value,
                is_did: false,
            });
        }
        Err(ValidationError::InvalidIdentifier(value))
    }

    /// The validated string, unchanged from construction input.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `true` for a `did:web` DID, `false` for a bare BPN.
    pub fn is_did(&self) -> bool {
        self.is_did
    }

    /// The BPN this identifier names. For a DID this is its final
    /// colon-separated segment.
    pub fn bpn(&self) -> Result<Bpn, ValidationError> {
        if self.is_did {
            let tail = self.value.rsplit(':').next().unwrap_or_default();
            Bpn::new(tail)
        } else {
            Bpn::new(self.value.clone())
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl std::str::FromStr for Identifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<Bpn> for Identifier {
    fn from(bpn: Bpn) -> Self {
        Self {
            value: bpn.into_inner(),
            is_did: false,
        }
    }
}

impl Serialize for Identifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl_validating_deserialize!(Identifier);

// ---------------------------------------------------------------------------
// CredentialId
// ---------------------------------------------------------------------------

/// A credential identifier: a DID URL whose fragment is a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CredentialId(String);

impl_validating_deserialize!(CredentialId);
impl_str_newtype!(CredentialId);

impl CredentialId {
    /// Create a credential id, validating the full string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCredentialId`] on mismatch.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if CREDENTIAL_ID_REGEX.is_match(&s) {
            Ok(Self(s))
        } else {
            Err(ValidationError::InvalidCredentialId(s))
        }
    }

    /// Parse an optional search filter. An absent value means "no filter"
    /// and is not validated; a present value must be well formed.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<Self>, ValidationError> {
        value.map(Self::new).transpose()
    }

    /// The DID part, before the `#`.
    pub fn did(&self) -> &str {
        self.0.split_once('#').map(|(did, _)| did).unwrap_or(&self.0)
    }

    /// The UUID fragment, after the `#`.
    pub fn fragment(&self) -> &str {
        self.0.split_once('#').map(|(_, frag)| frag).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpn_accepts_all_prefix_letters() {
        for bpn in ["BPNL000000000099", "BPNA0123456789ab", "BPNS00000000cafe"] {
            assert_eq!(Bpn::new(bpn).unwrap().as_str(), bpn);
        }
    }

    #[test]
    fn bpn_rejects_malformed() {
        for bad in [
            "",
            "BPNL",
            "BPNX000000000099",
            "BPNL00000000009",
            "BPNL0000000000999",
            "BPNL00000000009Z",
            "bpnl000000000099",
            " BPNL000000000099",
        ] {
            assert!(
                matches!(Bpn::new(bad), Err(ValidationError::InvalidBpn(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn identifier_classifies_did() {
        let id = Identifier::new("did:web:localhost:BPNL000000000099").unwrap();
        assert!(id.is_did());
        assert_eq!(id.bpn().unwrap().as_str(), "BPNL000000000099");
    }

    #[test]
    fn identifier_classifies_did_with_port() {
        let id = Identifier::new("did:web:localhost%3A8080:BPNL000000000099").unwrap();
        assert!(id.is_did());
    }

    #[test]
    fn identifier_classifies_bpn() {
        let id = Identifier::new("BPNL000000000099").unwrap();
        assert!(!id.is_did());
        assert_eq!(id.value(), "BPNL000000000099");
    }

    #[test]
    fn identifier_rejects_other_strings() {
        for bad in [
            "did:key:z6Mk",
            "did:web:localhost",
            "did:web:Localhost:BPNL000000000099",
            "did:web:localhost:8080:BPNL000000000099",
            "did:web:localhost%3A8:BPNL000000000099",
            "BPNL000000000099 ",
            "hello",
        ] {
            assert!(
                matches!(Identifier::new(bad), Err(ValidationError::InvalidIdentifier(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn credential_id_parts() {
        let raw = "did:web:example.com:BPNL000000000099#4bd0a3c4-6c4f-4a52-9d5b-6d3ee4ebf0f4";
        let id = CredentialId::new(raw).unwrap();
        assert_eq!(id.did(), "did:web:example.com:BPNL000000000099");
        assert_eq!(id.fragment(), "4bd0a3c4-6c4f-4a52-9d5b-6d3ee4ebf0f4");
    }

    #[test]
    fn credential_id_absent_means_no_filter() {
        assert_eq!(CredentialId::parse_optional(None).unwrap(), None);
    }

    #[test]
    fn credential_id_present_must_match() {
        assert!(CredentialId::parse_optional(Some("not-a-credential")).is_err());
        assert!(CredentialId::parse_optional(Some("did:web:example.com:BPNL000000000099")).is_err());
    }

    #[test]
    fn serde_rejects_invalid_values() {
        assert!(serde_json::from_str::<Bpn>(r#""BPNQ000000000000""#).is_err());
        let id: Identifier = serde_json::from_str(r#""BPNL000000000099""#).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""BPNL000000000099""#);
    }
}
