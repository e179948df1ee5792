//! # Canonical Serialization
//!
//! `CanonicalBytes` is the only byte sequence the workspace signs or
//! verifies. It is produced by RFC 8785 (JCS) serialization, so the same
//! credential always yields the same signing input regardless of field
//! order or number formatting in the source JSON. Decimal claims are
//! serialized with the ECMAScript number rules JCS prescribes.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// # Invariants
///
/// - The inner `Vec<u8>` is private; construction goes through
///   [`CanonicalBytes::new()`] or [`CanonicalBytes::from_value()`].
/// - Object keys are sorted, separators compact.
/// - Numbers use the shortest round-tripping ECMAScript form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalizationError::SerializationFailed`] if the value
    /// cannot be represented as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::from_value(value)
    }

    /// Canonicalize an already-built JSON value.
    pub fn from_value(value: Value) -> Result<Self, CanonicalizationError> {
        let bytes = serde_jcs::to_vec(&value)?;
        Ok(Self(bytes))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted() {
        let cb = CanonicalBytes::new(&json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"a":2,"b":1}"#);
    }

    #[test]
    fn field_order_does_not_change_bytes() {
        let a = CanonicalBytes::new(&json!({"x": {"q": true, "p": null}, "y": [1, 2]})).unwrap();
        let b = CanonicalBytes::new(&json!({"y": [1, 2], "x": {"p": null, "q": true}})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decimal_claims_are_canonicalized() {
        let cb = CanonicalBytes::new(&json!({"pcf": 2.50, "ratio": [{"b": 1.5}]})).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"pcf":2.5,"ratio":[{"b":1.5}]}"#);
    }

    #[test]
    fn decimal_formatting_does_not_change_bytes() {
        let a: Value = serde_json::from_str(r#"{"v": 2.50}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"v": 25e-1}"#).unwrap();
        assert_eq!(
            CanonicalBytes::from_value(a).unwrap(),
            CanonicalBytes::from_value(b).unwrap()
        );
    }

    #[test]
    fn strings_and_integers_pass() {
        let cb = CanonicalBytes::new(&json!({"n": -7, "s": "1.5"})).unwrap();
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), cb.as_ref().len());
    }
}
